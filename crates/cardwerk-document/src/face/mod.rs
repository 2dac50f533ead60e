// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face module — content fingerprints, the memoising face locator, and the
// face-centred square cropper.

pub mod cache;
pub mod cropper;
pub mod detector;
pub mod fingerprint;
pub mod locator;
#[cfg(feature = "rustface")]
pub mod rustface_backend;

pub use cache::FaceCache;
pub use cropper::FaceCropper;
pub use detector::{FaceDetector, UnavailableDetector};
pub use fingerprint::Fingerprint;
pub use locator::FaceLocator;
#[cfg(feature = "rustface")]
pub use rustface_backend::RustfaceDetector;
