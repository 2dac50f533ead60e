// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cardwerk-document — Image work for the Cardwerk ID card generator.
//
// Provides face location and portrait cropping (with a content-keyed face
// cache), card composition onto a template, the on-disk card store, batch
// regeneration, and multi-page print sheet tiling.

pub mod batch;
pub mod card;
pub mod face;
pub mod image;
pub mod sheet;
pub mod store;

// Re-export the primary structs so callers can use `cardwerk_document::SheetTiler` etc.
pub use batch::regenerate_all;
pub use card::{CardAssets, CardComposer, ComposedCard};
pub use face::{FaceCache, FaceCropper, FaceDetector, FaceLocator, Fingerprint};
pub use self::image::{ImageProcessor, Photo};
pub use sheet::{SheetGeometry, SheetTiler};
pub use store::{CardStore, StoredCard};

#[cfg(feature = "rustface")]
pub use face::RustfaceDetector;
