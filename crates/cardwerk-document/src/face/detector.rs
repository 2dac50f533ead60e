// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face detection capability.

use cardwerk_core::error::{CardwerkError, Result};
use cardwerk_core::types::{DetectionParams, FaceBox};
use image::GrayImage;

/// Pluggable multi-scale face detector.
///
/// Implementations must return the same rectangles for the same pixels and
/// parameters; the locator memoises results on that assumption. Order does
/// not matter, the locator sorts by `x`.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a grayscale image.
    fn detect(&self, gray: &GrayImage, params: &DetectionParams) -> Vec<FaceBox>;

    /// Whether [`detect`](Self::detect) can run at all. An empty detection
    /// result only means "no face" when this is `Ok`.
    fn ready(&self) -> Result<()> {
        Ok(())
    }
}

/// Stand-in used when no detector backend or model is available. It never
/// runs; every detection request fails with
/// [`CardwerkError::FaceDetectorUnavailable`], and only the forced
/// centre-square path works.
#[derive(Debug, Clone)]
pub struct UnavailableDetector {
    reason: String,
}

impl UnavailableDetector {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl FaceDetector for UnavailableDetector {
    fn detect(&self, _gray: &GrayImage, _params: &DetectionParams) -> Vec<FaceBox> {
        Vec::new()
    }

    fn ready(&self) -> Result<()> {
        Err(CardwerkError::FaceDetectorUnavailable(self.reason.clone()))
    }
}
