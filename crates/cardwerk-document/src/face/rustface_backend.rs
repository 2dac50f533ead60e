// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Built-in face detector backed by the `rustface` crate (SeetaFace engine).

use std::path::Path;

use cardwerk_core::error::{CardwerkError, Result};
use cardwerk_core::types::{DetectionParams, FaceBox};
use image::GrayImage;
use tracing::info;

use super::FaceDetector;

/// SeetaFace score threshold; SeetaFace has no neighbour-count parameter,
/// so `min_neighbors` only raises this threshold above the base value.
const BASE_SCORE_THRESHOLD: f64 = 2.0;

/// Face detector loading a SeetaFace frontal model from disk.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load the model file at `path`.
    pub fn from_model_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|err| {
            CardwerkError::TemplateOrFontMissing(format!(
                "face model {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        let model = rustface::read_model(std::io::BufReader::new(file)).map_err(|err| {
            CardwerkError::TemplateOrFontMissing(format!(
                "face model {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(path = %path.as_ref().display(), "SeetaFace model loaded");
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &GrayImage, params: &DetectionParams) -> Vec<FaceBox> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(params.min_width.min(params.min_height));
        detector.set_score_thresh(BASE_SCORE_THRESHOLD + params.min_neighbors as f64 * 0.1);
        detector.set_pyramid_scale_factor(1.0 / params.scale_factor);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(
            gray.as_raw(),
            gray.width(),
            gray.height(),
        ));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBox::new(
                    bbox.x().max(0) as u32,
                    bbox.y().max(0) as u32,
                    bbox.width(),
                    bbox.height(),
                )
            })
            .filter(|face| face.width >= params.min_width && face.height >= params.min_height)
            .collect()
    }
}
