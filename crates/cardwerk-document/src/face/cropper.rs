// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face cropper — square portrait crop centred on a chosen face.
//
// The larger face dimension is taken to fill `target_face_size` of the crop
// side. The crop is clipped to the image on each side independently and is
// not re-centred afterwards, so a face near an edge yields a non-square
// region that the final centre-square step normalises.

use cardwerk_core::error::{CardwerkError, Result};
use cardwerk_core::types::{FaceBox, PortraitSource};
use image::DynamicImage;
use tracing::{debug, info, instrument};

use super::FaceLocator;
use crate::image::{ImageProcessor, Photo};

/// Half-open pixel box `[left, right) x [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Produces square portraits from photos.
#[derive(Clone)]
pub struct FaceCropper {
    locator: FaceLocator,
}

impl FaceCropper {
    pub fn new(locator: FaceLocator) -> Self {
        Self { locator }
    }

    /// Square portrait for `photo` according to `source`.
    pub fn portrait(&self, photo: &Photo, source: PortraitSource) -> Result<DynamicImage> {
        match source {
            PortraitSource::Detect {
                target_face_size,
                face_index,
            } => self.crop_to_face(photo, target_face_size, face_index),
            PortraitSource::Force => Ok(to_square(photo.image().clone())),
        }
    }

    /// Crop `photo` to a square centred on its `face_index`-th face (1-based,
    /// counted left to right).
    ///
    /// An index past the last face selects the last face; 0 selects the
    /// first. Fails with `NoFaceDetected` when the photo has no faces.
    #[instrument(skip(self, photo))]
    pub fn crop_to_face(
        &self,
        photo: &Photo,
        target_face_size: f64,
        face_index: usize,
    ) -> Result<DynamicImage> {
        if !(target_face_size > 0.0 && target_face_size <= 1.0) {
            return Err(CardwerkError::InvalidFaceSize(target_face_size));
        }

        let faces = self.locator.locate(photo)?;
        let face = select_face(&faces, face_index).ok_or(CardwerkError::NoFaceDetected)?;

        let image = photo.image();
        let region = crop_region(image.width(), image.height(), &face, target_face_size);
        info!(?face, ?region, "Cropping to face");

        let cropped = ImageProcessor::from_dynamic(image.clone())
            .crop_box(region.left, region.top, region.right, region.bottom)
            .to_square();
        Ok(cropped.into_dynamic())
    }
}

/// The `face_index`-th face (1-based), clamped to the available faces.
pub fn select_face(faces: &[FaceBox], face_index: usize) -> Option<FaceBox> {
    if faces.is_empty() {
        return None;
    }
    let index = face_index.clamp(1, faces.len()) - 1;
    Some(faces[index])
}

/// Crop box for `face` in an image of `width` x `height`.
///
/// `crop = floor(max(face_w, face_h) / target)`, halved after clamping to
/// the smaller image dimension, centred on the face centre, clipped to the
/// image on every side.
pub fn crop_region(width: u32, height: u32, face: &FaceBox, target_face_size: f64) -> CropBox {
    let desired = (face.longest_side() as f64 / target_face_size).floor() as i64;
    let half = desired.min(width as i64).min(height as i64) / 2;

    let (cx, cy) = face.center();
    let (cx, cy) = (cx as i64, cy as i64);

    let region = CropBox {
        left: (cx - half).max(0) as u32,
        top: (cy - half).max(0) as u32,
        right: (cx + half).min(width as i64) as u32,
        bottom: (cy + half).min(height as i64) as u32,
    };
    debug!(desired, half, ?region, "Crop region");
    region
}

/// Centre-square crop. Used on its own for the forced path and after every
/// face crop.
pub fn to_square(image: DynamicImage) -> DynamicImage {
    ImageProcessor::from_dynamic(image).to_square().into_dynamic()
}
