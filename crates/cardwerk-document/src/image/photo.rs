// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source photo: the encoded bytes a face fingerprint is taken from, paired
// with the decoded pixels.

use std::path::Path;

use cardwerk_core::error::{CardwerkError, Result};
use image::DynamicImage;
use tracing::instrument;

use super::ImageProcessor;

/// A user photo as uploaded.
#[derive(Debug, Clone)]
pub struct Photo {
    bytes: Vec<u8>,
    image: DynamicImage,
}

impl Photo {
    /// Read and decode a photo from disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|err| CardwerkError::unreadable(path.as_ref().display(), err))?;
        let image = image::load_from_memory(&bytes)
            .map_err(|err| CardwerkError::unreadable(path.as_ref().display(), err))?;
        Ok(Self { bytes, image })
    }

    /// Decode a photo from encoded bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let image = image::load_from_memory(&bytes)
            .map_err(|err| CardwerkError::unreadable("<memory>", err))?;
        Ok(Self { bytes, image })
    }

    /// Wrap a decoded image, encoding it as PNG for fingerprinting.
    pub fn from_image(image: DynamicImage) -> Result<Self> {
        let bytes = ImageProcessor::from_dynamic(image).to_png_bytes()?;
        Self::from_bytes(bytes)
    }

    /// Encoded bytes as read.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded pixels.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn from_image_keeps_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 7, Rgb([1, 2, 3])));
        let photo = Photo::from_image(img).unwrap();
        assert_eq!(photo.image().width(), 12);
        assert_eq!(photo.image().height(), 7);
        assert_eq!(&photo.bytes()[1..4], b"PNG");
    }

    #[test]
    fn open_missing_file_is_unreadable() {
        let err = Photo::open("/definitely/not/here.jpg").unwrap_err();
        assert!(matches!(err, CardwerkError::SourceImageUnreadable { .. }));
    }
}
