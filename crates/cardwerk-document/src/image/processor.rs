// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — crop, centre-square, exact resize, and encoding for the
// card pipeline. Operates on in-memory images using the `image` crate.

use std::path::Path;

use cardwerk_core::error::{CardwerkError, Result};
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and returns a
/// new `ImageProcessor` wrapping the transformed image, enabling method chaining.
///
/// ```ignore
/// let portrait = ImageProcessor::open("photo.jpg")?
///     .to_square()
///     .resize_exact(440, 440)
///     .into_dynamic();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref())
            .map_err(|err| CardwerkError::unreadable(path.as_ref().display(), err))?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| CardwerkError::unreadable("<memory>", err))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Crop the image to its centre square.
    ///
    /// The longer axis loses `(long - short) / 2` pixels (floor) from its
    /// leading edge; an odd remainder is absorbed by the trailing edge. A
    /// square image is returned unchanged.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn to_square(self) -> Self {
        let (w, h) = (self.image.width(), self.image.height());
        if w == h {
            return self;
        }

        let side = w.min(h);
        let (x, y) = if w > h {
            ((w - h) / 2, 0)
        } else {
            (0, (h - w) / 2)
        };

        debug!(x, y, side, "Centre-square crop");
        Self {
            image: self.image.crop_imm(x, y, side, side),
        }
    }

    /// Crop the half-open pixel box `[left, right) x [top, bottom)`.
    ///
    /// Bounds are clamped to the image, so the box may come back smaller
    /// than requested.
    #[instrument(skip(self))]
    pub fn crop_box(self, left: u32, top: u32, right: u32, bottom: u32) -> Self {
        let right = right.min(self.image.width());
        let bottom = bottom.min(self.image.height());
        let left = left.min(right);
        let top = top.min(bottom);

        debug!(left, top, right, bottom, "Cropping image");
        Self {
            image: self.image.crop_imm(left, top, right - left, bottom - top),
        }
    }

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        let resized =
            self.image
                .resize_exact(width, height, image::imageops::FilterType::Lanczos3);
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100)
    /// and DPI density marker.
    pub fn to_jpeg_bytes(&self, quality: u8, dpi: u16) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        encoder.set_pixel_density(PixelDensity::dpi(dpi));
        rgb.write_with_encoder(encoder)
            .map_err(|err| CardwerkError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image as PNG through a temporary sibling file, so a failed
    /// write never leaves a partial file at `path`.
    pub fn save_png_atomic(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_png_bytes()?;
        write_atomic(path.as_ref(), &bytes)
    }
}

/// Write `bytes` to `path` via a `.part` sibling and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = std::path::PathBuf::from(partial);

    if let Err(err) = std::fs::write(&partial, bytes) {
        let _ = std::fs::remove_file(&partial);
        return Err(err.into());
    }
    std::fs::rename(&partial, path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "File written");
    Ok(())
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| CardwerkError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}
