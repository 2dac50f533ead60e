// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheet tiler — lays finished cards onto fixed-size pages and writes a
// multi-page PDF using `printpdf` 0.8.
//
// Each card is embedded as a DCT (JPEG) stream at the configured quality,
// so the PDF carries the lossy encoding rather than raw pixels. The source
// card is only read. An unreadable card aborts the whole run before any
// document is produced.

use std::path::{Path, PathBuf};

use cardwerk_core::config::SheetConfig;
use cardwerk_core::error::{CardwerkError, Result};
use cardwerk_core::types::SheetUnit;
use image::DynamicImage;
use printpdf::{
    ImageCompression, ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use super::geometry::{Placement, SheetGeometry};
use crate::image::ImageProcessor;
use crate::image::processor::write_atomic;

/// Points per inch.
const PT_PER_INCH: f32 = 72.0;

const DOCUMENT_TITLE: &str = "ID Cards";

/// Tiles card images onto print sheets.
pub struct SheetTiler {
    geometry: SheetGeometry,
    unit: SheetUnit,
    jpeg_quality: u8,
    dpi: u16,
    /// Where recompressed copies are kept, if anywhere.
    compressed_dir: Option<PathBuf>,
}

impl SheetTiler {
    /// Create a tiler for `config`. Geometry is derived once here.
    pub fn new(config: &SheetConfig) -> Result<Self> {
        let geometry = SheetGeometry::from_config(config)?;
        info!(
            frequency = ?geometry.frequency,
            spacing = ?geometry.spacing,
            "Sheet geometry"
        );
        Ok(Self {
            geometry,
            unit: config.unit,
            jpeg_quality: config.jpeg_quality,
            dpi: config.dpi,
            compressed_dir: None,
        })
    }

    /// Also write each recompressed JPEG into `dir`.
    pub fn with_compressed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.compressed_dir = Some(dir.into());
        self
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    /// Tile the card images at `paths`, in order, into PDF bytes.
    #[instrument(skip_all, fields(cards = paths.len()))]
    pub fn tile_files(&self, paths: &[PathBuf]) -> Result<Vec<u8>> {
        let mut embedded = Vec::with_capacity(paths.len());
        for path in paths {
            let card = ImageProcessor::open(path)?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("card_{}", embedded.len()));
            embedded.push(self.recompress(card, &stem)?);
        }
        self.render(embedded)
    }

    /// Tile already-decoded card images, in order, into PDF bytes.
    #[instrument(skip_all, fields(cards = images.len()))]
    pub fn tile_images(&self, images: &[DynamicImage]) -> Result<Vec<u8>> {
        let embedded = images
            .iter()
            .enumerate()
            .map(|(i, img)| {
                self.recompress(ImageProcessor::from_dynamic(img.clone()), &format!("card_{i}"))
            })
            .collect::<Result<Vec<_>>>()?;
        self.render(embedded)
    }

    /// Tile the cards at `paths` and write the PDF to `output`.
    ///
    /// Returns the number of pages written.
    pub fn write_to_file(&self, paths: &[PathBuf], output: impl AsRef<Path>) -> Result<usize> {
        let bytes = self.tile_files(paths)?;
        write_atomic(output.as_ref(), &bytes)?;
        let pages = self.geometry.page_count(paths.len());
        info!(path = %output.as_ref().display(), pages, "Wrote print sheet PDF");
        Ok(pages)
    }

    /// Prepare one card for embedding, keeping a JPEG copy when asked.
    ///
    /// The pixels handed to printpdf are the card's own; the single lossy
    /// pass happens when the document is saved with [`Self::save_options`].
    fn recompress(&self, card: ImageProcessor, stem: &str) -> Result<RawImage> {
        if let Some(dir) = &self.compressed_dir {
            let jpeg = card.to_jpeg_bytes(self.jpeg_quality, self.dpi)?;
            std::fs::create_dir_all(dir)?;
            write_atomic(&dir.join(format!("{stem}.jpg")), &jpeg)?;
            debug!(stem, jpeg_bytes = jpeg.len(), "Compressed copy written");
        }

        // No alpha: an SMask would force a lossless stream.
        let rgb = card.into_dynamic().to_rgb8();
        Ok(RawImage {
            width: rgb.width() as usize,
            height: rgb.height() as usize,
            pixels: RawImageData::U8(rgb.into_raw()),
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        })
    }

    /// Place `cards` on pages and serialise the document.
    fn render(&self, cards: Vec<RawImage>) -> Result<Vec<u8>> {
        let g = &self.geometry;
        let to_mm = self.unit.to_mm();
        let page_w = Mm((g.page.0 * to_mm) as f32);
        let page_h = Mm((g.page.1 * to_mm) as f32);
        let page_h_pt = page_h.into_pt().0;
        let foot_w_pt = Mm((g.footprint.0 * to_mm) as f32).into_pt().0;
        let foot_h_pt = Mm((g.footprint.1 * to_mm) as f32).into_pt().0;

        let mut doc = PdfDocument::new(DOCUMENT_TITLE);
        let mut pages: Vec<Vec<Op>> = (0..g.page_count(cards.len())).map(|_| Vec::new()).collect();

        for (card, placement) in cards.iter().zip(g.plan(cards.len())) {
            let xobject_id = doc.add_image(card);
            let (x_pt, y_top_pt) = self.offset_pt(&placement, to_mm);

            // Native size of the image at the embedding DPI.
            let native_w_pt = card.width as f32 / self.dpi as f32 * PT_PER_INCH;
            let native_h_pt = card.height as f32 / self.dpi as f32 * PT_PER_INCH;

            pages[placement.page].push(Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(x_pt)),
                    // PDF y grows upward from the bottom edge.
                    translate_y: Some(Pt(page_h_pt - y_top_pt - foot_h_pt)),
                    scale_x: Some(foot_w_pt / native_w_pt),
                    scale_y: Some(foot_h_pt / native_h_pt),
                    dpi: Some(self.dpi as f32),
                    rotate: None,
                },
            });
        }

        let page_total = pages.len();
        doc.with_pages(
            pages
                .into_iter()
                .map(|ops| PdfPage::new(page_w, page_h, ops))
                .collect(),
        );

        debug!(cards = cards.len(), pages = page_total, "Sheet layout complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&self.save_options(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }
        if !output.starts_with(b"%PDF-") {
            return Err(CardwerkError::PdfError(
                "serialised document has no PDF header".into(),
            ));
        }
        Ok(output)
    }

    /// DCT at the configured quality, without printpdf's greyscale or
    /// size-driven rewrites.
    fn save_options(&self) -> PdfSaveOptions {
        PdfSaveOptions {
            image_optimization: Some(ImageOptimizationOptions {
                quality: Some(f32::from(self.jpeg_quality) / 100.0),
                max_image_size: None,
                dither_greyscale: None,
                convert_to_greyscale: Some(false),
                auto_optimize: Some(false),
                format: Some(ImageCompression::Jpeg),
            }),
            ..PdfSaveOptions::default()
        }
    }

    fn offset_pt(&self, placement: &Placement, to_mm: f64) -> (f32, f32) {
        let (x, y) = placement.offset;
        (
            Mm((x * to_mm) as f32).into_pt().0,
            Mm((y * to_mm) as f32).into_pt().0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn card(shade: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(75, 100, Rgb([shade, 40, 200])))
    }

    fn page_count(pdf: &[u8]) -> usize {
        lopdf::Document::load_mem(pdf).unwrap().get_pages().len()
    }

    #[test]
    fn ten_cards_make_two_pages() {
        let tiler = SheetTiler::new(&SheetConfig::default()).unwrap();
        let images: Vec<DynamicImage> = (0..10).map(|i| card(i * 20)).collect();
        let pdf = tiler.tile_images(&images).unwrap();
        assert_eq!(&pdf[..5], b"%PDF-");
        assert_eq!(page_count(&pdf), 2);
    }

    #[test]
    fn empty_run_is_one_blank_page() {
        let tiler = SheetTiler::new(&SheetConfig::default()).unwrap();
        let pdf = tiler.tile_images(&[]).unwrap();
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn unreadable_card_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.png");
        card(10).save(&good).unwrap();
        let bad = dir.path().join("b.png");
        std::fs::write(&bad, b"not a png").unwrap();

        let out = dir.path().join("output.pdf");
        let tiler = SheetTiler::new(&SheetConfig::default()).unwrap();
        let err = tiler.write_to_file(&[good, bad], &out).unwrap_err();
        assert!(matches!(err, CardwerkError::SourceImageUnreadable { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn compressed_copies_leave_sources_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("ID_Card_A_B_1234567890_C.png");
        card(99).save(&source).unwrap();
        let before = std::fs::read(&source).unwrap();

        let compressed = dir.path().join("compressed");
        let tiler = SheetTiler::new(&SheetConfig::default())
            .unwrap()
            .with_compressed_dir(&compressed);
        let out = dir.path().join("output.pdf");
        assert_eq!(tiler.write_to_file(&[source.clone()], &out).unwrap(), 1);

        assert_eq!(std::fs::read(&source).unwrap(), before);
        let jpeg = std::fs::read(compressed.join("ID_Card_A_B_1234567890_C.jpg")).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(page_count(&std::fs::read(&out).unwrap()), 1);
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn cards_are_embedded_as_jpeg() {
        let tiler = SheetTiler::new(&SheetConfig::default()).unwrap();
        let pdf = tiler.tile_images(&[card(10), card(200)]).unwrap();
        assert!(contains(&pdf, b"/DCTDecode"));
        assert!(!contains(&pdf, b"/SMask"));
    }

    #[test]
    fn invalid_geometry_is_rejected_up_front() {
        let config = SheetConfig {
            image_footprint: (20.0, 5.0),
            ..SheetConfig::default()
        };
        assert!(SheetTiler::new(&config).is_err());
    }
}
