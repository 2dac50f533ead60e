// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card composer — validates the form fields, places the square portrait in
// the template slot, lays out and draws the three text rows, and saves the
// card with its record.
//
// Validation runs before anything is drawn. Card image and record are
// written through temporary files; if either write fails nothing is left at
// the final paths.

use std::path::PathBuf;

use ab_glyph::FontVec;
use cardwerk_core::config::CardTemplate;
use cardwerk_core::error::{CardwerkError, Result};
use cardwerk_core::human_errors;
use cardwerk_core::record::CardRecord;
use cardwerk_core::types::{CardFields, NormalizedFields, PortraitSource};
use cardwerk_core::validate;
use image::{DynamicImage, RgbaImage};
use tracing::{info, instrument, warn};

use super::layout::{COLON, FontMeasure, TextLayout};
use super::render::{TextBlock, TextStyle, draw_blocks};
use crate::face::FaceCropper;
use crate::face::cropper::to_square;
use crate::image::processor::write_atomic;
use crate::image::{ImageProcessor, Photo};

/// Status line for a successfully generated card.
pub const CARD_CREATED: &str = "ID card generated successfully!";

/// Template background and font, loaded once and shared by every card.
pub struct CardAssets {
    template: RgbaImage,
    font: FontVec,
}

impl CardAssets {
    /// Load the template image and font named by `template`.
    #[instrument(skip_all, fields(template = %template.template_path.display(), font = %template.font_path.display()))]
    pub fn load(template: &CardTemplate) -> Result<Self> {
        let background = image::open(&template.template_path).map_err(|err| {
            CardwerkError::TemplateOrFontMissing(format!(
                "{}: {}",
                template.template_path.display(),
                err
            ))
        })?;

        let font_bytes = std::fs::read(&template.font_path).map_err(|err| {
            CardwerkError::TemplateOrFontMissing(format!(
                "{}: {}",
                template.font_path.display(),
                err
            ))
        })?;
        let font = FontVec::try_from_vec(font_bytes).map_err(|err| {
            CardwerkError::TemplateOrFontMissing(format!(
                "{}: {}",
                template.font_path.display(),
                err
            ))
        })?;

        info!(
            width = background.width(),
            height = background.height(),
            "Card assets loaded"
        );
        Ok(Self::new(background.to_rgba8(), font))
    }

    pub fn new(template: RgbaImage, font: FontVec) -> Self {
        Self { template, font }
    }

    pub fn template(&self) -> &RgbaImage {
        &self.template
    }
}

/// A card written to disk.
#[derive(Debug, Clone)]
pub struct ComposedCard {
    pub record: CardRecord,
    pub image_path: PathBuf,
}

/// Builds finished card images.
pub struct CardComposer {
    template: CardTemplate,
    assets: CardAssets,
    cropper: FaceCropper,
    cards_dir: PathBuf,
}

impl CardComposer {
    pub fn new(
        template: CardTemplate,
        assets: CardAssets,
        cropper: FaceCropper,
        cards_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            template,
            assets,
            cropper,
            cards_dir: cards_dir.into(),
        }
    }

    pub fn template(&self) -> &CardTemplate {
        &self.template
    }

    /// Validate `fields`, crop a portrait from `photo`, and write the card.
    #[instrument(skip(self, photo, fields), fields(name = %fields.name))]
    pub fn compose(
        &self,
        photo: &Photo,
        source: PortraitSource,
        fields: &CardFields,
    ) -> Result<ComposedCard> {
        let normalized = validate::normalize(fields)?;
        let portrait = self.cropper.portrait(photo, source)?;
        self.finish(portrait, &normalized)
    }

    /// Like [`compose`](Self::compose) with the forced centre-square path,
    /// starting from an already-decoded image.
    pub fn compose_forced(&self, image: DynamicImage, fields: &CardFields) -> Result<ComposedCard> {
        let normalized = validate::normalize(fields)?;
        self.finish(to_square(image), &normalized)
    }

    /// Collapse a compose result into the `(path-or-none, message)` pair shown
    /// on the form.
    pub fn status(result: Result<ComposedCard>) -> (Option<PathBuf>, String) {
        let (card, message) = human_errors::into_status(result, CARD_CREATED);
        (card.map(|c| c.image_path), message)
    }

    /// Draw the card for `portrait` and `fields` without touching the disk.
    pub fn render(&self, portrait: &DynamicImage, fields: &NormalizedFields) -> RgbaImage {
        let t = &self.template;
        let mut card = self.assets.template.clone();

        let (slot_w, slot_h) = t.portrait_size;
        let slot = ImageProcessor::from_dynamic(portrait.clone())
            .resize_exact(slot_w, slot_h)
            .into_dynamic()
            .to_rgba8();
        let (slot_x, slot_y) = t.portrait_position;
        image::imageops::replace(&mut card, &slot, slot_x as i64, slot_y as i64);

        let values = fields.values();
        let measure = FontMeasure::new(&self.assets.font, t.font_size);
        let layout = TextLayout::compute(&measure, t, card.width(), values);
        if layout.recentred {
            warn!(
                total_width = layout.total_width,
                origin_x = layout.origin.0,
                "Card text overflows the template; centring"
            );
        }

        let top = layout.origin.1 as i32;
        let blocks = [
            TextBlock {
                x: layout.origin.0.round() as i32,
                y: top,
                lines: t.headings.iter().map(String::as_str).collect(),
            },
            TextBlock {
                x: layout.colon_x.round() as i32,
                y: top,
                lines: vec![COLON; t.headings.len()],
            },
            TextBlock {
                x: layout.value_x.round() as i32,
                y: top,
                lines: values.to_vec(),
            },
        ];

        let style = TextStyle::outlined(t.font_size, t.line_spacing, t.stroke_width);
        draw_blocks(&mut card, &self.assets.font, &style, &blocks);
        card
    }

    fn finish(&self, portrait: DynamicImage, fields: &NormalizedFields) -> Result<ComposedCard> {
        let card = self.render(&portrait, fields);
        let record = CardRecord::new(fields);

        std::fs::create_dir_all(&self.cards_dir)?;
        let image_path = self.cards_dir.join(&record.image_file);
        let record_path = self.cards_dir.join(record.record_file());

        let png = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(card)).to_png_bytes()?;
        let json = record.to_json()?;

        write_atomic(&image_path, &png)?;
        if let Err(err) = write_atomic(&record_path, json.as_bytes()) {
            let _ = std::fs::remove_file(&image_path);
            return Err(err);
        }

        info!(path = %image_path.display(), "Card written");
        Ok(ComposedCard { record, image_path })
    }
}
