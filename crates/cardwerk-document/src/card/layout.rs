// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card text layout — three columns (headings, colons, values) measured with
// the card font and anchored on the template.
//
// The block starts at the configured anchor. When the anchor plus the total
// text width overflows the template, the block is centred horizontally
// instead; the vertical anchor never moves. Narrow text is never re-centred.

use ab_glyph::{Font, PxScale, ScaleFont};
use cardwerk_core::config::CardTemplate;
use tracing::debug;

/// Pixel width of rendered text.
pub trait TextMeasure {
    /// Advance width of `text`, kerning included.
    fn text_width(&self, text: &str) -> f32;
}

/// Measures text with an `ab_glyph` font at a fixed pixel size.
pub struct FontMeasure<'a, F> {
    font: &'a F,
    scale: PxScale,
}

impl<'a, F: Font> FontMeasure<'a, F> {
    pub fn new(font: &'a F, scale: impl Into<PxScale>) -> Self {
        Self {
            font,
            scale: scale.into(),
        }
    }
}

impl<F: Font> TextMeasure for FontMeasure<'_, F> {
    fn text_width(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }
}

/// Separator drawn between each heading and its value.
pub const COLON: &str = ":";

/// Resolved positions of the three text columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    /// Widest heading.
    pub heading_width: f32,
    pub colon_width: f32,
    /// Widest value.
    pub value_width: f32,
    /// Heading, padding, colon, padding, and value widths combined.
    pub total_width: f32,
    /// Top-left of the heading column.
    pub origin: (f32, f32),
    /// Left edge of the colon column.
    pub colon_x: f32,
    /// Left edge of the value column.
    pub value_x: f32,
    /// Whether the overflow fallback moved the block.
    pub recentred: bool,
}

impl TextLayout {
    /// Lay out `values` under the template's headings on a template
    /// `template_width` pixels wide.
    pub fn compute(
        measure: &impl TextMeasure,
        template: &CardTemplate,
        template_width: u32,
        values: [&str; 3],
    ) -> Self {
        let heading_width = widest(measure, template.headings.iter().map(String::as_str));
        let colon_width = measure.text_width(COLON);
        let value_width = widest(measure, values);

        let total_width = heading_width
            + template.heading_padding
            + colon_width
            + template.value_padding
            + value_width;

        let (anchor_x, anchor_y) = template.text_position;
        let overflows = anchor_x as f32 + total_width > template_width as f32;
        let origin_x = if overflows {
            ((template_width as f32 - total_width) / 2.0).floor()
        } else {
            anchor_x as f32
        };

        let colon_x = origin_x + heading_width + template.heading_padding;
        let value_x = colon_x + colon_width + template.value_padding;

        debug!(
            heading_width,
            colon_width,
            value_width,
            total_width,
            origin_x,
            recentred = overflows,
            "Text layout"
        );

        Self {
            heading_width,
            colon_width,
            value_width,
            total_width,
            origin: (origin_x, anchor_y as f32),
            colon_x,
            value_x,
            recentred: overflows,
        }
    }
}

fn widest<'t>(measure: &impl TextMeasure, texts: impl IntoIterator<Item = &'t str>) -> f32 {
    texts
        .into_iter()
        .map(|text| measure.text_width(text))
        .fold(0.0, f32::max)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character advances by a fixed width.
    pub(crate) struct Monospace(pub f32);

    impl TextMeasure for Monospace {
        fn text_width(&self, text: &str) -> f32 {
            text.chars().count() as f32 * self.0
        }
    }

    #[test]
    fn columns_follow_widest_entries() {
        let template = CardTemplate::default();
        let layout = TextLayout::compute(
            &Monospace(10.0),
            &template,
            1500,
            ["Asha Rao", "98765 43210", "Clerk"],
        );

        assert_eq!(layout.heading_width, 60.0); // "Mobile"
        assert_eq!(layout.colon_width, 10.0);
        assert_eq!(layout.value_width, 110.0); // "98765 43210"
        assert_eq!(layout.total_width, 60.0 + 25.0 + 10.0 + 45.0 + 110.0);
        assert_eq!(layout.origin, (220.0, 1265.0));
        assert_eq!(layout.colon_x, 220.0 + 60.0 + 25.0);
        assert_eq!(layout.value_x, 220.0 + 60.0 + 25.0 + 10.0 + 45.0);
        assert!(!layout.recentred);
    }

    #[test]
    fn overflow_recentres_horizontally_only() {
        let template = CardTemplate::default();
        let long_post = "Senior Regional Field Operations Officer";
        let layout =
            TextLayout::compute(&Monospace(30.0), &template, 1500, ["Asha Rao", "98765 43210", long_post]);

        let total = 180.0 + 25.0 + 30.0 + 45.0 + long_post.len() as f32 * 30.0;
        assert_eq!(layout.total_width, total);
        assert!(layout.recentred);
        assert_eq!(layout.origin.0, ((1500.0 - total) / 2.0).floor());
        assert_eq!(layout.origin.1, 1265.0);
    }

    #[test]
    fn exact_fit_does_not_recentre() {
        let template = CardTemplate::default();
        // total = 60 + 25 + 10 + 45 + 110 = 250; anchor 220 → right edge 470.
        let layout =
            TextLayout::compute(&Monospace(10.0), &template, 470, ["Asha Rao", "98765 43210", "Clerk"]);
        assert!(!layout.recentred);
        assert_eq!(layout.origin.0, 220.0);

        let layout =
            TextLayout::compute(&Monospace(10.0), &template, 469, ["Asha Rao", "98765 43210", "Clerk"]);
        assert!(layout.recentred);
        assert_eq!(layout.origin.0, 109.0); // floor((469 - 250) / 2)
    }

    #[test]
    fn short_text_is_not_pulled_to_centre() {
        let template = CardTemplate::default();
        let layout = TextLayout::compute(&Monospace(1.0), &template, 5000, ["A B", "1", "C"]);
        assert_eq!(layout.origin.0, 220.0);
        assert!(!layout.recentred);
    }
}
