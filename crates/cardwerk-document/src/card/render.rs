// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outlined multi-line text drawing.
//
// Glyph coverage for every block is rasterised into one mask, the mask is
// dilated by the stroke radius to form the outline, and both are blended
// onto the card: outline first, fill on top.

use ab_glyph::{Font, PxScale, ScaleFont};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_text_mut;
use imageproc::morphology::dilate;

/// Fill and outline settings shared by all text on a card.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub scale: PxScale,
    /// Extra pixels between lines.
    pub line_spacing: u32,
    /// Outline radius in pixels.
    pub stroke_width: u8,
    pub fill: Rgba<u8>,
    pub outline: Rgba<u8>,
}

impl TextStyle {
    /// Dark text on a light outline.
    pub fn outlined(size: f32, line_spacing: u32, stroke_width: u8) -> Self {
        Self {
            scale: PxScale::from(size),
            line_spacing,
            stroke_width,
            fill: Rgba([0, 0, 0, 255]),
            outline: Rgba([255, 255, 255, 255]),
        }
    }

    /// Distance between the tops of consecutive lines.
    pub fn line_pitch(&self, font: &impl Font) -> u32 {
        let ascent = font.as_scaled(self.scale).ascent().ceil().max(0.0) as u32;
        ascent + 2 * self.stroke_width as u32 + self.line_spacing
    }
}

/// A column of lines with its top-left corner.
#[derive(Debug, Clone)]
pub struct TextBlock<'a> {
    pub x: i32,
    pub y: i32,
    pub lines: Vec<&'a str>,
}

/// Draw `blocks` onto `canvas` with `style`.
pub fn draw_blocks(canvas: &mut RgbaImage, font: &impl Font, style: &TextStyle, blocks: &[TextBlock<'_>]) {
    let pitch = style.line_pitch(font) as i32;
    let mut mask = GrayImage::new(canvas.width(), canvas.height());

    for block in blocks {
        for (row, line) in block.lines.iter().enumerate() {
            let y = block.y + row as i32 * pitch;
            draw_text_mut(&mut mask, Luma([255u8]), block.x, y, style.scale, font, line);
        }
    }

    let outline = if style.stroke_width > 0 {
        dilate(&mask, Norm::LInf, style.stroke_width)
    } else {
        mask.clone()
    };

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let stroke = outline.get_pixel(x, y)[0];
        if stroke > 0 {
            blend(pixel, style.outline, stroke);
        }
        let coverage = mask.get_pixel(x, y)[0];
        if coverage > 0 {
            blend(pixel, style.fill, coverage);
        }
    }
}

/// Alpha-blend `color` over `dst` with `coverage` (0-255).
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: u8) {
    let a = coverage as f32 / 255.0;
    let inv = 1.0 - a;
    for channel in 0..3 {
        dst.0[channel] = (color.0[channel] as f32 * a + dst.0[channel] as f32 * inv).round() as u8;
    }
    dst.0[3] = dst.0[3].max(coverage);
}
