// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CardwerkError, Result};
use crate::types::{DetectionParams, SheetUnit};

/// Persistent application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Card template geometry and assets.
    pub template: CardTemplate,
    /// Print sheet geometry.
    pub sheet: SheetConfig,
    /// Face detection settings.
    pub face: FaceConfig,
    /// Output locations.
    pub paths: PathsConfig,
    /// Worker bound for bulk regeneration (`None` = one per CPU).
    pub workers: Option<usize>,
}

/// Fixed geometry of the card template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardTemplate {
    /// Background image every card is drawn on.
    pub template_path: PathBuf,
    /// Font file used for all card text.
    pub font_path: PathBuf,
    /// Font size in pixels.
    pub font_size: f32,
    /// Top-left corner of the portrait slot.
    pub portrait_position: (u32, u32),
    /// Width and height of the portrait slot.
    pub portrait_size: (u32, u32),
    /// Top-left anchor of the text block. The x coordinate is overridden
    /// when the text would overflow the template.
    pub text_position: (i32, i32),
    /// Heading labels, one per text row.
    pub headings: [String; 3],
    /// Gap between the heading column and the colon column.
    pub heading_padding: f32,
    /// Gap between the colon column and the value column.
    pub value_padding: f32,
    /// Extra vertical space between text lines.
    pub line_spacing: u32,
    /// Radius of the light outline drawn around each glyph.
    pub stroke_width: u8,
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("example-template-id-card.png"),
            font_path: PathBuf::from("example-Exo-ExtraBold.otf"),
            font_size: 72.0,
            portrait_position: (525, 790),
            portrait_size: (440, 440),
            text_position: (220, 1265),
            headings: ["Name".into(), "Mobile".into(), "Post".into()],
            heading_padding: 25.0,
            value_padding: 45.0,
            line_spacing: 16,
            stroke_width: 8,
        }
    }
}

/// Print sheet geometry, all lengths in `unit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Page width and height.
    pub page_size: (f64, f64),
    /// Width and height one card occupies on the page.
    pub image_footprint: (f64, f64),
    pub unit: SheetUnit,
    /// JPEG quality (1-100) used when recompressing cards for embedding.
    pub jpeg_quality: u8,
    /// DPI written into the recompressed JPEGs.
    pub dpi: u16,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            page_size: (12.0, 18.0),
            image_footprint: (3.75, 5.0),
            unit: SheetUnit::Inch,
            jpeg_quality: 90,
            dpi: 300,
        }
    }
}

/// Face detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    pub detection: DetectionParams,
    /// Default fraction of the crop side the face should occupy.
    pub target_face_size: f64,
    /// Model file for the built-in detector backend, if compiled in.
    pub model_path: Option<PathBuf>,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            detection: DetectionParams::default(),
            target_face_size: 0.5,
            model_path: None,
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding finished card images and their records.
    pub cards_dir: PathBuf,
    /// Directory for recompressed copies embedded in the print document.
    pub compressed_dir: Option<PathBuf>,
    /// Print document written by the tiler.
    pub output_pdf: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cards_dir: PathBuf::from("outputs"),
            compressed_dir: Some(PathBuf::from("compressed")),
            output_pdf: PathBuf::from("output.pdf"),
        }
    }
}

impl AppConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings no card run could use.
    pub fn validate(&self) -> Result<()> {
        let (pw, ph) = self.sheet.page_size;
        let (fw, fh) = self.sheet.image_footprint;
        if !(pw > 0.0 && ph > 0.0 && fw > 0.0 && fh > 0.0) {
            return Err(CardwerkError::InvalidSheetGeometry(format!(
                "page {pw}x{ph} and footprint {fw}x{fh} must be positive"
            )));
        }
        if !(1..=100).contains(&self.sheet.jpeg_quality) {
            return Err(CardwerkError::InvalidSheetGeometry(format!(
                "JPEG quality must be 1-100, got {}",
                self.sheet.jpeg_quality
            )));
        }

        let size = self.face.target_face_size;
        if !(size > 0.0 && size <= 1.0) {
            return Err(CardwerkError::InvalidFaceSize(size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_template() {
        let config = AppConfig::default();
        assert_eq!(config.template.portrait_position, (525, 790));
        assert_eq!(config.template.portrait_size, (440, 440));
        assert_eq!(config.template.text_position, (220, 1265));
        assert_eq!(config.template.headings[1], "Mobile");
        assert_eq!(config.sheet.page_size, (12.0, 18.0));
        assert_eq!(config.sheet.jpeg_quality, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardwerk.json");
        std::fs::write(&path, r#"{ "sheet": { "page_size": [8.5, 11.0] }, "workers": 2 }"#)
            .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.sheet.page_size, (8.5, 11.0));
        assert_eq!(config.sheet.image_footprint, (3.75, 5.0));
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.template.font_size, 72.0);
    }

    #[test]
    fn load_or_default_without_path() {
        let config = AppConfig::load_or_default(None).unwrap();
        assert_eq!(config.paths.output_pdf, PathBuf::from("output.pdf"));
    }

    #[test]
    fn rejects_zero_footprint() {
        let mut config = AppConfig::default();
        config.sheet.image_footprint = (0.0, 5.0);
        assert!(matches!(
            config.validate(),
            Err(CardwerkError::InvalidSheetGeometry(_))
        ));
    }

    #[test]
    fn rejects_face_size_out_of_range() {
        let mut config = AppConfig::default();
        config.face.target_face_size = 1.5;
        assert!(matches!(config.validate(), Err(CardwerkError::InvalidFaceSize(_))));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(CardwerkError::Serialization(_))
        ));
    }
}
