// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Cardwerk.

use serde::{Deserialize, Serialize};

/// Axis-aligned face bounding box in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceBox {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Integer centre of the box, `(x + w/2, y + h/2)` with floor division.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// The larger of width and height.
    pub fn longest_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// Fixed parameters handed to a multi-scale face detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Image pyramid step between detection scales.
    pub scale_factor: f32,
    /// Overlapping candidate rectangles required to accept a detection.
    pub min_neighbors: u32,
    /// Smallest detectable face width in pixels.
    pub min_width: u32,
    /// Smallest detectable face height in pixels.
    pub min_height: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_width: 30,
            min_height: 50,
        }
    }
}

/// How the portrait for a card is obtained from the source photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortraitSource {
    /// Locate a face and crop around it.
    Detect {
        /// Fraction of the crop side the larger face dimension should occupy.
        target_face_size: f64,
        /// 1-based index into the faces ordered left to right.
        face_index: usize,
    },
    /// Skip detection and take the centre square.
    Force,
}

/// Raw card fields exactly as entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFields {
    pub name: String,
    pub phone: String,
    pub post: String,
}

impl CardFields {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, post: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            post: post.into(),
        }
    }
}

/// Card fields after validation: title-cased name and post, phone as
/// `"DDDDD DDDDD"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedFields {
    pub name: String,
    pub phone: String,
    pub post: String,
}

impl NormalizedFields {
    /// The three values in heading order (Name, Mobile, Post).
    pub fn values(&self) -> [&str; 3] {
        [&self.name, &self.phone, &self.post]
    }

    /// The phone number with the group separator removed.
    pub fn phone_digits(&self) -> String {
        self.phone.replace(' ', "")
    }
}

/// Unit used for print sheet measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetUnit {
    Inch,
    Millimetre,
}

impl SheetUnit {
    /// Length of one unit in millimetres.
    pub fn to_mm(&self) -> f64 {
        match self {
            Self::Inch => 25.4,
            Self::Millimetre => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_center_uses_floor_division() {
        let face = FaceBox::new(10, 20, 31, 41);
        assert_eq!(face.center(), (25, 40));
    }

    #[test]
    fn longest_side_picks_height_for_tall_faces() {
        assert_eq!(FaceBox::new(0, 0, 30, 50).longest_side(), 50);
    }

    #[test]
    fn default_detection_params() {
        let params = DetectionParams::default();
        assert!((params.scale_factor - 1.1).abs() < f32::EPSILON);
        assert_eq!(params.min_neighbors, 5);
        assert_eq!((params.min_width, params.min_height), (30, 50));
    }

    #[test]
    fn phone_digits_strips_group_space() {
        let fields = NormalizedFields {
            name: "Asha Rao".into(),
            phone: "98765 43210".into(),
            post: "Clerk".into(),
        };
        assert_eq!(fields.phone_digits(), "9876543210");
    }
}
