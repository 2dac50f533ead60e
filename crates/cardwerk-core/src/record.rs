// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card records and the card image filename schema.
//
// The structured record is a JSON sidecar stored next to each card image.
// The filename `ID_Card_<Name>_<digits>_<Post>.png` is a derived display
// artifact; `from_legacy_file_name` recovers a record from it for cards
// written without a sidecar.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CardwerkError, Result};
use crate::types::NormalizedFields;
use crate::validate;

/// Filename prefix shared by every card image.
pub const FILE_PREFIX: &str = "ID_Card_";

/// Extension of card images.
pub const IMAGE_EXTENSION: &str = "png";

/// Extension of the record sidecar.
pub const RECORD_EXTENSION: &str = "json";

/// A persisted card: normalised fields plus the image it was rendered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Title-cased name, 2 or 3 words.
    pub name: String,
    /// `"DDDDD DDDDD"`.
    pub phone: String,
    /// Title-cased post.
    pub post: String,
    /// File name of the card image, relative to the cards directory.
    pub image_file: String,
    /// When the card was rendered. Absent for records recovered from a
    /// legacy file name.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CardRecord {
    /// Build a record for freshly normalised fields.
    pub fn new(fields: &NormalizedFields) -> Self {
        Self {
            name: fields.name.clone(),
            phone: fields.phone.clone(),
            post: fields.post.clone(),
            image_file: file_name_for(fields),
            created_at: Some(Utc::now()),
        }
    }

    /// The fields of this record.
    pub fn fields(&self) -> NormalizedFields {
        NormalizedFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            post: self.post.clone(),
        }
    }

    /// File name of the JSON sidecar for this record.
    pub fn record_file(&self) -> String {
        sidecar_name(&self.image_file)
    }

    /// Read a sidecar record.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Serialise the record as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Recover the fields from a legacy card file name.
    ///
    /// Tokens are split on `_`. When the fourth token is a valid phone
    /// number the name has three words, otherwise two. A post that itself
    /// begins with a ten-digit token is read as part of a three-word name;
    /// that ambiguity is inherent to the schema.
    pub fn from_legacy_file_name(file_name: &str) -> Result<Self> {
        let stem = file_name
            .strip_prefix(FILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(&format!(".{IMAGE_EXTENSION}")))
            .ok_or_else(|| {
                CardwerkError::InvalidRecord(format!("not a card image name: {file_name}"))
            })?;

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 4 {
            return Err(CardwerkError::InvalidRecord(format!(
                "too few name tokens in {file_name}"
            )));
        }

        let name_len = if validate::format_phone(parts[3]).is_ok() {
            3
        } else {
            2
        };

        let phone = validate::format_phone(parts[name_len]).map_err(|_| {
            CardwerkError::InvalidRecord(format!("no phone number in {file_name}"))
        })?;

        let post_tokens = &parts[name_len + 1..];
        if post_tokens.is_empty() {
            return Err(CardwerkError::InvalidRecord(format!(
                "no post in {file_name}"
            )));
        }

        Ok(Self {
            name: parts[..name_len].join(" "),
            phone,
            post: post_tokens.join(" "),
            image_file: file_name.to_owned(),
            created_at: None,
        })
    }
}

/// Card image file name for normalised fields.
pub fn file_name_for(fields: &NormalizedFields) -> String {
    format!(
        "{FILE_PREFIX}{}_{}_{}.{IMAGE_EXTENSION}",
        fields.name.replace(' ', "_"),
        fields.phone_digits(),
        fields.post.replace(' ', "_"),
    )
}

/// Sidecar file name for a card image file name.
pub fn sidecar_name(image_file: &str) -> String {
    let mut path = PathBuf::from(image_file);
    path.set_extension(RECORD_EXTENSION);
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, phone: &str, post: &str) -> NormalizedFields {
        NormalizedFields {
            name: name.into(),
            phone: phone.into(),
            post: post.into(),
        }
    }

    #[test]
    fn file_name_schema() {
        let f = fields("Asha Devi Rao", "98765 43210", "Field Officer");
        assert_eq!(
            file_name_for(&f),
            "ID_Card_Asha_Devi_Rao_9876543210_Field_Officer.png"
        );
    }

    #[test]
    fn legacy_parse_two_word_name() {
        let rec = CardRecord::from_legacy_file_name("ID_Card_Asha_Rao_9876543210_Head_Clerk.png")
            .unwrap();
        assert_eq!(rec.name, "Asha Rao");
        assert_eq!(rec.phone, "98765 43210");
        assert_eq!(rec.post, "Head Clerk");
        assert!(rec.created_at.is_none());
    }

    #[test]
    fn legacy_parse_three_word_name() {
        let rec =
            CardRecord::from_legacy_file_name("ID_Card_Asha_Devi_Rao_9876543210_Clerk.png").unwrap();
        assert_eq!(rec.name, "Asha Devi Rao");
        assert_eq!(rec.post, "Clerk");
    }

    #[test]
    fn legacy_parse_recovers_what_file_name_for_wrote() {
        let f = fields("Asha Devi Rao", "98765 43210", "Senior Field Officer");
        let rec = CardRecord::from_legacy_file_name(&file_name_for(&f)).unwrap();
        assert_eq!(rec.fields(), f);
    }

    #[test]
    fn legacy_parse_ambiguous_digit_post_reads_as_middle_name() {
        // Two-word name whose post starts with ten digits: the heuristic
        // sees a phone at token 4 and misreads the split.
        let rec =
            CardRecord::from_legacy_file_name("ID_Card_Asha_Rao_9876543210_1234567890.png");
        let rec = rec.unwrap_err();
        assert!(matches!(rec, CardwerkError::InvalidRecord(_)));

        let rec = CardRecord::from_legacy_file_name(
            "ID_Card_Asha_Rao_9876543210_1234567890_Unit.png",
        )
        .unwrap();
        assert_eq!(rec.name, "Asha Rao 9876543210");
        assert_eq!(rec.phone, "12345 67890");
        assert_eq!(rec.post, "Unit");
    }

    #[test]
    fn legacy_parse_rejects_foreign_files() {
        assert!(CardRecord::from_legacy_file_name("holiday.png").is_err());
        assert!(CardRecord::from_legacy_file_name("ID_Card_Asha_Rao.png").is_err());
        assert!(CardRecord::from_legacy_file_name("ID_Card_Asha_Rao_12_Clerk.png").is_err());
    }

    #[test]
    fn sidecar_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let rec = CardRecord::new(&fields("Asha Rao", "98765 43210", "Clerk"));
        assert_eq!(rec.record_file(), "ID_Card_Asha_Rao_9876543210_Clerk.json");

        let path = dir.path().join(rec.record_file());
        std::fs::write(&path, rec.to_json().unwrap()).unwrap();
        assert_eq!(CardRecord::load(&path).unwrap(), rec);
    }
}
