// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card store — the directory of finished cards and their records.
//
// Cards are listed in file-name order and numbered from 1. The JSON sidecar
// is preferred; cards without one are recovered from the legacy file name.

use std::path::{Path, PathBuf};

use cardwerk_core::config::CardTemplate;
use cardwerk_core::error::{CardwerkError, Result};
use cardwerk_core::record::{self, CardRecord};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use crate::image::ImageProcessor;

/// One listed card.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCard {
    /// 1-based position in the listing.
    pub serial: usize,
    pub record: CardRecord,
    pub image_path: PathBuf,
}

/// Directory of card images.
#[derive(Debug, Clone)]
pub struct CardStore {
    dir: PathBuf,
}

impl CardStore {
    /// Open `dir`, creating it if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All cards, sorted by file name.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn list(&self) -> Result<Vec<StoredCard>> {
        let suffix = format!(".{}", record::IMAGE_EXTENSION);
        let mut names: Vec<String> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(&suffix))
            .collect();
        names.sort();

        let mut cards = Vec::with_capacity(names.len());
        for name in names {
            match self.record_for(&name) {
                Ok(record) => cards.push(StoredCard {
                    serial: cards.len() + 1,
                    image_path: self.dir.join(&name),
                    record,
                }),
                Err(err) => warn!(file = %name, error = %err, "Skipping unrecognised card file"),
            }
        }

        debug!(cards = cards.len(), "Card store listed");
        Ok(cards)
    }

    /// Card image paths in listing order.
    pub fn image_paths(&self) -> Result<Vec<PathBuf>> {
        Ok(self.list()?.into_iter().map(|c| c.image_path).collect())
    }

    /// The card with 1-based `serial`.
    pub fn get(&self, serial: usize) -> Result<StoredCard> {
        self.list()?
            .into_iter()
            .find(|card| card.serial == serial)
            .ok_or_else(|| CardwerkError::InvalidRecord(format!("no card with serial {serial}")))
    }

    /// Delete the card with 1-based `serial` and its record.
    #[instrument(skip(self))]
    pub fn delete(&self, serial: usize) -> Result<StoredCard> {
        let card = self.get(serial)?;
        std::fs::remove_file(&card.image_path)?;

        let sidecar = self.dir.join(card.record.record_file());
        if sidecar.exists() {
            std::fs::remove_file(&sidecar)?;
        }

        info!(file = %card.record.image_file, "Card deleted");
        Ok(card)
    }

    /// Cut the portrait slot back out of a finished card.
    pub fn portrait(&self, card: &StoredCard, template: &CardTemplate) -> Result<DynamicImage> {
        let (x, y) = template.portrait_position;
        let (w, h) = template.portrait_size;
        Ok(ImageProcessor::open(&card.image_path)?
            .crop_box(x, y, x + w, y + h)
            .into_dynamic())
    }

    fn record_for(&self, image_file: &str) -> Result<CardRecord> {
        let sidecar = self.dir.join(record::sidecar_name(image_file));
        if sidecar.exists() {
            let mut record = CardRecord::load(&sidecar)?;
            record.image_file = image_file.to_owned();
            return Ok(record);
        }
        CardRecord::from_legacy_file_name(image_file)
    }
}
