// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — wires configuration, the shared face cache, the card
// store, the composer, and the sheet tiler for the command handlers.
//
// Template and font are only loaded by commands that draw cards, so `list`,
// `delete` and `print` work on an installation without them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cardwerk_core::AppConfig;
use cardwerk_core::error::Result;
use cardwerk_core::types::{CardFields, PortraitSource};
use cardwerk_document::card::ComposedCard;
use cardwerk_document::store::StoredCard;
use cardwerk_document::{
    CardAssets, CardComposer, CardStore, FaceCache, FaceCropper, FaceDetector, FaceLocator,
    ImageProcessor, Photo, SheetTiler, batch,
};
use cardwerk_document::face::UnavailableDetector;
use tracing::info;

/// Backend for one command invocation.
pub struct AppServices {
    config: AppConfig,
    store: CardStore,
    cache: Arc<FaceCache>,
}

impl AppServices {
    /// Load configuration from `config_path` (or defaults) and open the card
    /// directory.
    pub fn init(config_path: Option<&Path>) -> Result<Self> {
        let config = AppConfig::load_or_default(config_path)?;
        let store = CardStore::open(&config.paths.cards_dir)?;
        info!(cards_dir = %store.dir().display(), "app services initialised");
        Ok(Self {
            config,
            store,
            cache: Arc::new(FaceCache::new()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // -- Cards ----------------------------------------------------------------

    /// Build a card from the photo at `photo_path`.
    pub fn create(
        &self,
        photo_path: &Path,
        source: PortraitSource,
        fields: &CardFields,
    ) -> Result<ComposedCard> {
        let composer = self.composer()?;
        let photo = Photo::open(photo_path)?;
        composer.compose(&photo, source, fields)
    }

    pub fn list(&self) -> Result<Vec<StoredCard>> {
        self.store.list()
    }

    pub fn delete(&self, serial: usize) -> Result<StoredCard> {
        self.store.delete(serial)
    }

    /// Cut the portrait slot out of card `serial` and save it as PNG at
    /// `output`.
    pub fn portrait(&self, serial: usize, output: &Path) -> Result<StoredCard> {
        let card = self.store.get(serial)?;
        let portrait = self.store.portrait(&card, &self.config.template)?;
        ImageProcessor::from_dynamic(portrait).save_png_atomic(output)?;
        info!(serial, path = %output.display(), "Portrait extracted");
        Ok(card)
    }

    /// Redraw every stored card with the current template.
    pub fn regenerate(&self, workers: Option<usize>) -> Result<Vec<Result<ComposedCard>>> {
        let composer = self.composer()?;
        batch::regenerate_all(&self.store, &composer, workers.or(self.config.workers))
    }

    // -- Printing -------------------------------------------------------------

    /// Tile every stored card into the print PDF. Returns the output path and
    /// page count.
    pub fn print(&self, output: Option<PathBuf>) -> Result<(PathBuf, usize)> {
        let mut tiler = SheetTiler::new(&self.config.sheet)?;
        if let Some(dir) = &self.config.paths.compressed_dir {
            tiler = tiler.with_compressed_dir(dir);
        }

        let output = output.unwrap_or_else(|| self.config.paths.output_pdf.clone());
        let paths = self.store.image_paths()?;
        let pages = tiler.write_to_file(&paths, &output)?;
        Ok((output, pages))
    }

    // -- Wiring ---------------------------------------------------------------

    fn composer(&self) -> Result<CardComposer> {
        let template = self.config.template.clone();
        let assets = CardAssets::load(&template)?;
        let locator = FaceLocator::with_params(
            self.detector()?,
            Arc::clone(&self.cache),
            self.config.face.detection,
        );
        Ok(CardComposer::new(
            template,
            assets,
            FaceCropper::new(locator),
            self.store.dir(),
        ))
    }

    #[cfg(feature = "rustface")]
    fn detector(&self) -> Result<Arc<dyn FaceDetector>> {
        use cardwerk_document::RustfaceDetector;

        match &self.config.face.model_path {
            Some(path) => Ok(Arc::new(RustfaceDetector::from_model_file(path)?)),
            None => {
                tracing::warn!("No face model configured; only forced crops will succeed");
                Ok(Arc::new(UnavailableDetector::new(
                    "no face model is configured (face.model_path)",
                )))
            }
        }
    }

    #[cfg(not(feature = "rustface"))]
    fn detector(&self) -> Result<Arc<dyn FaceDetector>> {
        if self.config.face.model_path.is_some() {
            tracing::warn!("A face model is configured but no detector backend is compiled in");
        }
        Ok(Arc::new(UnavailableDetector::new(
            "this build has no face detector backend (enable the rustface feature)",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services_in(dir: &Path) -> AppServices {
        services_with(dir, |_| {})
    }

    fn services_with(dir: &Path, edit: impl FnOnce(&mut AppConfig)) -> AppServices {
        let mut config = AppConfig::default();
        config.paths.cards_dir = dir.join("outputs");
        config.paths.compressed_dir = Some(dir.join("compressed"));
        config.paths.output_pdf = dir.join("output.pdf");
        config.template.template_path = dir.join("missing-template.png");
        edit(&mut config);

        let config_path = dir.join("config.json");
        std::fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        AppServices::init(Some(&config_path)).unwrap()
    }

    #[test]
    fn init_creates_cards_dir() {
        let dir = tempfile::tempdir().unwrap();
        let services = services_in(dir.path());
        assert!(dir.path().join("outputs").is_dir());
        assert!(services.list().unwrap().is_empty());
    }

    #[test]
    fn print_with_no_cards_writes_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let services = services_in(dir.path());
        let (output, pages) = services.print(None).unwrap();
        assert_eq!(output, dir.path().join("output.pdf"));
        assert_eq!(pages, 1);
        assert!(output.exists());
    }

    #[test]
    fn create_without_template_is_an_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let services = services_in(dir.path());
        let err = services
            .create(
                &dir.path().join("photo.png"),
                PortraitSource::Force,
                &CardFields::new("Asha Rao", "9876543210", "Clerk"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            cardwerk_core::CardwerkError::TemplateOrFontMissing(_)
        ));
    }

    #[test]
    fn portrait_is_saved_from_a_stored_card() {
        use image::{DynamicImage, Rgb, RgbImage};

        let dir = tempfile::tempdir().unwrap();
        let services = services_with(dir.path(), |config| {
            config.template.portrait_position = (4, 6);
            config.template.portrait_size = (10, 12);
        });
        let mut card = RgbImage::from_pixel(30, 30, Rgb([0, 0, 0]));
        for y in 6..18 {
            for x in 4..14 {
                card.put_pixel(x, y, Rgb([0, 200, 0]));
            }
        }
        DynamicImage::ImageRgb8(card)
            .save(dir.path().join("outputs/ID_Card_Asha_Rao_9876543210_Clerk.png"))
            .unwrap();

        let output = dir.path().join("portrait.png");
        let stored = services.portrait(1, &output).unwrap();
        assert_eq!(stored.record.name, "Asha Rao");

        let saved = image::open(&output).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (10, 12));
        assert!(saved.pixels().all(|p| *p == Rgb([0, 200, 0])));
        assert!(!dir.path().join("portrait.png.part").exists());
    }

    #[test]
    fn portrait_of_unknown_serial_is_a_record_error() {
        let dir = tempfile::tempdir().unwrap();
        let services = services_in(dir.path());
        let err = services.portrait(4, &dir.path().join("p.png")).unwrap_err();
        assert!(matches!(err, cardwerk_core::CardwerkError::InvalidRecord(_)));
        assert!(!dir.path().join("p.png").exists());
    }

    #[test]
    fn detection_without_a_backend_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let services = services_with(dir.path(), |config| {
            config.face.model_path = None;
        });
        let detector = services.detector().unwrap();
        assert!(matches!(
            detector.ready(),
            Err(cardwerk_core::CardwerkError::FaceDetectorUnavailable(_))
        ));
    }
}
