// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face locator — memoised face detection keyed by the photo's byte content.
//
// The result is a pure function of the encoded bytes: identical bytes hit
// the cache regardless of path or object identity, and the detector is not
// consulted again. An empty list is a valid result, not an error; a detector
// that cannot run is.

use std::sync::Arc;

use cardwerk_core::error::Result;
use cardwerk_core::types::DetectionParams;
use tracing::{debug, info, instrument};

use super::cache::FaceList;
use super::{FaceCache, FaceDetector, Fingerprint};
use crate::image::Photo;

/// Finds faces in photos, ordered left to right.
#[derive(Clone)]
pub struct FaceLocator {
    detector: Arc<dyn FaceDetector>,
    cache: Arc<FaceCache>,
    params: DetectionParams,
}

impl FaceLocator {
    /// Create a locator with the default detection parameters.
    pub fn new(detector: Arc<dyn FaceDetector>, cache: Arc<FaceCache>) -> Self {
        Self::with_params(detector, cache, DetectionParams::default())
    }

    pub fn with_params(
        detector: Arc<dyn FaceDetector>,
        cache: Arc<FaceCache>,
        params: DetectionParams,
    ) -> Self {
        Self {
            detector,
            cache,
            params,
        }
    }

    /// The cache shared by this locator.
    pub fn cache(&self) -> &Arc<FaceCache> {
        &self.cache
    }

    /// Faces in `photo`, sorted ascending by `x`.
    #[instrument(skip_all, fields(bytes = photo.bytes().len()))]
    pub fn locate(&self, photo: &Photo) -> Result<FaceList> {
        self.detector.ready()?;
        let key = Fingerprint::of(photo.bytes());

        if let Some(faces) = self.cache.get(&key) {
            debug!(fingerprint = %key, faces = faces.len(), "Face cache hit");
            return Ok(faces);
        }

        let gray = photo.image().to_luma8();
        let mut faces = self.detector.detect(&gray, &self.params);
        faces.sort_by_key(|face| face.x);

        info!(fingerprint = %key, faces = faces.len(), "Faces detected");
        Ok(self.cache.insert(key, faces))
    }
}
