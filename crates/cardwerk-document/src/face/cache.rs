// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face cache — detection results keyed by content fingerprint.
//
// Append-only for the lifetime of the cache; there is no eviction. The map
// sits behind an `RwLock` so parallel card jobs can read and insert
// concurrently. Two workers racing to insert the same fingerprint compute
// the same boxes, so the first insert wins and the second is dropped.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use cardwerk_core::types::FaceBox;
use tracing::debug;

use super::Fingerprint;

/// Ordered face boxes shared between cache and callers.
pub type FaceList = Arc<[FaceBox]>;

#[derive(Debug, Default)]
pub struct FaceCache {
    entries: RwLock<HashMap<Fingerprint, FaceList>>,
}

impl FaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached faces for `key`, if any.
    pub fn get(&self, key: &Fingerprint) -> Option<FaceList> {
        let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
        entries.get(key).cloned()
    }

    /// Store `faces` under `key` unless an entry already exists, and return
    /// whichever list is now cached.
    pub fn insert(&self, key: Fingerprint, faces: Vec<FaceBox>) -> FaceList {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        let list = entries.entry(key).or_insert_with(|| {
            debug!(fingerprint = %key, faces = faces.len(), "Face cache insert");
            Arc::from(faces)
        });
        Arc::clone(list)
    }

    /// Number of distinct fingerprints cached.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
