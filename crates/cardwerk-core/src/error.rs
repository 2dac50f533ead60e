// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Cardwerk.

use thiserror::Error;

/// Top-level error type for all Cardwerk operations.
#[derive(Debug, Error)]
pub enum CardwerkError {
    // -- Portrait errors --
    #[error("no face detected in the source photo")]
    NoFaceDetected,

    #[error("target face size must be in (0, 1], got {0}")]
    InvalidFaceSize(f64),

    #[error("face detection unavailable: {0}")]
    FaceDetectorUnavailable(String),

    // -- Field validation --
    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid post: {0}")]
    InvalidPost(String),

    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    // -- Assets and sources --
    #[error("source image unreadable: {path}: {reason}")]
    SourceImageUnreadable { path: String, reason: String },

    #[error("template or font missing: {0}")]
    TemplateOrFontMissing(String),

    // -- Layout / records --
    #[error("invalid sheet geometry: {0}")]
    InvalidSheetGeometry(String),

    #[error("invalid card record: {0}")]
    InvalidRecord(String),

    // -- Output --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("worker pool failed: {0}")]
    WorkerPool(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CardwerkError {
    /// Build a `SourceImageUnreadable` from any displayable source and cause.
    pub fn unreadable(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::SourceImageUnreadable {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CardwerkError>;
