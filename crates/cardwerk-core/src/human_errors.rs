// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for the people filling in the card form.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Validation failures never escape a component boundary as errors: callers
// turn them into a `(result-or-none, message)` pair with `into_status`.

use crate::error::CardwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change an input (photo, name, phone, post).
    ActionRequired,
    /// An installation problem: missing template, font, or bad configuration.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary, shown as the status line.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `CardwerkError` into a `HumanError`.
pub fn humanize_error(err: &CardwerkError) -> HumanError {
    match err {
        CardwerkError::NoFaceDetected => HumanError {
            message: "No face detected. Please try another image.".into(),
            suggestion: "Use a well-lit, front-facing photo, or force the image to skip face detection.".into(),
            severity: Severity::ActionRequired,
        },

        CardwerkError::InvalidFaceSize(size) => HumanError {
            message: format!("Target face size {size} is out of range."),
            suggestion: "Choose a face size greater than 0 and at most 1 (0.5 is typical).".into(),
            severity: Severity::ActionRequired,
        },

        // Field validation carries the exact user-facing message.
        CardwerkError::InvalidName(msg)
        | CardwerkError::InvalidPost(msg)
        | CardwerkError::InvalidPhone(msg) => HumanError {
            message: msg.clone(),
            suggestion: "Correct the highlighted field and generate the card again.".into(),
            severity: Severity::ActionRequired,
        },

        CardwerkError::SourceImageUnreadable { path, .. } => HumanError {
            message: format!("The image {path} couldn't be read."),
            suggestion: "The file may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::ActionRequired,
        },

        CardwerkError::FaceDetectorUnavailable(detail) => HumanError {
            message: "Face detection isn't set up on this installation.".into(),
            suggestion: format!("Configure a face model, or force the image to skip face detection. ({detail})"),
            severity: Severity::Permanent,
        },

        CardwerkError::TemplateOrFontMissing(detail) => HumanError {
            message: "The card template or font is missing.".into(),
            suggestion: format!("Check the template and font paths in the configuration. ({detail})"),
            severity: Severity::Permanent,
        },

        CardwerkError::InvalidSheetGeometry(detail) => HumanError {
            message: "The print sheet settings don't work.".into(),
            suggestion: format!("Make sure at least one card fits on a page. ({detail})"),
            severity: Severity::Permanent,
        },

        CardwerkError::InvalidRecord(detail) => HumanError {
            message: "That ID card record couldn't be found or read.".into(),
            suggestion: format!("Refresh the card list and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        CardwerkError::ImageError(_) => HumanError {
            message: "There was a problem creating the card image.".into(),
            suggestion: "Try again with a different photo.".into(),
            severity: Severity::Permanent,
        },

        CardwerkError::PdfError(_) => HumanError {
            message: "The print document couldn't be created.".into(),
            suggestion: "Regenerate the ID cards and try printing again.".into(),
            severity: Severity::Permanent,
        },

        CardwerkError::WorkerPool(_) => HumanError {
            message: "Cards couldn't be regenerated in parallel.".into(),
            suggestion: "Try again with fewer workers.".into(),
            severity: Severity::Permanent,
        },

        CardwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Cardwerk doesn't have permission to use that file.".into(),
                    suggestion: "Check the file and folder permissions.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        CardwerkError::Serialization(_) => HumanError {
            message: "A settings or record file is damaged.".into(),
            suggestion: "Check the JSON file for typos, or delete it to fall back to defaults.".into(),
            severity: Severity::Permanent,
        },
    }
}

/// Collapse a result into the `(result-or-none, message)` pair shown to users.
pub fn into_status<T>(result: Result<T, CardwerkError>, success: &str) -> (Option<T>, String) {
    match result {
        Ok(value) => (Some(value), success.to_owned()),
        Err(err) => (None, humanize_error(&err).message),
    }
}
