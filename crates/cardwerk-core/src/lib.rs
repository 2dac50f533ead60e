// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cardwerk — Core types, field validation, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod record;
pub mod types;
pub mod validate;

pub use config::AppConfig;
pub use error::CardwerkError;
pub use record::CardRecord;
pub use types::*;
