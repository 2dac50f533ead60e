// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card module — text layout, outlined text drawing, and card composition.

pub mod composer;
pub mod layout;
pub mod render;

pub use composer::{CardAssets, CardComposer, ComposedCard};
pub use layout::{FontMeasure, TextLayout, TextMeasure};
