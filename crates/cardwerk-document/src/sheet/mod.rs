// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheet module — print sheet geometry and PDF tiling.

pub mod geometry;
pub mod tiler;

pub use geometry::{PageCursor, Placement, SheetGeometry};
pub use tiler::SheetTiler;
