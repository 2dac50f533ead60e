// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — source photos plus crop, square, resize, and encode helpers.

pub mod photo;
pub mod processor;

pub use photo::Photo;
pub use processor::ImageProcessor;
