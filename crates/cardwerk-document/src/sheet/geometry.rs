// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print sheet geometry — how many card footprints fit per axis, the equal
// spacing around them, and the page/row/column traversal that places cards
// in input order.
//
// Spacing on an axis is the leftover length split into `frequency + 1`
// equal gaps: before the first card, between neighbours, after the last.

use cardwerk_core::config::SheetConfig;
use cardwerk_core::error::{CardwerkError, Result};

/// Derived layout constants for one sheet configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetGeometry {
    /// Page width and height.
    pub page: (f64, f64),
    /// Card width and height on the page.
    pub footprint: (f64, f64),
    /// Cards per row and per column.
    pub frequency: (u32, u32),
    /// Gap between cards (and page edges) along x and y.
    pub spacing: (f64, f64),
}

impl SheetGeometry {
    /// Derive frequency and spacing for a page and card footprint.
    ///
    /// Fails when a size is not a positive finite number, or when not even
    /// one card fits along an axis.
    pub fn new(page: (f64, f64), footprint: (f64, f64)) -> Result<Self> {
        let sizes = [page.0, page.1, footprint.0, footprint.1];
        if !sizes.iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(CardwerkError::InvalidSheetGeometry(format!(
                "page {}x{} and footprint {}x{} must be positive",
                page.0, page.1, footprint.0, footprint.1
            )));
        }

        let fx = axis_frequency(page.0, footprint.0);
        let fy = axis_frequency(page.1, footprint.1);
        if fx == 0 || fy == 0 {
            return Err(CardwerkError::InvalidSheetGeometry(format!(
                "a {}x{} footprint does not fit on a {}x{} page",
                footprint.0, footprint.1, page.0, page.1
            )));
        }

        Ok(Self {
            page,
            footprint,
            frequency: (fx, fy),
            spacing: (
                axis_spacing(page.0, footprint.0, fx),
                axis_spacing(page.1, footprint.1, fy),
            ),
        })
    }

    pub fn from_config(config: &SheetConfig) -> Result<Self> {
        Self::new(config.page_size, config.image_footprint)
    }

    /// Cards that fit on one page.
    pub fn per_page(&self) -> usize {
        self.frequency.0 as usize * self.frequency.1 as usize
    }

    /// Pages needed for `count` cards. An empty run still has one blank page.
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(self.per_page()).max(1)
    }

    /// Top-left offset of the card in column `col`, row `row`, measured from
    /// the top-left page corner.
    pub fn offset(&self, col: u32, row: u32) -> (f64, f64) {
        (
            col as f64 * self.footprint.0 + (col + 1) as f64 * self.spacing.0,
            row as f64 * self.footprint.1 + (row + 1) as f64 * self.spacing.1,
        )
    }

    /// Placement of the `index`-th card computed directly from the
    /// flattened index, without walking a cursor.
    pub fn placement_for_index(&self, index: usize) -> Placement {
        let per_page = self.per_page();
        let page = index / per_page;
        let within = index % per_page;
        let col = (within % self.frequency.0 as usize) as u32;
        let row = (within / self.frequency.0 as usize) as u32;
        Placement {
            index,
            page,
            col,
            row,
            offset: self.offset(col, row),
        }
    }

    /// Placements for `count` cards in input order.
    pub fn plan(&self, count: usize) -> Vec<Placement> {
        let mut cursor = PageCursor::default();
        (0..count).map(|index| cursor.place(self, index)).collect()
    }
}

fn axis_frequency(page: f64, footprint: f64) -> u32 {
    (page / footprint).floor() as u32
}

fn axis_spacing(page: f64, footprint: f64, frequency: u32) -> f64 {
    (page - frequency as f64 * footprint) / (frequency as f64 + 1.0)
}

/// Where one card lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Position in the input sequence.
    pub index: usize,
    /// Zero-based page number.
    pub page: usize,
    pub col: u32,
    pub row: u32,
    /// Top-left offset from the top-left page corner.
    pub offset: (f64, f64),
}

/// Traversal state over the current page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    pub page: usize,
    pub col: u32,
    pub row: u32,
}

impl PageCursor {
    /// Place the next card and advance.
    ///
    /// A full row moves to the next row; a full page resets to `(0, 0)` on a
    /// new page. The offset uses the position after that wrap and before the
    /// column is incremented.
    pub fn place(&mut self, geometry: &SheetGeometry, index: usize) -> Placement {
        if self.col == geometry.frequency.0 {
            self.row += 1;
            self.col = 0;
            if self.row == geometry.frequency.1 {
                self.row = 0;
                self.page += 1;
            }
        }

        let placement = Placement {
            index,
            page: self.page,
            col: self.col,
            row: self.row,
            offset: geometry.offset(self.col, self.row),
        };
        self.col += 1;
        placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> SheetGeometry {
        SheetGeometry::new((12.0, 18.0), (3.75, 5.0)).unwrap()
    }

    #[test]
    fn stock_sheet_frequency_and_spacing() {
        let g = stock();
        assert_eq!(g.frequency, (3, 3));
        assert_eq!(g.spacing, (0.1875, 0.75));
    }

    #[test]
    fn margins_are_equal_on_both_ends() {
        let g = stock();
        let (last_x, last_y) = g.offset(2, 2);
        assert!((g.page.0 - (last_x + g.footprint.0) - g.spacing.0).abs() < 1e-9);
        assert!((g.page.1 - (last_y + g.footprint.1) - g.spacing.1).abs() < 1e-9);
    }

    #[test]
    fn ten_cards_fill_two_pages() {
        let g = stock();
        let plan = g.plan(10);
        assert_eq!(plan.iter().filter(|p| p.page == 0).count(), 9);
        assert_eq!(plan.iter().filter(|p| p.page == 1).count(), 1);
        assert_eq!(g.page_count(10), 2);

        for first in [plan[0], plan[9]] {
            assert_eq!((first.col, first.row), (0, 0));
            assert_eq!(first.offset, (0.1875, 0.75));
        }
    }

    #[test]
    fn row_major_order_within_page() {
        let plan = stock().plan(4);
        let cells: Vec<(u32, u32)> = plan.iter().map(|p| (p.col, p.row)).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0), (0, 1)]);
        assert_eq!(plan[3].offset, (0.1875, 5.0 + 2.0 * 0.75));
    }

    #[test]
    fn flattened_index_matches_cursor_walk() {
        let g = SheetGeometry::new((8.5, 11.0), (2.0, 3.0)).unwrap();
        for placement in g.plan(40) {
            assert_eq!(g.placement_for_index(placement.index), placement);
        }
    }

    #[test]
    fn page_count_is_ceiling_with_blank_minimum() {
        let g = stock();
        assert_eq!(g.page_count(0), 1);
        assert_eq!(g.page_count(9), 1);
        assert_eq!(g.page_count(18), 2);
        assert_eq!(g.page_count(19), 3);
    }

    #[test]
    fn oversized_footprint_is_rejected() {
        assert!(matches!(
            SheetGeometry::new((12.0, 18.0), (13.0, 5.0)),
            Err(CardwerkError::InvalidSheetGeometry(_))
        ));
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        for (page, footprint) in [
            ((12.0, 18.0), (0.0, 5.0)),
            ((12.0, 18.0), (3.75, -5.0)),
            ((0.0, 18.0), (3.75, 5.0)),
            ((12.0, 18.0), (f64::NAN, 5.0)),
            ((f64::INFINITY, 18.0), (3.75, 5.0)),
        ] {
            assert!(
                matches!(
                    SheetGeometry::new(page, footprint),
                    Err(CardwerkError::InvalidSheetGeometry(_))
                ),
                "{page:?} / {footprint:?}"
            );
        }
    }

    #[test]
    fn tiny_footprint_does_not_overflow() {
        let g = SheetGeometry::new((12.0, 18.0), (1e-12, 1e-12)).unwrap();
        assert_eq!(g.frequency, (u32::MAX, u32::MAX));
        assert!(g.spacing.0.is_finite() && g.spacing.0 >= 0.0);
    }
}
