// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page partitioning: the cells each layout mode draws into.

use pressbind_core::error::{PressbindError, Result};
use pressbind_core::{LayoutMode, Margins, PageSize, Rect};

/// The page inset by `margins.page` on all four sides.
///
/// Fails with `InvalidMargin` when a margin is negative or non-finite, or
/// when the inset leaves no drawing area.
pub fn available_area(page: PageSize, margins: Margins) -> Result<Rect> {
    let width = page.width() - 2.0 * margins.page;
    let height = page.height() - 2.0 * margins.page;

    let margins_valid = margins.page.is_finite()
        && margins.gutter.is_finite()
        && margins.page >= 0.0
        && margins.gutter >= 0.0;

    if !margins_valid || width <= 0.0 || height <= 0.0 {
        return Err(PressbindError::InvalidMargin {
            available_width: width,
            available_height: height,
        });
    }

    Ok(Rect::new(margins.page, margins.page, width, height))
}

/// Cell rectangles for `mode`, in image order.
///
/// Two-up vertical cells run top to bottom, two-up horizontal cells left to
/// right, and grid cells top-left, top-right, bottom-left, bottom-right.
/// Cells plus the gutters between them exactly cover the available area.
pub fn cells(page: PageSize, margins: Margins, mode: LayoutMode) -> Result<Vec<Rect>> {
    let area = available_area(page, margins)?;
    let gutter = margins.gutter;

    let (columns, rows) = match mode {
        LayoutMode::Original | LayoutMode::A4Fit | LayoutMode::LeftAlign => (1, 1),
        LayoutMode::TwoUpVertical => (1, 2),
        LayoutMode::TwoUpHorizontal => (2, 1),
        LayoutMode::Grid2x2 => (2, 2),
    };

    // Gutters only exist between cells.
    let cell_width = (area.width - gutter * (columns - 1) as f32) / columns as f32;
    let cell_height = (area.height - gutter * (rows - 1) as f32) / rows as f32;
    if cell_width <= 0.0 || cell_height <= 0.0 {
        return Err(PressbindError::InvalidMargin {
            available_width: cell_width,
            available_height: cell_height,
        });
    }

    let mut result = Vec::with_capacity(columns * rows);
    for index in 0..columns * rows {
        let row = index / columns;
        let column = index % columns;
        // Row 0 is the top row; PDF y grows upwards.
        let flipped_row = rows - 1 - row;
        result.push(Rect::new(
            area.x + column as f32 * (cell_width + gutter),
            area.y + flipped_row as f32 * (cell_height + gutter),
            cell_width,
            cell_height,
        ));
    }
    Ok(result)
}
