// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placement computation for one page's worth of images.

use pressbind_core::error::{PressbindError, Result};
use pressbind_core::{ImageDescriptor, ImageSize, LayoutMode, Margins, PageSize, Placement, Rect};

use crate::cells::cells;
use crate::fit::{fill_within, fit_within};

/// Compute where each image of one page is drawn.
///
/// `images[i]` goes into cell `i`; `None` entries, and cells past the end of
/// the slice, are left blank. The returned placements are in cell order and
/// only cover populated cells.
///
/// Margins are validated before any image is looked at, so a bad margin is
/// reported as `InvalidMargin` even when an image is also invalid.
pub fn compute_placements(
    page: PageSize,
    margins: Margins,
    mode: LayoutMode,
    images: &[Option<ImageSize>],
) -> Result<Vec<Placement>> {
    let capacity = mode.images_per_page();
    if images.len() > capacity {
        return Err(PressbindError::TooManyImages {
            given: images.len(),
            capacity,
        });
    }

    let page_cells = cells(page, margins, mode)?;

    let mut placements = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let Some(image) = image else {
            continue;
        };
        let image = image.validate()?;
        placements.push(place_in_cell(mode, index, page_cells[index], image));
    }
    Ok(placements)
}

/// Convenience wrapper taking resolved descriptors.
pub fn placements_for(
    page: PageSize,
    margins: Margins,
    mode: LayoutMode,
    images: &[ImageDescriptor],
) -> Result<Vec<Placement>> {
    let sizes: Vec<Option<ImageSize>> = images.iter().map(|d| Some(d.size())).collect();
    compute_placements(page, margins, mode, &sizes)
}

fn place_in_cell(mode: LayoutMode, index: usize, cell: Rect, image: ImageSize) -> Placement {
    let drawn = match mode {
        LayoutMode::Original => fill_within(image, cell.width, cell.height),
        _ => fit_within(image, cell.width, cell.height),
    };

    let (x, y) = match mode {
        // Top-left anchored; y is the bottom edge of the drawn image.
        LayoutMode::LeftAlign => (cell.x, cell.top() - drawn.height),
        _ => {
            let (center_x, center_y) = cell.center();
            (center_x - drawn.width / 2.0, center_y - drawn.height / 2.0)
        }
    };

    Placement {
        cell: index,
        x,
        y,
        width: drawn.width,
        height: drawn.height,
    }
}
