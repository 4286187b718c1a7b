// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Property tests for the placement geometry across page sizes, margins, and
// image shapes.

use pressbind_core::{ImageSize, LayoutMode, Margins, PageSize, Placement, Rect};
use pressbind_layout::{cells, compute_placements};
use proptest::prelude::*;

/// Relative tolerance for comparisons after scaling.
const EPSILON: f32 = 1e-3;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}

fn shrink_only_modes() -> impl Strategy<Value = LayoutMode> {
    prop_oneof![
        Just(LayoutMode::A4Fit),
        Just(LayoutMode::LeftAlign),
        Just(LayoutMode::TwoUpVertical),
        Just(LayoutMode::TwoUpHorizontal),
        Just(LayoutMode::Grid2x2),
    ]
}

fn centered_modes() -> impl Strategy<Value = LayoutMode> {
    prop_oneof![
        Just(LayoutMode::A4Fit),
        Just(LayoutMode::TwoUpVertical),
        Just(LayoutMode::TwoUpHorizontal),
        Just(LayoutMode::Grid2x2),
    ]
}

fn page_sizes() -> impl Strategy<Value = PageSize> {
    (200.0f32..2000.0, 200.0f32..2000.0).prop_map(|(w, h)| PageSize::new(w, h).unwrap())
}

fn image_size() -> impl Strategy<Value = ImageSize> {
    (1.0f32..6000.0, 1.0f32..6000.0).prop_map(|(w, h)| ImageSize::new(w, h))
}

fn full_page(mode: LayoutMode, image: ImageSize) -> Vec<Option<ImageSize>> {
    vec![Some(image); mode.images_per_page()]
}

fn cell_of(page: PageSize, margins: Margins, mode: LayoutMode, placement: &Placement) -> Rect {
    cells(page, margins, mode).unwrap()[placement.cell]
}

proptest! {
    #[test]
    fn shrink_only_preserves_aspect_and_bounds(
        mode in shrink_only_modes(),
        page in page_sizes(),
        margin in 0.0f32..60.0,
        image in image_size(),
    ) {
        let margins = mode.margin_policy(margin);
        let placements = compute_placements(page, margins, mode, &full_page(mode, image)).unwrap();
        prop_assert_eq!(placements.len(), mode.images_per_page());

        for p in &placements {
            let cell = cell_of(page, margins, mode, p);
            prop_assert!(close(p.width / p.height, image.aspect_ratio()));
            prop_assert!(p.width <= cell.width * (1.0 + EPSILON));
            prop_assert!(p.height <= cell.height * (1.0 + EPSILON));
            prop_assert!(p.width <= image.width * (1.0 + EPSILON));
        }
    }

    #[test]
    fn images_smaller_than_the_area_are_not_scaled(
        mode in prop_oneof![Just(LayoutMode::A4Fit), Just(LayoutMode::LeftAlign)],
        page in page_sizes(),
        margin in 0.0f32..60.0,
        fraction_w in 0.05f32..1.0,
        fraction_h in 0.05f32..1.0,
    ) {
        let margins = mode.margin_policy(margin);
        let available_w = page.width() - 2.0 * margin;
        let available_h = page.height() - 2.0 * margin;
        let image = ImageSize::new(available_w * fraction_w, available_h * fraction_h);

        let p = compute_placements(page, margins, mode, &[Some(image)]).unwrap()[0];
        prop_assert_eq!(p.width, image.width);
        prop_assert_eq!(p.height, image.height);
    }

    #[test]
    fn placements_are_centered_in_their_cells(
        mode in centered_modes(),
        page in page_sizes(),
        margin in 0.0f32..60.0,
        image in image_size(),
    ) {
        let margins = mode.margin_policy(margin);
        let placements = compute_placements(page, margins, mode, &full_page(mode, image)).unwrap();
        for p in &placements {
            let (cell_x, cell_y) = cell_of(page, margins, mode, p).center();
            let (x, y) = p.rect().center();
            prop_assert!(close(x, cell_x), "x centre {} vs cell {}", x, cell_x);
            prop_assert!(close(y, cell_y), "y centre {} vs cell {}", y, cell_y);
        }
    }

    #[test]
    fn grid_cells_tile_the_page(
        page in page_sizes(),
        page_margin in 0.0f32..50.0,
        gutter in 0.0f32..50.0,
    ) {
        let margins = Margins::new(page_margin, gutter);
        let grid = cells(page, margins, LayoutMode::Grid2x2).unwrap();

        // Rows and columns line up and abut across exactly one gutter.
        prop_assert!(close(grid[0].x, page_margin));
        prop_assert!(close(grid[2].y, page_margin));
        prop_assert!(close(grid[1].x - grid[0].right(), gutter));
        prop_assert!(close(grid[0].y - grid[2].top(), gutter));
        prop_assert!(close(grid[1].right(), page.width() - page_margin));
        prop_assert!(close(grid[0].top(), page.height() - page_margin));

        // Total covered area equals the page minus margins and gutters.
        let covered: f32 = grid.iter().map(|c| c.width * c.height).sum();
        let inner_w = page.width() - 2.0 * page_margin - gutter;
        let inner_h = page.height() - 2.0 * page_margin - gutter;
        prop_assert!(close(covered, inner_w * inner_h));
    }

    #[test]
    fn partial_pages_only_place_present_images(
        mode in prop_oneof![
            Just(LayoutMode::TwoUpVertical),
            Just(LayoutMode::TwoUpHorizontal),
            Just(LayoutMode::Grid2x2),
        ],
        present in 1usize..4,
        image in image_size(),
    ) {
        let count = present.min(mode.images_per_page());
        let images = vec![Some(image); count];
        let placements =
            compute_placements(PageSize::A4, mode.margin_policy(20.0), mode, &images).unwrap();
        prop_assert_eq!(placements.len(), count);
        let cells_used: Vec<usize> = placements.iter().map(|p| p.cell).collect();
        prop_assert_eq!(cells_used, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn oversized_margins_never_produce_placements(
        page in page_sizes(),
        extra in 0.0f32..100.0,
    ) {
        let margin = page.width().min(page.height()) / 2.0 + extra;
        let result = compute_placements(
            page,
            Margins::new(margin, 0.0),
            LayoutMode::A4Fit,
            &[Some(ImageSize::new(10.0, 10.0))],
        );
        prop_assert!(result.is_err());
    }
}
