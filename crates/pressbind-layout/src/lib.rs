// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pressbind-layout: Placement geometry for every page layout.
//
// Every layout is expressed as "which cells, which anchor": the page is
// partitioned into cells, each image is scaled against its cell with one
// shared fit function, and the mode decides where inside the cell it sits.
// Nothing here performs I/O or holds state.

pub mod cells;
pub mod engine;
pub mod fit;

pub use cells::{available_area, cells};
pub use engine::{compute_placements, placements_for};
pub use fit::{fill_within, fit_within};
