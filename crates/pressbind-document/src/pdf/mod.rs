// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: assembling, protecting, writing, and reading documents.

pub mod assembler;
pub mod protector;
pub mod reader;
pub mod writer;

pub use assembler::{AssembledDocument, AssemblyState, PageAssembler, PageRecord};
pub use protector::{DocumentProtector, ProtectedDocument};
pub use reader::PdfReader;
pub use writer::{DocumentWriter, Serializable};
