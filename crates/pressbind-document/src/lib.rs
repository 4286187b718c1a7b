// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pressbind-document: Turning image references into a finished PDF.
//
// Image sources resolve references into embeddable JPEG descriptors, the
// page assembler lays them out with pressbind-layout and builds a lopdf
// document, the protector applies password encryption, and the writer
// persists the result atomically. `compose` strings the stages together.

pub mod compose;
pub mod image;
pub mod pdf;
pub mod source;

// Re-export the primary entry points so callers can use
// `pressbind_document::Composer` etc.
pub use compose::{CancelFlag, Composer, compose};
pub use crate::image::processor::ImageProcessor;
pub use pdf::assembler::{AssembledDocument, AssemblyState, PageAssembler, PageRecord};
pub use pdf::protector::{DocumentProtector, ProtectedDocument};
pub use pdf::reader::PdfReader;
pub use pdf::writer::{DocumentWriter, Serializable};
pub use source::{FileImageSource, ImageSource, MemoryImageSource};
