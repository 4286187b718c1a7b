// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pressbind.

use thiserror::Error;

/// Top-level error type for all Pressbind operations.
#[derive(Debug, Error)]
pub enum PressbindError {
    // -- Geometry errors --
    #[error("invalid image dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: f32, height: f32 },

    #[error("invalid page size {width}x{height}: both must be positive")]
    InvalidPageSize { width: f32, height: f32 },

    #[error(
        "margins leave no drawing area (available {available_width}x{available_height})"
    )]
    InvalidMargin {
        available_width: f32,
        available_height: f32,
    },

    #[error("{given} images supplied for a page that holds {capacity}")]
    TooManyImages { given: usize, capacity: usize },

    // -- Assembly errors --
    #[error("no images to compose")]
    NoImages,

    #[error("could not resolve image {reference}: {reason}")]
    ResolutionFailure { reference: String, reason: String },

    #[error("image processing error: {0}")]
    ImageError(String),

    #[error("assembly failed on page {page}: {source}")]
    AssemblyFailure {
        page: usize,
        #[source]
        source: Box<PressbindError>,
    },

    #[error("composition cancelled")]
    Cancelled,

    // -- Protection errors --
    #[error("encryption failed: {0}")]
    EncryptionError(String),

    #[error("decryption failed: {0}")]
    DecryptionError(String),

    // -- Output --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("could not write document: {0}")]
    WriteError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification handed to callers: one per failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad geometry or configuration supplied by the caller.
    Configuration,
    /// An image reference could not be turned into a descriptor.
    Resolution,
    /// The password policy could not be applied or checked.
    Encryption,
    /// The document could not be serialized or persisted.
    Output,
    /// The caller cancelled the run.
    Cancelled,
}

impl PressbindError {
    /// Classify this error. `AssemblyFailure` reports the kind of its cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimension { .. }
            | Self::InvalidPageSize { .. }
            | Self::InvalidMargin { .. }
            | Self::TooManyImages { .. }
            | Self::NoImages
            | Self::Serialization(_) => ErrorKind::Configuration,
            Self::ResolutionFailure { .. } | Self::ImageError(_) => ErrorKind::Resolution,
            Self::AssemblyFailure { source, .. } => source.kind(),
            Self::Cancelled => ErrorKind::Cancelled,
            Self::EncryptionError(_) | Self::DecryptionError(_) => ErrorKind::Encryption,
            Self::PdfError(_) | Self::WriteError(_) | Self::Io(_) => ErrorKind::Output,
        }
    }

    /// Build a `ResolutionFailure` for `reference`.
    pub fn resolution(reference: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::ResolutionFailure {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PressbindError>;
