// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: serialize finished documents and persist them atomically.

use std::io::Write;
use std::path::Path;

use lopdf::Document;
use pressbind_core::error::{PressbindError, Result};
use pressbind_security::hash_bytes;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::pdf::assembler::AssembledDocument;
use crate::pdf::protector::ProtectedDocument;

/// A document that can be turned into PDF bytes.
///
/// Serialization takes `&mut self` because lopdf rebuilds its cross-reference
/// table while writing.
pub trait Serializable {
    fn serialize(&mut self) -> Result<Vec<u8>>;
}

impl Serializable for AssembledDocument {
    fn serialize(&mut self) -> Result<Vec<u8>> {
        save(self.document_mut())
    }
}

impl Serializable for ProtectedDocument {
    fn serialize(&mut self) -> Result<Vec<u8>> {
        save(self.document_mut())
    }
}

impl Serializable for Document {
    fn serialize(&mut self) -> Result<Vec<u8>> {
        save(self)
    }
}

fn save(document: &mut Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    document
        .save_to(&mut buffer)
        .map_err(|err| PressbindError::WriteError(format!("failed to serialize PDF: {err}")))?;
    Ok(buffer)
}

/// Writes documents to memory or disk.
pub struct DocumentWriter;

impl DocumentWriter {
    /// Serialize in memory.
    pub fn to_bytes(document: &mut impl Serializable) -> Result<Vec<u8>> {
        let bytes = document.serialize()?;
        debug!(bytes = bytes.len(), "document serialized");
        Ok(bytes)
    }

    /// Serialize and atomically replace `destination`.
    ///
    /// The bytes go to a temporary file next to the destination, which is
    /// flushed, synced, and renamed over it. On failure the temporary file is
    /// removed and `destination` is left as it was.
    #[instrument(skip_all, fields(path = %destination.as_ref().display()))]
    pub fn write(document: &mut impl Serializable, destination: impl AsRef<Path>) -> Result<()> {
        let destination = destination.as_ref();
        let bytes = Self::to_bytes(document)?;
        Self::write_bytes(&bytes, destination)?;
        info!(
            bytes = bytes.len(),
            sha256 = %hash_bytes(&bytes),
            "document written"
        );
        Ok(())
    }

    /// Atomically replace `destination` with `bytes`.
    pub fn write_bytes(bytes: &[u8], destination: &Path) -> Result<()> {
        let parent = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let write_error = |action: &str, err: std::io::Error| {
            PressbindError::WriteError(format!("{action} for {}: {err}", destination.display()))
        };

        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|err| write_error("cannot create temporary file", err))?;
        temp.write_all(bytes)
            .map_err(|err| write_error("write failed", err))?;
        temp.flush().map_err(|err| write_error("flush failed", err))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| write_error("sync failed", err))?;
        temp.persist(destination)
            .map_err(|err| write_error("cannot move output into place", err.error))?;
        Ok(())
    }
}
