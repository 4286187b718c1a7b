// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document protector: apply a password to assembled or existing PDFs.

use std::path::Path;

use lopdf::Document;
use pressbind_core::DocumentId;
use pressbind_core::error::{PressbindError, Result};
use pressbind_security::{
    EncryptionPolicy, KeyLength, Permissions, StandardSecurityHandler, file_identifier,
};
use tracing::{info, instrument};

use crate::pdf::assembler::AssembledDocument;
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::DocumentWriter;

/// An encrypted document, ready for the writer.
#[derive(Debug, Clone)]
pub struct ProtectedDocument {
    id: DocumentId,
    key_length: KeyLength,
    document: Document,
}

impl ProtectedDocument {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn key_length(&self) -> KeyLength {
        self.key_length
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

/// Applies single-password protection: the password opens the document and
/// every permission is granted once it is open.
#[derive(Debug, Clone, Default)]
pub struct DocumentProtector {
    key_length: KeyLength,
    permissions: Permissions,
}

impl DocumentProtector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_length(mut self, key_length: KeyLength) -> Self {
        self.key_length = key_length;
        self
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    fn handler(&self, password: &str) -> Result<StandardSecurityHandler> {
        let policy = EncryptionPolicy {
            key_length: self.key_length,
            permissions: self.permissions,
            ..EncryptionPolicy::single_password(password)
        };
        StandardSecurityHandler::new(policy)
    }

    /// Encrypt an assembled document with `password`.
    #[instrument(skip_all, fields(id = %document.id(), bits = self.key_length.bits()))]
    pub fn protect(
        &self,
        document: AssembledDocument,
        password: &str,
    ) -> Result<ProtectedDocument> {
        let handler = self.handler(password)?;
        let (id, mut document) = document.into_document();
        handler.encrypt_document(&mut document, &file_identifier(&id))?;
        info!("document protected");
        Ok(ProtectedDocument {
            id,
            key_length: self.key_length,
            document,
        })
    }

    /// Load an existing PDF, protect it, and atomically write it to
    /// `destination`.
    ///
    /// Already-encrypted input is refused. Every failure, including unreadable
    /// input and write errors, is reported as `EncryptionError`, and no
    /// output file is left behind.
    #[instrument(
        skip_all,
        fields(
            source = %source.as_ref().display(),
            destination = %destination.as_ref().display()
        )
    )]
    pub fn protect_file(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        password: &str,
    ) -> Result<()> {
        let (source, destination) = (source.as_ref(), destination.as_ref());
        let handler = self.handler(password)?;

        let reader = PdfReader::open(source).map_err(|err| {
            PressbindError::EncryptionError(format!("cannot read {}: {err}", source.display()))
        })?;
        if reader.is_encrypted() {
            return Err(PressbindError::EncryptionError(format!(
                "{} is already encrypted",
                source.display()
            )));
        }
        let mut document = reader.into_document();

        let id = DocumentId::new();
        handler.encrypt_document(&mut document, &file_identifier(&id))?;
        let mut protected = ProtectedDocument {
            id,
            key_length: self.key_length,
            document,
        };
        DocumentWriter::write(&mut protected, destination).map_err(|err| {
            PressbindError::EncryptionError(format!(
                "cannot write {}: {err}",
                destination.display()
            ))
        })?;
        info!("file protected");
        Ok(())
    }
}
