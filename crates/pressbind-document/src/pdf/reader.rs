// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open composed documents and inspect their pages and images
// using the `lopdf` crate.

use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use pressbind_core::Rect;
use pressbind_core::error::{PressbindError, Result};
use pressbind_security::{StandardSecurityHandler, is_encrypted};
use tracing::{debug, info, instrument};

/// Name that stands in for the trailer's /Encrypt key while lopdf parses an
/// encrypted file. It has the same length, so xref offsets stay valid.
const HIDDEN_ENCRYPT_KEY: &[u8] = b"Encrypx";

/// Reads existing PDF files.
///
/// Wraps `lopdf::Document` and answers the questions needed to check a
/// composed document: how many pages, how many images on each, and how big
/// each page is.
///
/// Encrypted files are loaded with every object still encrypted, whatever
/// their user password, and stay that way until [`PdfReader::unlock`].
#[derive(Debug)]
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (used in diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let data = std::fs::read(path_ref).map_err(|err| {
            PressbindError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;
        let document = load_document(&data).map_err(|err| {
            PressbindError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Open a password-protected PDF and decrypt it in memory.
    pub fn open_with_password(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        let mut reader = Self::open(path)?;
        reader.unlock(password)?;
        Ok(reader)
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = load_document(data).map_err(|err| {
            PressbindError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    /// Wrap a document that is already in memory.
    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            source_path: None,
        }
    }

    /// Decrypt the document with `password` if it is encrypted.
    ///
    /// Fails with `DecryptionError` if the password is wrong or if nothing
    /// readable is left once the objects are decrypted.
    #[instrument(skip_all, fields(path = self.source_path.as_deref().unwrap_or("<memory>")))]
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        if !is_encrypted(&self.document) {
            return Ok(());
        }
        let origin = self.source_path.as_deref().unwrap_or("in-memory PDF");
        StandardSecurityHandler::decrypt_document(&mut self.document, password)?;
        if self.page_count() == 0 {
            return Err(PressbindError::DecryptionError(format!(
                "{origin} has no readable pages after decryption"
            )));
        }
        info!(pages = self.page_count(), "PDF unlocked");
        Ok(())
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    pub fn is_encrypted(&self) -> bool {
        is_encrypted(&self.document)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Number of image XObjects referenced by each page, in page order.
    pub fn images_per_page(&self) -> Vec<usize> {
        self.document
            .get_pages()
            .values()
            .map(|&page_id| {
                self.document
                    .get_object(page_id)
                    .ok()
                    .and_then(|page| self.dictionary(page))
                    .and_then(|page| page.get(b"Resources").ok())
                    .and_then(|resources| self.dictionary(resources))
                    .and_then(|resources| resources.get(b"XObject").ok())
                    .and_then(|xobjects| self.dictionary(xobjects))
                    .map(|xobjects| {
                        xobjects
                            .iter()
                            .filter(|(_, object)| self.is_image(object))
                            .count()
                    })
                    .unwrap_or(0)
            })
            .collect()
    }

    /// MediaBox of each page, in page order.
    pub fn media_boxes(&self) -> Vec<Option<Rect>> {
        self.document
            .get_pages()
            .values()
            .map(|&page_id| {
                let page = self.dictionary(self.document.get_object(page_id).ok()?)?;
                match page.get(b"MediaBox").ok()? {
                    Object::Array(values) if values.len() == 4 => {
                        let llx = number(&values[0])?;
                        let lly = number(&values[1])?;
                        let urx = number(&values[2])?;
                        let ury = number(&values[3])?;
                        Some(Rect::new(llx, lly, urx - llx, ury - lly))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    /// Follow a reference if needed and return the dictionary behind `object`.
    fn dictionary<'d>(&'d self, object: &'d Object) -> Option<&'d Dictionary> {
        match object {
            Object::Dictionary(dict) => Some(dict),
            Object::Reference(id) => match self.document.get_object(*id).ok()? {
                Object::Dictionary(dict) => Some(dict),
                _ => None,
            },
            _ => None,
        }
    }

    fn is_image(&self, object: &Object) -> bool {
        let stream = match object {
            Object::Reference(id) => match self.document.get_object(*id) {
                Ok(Object::Stream(stream)) => stream,
                _ => return false,
            },
            Object::Stream(stream) => stream,
            _ => return false,
        };
        matches!(
            stream.dict.get(b"Subtype"),
            Ok(Object::Name(name)) if name.as_slice() == b"Image"
        )
    }
}

/// Parse `data`, keeping encrypted objects intact.
///
/// lopdf tries the empty user password on encrypted input and keeps only the
/// encryption dictionary when that fails. Hiding the trailer key makes it
/// parse the file as plain objects, and the key is put back afterwards.
fn load_document(data: &[u8]) -> lopdf::Result<Document> {
    let Some(hidden) = hide_encrypt_key(data) else {
        return Document::load_mem(data);
    };
    let mut document = Document::load_mem(&hidden)?;
    match document.trailer.remove(HIDDEN_ENCRYPT_KEY) {
        Some(reference) => {
            document.trailer.set("Encrypt", reference);
            Ok(document)
        }
        // The name only appeared outside the trailer; parse the bytes as given.
        None => Document::load_mem(data),
    }
}

/// Copy of `data` with every `/Encrypt` name token renamed, or `None` if
/// there is none. `/EncryptMetadata` is left alone.
fn hide_encrypt_key(data: &[u8]) -> Option<Vec<u8>> {
    const KEY: &[u8] = b"/Encrypt";
    let positions: Vec<usize> = data
        .windows(KEY.len() + 1)
        .enumerate()
        .filter(|(_, window)| window.starts_with(KEY) && ends_name(window[KEY.len()]))
        .map(|(pos, _)| pos)
        .collect();
    if positions.is_empty() {
        return None;
    }

    let mut hidden = data.to_vec();
    for pos in positions {
        hidden[pos + 1..pos + KEY.len()].copy_from_slice(HIDDEN_ENCRYPT_KEY);
    }
    Some(hidden)
}

/// Whitespace and delimiters terminate a PDF name.
fn ends_name(byte: u8) -> bool {
    byte.is_ascii_whitespace() || b"()<>[]{}/%".contains(&byte)
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}
