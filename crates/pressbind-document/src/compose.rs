// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition entry points: assemble, optionally protect, and serialize.

use std::path::Path;

use pressbind_core::error::{PressbindError, Result};
use pressbind_core::{ComposeConfig, ImageRef, LayoutMode, PageSize, PaperSize};
use pressbind_security::KeyLength;
use tracing::{info, instrument};

use crate::pdf::assembler::{AssembledDocument, PageAssembler};
use crate::pdf::protector::DocumentProtector;
use crate::pdf::writer::DocumentWriter;
use crate::source::ImageSource;

pub use crate::pdf::assembler::CancelFlag;

/// Compose `refs` into PDF bytes in one call.
///
/// `margin` is interpreted by the layout's margin policy. With a password the
/// document is encrypted (128-bit) before serialization.
pub fn compose(
    source: &dyn ImageSource,
    refs: &[ImageRef],
    mode: LayoutMode,
    page_size: PageSize,
    margin: f32,
    password: Option<&str>,
) -> Result<Vec<u8>> {
    let config = ComposeConfig {
        paper_size: PaperSize::Custom {
            width_pt: page_size.width(),
            height_pt: page_size.height(),
        },
        layout: mode,
        margin,
        ..ComposeConfig::default()
    };
    Composer::new(source, config).compose(refs, password)
}

/// Runs compositions against one image source and configuration.
pub struct Composer<'a> {
    source: &'a dyn ImageSource,
    config: ComposeConfig,
    cancel: CancelFlag,
}

impl<'a> Composer<'a> {
    pub fn new(source: &'a dyn ImageSource, config: ComposeConfig) -> Self {
        Self {
            source,
            config,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Page size after applying orientation.
    pub fn page_size(&self) -> Result<PageSize> {
        let page = self.config.paper_size.page_size()?;
        Ok(if self.config.landscape {
            page.landscape()
        } else {
            page
        })
    }

    fn protector(&self) -> Result<DocumentProtector> {
        let key_length = KeyLength::from_bits(self.config.key_length_bits)?;
        Ok(DocumentProtector::new().with_key_length(key_length))
    }

    /// Fail early on settings that would only be rejected after assembly.
    /// The key length only matters, and is only checked, when a password is
    /// given.
    fn preflight<'p>(
        &self,
        password: Option<&'p str>,
    ) -> Result<Option<(DocumentProtector, &'p str)>> {
        match password {
            None => Ok(None),
            Some("") => Err(PressbindError::EncryptionError(
                "password must not be empty".into(),
            )),
            Some(password) => Ok(Some((self.protector()?, password))),
        }
    }

    /// Resolve and lay out every page without serializing.
    pub fn assemble(&self, refs: &[ImageRef]) -> Result<AssembledDocument> {
        let page_size = self.page_size()?;
        PageAssembler::new(self.source)
            .with_config(&self.config)
            .with_cancel_flag(self.cancel.clone())
            .assemble(refs, self.config.layout, page_size, self.config.margins())
    }

    /// Compose into PDF bytes, encrypting when `password` is given.
    #[instrument(
        skip_all,
        fields(images = refs.len(), layout = %self.config.layout, protected = password.is_some())
    )]
    pub fn compose(&self, refs: &[ImageRef], password: Option<&str>) -> Result<Vec<u8>> {
        let protection = self.preflight(password)?;
        let mut assembled = self.assemble(refs)?;
        let bytes = match protection {
            Some((protector, password)) => {
                DocumentWriter::to_bytes(&mut protector.protect(assembled, password)?)?
            }
            None => DocumentWriter::to_bytes(&mut assembled)?,
        };
        info!(bytes = bytes.len(), "composition complete");
        Ok(bytes)
    }

    /// Compose and atomically write to `destination`. Nothing is written
    /// unless every stage succeeds.
    #[instrument(skip_all, fields(images = refs.len(), path = %destination.as_ref().display()))]
    pub fn compose_to_file(
        &self,
        refs: &[ImageRef],
        destination: impl AsRef<Path>,
        password: Option<&str>,
    ) -> Result<()> {
        let protection = self.preflight(password)?;
        let mut assembled = self.assemble(refs)?;
        match protection {
            Some((protector, password)) => {
                DocumentWriter::write(&mut protector.protect(assembled, password)?, destination)
            }
            None => DocumentWriter::write(&mut assembled, destination),
        }
    }

    /// Password-protect an existing PDF file.
    pub fn lock_file(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        password: &str,
    ) -> Result<()> {
        self.protector()?.protect_file(source, destination, password)
    }
}
