// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition configuration, persisted as pretty-printed JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{FailurePolicy, LayoutMode, Margins, PaperSize};

/// Upper bound on the default resolver pool size.
const DEFAULT_MAX_WORKERS: usize = 4;

/// Settings for a composition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Paper size for every page.
    pub paper_size: PaperSize,
    /// Rotate pages to landscape.
    pub landscape: bool,
    /// Page layout strategy.
    pub layout: LayoutMode,
    /// Margin in points, interpreted by the layout's margin policy.
    pub margin: f32,
    /// Explicit page inset / gutter, overriding the layout's margin policy.
    pub margins_override: Option<Margins>,
    /// Behaviour when an image cannot be resolved.
    pub failure_policy: FailurePolicy,
    /// Size of the resolver pool (0 picks a default from the host).
    pub workers: usize,
    /// JPEG quality (1-100) used when images must be re-encoded.
    pub jpeg_quality: u8,
    /// Title written to the document information dictionary.
    pub title: Option<String>,
    /// Encryption key length in bits (40 or 128).
    pub key_length_bits: u32,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            landscape: false,
            layout: LayoutMode::A4Fit,
            margin: 20.0,
            margins_override: None,
            failure_policy: FailurePolicy::FailFast,
            workers: 0,
            jpeg_quality: 90,
            title: None,
            key_length_bits: 128,
        }
    }
}

impl ComposeConfig {
    /// Margins for the configured layout.
    pub fn margins(&self) -> Margins {
        self.margins_override
            .unwrap_or_else(|| self.layout.margin_policy(self.margin))
    }

    /// Resolver pool size, never zero.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(DEFAULT_MAX_WORKERS)
    }

    /// Load a configuration file written by [`ComposeConfig::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
