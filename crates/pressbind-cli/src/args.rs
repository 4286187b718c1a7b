// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line parsing and its mapping onto a ComposeConfig.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pressbind_core::error::Result;
use pressbind_core::{ComposeConfig, FailurePolicy, LayoutMode, PaperSize};

/// What the invocation asks for.
#[derive(Debug, PartialEq)]
pub enum Operation {
    Compose {
        images: Vec<String>,
        output: PathBuf,
        password: Option<String>,
    },
    Lock {
        source: PathBuf,
        output: PathBuf,
        password: String,
    },
}

/// Page layout names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// One image per page, scaled to meet the page edge
    Original,
    /// One image per page inside the margins, centred
    #[value(name = "a4-fit")]
    A4Fit,
    /// One image per page inside the margins, top-left anchored
    LeftAlign,
    /// Two images per page, stacked
    TwoUpVertical,
    /// Two images per page, side by side
    TwoUpHorizontal,
    /// Four images per page in a 2x2 grid
    #[value(name = "grid-2x2")]
    Grid2x2,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Original => Self::Original,
            LayoutArg::A4Fit => Self::A4Fit,
            LayoutArg::LeftAlign => Self::LeftAlign,
            LayoutArg::TwoUpVertical => Self::TwoUpVertical,
            LayoutArg::TwoUpHorizontal => Self::TwoUpHorizontal,
            LayoutArg::Grid2x2 => Self::Grid2x2,
        }
    }
}

/// Named paper sizes. Custom sizes come from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailureArg {
    /// Resolve pages concurrently and report the failing page
    FailFast,
    /// Resolve one image at a time and stop at the first failure
    FailLoud,
}

impl From<FailureArg> for FailurePolicy {
    fn from(arg: FailureArg) -> Self {
        match arg {
            FailureArg::FailFast => Self::FailFast,
            FailureArg::FailLoud => Self::FailLoud,
        }
    }
}

/// Parsed flags. Settings are kept as options so they can be layered over
/// a config file.
#[derive(Parser, Debug)]
#[command(
    name = "pressbind",
    version,
    about = "Compose raster images into a paginated PDF, optionally password-protected."
)]
pub struct Args {
    /// Page layout [default: a4-fit]
    #[arg(short, long, value_enum)]
    layout: Option<LayoutArg>,

    /// Margin in points [default: 20]
    #[arg(short, long, value_parser = parse_margin)]
    margin: Option<f32>,

    /// Paper size [default: a4]
    #[arg(short, long, value_enum)]
    paper: Option<PaperArg>,

    /// Rotate pages to landscape
    #[arg(long)]
    landscape: bool,

    /// Encrypt the output with this password
    #[arg(long)]
    password: Option<String>,

    /// How image resolution failures are handled [default: fail-fast]
    #[arg(long, value_enum)]
    failure_policy: Option<FailureArg>,

    /// Resolver pool size
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Document title
    #[arg(short, long)]
    title: Option<String>,

    /// Load settings from a JSON file; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Password-protect this existing PDF instead of composing
    #[arg(long, value_name = "SRC", conflicts_with = "images", requires = "password")]
    lock: Option<PathBuf>,

    /// Output path
    #[arg(short, long)]
    output: PathBuf,

    /// Images to compose, in page order
    #[arg(required_unless_present = "lock")]
    images: Vec<String>,
}

fn parse_margin(raw: &str) -> std::result::Result<f32, String> {
    let margin: f32 = raw.parse().map_err(|_| format!("invalid margin '{raw}'"))?;
    if !margin.is_finite() || margin < 0.0 {
        return Err(format!("margin must be a non-negative number, got {raw}"));
    }
    Ok(margin)
}

impl Args {
    /// Decide what to run.
    pub fn operation(&self) -> Operation {
        match (&self.lock, &self.password) {
            (Some(source), Some(password)) => Operation::Lock {
                source: source.clone(),
                output: self.output.clone(),
                password: password.clone(),
            },
            _ => Operation::Compose {
                images: self.images.clone(),
                output: self.output.clone(),
                password: self.password.clone(),
            },
        }
    }

    /// Build the effective configuration: file (or defaults), then flags.
    pub fn config(&self) -> Result<ComposeConfig> {
        let mut config = match &self.config {
            Some(path) => ComposeConfig::load(path)?,
            None => ComposeConfig::default(),
        };
        if let Some(layout) = self.layout {
            config.layout = layout.into();
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
            config.margins_override = None;
        }
        if let Some(paper) = self.paper {
            config.paper_size = paper.into();
        }
        if self.landscape {
            config.landscape = true;
        }
        if let Some(policy) = self.failure_policy {
            config.failure_policy = policy.into();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(title) = &self.title {
            config.title = Some(title.clone());
        }
        Ok(config)
    }
}
