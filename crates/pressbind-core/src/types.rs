// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for composing images into paginated documents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PressbindError, Result};

/// Unique identifier for a composed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Raw 16 bytes of the identifier.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-side reference to an image: a path, URI, or lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&std::path::Path> for ImageRef {
    fn from(value: &std::path::Path) -> Self {
        Self(value.display().to_string())
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// -- Geometry -----------------------------------------------------------------

/// Page dimensions in PDF points (1/72 in). Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    width: f32,
    height: f32,
}

impl PageSize {
    /// ISO A4 rounded to whole points.
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };

    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PressbindError::InvalidPageSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// The same page rotated a quarter turn.
    pub fn landscape(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_pt: f32, height_pt: f32 },
}

impl PaperSize {
    /// Dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A3 => (842.0, 1191.0),
            Self::A4 => (595.0, 842.0),
            Self::A5 => (420.0, 595.0),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }

    pub fn page_size(&self) -> Result<PageSize> {
        let (width, height) = self.dimensions_pt();
        PageSize::new(width, height)
    }
}

/// Pixel dimensions of a source image as seen by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

impl ImageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Reject zero, negative, or non-finite sides.
    pub fn validate(self) -> Result<Self> {
        if self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
        {
            Ok(self)
        } else {
            Err(PressbindError::InvalidDimension {
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

/// Page inset and inter-cell spacing, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Inset applied to all four page edges.
    pub page: f32,
    /// Gap between neighbouring cells in multi-image modes.
    pub gutter: f32,
}

impl Margins {
    pub fn new(page: f32, gutter: f32) -> Self {
        Self { page, gutter }
    }
}

/// An axis-aligned rectangle in page space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Where one image is drawn on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index of the cell the image occupies (0 for single-image modes).
    pub cell: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// -- Layout modes -------------------------------------------------------------

/// Page layout strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// One image per page, scaled up or down until it meets the page edge.
    Original,
    /// One image per page inside the margins, shrink-only, centred.
    #[default]
    #[serde(rename = "a4-fit")]
    A4Fit,
    /// One image per page inside the margins, shrink-only, top-left anchored.
    LeftAlign,
    /// Two images per page, stacked top and bottom.
    TwoUpVertical,
    /// Two images per page, side by side.
    TwoUpHorizontal,
    /// Four images per page in a 2x2 grid.
    #[serde(rename = "grid-2x2")]
    Grid2x2,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 6] = [
        Self::Original,
        Self::A4Fit,
        Self::LeftAlign,
        Self::TwoUpVertical,
        Self::TwoUpHorizontal,
        Self::Grid2x2,
    ];

    /// How many images one page consumes.
    pub fn images_per_page(&self) -> usize {
        match self {
            Self::Original | Self::A4Fit | Self::LeftAlign => 1,
            Self::TwoUpVertical | Self::TwoUpHorizontal => 2,
            Self::Grid2x2 => 4,
        }
    }

    /// Whether images are only ever scaled down.
    pub fn is_shrink_only(&self) -> bool {
        !matches!(self, Self::Original)
    }

    /// Expand the caller's single margin value into this mode's margins.
    ///
    /// Single-image margined modes inset the page; multi-image modes keep the
    /// page edge and use the value as the gap between cells.
    pub fn margin_policy(&self, margin: f32) -> Margins {
        match self {
            Self::Original => Margins::new(0.0, 0.0),
            Self::A4Fit | Self::LeftAlign => Margins::new(margin, 0.0),
            Self::TwoUpVertical | Self::TwoUpHorizontal | Self::Grid2x2 => {
                Margins::new(0.0, margin)
            }
        }
    }

    /// Stable kebab-case name, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::A4Fit => "a4-fit",
            Self::LeftAlign => "left-align",
            Self::TwoUpVertical => "two-up-vertical",
            Self::TwoUpHorizontal => "two-up-horizontal",
            Self::Grid2x2 => "grid-2x2",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What the assembler does when an image cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Resolve a batch of pages concurrently; any failure discards the whole
    /// document and is reported with the page it occurred on.
    #[default]
    FailFast,
    /// Resolve one image at a time and surface the first failure unchanged,
    /// without touching the remaining images.
    FailLoud,
}

// -- Images -------------------------------------------------------------------

/// Colour model of an encoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    Gray,
    Rgb,
    /// Four-component JPEG. Files written by Adobe software store the
    /// channels inverted, which `adobe_inverted` records.
    Cmyk { adobe_inverted: bool },
}

impl ColorSpace {
    /// PDF colour space name.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Gray => "DeviceGray",
            Self::Rgb => "DeviceRGB",
            Self::Cmyk { .. } => "DeviceCMYK",
        }
    }

    /// The /Decode array needed to undo inverted samples, if any.
    pub fn decode_ranges(&self) -> Option<[f32; 8]> {
        match self {
            Self::Cmyk {
                adobe_inverted: true,
            } => Some([1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]),
            _ => None,
        }
    }
}

/// JPEG bytes ready to be embedded as a DCT-encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub color_space: ColorSpace,
}

impl EncodedImage {
    pub fn jpeg(bytes: Vec<u8>, color_space: ColorSpace) -> Self {
        Self { bytes, color_space }
    }
}

/// A resolved image: its reference, pixel size, and embeddable bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    pub id: ImageRef,
    pub pixel_width: f32,
    pub pixel_height: f32,
    pub encoded: EncodedImage,
}

impl ImageDescriptor {
    pub fn new(id: ImageRef, size: ImageSize, encoded: EncodedImage) -> Result<Self> {
        let size = size.validate()?;
        Ok(Self {
            id,
            pixel_width: size.width,
            pixel_height: size.height,
            encoded,
        })
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.pixel_width, self.pixel_height)
    }
}
