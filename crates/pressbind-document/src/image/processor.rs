// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode arbitrary raster formats and re-encode them as
// JPEG for embedding with the DCTDecode filter.

use std::io::Cursor;

use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use pressbind_core::error::{PressbindError, Result};
use pressbind_core::{ColorSpace, EncodedImage, ImageSize};
use tracing::{debug, info, instrument};

/// A single decoded image on its way into a document.
///
/// ```ignore
/// let encoded = ImageProcessor::open("scan.png")?.into_encoded(90)?;
/// ```
pub struct ImageProcessor {
    /// The decoded image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            PressbindError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| PressbindError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel size as seen by the layout engine.
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width() as f32, self.height() as f32)
    }

    /// Colour space the JPEG output will use.
    pub fn color_space(&self) -> ColorSpace {
        color_space_of(self.image.color())
    }

    // -- Export ---------------------------------------------------------------

    /// Encode as JPEG at `quality` (1-100). Greyscale images stay
    /// single-channel; everything else, including alpha, becomes RGB.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        let written = match self.color_space() {
            ColorSpace::Gray => self.image.to_luma8().write_with_encoder(encoder),
            _ => self.image.to_rgb8().write_with_encoder(encoder),
        };
        written
            .map_err(|err| PressbindError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Consume the processor and produce embeddable JPEG data.
    pub fn into_encoded(self, quality: u8) -> Result<EncodedImage> {
        let bytes = self.to_jpeg_bytes(quality)?;
        Ok(EncodedImage::jpeg(bytes, self.color_space()))
    }
}

/// Whether `data` is already a JPEG stream.
pub fn is_jpeg(data: &[u8]) -> bool {
    matches!(image::guess_format(data), Ok(ImageFormat::Jpeg))
}

/// Read the header of an encoded image without decoding pixels.
///
/// JPEG frame headers are read directly, since the decoder converts
/// four-component files to RGB and would hide their colour model.
pub fn read_header(data: &[u8]) -> Result<(ImageSize, ColorSpace)> {
    if let Some(frame) = jpeg_frame(data) {
        let size = ImageSize::new(f32::from(frame.width), f32::from(frame.height));
        return Ok((size, frame.color_space()?));
    }

    let decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|err| PressbindError::ImageError(format!("unreadable image header: {}", err)))?
        .into_decoder()
        .map_err(|err| PressbindError::ImageError(format!("unsupported image: {}", err)))?;
    let (width, height) = decoder.dimensions();
    let color = color_space_of(decoder.color_type());
    Ok((ImageSize::new(width as f32, height as f32), color))
}

fn color_space_of(color: ColorType) -> ColorSpace {
    match color {
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => ColorSpace::Gray,
        _ => ColorSpace::Rgb,
    }
}

// -- JPEG markers -------------------------------------------------------------

/// The parts of a JPEG frame header that decide how it is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JpegFrame {
    width: u16,
    height: u16,
    components: u8,
    /// An Adobe APP14 segment came before the frame header.
    adobe: bool,
}

impl JpegFrame {
    fn color_space(&self) -> Result<ColorSpace> {
        match self.components {
            1 => Ok(ColorSpace::Gray),
            3 => Ok(ColorSpace::Rgb),
            4 => Ok(ColorSpace::Cmyk {
                adobe_inverted: self.adobe,
            }),
            other => Err(PressbindError::ImageError(format!(
                "unsupported JPEG with {other} colour components"
            ))),
        }
    }
}

/// Walk the marker segments of `data` up to the first start-of-frame.
/// Returns `None` for anything that is not a well-formed JPEG header.
fn jpeg_frame(data: &[u8]) -> Option<JpegFrame> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    let mut adobe = false;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            // Fill byte before a marker.
            0xFF => {
                pos += 1;
                continue;
            }
            // Markers without a length field.
            0x01 | 0xD0..=0xD8 => {
                pos += 2;
                continue;
            }
            // End of image or start of scan before any frame header.
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let length = usize::from(u16::from_be_bytes([data[pos + 2], data[pos + 3]]));
        let body = data.get(pos + 4..pos + 2 + length)?;
        match marker {
            0xEE => adobe |= body.starts_with(b"Adobe"),
            0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                let header = body.get(..6)?;
                return Some(JpegFrame {
                    height: u16::from_be_bytes([header[1], header[2]]),
                    width: u16::from_be_bytes([header[3], header[4]]),
                    components: header[5],
                    adobe,
                });
            }
            _ => {}
        }
        pos += 2 + length;
    }
    None
}
