// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image sources: resolving caller references into embeddable descriptors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pressbind_core::error::{PressbindError, Result};
use pressbind_core::{ColorSpace, EncodedImage, ImageDescriptor, ImageRef, ImageSize};
use tracing::{debug, instrument};

use crate::image::processor::{ImageProcessor, is_jpeg, read_header};

/// Resolves image references into pixel dimensions and JPEG bytes.
///
/// Implementations are shared across the resolver pool, so they must be
/// `Send + Sync`. Any failure to locate or decode an image is reported as
/// `ResolutionFailure`.
pub trait ImageSource: Send + Sync {
    /// Pixel dimensions of the referenced image.
    fn dimensions(&self, reference: &ImageRef) -> Result<ImageSize>;

    /// The image as JPEG data ready for a DCTDecode stream.
    fn encoded_bytes(&self, reference: &ImageRef) -> Result<EncodedImage>;

    /// Resolve a reference into a validated descriptor.
    fn resolve(&self, reference: &ImageRef) -> Result<ImageDescriptor> {
        let size = self.dimensions(reference)?;
        let encoded = self.encoded_bytes(reference)?;
        ImageDescriptor::new(reference.clone(), size, encoded)
    }
}

// -- Filesystem ---------------------------------------------------------------

/// Reads images from disk. References are file paths, resolved against an
/// optional base directory when relative.
///
/// JPEG files are embedded untouched; every other format the `image` crate
/// can decode is re-encoded to JPEG at `jpeg_quality`.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    base_dir: Option<PathBuf>,
    jpeg_quality: u8,
}

impl FileImageSource {
    pub fn new() -> Self {
        Self {
            base_dir: None,
            jpeg_quality: 90,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn path_for(&self, reference: &ImageRef) -> PathBuf {
        let path = Path::new(reference.as_str());
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn read(&self, reference: &ImageRef) -> Result<Vec<u8>> {
        let path = self.path_for(reference);
        std::fs::read(&path).map_err(|err| {
            let reason = format!("cannot read {}: {}", path.display(), err);
            PressbindError::resolution(reference, reason)
        })
    }

    fn encode(&self, reference: &ImageRef, bytes: Vec<u8>) -> Result<(ImageSize, EncodedImage)> {
        let as_resolution =
            |err: PressbindError| PressbindError::resolution(reference, err.to_string());

        if is_jpeg(&bytes) {
            let (size, color_space) = read_header(&bytes).map_err(as_resolution)?;
            debug!(%reference, "embedding JPEG as-is");
            return Ok((size, EncodedImage::jpeg(bytes, color_space)));
        }

        let processor = ImageProcessor::from_bytes(&bytes).map_err(as_resolution)?;
        let size = processor.size();
        let encoded = processor
            .into_encoded(self.jpeg_quality)
            .map_err(as_resolution)?;
        debug!(%reference, jpeg_len = encoded.bytes.len(), "re-encoded image as JPEG");
        Ok((size, encoded))
    }
}

impl Default for FileImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource for FileImageSource {
    fn dimensions(&self, reference: &ImageRef) -> Result<ImageSize> {
        let bytes = self.read(reference)?;
        let (size, _) = read_header(&bytes)
            .map_err(|err| PressbindError::resolution(reference, err.to_string()))?;
        Ok(size)
    }

    fn encoded_bytes(&self, reference: &ImageRef) -> Result<EncodedImage> {
        let bytes = self.read(reference)?;
        Ok(self.encode(reference, bytes)?.1)
    }

    /// Reads the file once for both size and bytes.
    #[instrument(skip_all, fields(reference = %reference))]
    fn resolve(&self, reference: &ImageRef) -> Result<ImageDescriptor> {
        let bytes = self.read(reference)?;
        let (size, encoded) = self.encode(reference, bytes)?;
        ImageDescriptor::new(reference.clone(), size, encoded)
    }
}

// -- In memory ----------------------------------------------------------------

/// Smallest byte sequence that still reads as JPEG (SOI, EOI).
const PLACEHOLDER_JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xD9];

/// Holds pre-encoded images keyed by reference.
///
/// Useful when the caller already has JPEG data, and for exercising layout
/// and assembly without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageSource {
    images: HashMap<ImageRef, (ImageSize, EncodedImage)>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        reference: impl Into<ImageRef>,
        size: ImageSize,
        encoded: EncodedImage,
    ) {
        self.images.insert(reference.into(), (size, encoded));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_image(
        mut self,
        reference: impl Into<ImageRef>,
        size: ImageSize,
        encoded: EncodedImage,
    ) -> Self {
        self.insert(reference, size, encoded);
        self
    }

    /// Register an image of the given size backed by placeholder JPEG bytes.
    pub fn with_placeholder(self, reference: impl Into<ImageRef>, width: f32, height: f32) -> Self {
        self.with_image(
            reference,
            ImageSize::new(width, height),
            EncodedImage::jpeg(PLACEHOLDER_JPEG.to_vec(), ColorSpace::Rgb),
        )
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn entry(&self, reference: &ImageRef) -> Result<&(ImageSize, EncodedImage)> {
        self.images
            .get(reference)
            .ok_or_else(|| PressbindError::resolution(reference, "no such image"))
    }
}

impl ImageSource for MemoryImageSource {
    fn dimensions(&self, reference: &ImageRef) -> Result<ImageSize> {
        Ok(self.entry(reference)?.0)
    }

    fn encoded_bytes(&self, reference: &ImageRef) -> Result<EncodedImage> {
        Ok(self.entry(reference)?.1.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use pressbind_core::ErrorKind;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 200, 30]));
        DynamicImage::ImageRgb8(img)
            .save_with_format(dir.join(name), ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn memory_source_resolves_registered_images() {
        let source = MemoryImageSource::new().with_placeholder("a", 300.0, 200.0);
        let descriptor = source.resolve(&"a".into()).unwrap();
        assert_eq!(descriptor.size(), ImageSize::new(300.0, 200.0));
        assert_eq!(descriptor.id, ImageRef::new("a"));
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn memory_source_reports_missing_images() {
        let err = MemoryImageSource::new().resolve(&"missing".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn zero_sized_images_fail_validation() {
        let source = MemoryImageSource::new().with_placeholder("flat", 100.0, 0.0);
        let err = source.resolve(&"flat".into()).unwrap_err();
        assert!(matches!(err, PressbindError::InvalidDimension { .. }));
    }

    #[test]
    fn png_files_are_reencoded_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "scan.png", 64, 48);

        let source = FileImageSource::new().with_base_dir(dir.path());
        let descriptor = source.resolve(&"scan.png".into()).unwrap();
        assert_eq!(descriptor.size(), ImageSize::new(64.0, 48.0));
        assert!(is_jpeg(&descriptor.encoded.bytes));
        assert_eq!(source.dimensions(&"scan.png".into()).unwrap(), descriptor.size());
    }

    #[test]
    fn jpeg_files_pass_through_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(16, 9)))
            .to_jpeg_bytes(80)
            .unwrap();
        std::fs::write(dir.path().join("photo.jpg"), &jpeg).unwrap();

        let source = FileImageSource::new().with_base_dir(dir.path());
        let encoded = source.encoded_bytes(&"photo.jpg".into()).unwrap();
        assert_eq!(encoded.bytes, jpeg);
        assert_eq!(encoded.color_space, ColorSpace::Rgb);
    }

    #[test]
    fn missing_and_corrupt_files_are_resolution_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
        let source = FileImageSource::new().with_base_dir(dir.path());

        for name in ["absent.png", "broken.png"] {
            let err = source.resolve(&name.into()).unwrap_err();
            assert!(
                matches!(
                    err,
                    PressbindError::ResolutionFailure { ref reference, .. } if reference == name
                ),
                "unexpected error for {name}: {err}"
            );
        }
    }

    #[test]
    fn absolute_paths_ignore_base_dir() {
        let source = FileImageSource::new().with_base_dir("/srv/images");
        assert_eq!(source.path_for(&"/tmp/a.png".into()), PathBuf::from("/tmp/a.png"));
        assert_eq!(source.path_for(&"b.png".into()), PathBuf::from("/srv/images/b.png"));
    }
}
