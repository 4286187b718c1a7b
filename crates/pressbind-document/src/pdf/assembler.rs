// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembler: resolves image references page by page, lays them out,
// and builds the lopdf object graph of the finished document.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use pressbind_core::error::{PressbindError, Result};
use pressbind_core::{
    ComposeConfig, DocumentId, FailurePolicy, ImageDescriptor, ImageRef, LayoutMode, Margins,
    PageSize, Placement,
};
use pressbind_layout::{cells, placements_for};
use pressbind_security::file_identifier;

use crate::source::ImageSource;

const PRODUCER: &str = concat!("pressbind ", env!("CARGO_PKG_VERSION"));
const DEFAULT_TITLE: &str = "Composed images";

// -- Cancellation -------------------------------------------------------------

/// Shared flag a caller sets to abandon a composition run.
///
/// Cancellation is all-or-nothing: a cancelled run produces no document.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(PressbindError::Cancelled)
        } else {
            Ok(())
        }
    }
}

// -- Results ------------------------------------------------------------------

/// Lifecycle of a [`PageAssembler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssemblyState {
    #[default]
    Idle,
    /// Building the page with this 1-based number.
    Assembling { page: usize },
    Assembled,
    Failed,
}

/// What was placed on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// 1-based page number.
    pub number: usize,
    pub image_ids: Vec<ImageRef>,
    pub placements: Vec<Placement>,
}

/// A complete, unencrypted document ready for protection or writing.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    id: DocumentId,
    mode: LayoutMode,
    page_size: PageSize,
    pages: Vec<PageRecord>,
    document: Document,
}

impl AssembledDocument {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of images placed across all pages.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|page| page.placements.len()).sum()
    }

    /// The underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub(crate) fn into_document(self) -> (DocumentId, Document) {
        (self.id, self.document)
    }
}

// -- Assembler ----------------------------------------------------------------

/// Turns a list of image references into an [`AssembledDocument`].
///
/// One assembler performs one run. After it has finished or failed it must
/// be [`reset`](Self::reset) before it is used again.
pub struct PageAssembler<'a> {
    source: &'a dyn ImageSource,
    failure_policy: FailurePolicy,
    workers: usize,
    title: Option<String>,
    cancel: CancelFlag,
    state: AssemblyState,
}

impl<'a> PageAssembler<'a> {
    pub fn new(source: &'a dyn ImageSource) -> Self {
        Self {
            source,
            failure_policy: FailurePolicy::default(),
            workers: ComposeConfig::default().effective_workers(),
            title: None,
            cancel: CancelFlag::new(),
            state: AssemblyState::Idle,
        }
    }

    /// Take policy, pool size, and title from a configuration.
    pub fn with_config(self, config: &ComposeConfig) -> Self {
        Self {
            failure_policy: config.failure_policy,
            workers: config.effective_workers(),
            title: config.title.clone(),
            ..self
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// Return to `Idle` so the assembler can run again.
    pub fn reset(&mut self) {
        self.state = AssemblyState::Idle;
    }

    /// Resolve, lay out, and build every page.
    ///
    /// References are grouped `mode.images_per_page()` at a time in input
    /// order; the last page may be partially filled. Margins are checked
    /// before any image is resolved.
    #[instrument(
        skip_all,
        fields(images = refs.len(), mode = %mode, policy = ?self.failure_policy)
    )]
    pub fn assemble(
        &mut self,
        refs: &[ImageRef],
        mode: LayoutMode,
        page_size: PageSize,
        margins: Margins,
    ) -> Result<AssembledDocument> {
        if self.state != AssemblyState::Idle {
            return Err(PressbindError::PdfError(format!(
                "assembler is {:?}; reset it before reuse",
                self.state
            )));
        }

        let result = self.run(refs, mode, page_size, margins);
        match &result {
            Ok(document) => {
                self.state = AssemblyState::Assembled;
                info!(
                    pages = document.page_count(),
                    images = document.image_count(),
                    id = %document.id(),
                    "document assembled"
                );
            }
            Err(err) => {
                self.state = AssemblyState::Failed;
                warn!(error = %err, "assembly failed");
            }
        }
        result
    }

    fn run(
        &mut self,
        refs: &[ImageRef],
        mode: LayoutMode,
        page_size: PageSize,
        margins: Margins,
    ) -> Result<AssembledDocument> {
        if refs.is_empty() {
            return Err(PressbindError::NoImages);
        }
        cells(page_size, margins, mode)?;

        let groups: Vec<&[ImageRef]> = refs.chunks(mode.images_per_page()).collect();
        let mut builder = DocumentBuilder::new(page_size, mode, margins);
        let mut records = Vec::with_capacity(groups.len());

        match self.failure_policy {
            FailurePolicy::FailLoud => {
                for (index, group) in groups.iter().enumerate() {
                    let number = index + 1;
                    self.state = AssemblyState::Assembling { page: number };
                    let descriptors = resolve_group(self.source, &self.cancel, group)?;
                    records.push(builder.add_page(number, descriptors)?);
                }
            }
            FailurePolicy::FailFast => {
                let workers = self.workers.max(1);
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .map_err(|err| {
                        PressbindError::PdfError(format!("cannot start resolver pool: {err}"))
                    })?;

                for (batch_index, batch) in groups.chunks(workers).enumerate() {
                    self.cancel.check()?;
                    let first_page = batch_index * workers + 1;
                    let source = self.source;
                    let cancel = &self.cancel;

                    let outcomes: Vec<Result<Vec<ImageDescriptor>>> = pool.install(|| {
                        batch
                            .par_iter()
                            .map(|group| resolve_group(source, cancel, group))
                            .collect()
                    });
                    // Several pages of a batch may fail; report the lowest.
                    let resolved = outcomes
                        .into_iter()
                        .enumerate()
                        .map(|(offset, outcome)| {
                            outcome.map_err(|err| at_page(first_page + offset, err))
                        })
                        .collect::<Result<Vec<_>>>()?;
                    debug!(first_page, pages = resolved.len(), "batch resolved");

                    for (offset, descriptors) in resolved.into_iter().enumerate() {
                        let number = first_page + offset;
                        self.state = AssemblyState::Assembling { page: number };
                        records.push(builder.add_page(number, descriptors)?);
                    }
                }
            }
        }

        let id = DocumentId::new();
        let document = builder.finish(&id, self.title.as_deref());
        Ok(AssembledDocument {
            id,
            mode,
            page_size,
            pages: records,
            document,
        })
    }
}

/// Resolve one page's references in order, stopping at the first failure.
fn resolve_group(
    source: &dyn ImageSource,
    cancel: &CancelFlag,
    group: &[ImageRef],
) -> Result<Vec<ImageDescriptor>> {
    let mut descriptors = Vec::with_capacity(group.len());
    for reference in group {
        cancel.check()?;
        descriptors.push(source.resolve(reference)?);
    }
    Ok(descriptors)
}

fn at_page(page: usize, err: PressbindError) -> PressbindError {
    match err {
        PressbindError::Cancelled => err,
        other => PressbindError::AssemblyFailure {
            page,
            source: Box::new(other),
        },
    }
}

// -- Object graph -------------------------------------------------------------

/// Accumulates pages into a lopdf document.
struct DocumentBuilder {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page_size: PageSize,
    mode: LayoutMode,
    margins: Margins,
    image_count: usize,
}

impl DocumentBuilder {
    fn new(page_size: PageSize, mode: LayoutMode, margins: Margins) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            page_size,
            mode,
            margins,
            image_count: 0,
        }
    }

    fn add_page(&mut self, number: usize, descriptors: Vec<ImageDescriptor>) -> Result<PageRecord> {
        let placements = placements_for(self.page_size, self.margins, self.mode, &descriptors)?;
        let image_ids: Vec<ImageRef> = descriptors.iter().map(|d| d.id.clone()).collect();

        let mut xobjects = Dictionary::new();
        let mut operations = Vec::new();
        for (descriptor, placement) in descriptors.into_iter().zip(&placements) {
            let name = format!("Im{}", self.image_count);
            self.image_count += 1;

            let image_id = self.document.add_object(image_xobject(descriptor));
            xobjects.set(name.clone(), image_id);
            operations.extend(draw_image(&name, placement));
        }

        let content = Content { operations }.encode().map_err(|err| {
            PressbindError::PdfError(format!("failed to encode page {number} content: {err}"))
        })?;
        let content_id = self.document.add_object(Stream::new(dictionary! {}, content));
        let resources_id = self.document.add_object(dictionary! {
            "XObject" => xobjects,
        });

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_size.width()),
                Object::Real(self.page_size.height()),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        self.page_ids.push(page_id);
        debug!(page = number, images = placements.len(), "page built");

        Ok(PageRecord {
            number,
            image_ids,
            placements,
        })
    }

    /// Attach the page tree, catalog, /Info, and trailer /ID.
    fn finish(mut self, id: &DocumentId, title: Option<&str>) -> Document {
        let kids: Vec<Object> = self.page_ids.iter().map(|&page| page.into()).collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.document.add_object(dictionary! {
            "Title" => lopdf::text_string(title.unwrap_or(DEFAULT_TITLE)),
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(creation_date()),
        });

        let file_id = file_identifier(id).to_vec();
        self.document.trailer.set("Root", catalog_id);
        self.document.trailer.set("Info", info_id);
        self.document.trailer.set(
            "ID",
            Object::Array(vec![
                Object::String(file_id.clone(), StringFormat::Hexadecimal),
                Object::String(file_id, StringFormat::Hexadecimal),
            ]),
        );
        self.document
    }
}

fn image_xobject(descriptor: ImageDescriptor) -> Stream {
    let color_space = descriptor.encoded.color_space;
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => descriptor.pixel_width.round() as i64,
        "Height" => descriptor.pixel_height.round() as i64,
        "ColorSpace" => color_space.pdf_name(),
        "BitsPerComponent" => 8,
        "Filter" => "DCTDecode",
    };
    if let Some(ranges) = color_space.decode_ranges() {
        let ranges: Vec<Object> = ranges.into_iter().map(Object::Real).collect();
        dict.set("Decode", ranges);
    }
    Stream::new(dict, descriptor.encoded.bytes).with_compression(false)
}

/// `q w 0 0 h x y cm /Name Do Q`
fn draw_image(name: &str, placement: &Placement) -> [Operation; 4] {
    [
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(placement.width),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(placement.height),
                Object::Real(placement.x),
                Object::Real(placement.y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// PDF date string for "now" in UTC.
fn creation_date() -> String {
    Utc::now().format("D:%Y%m%d%H%M%S+00'00'").to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::source::MemoryImageSource;
    use pressbind_core::{EncodedImage, ImageSize};

    /// Wraps a memory source and counts resolution attempts.
    struct CountingSource {
        inner: MemoryImageSource,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new(inner: MemoryImageSource) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ImageSource for CountingSource {
        fn dimensions(&self, reference: &ImageRef) -> Result<ImageSize> {
            self.inner.dimensions(reference)
        }

        fn encoded_bytes(&self, reference: &ImageRef) -> Result<EncodedImage> {
            self.inner.encoded_bytes(reference)
        }

        fn resolve(&self, reference: &ImageRef) -> Result<ImageDescriptor> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve(reference)
        }
    }

    fn source_with(count: usize) -> MemoryImageSource {
        (0..count).fold(MemoryImageSource::new(), |source, i| {
            source.with_placeholder(format!("img-{i}"), 1000.0, 500.0)
        })
    }

    fn refs(names: &[&str]) -> Vec<ImageRef> {
        names.iter().map(|&name| ImageRef::new(name)).collect()
    }

    fn numbered(count: usize) -> Vec<ImageRef> {
        (0..count).map(|i| ImageRef::new(format!("img-{i}"))).collect()
    }

    fn image_objects(document: &Document) -> usize {
        document
            .objects
            .values()
            .filter(|object| match object {
                Object::Stream(stream) => matches!(
                    stream.dict.get(b"Subtype"),
                    Ok(Object::Name(name)) if name.as_slice() == b"Image"
                ),
                _ => false,
            })
            .count()
    }

    #[test]
    fn a4_fit_single_page() {
        let source = source_with(1);
        let mut assembler = PageAssembler::new(&source);
        let doc = assembler
            .assemble(
                &numbered(1),
                LayoutMode::A4Fit,
                PageSize::A4,
                LayoutMode::A4Fit.margin_policy(20.0),
            )
            .unwrap();

        assert_eq!(assembler.state(), AssemblyState::Assembled);
        assert_eq!(doc.page_count(), 1);
        let placement = doc.pages()[0].placements[0];
        assert_eq!(placement.width, 555.0);
        assert!((placement.height - 277.5).abs() < 1e-3);
        assert!((placement.y - 282.25).abs() < 1e-3);
        assert_eq!(doc.document().get_pages().len(), 1);
        assert_eq!(image_objects(doc.document()), 1);
    }

    #[test]
    fn grid_spills_onto_second_page() {
        let source = source_with(5);
        let mut assembler = PageAssembler::new(&source).with_workers(2);
        let doc = assembler
            .assemble(
                &numbered(5),
                LayoutMode::Grid2x2,
                PageSize::A4,
                LayoutMode::Grid2x2.margin_policy(20.0),
            )
            .unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[0].image_ids, numbered(4));
        assert_eq!(doc.pages()[1].image_ids, refs(&["img-4"]));
        assert_eq!(doc.pages()[1].number, 2);
        assert_eq!(doc.image_count(), 5);
        assert_eq!(image_objects(doc.document()), 5);
    }

    #[test]
    fn pages_keep_input_order_across_batches() {
        let source = source_with(7);
        let mut assembler = PageAssembler::new(&source).with_workers(3);
        let doc = assembler
            .assemble(&numbered(7), LayoutMode::A4Fit, PageSize::A4, Margins::new(20.0, 0.0))
            .unwrap();
        let order: Vec<ImageRef> = doc
            .pages()
            .iter()
            .flat_map(|page| page.image_ids.clone())
            .collect();
        assert_eq!(order, numbered(7));
        let numbers: Vec<usize> = doc.pages().iter().map(|page| page.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn two_up_vertical_with_one_image() {
        let source = source_with(1);
        let mut assembler = PageAssembler::new(&source);
        let doc = assembler
            .assemble(
                &numbered(1),
                LayoutMode::TwoUpVertical,
                PageSize::A4,
                LayoutMode::TwoUpVertical.margin_policy(20.0),
            )
            .unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(image_objects(doc.document()), 1);
        // The lone image sits in the top half.
        assert!(doc.pages()[0].placements[0].y > 421.0);
    }

    #[test]
    fn empty_input_fails_with_no_images() {
        let source = MemoryImageSource::new();
        let mut assembler = PageAssembler::new(&source);
        let err = assembler
            .assemble(&[], LayoutMode::A4Fit, PageSize::A4, Margins::default())
            .unwrap_err();
        assert!(matches!(err, PressbindError::NoImages));
        assert_eq!(assembler.state(), AssemblyState::Failed);
    }

    #[test]
    fn bad_margins_fail_before_resolution() {
        let source = CountingSource::new(source_with(2));
        let mut assembler = PageAssembler::new(&source);
        let err = assembler
            .assemble(&numbered(2), LayoutMode::A4Fit, PageSize::A4, Margins::new(300.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, PressbindError::InvalidMargin { .. }));
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn fail_fast_reports_the_failing_page() {
        let source = source_with(2);
        let mut names = numbered(2);
        names.push(ImageRef::new("missing"));
        let mut assembler = PageAssembler::new(&source)
            .with_failure_policy(FailurePolicy::FailFast)
            .with_workers(4);

        let err = assembler
            .assemble(&names, LayoutMode::A4Fit, PageSize::A4, Margins::new(20.0, 0.0))
            .unwrap_err();
        match err {
            PressbindError::AssemblyFailure { page, source } => {
                assert_eq!(page, 3);
                assert!(matches!(*source, PressbindError::ResolutionFailure { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(assembler.state(), AssemblyState::Failed);
    }

    #[test]
    fn fail_fast_reports_the_lowest_failing_page_in_a_batch() {
        let source = source_with(2);
        let names = refs(&["missing-a", "img-0", "img-1", "missing-b"]);
        for _ in 0..8 {
            let mut assembler = PageAssembler::new(&source)
                .with_failure_policy(FailurePolicy::FailFast)
                .with_workers(4);
            let err = assembler
                .assemble(&names, LayoutMode::A4Fit, PageSize::A4, Margins::new(20.0, 0.0))
                .unwrap_err();
            match err {
                PressbindError::AssemblyFailure { page, source } => {
                    assert_eq!(page, 1);
                    assert!(source.to_string().contains("missing-a"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn fail_loud_stops_at_first_failure() {
        let source = CountingSource::new(source_with(5));
        let names = refs(&["img-0", "missing", "img-2", "img-3", "img-4"]);
        let mut assembler =
            PageAssembler::new(&source).with_failure_policy(FailurePolicy::FailLoud);

        let err = assembler
            .assemble(&names, LayoutMode::A4Fit, PageSize::A4, Margins::new(20.0, 0.0))
            .unwrap_err();
        match err {
            PressbindError::ResolutionFailure { reference, .. } => assert_eq!(reference, "missing"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn cancelled_runs_produce_nothing() {
        let source = CountingSource::new(source_with(3));
        let cancel = CancelFlag::new();
        cancel.cancel();
        for policy in [FailurePolicy::FailFast, FailurePolicy::FailLoud] {
            let mut assembler = PageAssembler::new(&source)
                .with_failure_policy(policy)
                .with_cancel_flag(cancel.clone());
            let err = assembler
                .assemble(&numbered(3), LayoutMode::A4Fit, PageSize::A4, Margins::default())
                .unwrap_err();
            assert!(matches!(err, PressbindError::Cancelled));
        }
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn reuse_requires_reset() {
        let source = source_with(1);
        let mut assembler = PageAssembler::new(&source);
        let args = (numbered(1), LayoutMode::Original, PageSize::A4, Margins::default());
        assembler.assemble(&args.0, args.1, args.2, args.3).unwrap();

        assert!(assembler.assemble(&args.0, args.1, args.2, args.3).is_err());
        assembler.reset();
        assert_eq!(assembler.state(), AssemblyState::Idle);
        assert!(assembler.assemble(&args.0, args.1, args.2, args.3).is_ok());
    }

    #[test]
    fn pages_carry_media_box_and_info() {
        let source = source_with(1);
        let page = PageSize::A4.landscape();
        let mut assembler = PageAssembler::new(&source).with_title("Receipts");
        let doc = assembler
            .assemble(&numbered(1), LayoutMode::A4Fit, page, Margins::new(20.0, 0.0))
            .unwrap();
        let document = doc.document();

        let (_, page_id) = document.get_pages().into_iter().next().unwrap();
        let page_dict = document.get_object(page_id).unwrap().as_dict().unwrap();
        match page_dict.get(b"MediaBox").unwrap() {
            Object::Array(media_box) => match (&media_box[2], &media_box[3]) {
                (Object::Real(width), Object::Real(height)) => {
                    assert_eq!((*width, *height), (842.0, 595.0));
                }
                other => panic!("unexpected MediaBox extent {other:?}"),
            },
            other => panic!("unexpected MediaBox {other:?}"),
        }

        let info_id = match document.trailer.get(b"Info").unwrap() {
            Object::Reference(id) => *id,
            other => panic!("unexpected Info {other:?}"),
        };
        let info = document.get_object(info_id).unwrap().as_dict().unwrap();
        match info.get(b"Title").unwrap() {
            Object::String(title, _) => assert_eq!(title.as_slice(), b"Receipts"),
            other => panic!("unexpected Title {other:?}"),
        }
        assert!(document.trailer.has(b"ID"));
    }

    #[test]
    fn non_ascii_titles_are_utf16_text_strings() {
        let source = source_with(1);
        let title = "Quittungen März 2026 ✓";
        let doc = PageAssembler::new(&source)
            .with_title(title)
            .assemble(&numbered(1), LayoutMode::A4Fit, PageSize::A4, Margins::default())
            .unwrap();
        let document = doc.document();

        let info_id = document.trailer.get(b"Info").and_then(Object::as_reference).unwrap();
        let info = document.get_object(info_id).unwrap().as_dict().unwrap();
        let stored = info.get(b"Title").unwrap();
        let bytes = stored.as_str().unwrap();
        assert_eq!(&bytes[..2], b"\xFE\xFF");
        assert_eq!(bytes.len(), 2 + 2 * title.encode_utf16().count());
        assert_eq!(lopdf::decode_text_string(stored).unwrap(), title);
    }
}
