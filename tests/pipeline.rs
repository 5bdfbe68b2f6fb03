//! End-to-end pipeline scenarios over deterministic service doubles.
//!
//! These run without a network connection, a pdfium library, or a real PDF:
//! pages are constructed in memory and the remote collaborators are scripted
//! fixtures, so every assertion is about the pipeline's own control flow and
//! geometry.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use image::{DynamicImage, Rgb, RgbImage};
use pagemill::{
    extract_figures_from_pages, extract_text_from_pages, ExtractError, ExtractionConfig, Polygon,
    Rect, RenderedPage, TextLine, INVALID_SIZE_CAPTION,
};
use pagemill::{Captioner, FigureDetector, LineRecognizer, TextReflow};

// ── Service doubles ──────────────────────────────────────────────────────

/// Hands out one scripted response per call, in order.
struct ScriptedDetector {
    responses: Mutex<VecDeque<Vec<Polygon>>>,
    calls: AtomicUsize,
}

impl ScriptedDetector {
    fn new(responses: Vec<Vec<Polygon>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FigureDetector for ScriptedDetector {
    async fn detect_figures(&self, _image: &[u8]) -> Result<Vec<Polygon>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("detector called more often than scripted"))
    }
}

struct CountingCaptioner {
    reply: &'static str,
    calls: AtomicUsize,
}

impl CountingCaptioner {
    fn new(reply: &'static str) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Captioner for CountingCaptioner {
    async fn caption(&self, _image: &[u8]) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

struct ScriptedRecognizer {
    responses: Mutex<VecDeque<Vec<TextLine>>>,
}

impl ScriptedRecognizer {
    fn new(responses: Vec<Vec<TextLine>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl LineRecognizer for ScriptedRecognizer {
    async fn recognize_lines(&self, _image: &[u8]) -> Result<Vec<TextLine>, ExtractError> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("recognizer called more often than scripted"))
    }
}

/// Records every input and applies a visible, deterministic transformation.
struct RecordingReflow {
    seen: Mutex<Vec<String>>,
}

impl RecordingReflow {
    fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextReflow for RecordingReflow {
    async fn reflow(&self, text: &str) -> Result<String, ExtractError> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(text.replace(". ", ".\n"))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn white_page(index: usize, name: &str, output_dir: &std::path::Path) -> RenderedPage {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 200, Rgb([255, 255, 255])));
    RenderedPage::from_image(index, name, output_dir, image).unwrap()
}

fn line(content: &str) -> TextLine {
    TextLine {
        content: content.to_string(),
        spans: Vec::new(),
    }
}

// ── Figure pipeline ──────────────────────────────────────────────────────

/// Two pages, one detected region on page 1 (index 0), none on page 2. The
/// pinned region crops to 40x30, which is below the captionable minimum, so
/// the captioning stage resolves it to the sentinel without a remote call.
#[tokio::test]
async fn two_page_document_with_one_figure() {
    let out = tempfile::tempdir().unwrap();
    let config = ExtractionConfig::builder()
        .output_dir(out.path())
        .build()
        .unwrap();

    let pages = vec![
        white_page(0, "edu_01_P0", out.path()),
        white_page(1, "edu_01_P1", out.path()),
    ];
    let detector = ScriptedDetector::new(vec![
        vec![vec![10.0, 10.0, 50.0, 10.0, 50.0, 40.0, 10.0, 40.0]],
        vec![],
    ]);
    let captioner = CountingCaptioner::new("a diagram of a cylinder");

    let run = extract_figures_from_pages(&pages, &config, &detector, &captioner)
        .await
        .unwrap();

    assert_eq!(detector.calls(), 2, "one detection call per page");
    assert_eq!(run.figures.len(), 1);
    assert_eq!(run.stats.page_count, 2);

    let figure = &run.figures[0];
    assert_eq!(figure.page_index, 0);
    assert_eq!(figure.figure_index, 0);
    assert_eq!(
        figure.rect,
        Rect {
            x1: 10.0,
            y1: 10.0,
            x2: 50.0,
            y2: 40.0
        }
    );
    assert_eq!(figure.path, out.path().join("edu_01_P0_fig0.jpg"));
    assert!(figure.path.exists(), "crop must be persisted");

    // 40x30 falls outside [50, 16000]: sentinel caption, zero remote calls.
    assert_eq!(figure.caption, INVALID_SIZE_CAPTION);
    assert_eq!(captioner.calls(), 0);
}

/// Same shape with an in-range region: the remote captioner is invoked
/// exactly once.
#[tokio::test]
async fn in_range_figure_is_captioned_remotely() {
    let out = tempfile::tempdir().unwrap();
    let config = ExtractionConfig::builder()
        .output_dir(out.path())
        .build()
        .unwrap();

    let pages = vec![
        white_page(0, "edu_01_P0", out.path()),
        white_page(1, "edu_01_P1", out.path()),
    ];
    let detector = ScriptedDetector::new(vec![
        vec![vec![20.0, 30.0, 140.0, 30.0, 140.0, 110.0, 20.0, 110.0]],
        vec![],
    ]);
    let captioner = CountingCaptioner::new("a diagram of a cylinder");

    let run = extract_figures_from_pages(&pages, &config, &detector, &captioner)
        .await
        .unwrap();

    assert_eq!(run.figures.len(), 1);
    assert_eq!(run.figures[0].caption, "a diagram of a cylinder");
    assert_eq!(captioner.calls(), 1);
}

/// Several regions on one page get consecutive figure indices and are
/// processed in detection order.
#[tokio::test]
async fn figure_indices_follow_detection_order() {
    let out = tempfile::tempdir().unwrap();
    let config = ExtractionConfig::builder()
        .output_dir(out.path())
        .build()
        .unwrap();

    let pages = vec![white_page(0, "doc_P0", out.path())];
    let detector = ScriptedDetector::new(vec![vec![
        vec![0.0, 0.0, 60.0, 0.0, 60.0, 60.0, 0.0, 60.0],
        vec![80.0, 80.0, 190.0, 80.0, 190.0, 180.0, 80.0, 180.0],
    ]]);
    let captioner = CountingCaptioner::new("a chart");

    let run = extract_figures_from_pages(&pages, &config, &detector, &captioner)
        .await
        .unwrap();

    assert_eq!(run.figures.len(), 2);
    assert_eq!(run.figures[0].path, out.path().join("doc_P0_fig0.jpg"));
    assert_eq!(run.figures[1].path, out.path().join("doc_P0_fig1.jpg"));
    assert_eq!(captioner.calls(), 2);
}

/// A malformed polygon from the detector aborts the whole run.
#[tokio::test]
async fn malformed_polygon_aborts_the_run() {
    let out = tempfile::tempdir().unwrap();
    let config = ExtractionConfig::builder()
        .output_dir(out.path())
        .build()
        .unwrap();

    let pages = vec![white_page(0, "doc_P0", out.path())];
    let detector = ScriptedDetector::new(vec![vec![vec![1.0, 2.0, 3.0]]]);
    let captioner = CountingCaptioner::new("unused");

    let err = extract_figures_from_pages(&pages, &config, &detector, &captioner)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::MalformedPolygon { len: 3 }));
    assert_eq!(captioner.calls(), 0);
}

// ── Text pipeline ────────────────────────────────────────────────────────

#[tokio::test]
async fn text_pipeline_cleans_joins_and_reflows_per_page() {
    let out = tempfile::tempdir().unwrap();

    let pages = vec![
        white_page(0, "edu_02_P0", out.path()),
        white_page(1, "edu_02_P1", out.path()),
    ];
    let recognizer = ScriptedRecognizer::new(vec![
        vec![
            line("STEP 1"),
            line(":formula:"),
            line("3.14"),
            line("Find the volume. Use the given radius,"),
        ],
        vec![line("-7"), line("then state the answer.")],
    ]);
    let reflow = RecordingReflow::new();

    let run = extract_text_from_pages(&pages, &recognizer, &reflow)
        .await
        .unwrap();

    assert_eq!(run.pages.len(), 2);
    assert_eq!(run.stats.page_count, 2);

    assert_eq!(
        run.pages[0].source,
        "STEP 1 Find the volume. Use the given radius,"
    );
    assert_eq!(
        run.pages[0].text,
        "STEP 1 Find the volume.\nUse the given radius,"
    );
    assert_eq!(run.pages[1].source, "then state the answer.");

    // The reflow service receives each page's joined text whole, in order.
    let seen = reflow.seen.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        &[
            "STEP 1 Find the volume. Use the given radius,".to_string(),
            "then state the answer.".to_string(),
        ]
    );
}

/// A recognizer error propagates instead of being swallowed.
#[tokio::test]
async fn recognizer_failure_aborts_the_run() {
    struct FailingRecognizer;

    #[async_trait]
    impl LineRecognizer for FailingRecognizer {
        async fn recognize_lines(&self, _image: &[u8]) -> Result<Vec<TextLine>, ExtractError> {
            Err(ExtractError::AnalyzeFailed {
                status: "failed".into(),
            })
        }
    }

    let out = tempfile::tempdir().unwrap();
    let pages = vec![white_page(0, "doc_P0", out.path())];
    let reflow = RecordingReflow::new();

    let err = extract_text_from_pages(&pages, &FailingRecognizer, &reflow)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::AnalyzeFailed { .. }));
    assert!(reflow.seen.lock().unwrap().is_empty());
}
