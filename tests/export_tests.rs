mod common;

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use tokio::sync::Notify;

use wsdiag::app::{App, ExportOutcome, ExportRequest, run_export};
use wsdiag::error::{CaptureError, DocumentError, ShareError};
use wsdiag::export::report::ReportDocument;
use wsdiag::export::share::{ClipboardTarget, ShareTarget};
use wsdiag::export::sink::ArtifactSink;
use wsdiag::export::surface::{RenderSurface, SharedSurface};
use wsdiag::export::{ExportPipeline, ExportSettings, SHARE_TITLE, ShareOutcome};
use wsdiag::i18n::Locale;
use wsdiag::ui;
use wsdiag::ui::theme::Theme;

use common::{committed, engine};

type Log = Arc<Mutex<Vec<String>>>;

struct RecordingShare {
    available: bool,
    fail: bool,
    log: Log,
}

#[async_trait]
impl ShareTarget for RecordingShare {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError> {
        if self.fail {
            return Err(ShareError::Share("dismissed".into()));
        }
        self.log.lock().unwrap().push(format!("{title}|{text}"));
        Ok(())
    }
}

struct RecordingClipboard {
    log: Log,
}

#[async_trait]
impl ClipboardTarget for RecordingClipboard {
    fn is_available(&self) -> bool {
        true
    }

    async fn copy(&self, text: &str) -> Result<(), ShareError> {
        self.log.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Share facility whose dialog is never dismissed.
struct StalledShare {
    entered: Arc<Notify>,
}

#[async_trait]
impl ShareTarget for StalledShare {
    fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, _title: &str, _text: &str) -> Result<(), ShareError> {
        self.entered.notify_one();
        std::future::pending::<()>().await;
        Ok(())
    }
}

struct BrokenSurface;

impl RenderSurface for BrokenSurface {
    fn capture(&self) -> Result<Buffer, CaptureError> {
        Err(CaptureError::Surface("context lost".into()))
    }
}

fn pipeline_for(
    engine: &wsdiag::system::engine::SamplingEngine,
    surface: Arc<dyn RenderSurface>,
) -> ExportPipeline {
    ExportPipeline::new(engine.store(), surface, ExportSettings::default())
}

fn draw_dashboard(surface: &SharedSurface, app: &App, width: u16, height: u16) {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    let completed = terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    surface.publish(completed.buffer);
}

#[tokio::test]
async fn report_reflects_the_committed_snapshot() {
    let engine = engine(4);
    let snapshot = committed(&engine).await;
    let pipeline = pipeline_for(&engine, Arc::new(SharedSurface::new()));

    let artifact = pipeline.compose_report().await.unwrap();
    assert_eq!(artifact.media_type, "application/pdf");
    assert!(artifact.name.starts_with("system-diagnostics-report-"));
    assert!(artifact.name.ends_with(".pdf"));
    assert!(artifact.bytes.starts_with(b"%PDF-1.5"));

    let parsed = lopdf::Document::load_mem(&artifact.bytes).unwrap();
    assert_eq!(parsed.get_pages().len(), 1);

    let generated = Local.with_ymd_and_hms(2024, 3, 9, 17, 5, 2).unwrap();
    let document = ReportDocument::from_snapshot(&snapshot, Locale::En, &generated, 90);
    let text = document.text();
    let specs: Vec<&str> = text
        .lines()
        .skip_while(|line| *line != "SYSTEM SPECIFICATIONS:")
        .skip(1)
        .collect();
    assert_eq!(specs[0], "CPU Cores: 4");
    assert!(text.contains("Platform: TestOS"));
    assert!(text.contains("Generated: 03/09/2024, 17:05:02"));
}

#[tokio::test]
async fn report_without_snapshot_fails_cleanly() {
    let engine = engine(4);
    let pipeline = pipeline_for(&engine, Arc::new(SharedSurface::new()));
    assert!(matches!(
        pipeline.compose_report().await,
        Err(DocumentError::NoSnapshot)
    ));
}

#[tokio::test]
async fn capture_failure_does_not_disturb_sampling() {
    let engine = engine(4);
    committed(&engine).await;
    let pipeline = pipeline_for(&engine, Arc::new(BrokenSurface));

    assert!(matches!(
        pipeline.capture_image().await,
        Err(CaptureError::Surface(_))
    ));
    assert_eq!(engine.tick().await.unwrap().sequence, 2);
}

#[tokio::test(start_paused = true)]
async fn scheduled_sampling_ignores_failed_and_stalled_exports() {
    let mut engine = engine(4);
    let mut snapshots = engine.bus().subscribe_snapshots();
    engine.start();
    assert_eq!(snapshots.recv().await.unwrap().sequence, 1);
    let first_at = tokio::time::Instant::now();

    let entered = Arc::new(Notify::new());
    let capture = pipeline_for(&engine, Arc::new(BrokenSurface));
    let share = pipeline_for(&engine, Arc::new(SharedSurface::new())).with_share(StalledShare {
        entered: Arc::clone(&entered),
    });
    let capture_task = tokio::spawn(async move { capture.capture_image().await });
    let share_task = tokio::spawn(async move { share.share_or_copy_summary().await });

    assert!(matches!(
        capture_task.await.unwrap(),
        Err(CaptureError::Surface(_))
    ));
    entered.notified().await;

    let second = snapshots.recv().await.unwrap();
    let elapsed = first_at.elapsed();
    assert_eq!(second.sequence, 2);
    assert!(elapsed >= Duration::from_millis(2000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(2100), "{elapsed:?}");
    assert!(!share_task.is_finished());

    share_task.abort();
    engine.shutdown();
}

#[tokio::test]
async fn captured_image_matches_the_rendered_grid() {
    let engine = engine(4);
    let snapshot = committed(&engine).await;
    let surface = SharedSurface::new();
    let mut app = App::new(Locale::En, Theme::dashboard());
    app.on_snapshot(snapshot);
    draw_dashboard(&surface, &app, 120, 36);

    let pipeline = pipeline_for(&engine, Arc::new(surface));
    let artifact = pipeline.capture_image().await.unwrap();
    assert_eq!(artifact.media_type, "image/png");
    assert!(artifact.name.starts_with("engineering-workstation-diagnostics-"));
    assert!(artifact.name.ends_with("Z.png"));

    let decoder = png::Decoder::new(Cursor::new(artifact.bytes));
    let reader = decoder.read_info().unwrap();
    assert_eq!(reader.info().width, 120 * 8 * 2);
    assert_eq!(reader.info().height, 36 * 16 * 2);
}

#[tokio::test]
async fn summary_prefers_the_share_facility() {
    let engine = engine(4);
    committed(&engine).await;
    let shared = Log::default();
    let copied = Log::default();
    let pipeline = pipeline_for(&engine, Arc::new(SharedSurface::new()))
        .with_share(RecordingShare {
            available: true,
            fail: false,
            log: Arc::clone(&shared),
        })
        .with_clipboard(RecordingClipboard {
            log: Arc::clone(&copied),
        });

    assert_eq!(
        pipeline.share_or_copy_summary().await.unwrap(),
        ShareOutcome::Shared
    );
    assert_eq!(
        *shared.lock().unwrap(),
        vec![format!("{SHARE_TITLE}|1920x1080 display, 4 CPU cores, TestOS")]
    );
    assert!(copied.lock().unwrap().is_empty());
}

#[tokio::test]
async fn summary_falls_back_to_the_clipboard() {
    let engine = engine(8);
    committed(&engine).await;
    let copied = Log::default();
    let pipeline = pipeline_for(&engine, Arc::new(SharedSurface::new()))
        .with_share(RecordingShare {
            available: false,
            fail: false,
            log: Log::default(),
        })
        .with_clipboard(RecordingClipboard {
            log: Arc::clone(&copied),
        });

    assert_eq!(
        pipeline.share_or_copy_summary().await.unwrap(),
        ShareOutcome::Copied
    );
    assert_eq!(
        *copied.lock().unwrap(),
        vec!["1920x1080 display, 8 CPU cores, TestOS".to_string()]
    );
}

#[tokio::test]
async fn failed_share_is_reported_not_retried_on_clipboard() {
    let engine = engine(4);
    committed(&engine).await;
    let copied = Log::default();
    let pipeline = pipeline_for(&engine, Arc::new(SharedSurface::new()))
        .with_share(RecordingShare {
            available: true,
            fail: true,
            log: Log::default(),
        })
        .with_clipboard(RecordingClipboard {
            log: Arc::clone(&copied),
        });

    assert!(matches!(
        pipeline.share_or_copy_summary().await,
        Err(ShareError::Share(_))
    ));
    assert!(copied.lock().unwrap().is_empty());
}

#[tokio::test]
async fn summary_without_any_target_or_snapshot() {
    let engine = engine(4);
    let pipeline = pipeline_for(&engine, Arc::new(SharedSurface::new()));
    assert!(matches!(
        pipeline.share_or_copy_summary().await,
        Err(ShareError::NoSnapshot)
    ));

    committed(&engine).await;
    assert!(matches!(
        pipeline.share_or_copy_summary().await,
        Err(ShareError::Unavailable)
    ));
}

#[tokio::test]
async fn run_export_saves_artifacts_into_the_sink() {
    let dir = tempfile::tempdir().unwrap();
    let sink = ArtifactSink::new(dir.path().join("exports"));
    let engine = engine(4);
    let surface = SharedSurface::new();
    let pipeline = pipeline_for(&engine, Arc::new(surface.clone()));

    assert_eq!(
        run_export(ExportRequest::Report, &pipeline, &sink).await,
        ExportOutcome::NoSnapshot(ExportRequest::Report)
    );
    assert_eq!(
        run_export(ExportRequest::Image, &pipeline, &sink).await,
        ExportOutcome::Failed(ExportRequest::Image)
    );

    let snapshot = committed(&engine).await;
    let mut app = App::new(Locale::En, Theme::dashboard());
    app.on_snapshot(snapshot);
    draw_dashboard(&surface, &app, 100, 30);

    let ExportOutcome::ReportSaved(report) =
        run_export(ExportRequest::Report, &pipeline, &sink).await
    else {
        panic!("report was not saved");
    };
    let ExportOutcome::ImageSaved(image) =
        run_export(ExportRequest::Image, &pipeline, &sink).await
    else {
        panic!("image was not saved");
    };

    assert!(report.starts_with(dir.path().join("exports")));
    assert!(std::fs::read(&report).unwrap().starts_with(b"%PDF"));
    assert!(
        std::fs::read(&image)
            .unwrap()
            .starts_with(&[0x89, b'P', b'N', b'G'])
    );

    app.on_export(ExportOutcome::ImageSaved(image));
    assert!(!app.capturing);
}
