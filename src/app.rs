use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::action::Action;
use crate::error::{DocumentError, ShareError};
use crate::export::sink::ArtifactSink;
use crate::export::{ExportPipeline, ShareOutcome};
use crate::i18n::{Locale, Notice};
use crate::system::snapshot::Snapshot;
use crate::system::store::ClockTime;
use crate::ui::theme::Theme;

const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRequest {
    Image,
    Report,
    Summary,
}

/// Work the host loop performs on the app's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Export(ExportRequest),
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    ImageSaved(PathBuf),
    ReportSaved(PathBuf),
    SummaryDelivered(ShareOutcome),
    NoSnapshot(ExportRequest),
    Failed(ExportRequest),
}

/// Run one export to completion and save its artifact. Failures are logged
/// here and reduced to an outcome for the status bar.
pub async fn run_export(
    request: ExportRequest,
    pipeline: &ExportPipeline,
    sink: &ArtifactSink,
) -> ExportOutcome {
    match request {
        ExportRequest::Image => match pipeline.capture_image().await {
            Ok(artifact) => match sink.save(&artifact).await {
                Ok(path) => ExportOutcome::ImageSaved(path),
                Err(err) => {
                    warn!(error = %err, "saving capture failed");
                    ExportOutcome::Failed(request)
                }
            },
            Err(err) => {
                warn!(error = %err, "image capture failed");
                ExportOutcome::Failed(request)
            }
        },
        ExportRequest::Report => match pipeline.compose_report().await {
            Ok(artifact) => match sink.save(&artifact).await {
                Ok(path) => ExportOutcome::ReportSaved(path),
                Err(err) => {
                    warn!(error = %err, "saving report failed");
                    ExportOutcome::Failed(request)
                }
            },
            Err(DocumentError::NoSnapshot) => ExportOutcome::NoSnapshot(request),
            Err(err) => {
                warn!(error = %err, "report composition failed");
                ExportOutcome::Failed(request)
            }
        },
        ExportRequest::Summary => match pipeline.share_or_copy_summary().await {
            Ok(outcome) => ExportOutcome::SummaryDelivered(outcome),
            Err(ShareError::NoSnapshot) => ExportOutcome::NoSnapshot(request),
            Err(err) => {
                warn!(error = %err, "summary share failed");
                ExportOutcome::Failed(request)
            }
        },
    }
}

pub struct App {
    pub running: bool,
    pub snapshot: Option<Arc<Snapshot>>,
    pub clock: Option<ClockTime>,
    pub locale: Locale,
    pub theme: Theme,
    pub capturing: bool,
    pub status_message: Option<(Notice, Instant)>,
}

impl App {
    pub fn new(locale: Locale, theme: Theme) -> Self {
        App {
            running: true,
            snapshot: None,
            clock: None,
            locale,
            theme,
            capturing: false,
            status_message: None,
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('p') => Action::CaptureImage,
            KeyCode::Char('r') => Action::ComposeReport,
            KeyCode::Char('s') => Action::ShareSummary,
            KeyCode::Char(' ') => Action::Refresh,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Quit => {
                self.running = false;
                None
            }
            Action::CaptureImage => {
                if self.capturing {
                    return None;
                }
                self.capturing = true;
                Some(Command::Export(ExportRequest::Image))
            }
            Action::ComposeReport => Some(Command::Export(ExportRequest::Report)),
            Action::ShareSummary => Some(Command::Export(ExportRequest::Summary)),
            Action::Refresh => Some(Command::Refresh),
            Action::None => None,
        }
    }

    /// Ignores anything not newer than what is already shown.
    pub fn on_snapshot(&mut self, snapshot: Arc<Snapshot>) -> bool {
        if let Some(current) = &self.snapshot
            && current.sequence >= snapshot.sequence
        {
            return false;
        }
        self.snapshot = Some(snapshot);
        true
    }

    pub fn on_clock(&mut self, time: ClockTime) {
        self.clock = Some(time);
        if let Some((_, created)) = &self.status_message
            && created.elapsed() >= NOTICE_TTL
        {
            self.status_message = None;
        }
    }

    pub fn on_export(&mut self, outcome: ExportOutcome) {
        let notice = match outcome {
            ExportOutcome::ImageSaved(path) => Notice::CaptureSaved(path),
            ExportOutcome::ReportSaved(path) => Notice::ReportSaved(path),
            ExportOutcome::SummaryDelivered(ShareOutcome::Shared) => Notice::Shared,
            ExportOutcome::SummaryDelivered(ShareOutcome::Copied) => Notice::Copied,
            ExportOutcome::NoSnapshot(_) => Notice::NoSnapshot,
            ExportOutcome::Failed(ExportRequest::Image) => Notice::CaptureFailed,
            ExportOutcome::Failed(ExportRequest::Report) => Notice::ReportFailed,
            ExportOutcome::Failed(ExportRequest::Summary) => Notice::ShareFailed,
        };
        if matches!(
            &notice,
            Notice::CaptureSaved(_) | Notice::CaptureFailed
        ) {
            self.capturing = false;
        }
        self.status_message = Some((notice, Instant::now()));
    }
}
