//! On-demand exports of the dashboard: a raster image of the rendered
//! surface, a paginated report, and a short shareable summary.
//!
//! Every export reads the latest committed snapshot and nothing else.
//! CPU-bound encoding runs on the blocking pool so sampling is never
//! delayed by an export.

pub mod raster;
pub mod report;
pub mod share;
pub mod sink;
pub mod surface;

use std::sync::Arc;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::error::{CaptureError, DocumentError, ShareError};
use crate::i18n::Locale;
use crate::system::snapshot::Snapshot;
use crate::system::store::SnapshotStore;
use report::ReportDocument;
use share::{ClipboardTarget, ShareTarget, Unavailable};
use surface::RenderSurface;

pub const SHARE_TITLE: &str = "Engineering Workstation Diagnostics";

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
}

#[derive(Debug, Clone, Copy)]
pub struct ExportSettings {
    pub image_scale: u32,
    pub wrap_columns: usize,
    pub locale: Locale,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            image_scale: 2,
            wrap_columns: 90,
            locale: Locale::En,
        }
    }
}

/// `engineering-workstation-diagnostics-2024-03-09T17-05-02-123Z.png`
pub fn image_name(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("engineering-workstation-diagnostics-{stamp}.png")
}

pub fn report_name(epoch_ms: i64) -> String {
    format!("system-diagnostics-report-{epoch_ms}.pdf")
}

pub fn summary_text(snapshot: &Snapshot) -> String {
    format!(
        "{}x{} display, {} CPU cores, {}",
        snapshot.screen.width, snapshot.screen.height, snapshot.cpu.cores, snapshot.host.platform
    )
}

#[derive(Clone)]
pub struct ExportPipeline {
    store: Arc<SnapshotStore>,
    surface: Arc<dyn RenderSurface>,
    share: Arc<dyn ShareTarget>,
    clipboard: Arc<dyn ClipboardTarget>,
    settings: ExportSettings,
}

impl ExportPipeline {
    pub fn new(
        store: Arc<SnapshotStore>,
        surface: Arc<dyn RenderSurface>,
        settings: ExportSettings,
    ) -> Self {
        ExportPipeline {
            store,
            surface,
            share: Arc::new(Unavailable),
            clipboard: Arc::new(Unavailable),
            settings,
        }
    }

    pub fn with_share(mut self, share: impl ShareTarget + 'static) -> Self {
        self.share = Arc::new(share);
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardTarget + 'static) -> Self {
        self.clipboard = Arc::new(clipboard);
        self
    }

    pub async fn capture_image(&self) -> Result<Artifact, CaptureError> {
        let buffer = self.surface.capture()?;
        let scale = self.settings.image_scale;
        let area = buffer.area;
        let bytes = tokio::task::spawn_blocking(move || raster::render_png(&buffer, scale))
            .await
            .map_err(|e| CaptureError::Rasterize(e.to_string()))??;
        let artifact = Artifact {
            name: image_name(Utc::now()),
            media_type: "image/png",
            bytes,
        };
        info!(
            name = %artifact.name,
            cols = area.width,
            rows = area.height,
            scale,
            "image captured"
        );
        Ok(artifact)
    }

    pub async fn compose_report(&self) -> Result<Artifact, DocumentError> {
        let snapshot = self.store.current().ok_or(DocumentError::NoSnapshot)?;
        let generated_at = Local::now();
        let document = ReportDocument::from_snapshot(
            &snapshot,
            self.settings.locale,
            &generated_at,
            self.settings.wrap_columns,
        );
        let bytes = tokio::task::spawn_blocking(move || document.to_pdf())
            .await
            .map_err(|e| DocumentError::Task(e.to_string()))??;
        let artifact = Artifact {
            name: report_name(generated_at.timestamp_millis()),
            media_type: "application/pdf",
            bytes,
        };
        info!(name = %artifact.name, sequence = snapshot.sequence, "report composed");
        Ok(artifact)
    }

    /// Hand the summary to the share facility when there is one, otherwise
    /// copy the same text to the clipboard.
    pub async fn share_or_copy_summary(&self) -> Result<ShareOutcome, ShareError> {
        let snapshot = self.store.current().ok_or(ShareError::NoSnapshot)?;
        let text = summary_text(&snapshot);

        if self.share.is_available() {
            return match self.share.share(SHARE_TITLE, &text).await {
                Ok(()) => {
                    info!(summary = %text, "summary shared");
                    Ok(ShareOutcome::Shared)
                }
                Err(err) => {
                    warn!(error = %err, "share failed");
                    Err(err)
                }
            };
        }
        if self.clipboard.is_available() {
            self.clipboard.copy(&text).await?;
            info!(summary = %text, "summary copied");
            return Ok(ShareOutcome::Copied);
        }
        Err(ShareError::Unavailable)
    }
}
