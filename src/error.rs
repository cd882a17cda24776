use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single metric probe. Never escapes the adapter boundary.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("probe failed: {0}")]
    Failed(String),

    #[error("probe panicked")]
    Panicked,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("cpu reported zero cores")]
    NoCores,

    #[error("cpu reported {cores} cores but {samples} usage samples")]
    CoreCountMismatch { cores: usize, samples: usize },

    #[error("core count changed from {expected} to {actual}")]
    CoreCountChanged { expected: usize, actual: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("memory total must be positive, got {0}")]
    InvalidMemoryTotal(f64),

    #[error("screen dimensions must be positive, got {width}x{height}")]
    InvalidScreen { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Why a sampling tick did not commit a snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickSkipped {
    #[error("previous tick still in flight")]
    InFlight,

    #[error("sampling engine has been shut down")]
    Stopped,

    #[error("assembled snapshot is invalid: {0}")]
    Invalid(#[from] SnapshotError),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no rendered surface is available")]
    SurfaceUnavailable,

    #[error("rendered surface failed: {0}")]
    Surface(String),

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no snapshot has been committed yet")]
    NoSnapshot,

    #[error("pdf serialization failed: {0}")]
    Encode(#[from] lopdf::Error),

    #[error("pdf write failed: {0}")]
    Write(String),

    #[error("report task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("no snapshot has been committed yet")]
    NoSnapshot,

    #[error("no share facility or clipboard is available")]
    Unavailable,

    #[error("share failed: {0}")]
    Share(String),

    #[error("clipboard copy failed: {0}")]
    Clipboard(String),
}
