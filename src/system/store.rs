use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::watch;

use super::snapshot::Snapshot;

/// Wall-clock value for the display clock stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(pub DateTime<Local>);

impl ClockTime {
    pub fn now() -> Self {
        ClockTime(Local::now())
    }

    pub fn time_label(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }

    pub fn date_label(&self) -> String {
        self.0.format("%m/%d/%Y").to_string()
    }
}

/// Holds the current snapshot and the current display clock.
///
/// Replacing the snapshot swaps a single `Arc`, so a reader either sees the
/// previous snapshot or the new one, never a mix.
pub struct SnapshotStore {
    snapshot: watch::Sender<Option<Arc<Snapshot>>>,
    clock: watch::Sender<Option<ClockTime>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        let (clock, _) = watch::channel(None);
        SnapshotStore { snapshot, clock }
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.borrow().clone()
    }

    /// Commit a fully assembled snapshot. The sampling engine is the only
    /// writer in a running process.
    pub fn replace(&self, snapshot: Arc<Snapshot>) {
        self.snapshot.send_replace(Some(snapshot));
    }

    pub fn clock(&self) -> Option<ClockTime> {
        *self.clock.borrow()
    }

    pub fn set_clock(&self, time: ClockTime) {
        self.clock.send_replace(Some(time));
    }

    /// Receiver that always observes the latest committed snapshot.
    pub fn watch_snapshots(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.snapshot.subscribe()
    }
}
