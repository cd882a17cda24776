use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, debug, debug_span, info, warn};

use super::bus::SubscriptionBus;
use super::collector::AdapterSet;
use super::snapshot::{SessionId, Snapshot, SystemInfo};
use super::store::{ClockTime, SnapshotStore};
use crate::error::TickSkipped;

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub sample_interval: Duration,
    pub clock_interval: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            sample_interval: Duration::from_millis(2000),
            clock_interval: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Default)]
struct Progress {
    sequence: u64,
    last_timestamp: i64,
    cores: Option<usize>,
}

struct EngineCore {
    adapters: AdapterSet,
    store: Arc<SnapshotStore>,
    bus: Arc<SubscriptionBus>,
    sampling: AtomicBool,
    stopped: AtomicBool,
    progress: Mutex<Progress>,
    session_id: SessionId,
    started: Instant,
}

/// Clears the in-flight flag when a tick ends, including when the tick's
/// future is dropped mid-await.
struct SamplingGuard<'a>(&'a AtomicBool);

impl<'a> SamplingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SamplingGuard(flag))
    }
}

impl Drop for SamplingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EngineCore {
    async fn tick(&self) -> Result<Arc<Snapshot>, TickSkipped> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(TickSkipped::Stopped);
        }
        let Some(_guard) = SamplingGuard::acquire(&self.sampling) else {
            debug!("tick skipped: previous tick in flight");
            return Err(TickSkipped::InFlight);
        };

        let readings = self.adapters.sample_all().await;
        if self.stopped.load(Ordering::Acquire) {
            debug!("tick abandoned: engine shut down while sampling");
            return Err(TickSkipped::Stopped);
        }

        // Nothing below awaits, so an abandoned tick never reaches the commit.
        let snapshot = {
            let mut progress = self.progress.lock().unwrap_or_else(PoisonError::into_inner);
            let sequence = progress.sequence + 1;
            let timestamp = Utc::now()
                .timestamp_millis()
                .max(progress.last_timestamp + 1);
            let system = SystemInfo {
                uptime_ms: self.started.elapsed().as_secs_f64() * 1000.0,
                timestamp,
                session_id: self.session_id.clone(),
            };
            match Snapshot::assemble(readings, sequence, system, progress.cores) {
                Ok(snapshot) => {
                    progress.sequence = sequence;
                    progress.last_timestamp = timestamp;
                    progress.cores = Some(snapshot.cpu.cores);
                    Arc::new(snapshot)
                }
                Err(err) => {
                    warn!(sequence, error = %err, "tick skipped: snapshot rejected");
                    return Err(err.into());
                }
            }
        };

        self.store.replace(Arc::clone(&snapshot));
        let delivered = self.bus.publish_snapshot(Arc::clone(&snapshot));
        debug!(sequence = snapshot.sequence, delivered, "snapshot committed");
        Ok(snapshot)
    }

    fn clock_tick(&self) {
        let now = ClockTime::now();
        self.store.set_clock(now);
        self.bus.publish_clock(now);
    }
}

/// Owns the sampling and display-clock timers and the snapshot slot they
/// feed. Constructed and torn down explicitly by the host process.
pub struct SamplingEngine {
    core: Arc<EngineCore>,
    settings: EngineSettings,
    tasks: Vec<JoinHandle<()>>,
}

/// Cloneable handle for requesting ticks from other tasks.
#[derive(Clone)]
pub struct EngineHandle {
    core: Arc<EngineCore>,
}

impl EngineHandle {
    pub async fn tick(&self) -> Result<Arc<Snapshot>, TickSkipped> {
        self.core.tick().await
    }
}

impl SamplingEngine {
    pub fn new(adapters: AdapterSet, settings: EngineSettings) -> Self {
        Self::with_parts(
            adapters,
            settings,
            Arc::new(SnapshotStore::new()),
            Arc::new(SubscriptionBus::new()),
        )
    }

    pub fn with_parts(
        adapters: AdapterSet,
        settings: EngineSettings,
        store: Arc<SnapshotStore>,
        bus: Arc<SubscriptionBus>,
    ) -> Self {
        SamplingEngine {
            core: Arc::new(EngineCore {
                adapters,
                store,
                bus,
                sampling: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                progress: Mutex::new(Progress::default()),
                session_id: SessionId::generate(),
                started: Instant::now(),
            }),
            settings,
            tasks: Vec::new(),
        }
    }

    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.core.store)
    }

    pub fn bus(&self) -> Arc<SubscriptionBus> {
        Arc::clone(&self.core.bus)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.core.session_id
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            core: Arc::clone(&self.core),
        }
    }

    pub fn is_sampling(&self) -> bool {
        self.core.sampling.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Run one sampling cycle now. Skipped if another tick is in flight.
    pub async fn tick(&self) -> Result<Arc<Snapshot>, TickSkipped> {
        self.core.tick().await
    }

    /// Spawn the sampling and display-clock timers. Both fire immediately,
    /// then on their own cadence; missed periods are skipped, not queued.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() || self.core.stopped.load(Ordering::Acquire) {
            return;
        }
        info!(
            session = %self.core.session_id,
            sample_ms = self.settings.sample_interval.as_millis() as u64,
            clock_ms = self.settings.clock_interval.as_millis() as u64,
            "sampling engine started"
        );

        let core = Arc::clone(&self.core);
        let sample_interval = self.settings.sample_interval;
        let sampling = tokio::spawn(async move {
            let mut interval = tokio::time::interval(sample_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let _ = core.tick().instrument(debug_span!("sampling.tick")).await;
            }
        });

        let core = Arc::clone(&self.core);
        let clock_interval = self.settings.clock_interval;
        let clock = tokio::spawn(async move {
            let mut interval = tokio::time::interval(clock_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                core.clock_tick();
            }
        });

        self.tasks = vec![sampling, clock];
    }

    /// Stop both timers and refuse every later tick, including ticks
    /// requested through an [`EngineHandle`]. An in-flight tick is abandoned
    /// before its commit. The engine cannot be restarted.
    pub fn shutdown(&mut self) {
        self.core.stopped.store(true, Ordering::Release);
        if self.tasks.is_empty() {
            return;
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        info!(session = %self.core.session_id, "sampling engine stopped");
    }
}

impl Drop for SamplingEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
