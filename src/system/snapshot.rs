use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::error::SnapshotError;

pub const MAX_TEMPERATURE_C: f64 = 150.0;
pub const DEFAULT_REFRESH_RATE: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuReading {
    pub cores: usize,
    pub usage: Vec<f64>,
    pub temperature: f64,
    pub frequency: f64,
}

impl CpuReading {
    pub fn average_usage(&self) -> f64 {
        if self.usage.is_empty() {
            return 0.0;
        }
        self.usage.iter().sum::<f64>() / self.usage.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryReading {
    pub total: f64,
    pub used: f64,
}

impl MemoryReading {
    pub fn available(&self) -> f64 {
        self.total - self.used
    }

    pub fn pressure(&self) -> f64 {
        self.used / self.total
    }
}

/// Derived figures are computed here, never stored.
impl Serialize for MemoryReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MemoryReading", 4)?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("used", &self.used)?;
        state.serialize_field("available", &self.available())?;
        state.serialize_field("pressure", &self.pressure())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuReading {
    pub vendor: String,
    pub renderer: String,
    pub memory: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenReading {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
    pub refresh_rate: u32,
}

impl ScreenReading {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Identification of the client the dashboard is presented through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserReading {
    pub name: String,
    pub version: String,
    pub engine: String,
    pub user_agent: String,
    pub truecolor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectiveType {
    #[serde(rename = "4g")]
    FourG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "unknown")]
    Unknown,
}

impl EffectiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveType::FourG => "4g",
            EffectiveType::ThreeG => "3g",
            EffectiveType::TwoG => "2g",
            EffectiveType::Unknown => "unknown",
        }
    }

    /// Classify a link the way the Network Information API buckets
    /// connections; slow-2g collapses into 2g.
    pub fn from_link(downlink_mbps: f64, rtt_ms: f64) -> Self {
        if downlink_mbps <= 0.0 && rtt_ms <= 0.0 {
            return EffectiveType::Unknown;
        }
        let known_down = downlink_mbps > 0.0;
        let known_rtt = rtt_ms > 0.0;
        if (known_rtt && rtt_ms >= 1400.0) || (known_down && downlink_mbps <= 0.07) {
            EffectiveType::TwoG
        } else if (known_rtt && rtt_ms >= 270.0) || (known_down && downlink_mbps <= 0.7) {
            EffectiveType::ThreeG
        } else {
            EffectiveType::FourG
        }
    }
}

impl fmt::Display for EffectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkReading {
    pub effective_type: EffectiveType,
    pub downlink: f64,
    pub rtt: f64,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostReading {
    pub platform: String,
    pub language: String,
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        SessionId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        SessionId(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInfo {
    pub uptime_ms: f64,
    pub timestamp: i64,
    pub session_id: SessionId,
}

/// One reading per metric source, as gathered during a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    pub cpu: CpuReading,
    pub memory: MemoryReading,
    pub gpu: GpuReading,
    pub screen: ScreenReading,
    pub browser: BrowserReading,
    pub network: NetworkReading,
    pub host: HostReading,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub sequence: u64,
    pub cpu: CpuReading,
    pub memory: MemoryReading,
    pub gpu: GpuReading,
    pub screen: ScreenReading,
    pub browser: BrowserReading,
    pub network: NetworkReading,
    pub host: HostReading,
    pub system: SystemInfo,
}

impl Snapshot {
    /// Validate and normalize a tick's readings into a publishable snapshot.
    ///
    /// Bounded values are clamped into their domain. Non-finite values and
    /// a core count that differs from `expected_cores` are rejected.
    pub fn assemble(
        readings: Readings,
        sequence: u64,
        system: SystemInfo,
        expected_cores: Option<usize>,
    ) -> Result<Snapshot, SnapshotError> {
        let Readings {
            mut cpu,
            mut memory,
            gpu,
            mut screen,
            browser,
            mut network,
            host,
        } = readings;

        if cpu.cores == 0 {
            return Err(SnapshotError::NoCores);
        }
        if cpu.usage.len() != cpu.cores {
            return Err(SnapshotError::CoreCountMismatch {
                cores: cpu.cores,
                samples: cpu.usage.len(),
            });
        }
        if let Some(expected) = expected_cores
            && expected != cpu.cores
        {
            return Err(SnapshotError::CoreCountChanged {
                expected,
                actual: cpu.cores,
            });
        }

        ensure_finite("cpu.temperature", cpu.temperature)?;
        ensure_finite("cpu.frequency", cpu.frequency)?;
        for &usage in &cpu.usage {
            ensure_finite("cpu.usage", usage)?;
        }
        ensure_finite("memory.total", memory.total)?;
        ensure_finite("memory.used", memory.used)?;
        ensure_finite("network.downlink", network.downlink)?;
        ensure_finite("network.rtt", network.rtt)?;
        ensure_finite("system.uptime_ms", system.uptime_ms)?;

        if memory.total <= 0.0 {
            return Err(SnapshotError::InvalidMemoryTotal(memory.total));
        }
        if screen.width == 0 || screen.height == 0 {
            return Err(SnapshotError::InvalidScreen {
                width: screen.width,
                height: screen.height,
            });
        }

        for usage in &mut cpu.usage {
            *usage = usage.clamp(0.0, 100.0);
        }
        cpu.temperature = cpu.temperature.clamp(0.0, MAX_TEMPERATURE_C);
        cpu.frequency = cpu.frequency.max(0.0);
        memory.used = memory.used.clamp(0.0, memory.total);
        network.downlink = network.downlink.max(0.0);
        network.rtt = network.rtt.max(0.0);
        if screen.refresh_rate == 0 {
            screen.refresh_rate = DEFAULT_REFRESH_RATE;
        }

        Ok(Snapshot {
            sequence,
            cpu,
            memory,
            gpu,
            screen,
            browser,
            network,
            host,
            system,
        })
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), SnapshotError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SnapshotError::NonFinite(field))
    }
}
