use std::sync::Mutex;

use async_trait::async_trait;
use sysinfo::{Components, System};

use crate::error::ProbeError;
use crate::system::snapshot::CpuReading;
use crate::system::source::MetricSource;

pub const FALLBACK_CORES: usize = 4;
pub const FALLBACK_TEMPERATURE_C: f64 = 35.0;
pub const FALLBACK_FREQUENCY_GHZ: f64 = 2.4;

const SENSOR_LABELS: [&str; 5] = ["cpu", "package", "core", "tctl", "k10temp"];

pub struct CpuSource {
    sys: Mutex<System>,
    components: Mutex<Components>,
    cores: usize,
}

impl Default for CpuSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        let detected = sys.cpus().len();
        CpuSource {
            sys: Mutex::new(sys),
            components: Mutex::new(Components::new_with_refreshed_list()),
            cores: if detected == 0 { FALLBACK_CORES } else { detected },
        }
    }

    fn read_temperature(&self, usage: &[f64]) -> f64 {
        let sensed = self.components.lock().ok().and_then(|mut components| {
            components.refresh(false);
            components
                .list()
                .iter()
                .filter(|c| {
                    let label = c.label().to_lowercase();
                    SENSOR_LABELS.iter().any(|s| label.contains(s))
                })
                .filter_map(|c| c.temperature())
                .map(f64::from)
                .filter(|t| t.is_finite() && *t > 0.0)
                .reduce(f64::max)
        });
        sensed.unwrap_or_else(|| estimate_temperature(usage))
    }
}

/// Estimated package temperature when no sensor is exposed.
pub fn estimate_temperature(usage: &[f64]) -> f64 {
    if usage.is_empty() {
        return FALLBACK_TEMPERATURE_C;
    }
    let mean = usage.iter().sum::<f64>() / usage.len() as f64;
    FALLBACK_TEMPERATURE_C + mean.clamp(0.0, 100.0) * 0.3
}

#[async_trait]
impl MetricSource for CpuSource {
    type Reading = CpuReading;

    fn name(&self) -> &'static str {
        "cpu"
    }

    async fn probe(&self) -> Result<CpuReading, ProbeError> {
        let (usage, frequency) = {
            let mut sys = self
                .sys
                .lock()
                .map_err(|_| ProbeError::Failed("cpu state poisoned".into()))?;
            sys.refresh_cpu_all();
            let cpus = sys.cpus();
            if cpus.is_empty() {
                return Err(ProbeError::Unsupported("cpu list"));
            }
            let usage: Vec<f64> = cpus.iter().map(|c| f64::from(c.cpu_usage())).collect();
            let mhz = cpus.iter().map(|c| c.frequency()).sum::<u64>() / cpus.len() as u64;
            let frequency = if mhz == 0 {
                FALLBACK_FREQUENCY_GHZ
            } else {
                mhz as f64 / 1000.0
            };
            (usage, frequency)
        };

        let temperature = self.read_temperature(&usage);
        Ok(CpuReading {
            cores: usage.len(),
            usage,
            temperature,
            frequency,
        })
    }

    fn fallback(&self) -> CpuReading {
        CpuReading {
            cores: self.cores,
            usage: vec![0.0; self.cores],
            temperature: FALLBACK_TEMPERATURE_C,
            frequency: FALLBACK_FREQUENCY_GHZ,
        }
    }
}
