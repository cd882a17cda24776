use async_trait::async_trait;

use crate::error::ProbeError;
use crate::format::UNKNOWN;
use crate::system::platform::{self, GpuInfo};
use crate::system::snapshot::GpuReading;
use crate::system::source::MetricSource;

pub struct GpuSource;

impl GpuSource {
    pub fn reading_from(info: GpuInfo) -> GpuReading {
        let memory = info
            .memory_bytes
            .map(|b| (b as f64 / (1024.0 * 1024.0 * 1024.0)).round() as u32)
            .unwrap_or(0);
        GpuReading {
            vendor: info.vendor,
            renderer: info.renderer,
            memory,
        }
    }
}

#[async_trait]
impl MetricSource for GpuSource {
    type Reading = GpuReading;

    fn name(&self) -> &'static str {
        "gpu"
    }

    async fn probe(&self) -> Result<GpuReading, ProbeError> {
        platform::gpu_info()
            .map(Self::reading_from)
            .ok_or(ProbeError::Unsupported("gpu"))
    }

    fn fallback(&self) -> GpuReading {
        GpuReading {
            vendor: UNKNOWN.to_string(),
            renderer: UNKNOWN.to_string(),
            memory: 0,
        }
    }
}
