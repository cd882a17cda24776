use std::sync::Mutex;

use async_trait::async_trait;
use sysinfo::System;

use crate::error::ProbeError;
use crate::format::bytes_to_gb;
use crate::system::snapshot::MemoryReading;
use crate::system::source::MetricSource;

pub const FALLBACK_TOTAL_GB: f64 = 8.0;

pub struct MemorySource {
    sys: Mutex<System>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource {
            sys: Mutex::new(System::new()),
        }
    }
}

#[async_trait]
impl MetricSource for MemorySource {
    type Reading = MemoryReading;

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn probe(&self) -> Result<MemoryReading, ProbeError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|_| ProbeError::Failed("memory state poisoned".into()))?;
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(ProbeError::Unsupported("memory total"));
        }
        Ok(MemoryReading {
            total: bytes_to_gb(total),
            used: bytes_to_gb(sys.used_memory()),
        })
    }

    fn fallback(&self) -> MemoryReading {
        MemoryReading {
            total: FALLBACK_TOTAL_GB,
            used: 0.0,
        }
    }
}
