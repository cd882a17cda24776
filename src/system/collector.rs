use std::time::Duration;

use tracing::debug;

use super::snapshot::{
    BrowserReading, CpuReading, GpuReading, HostReading, MemoryReading, NetworkReading, Readings,
    ScreenReading,
};
use super::source::{MetricSource, MetricSourceAdapter, StaticSource};
use super::sources::{
    CpuSource, DisplaySource, GpuSource, HostSource, MemorySource, NetworkSource, RuntimeSource,
};
use crate::config::NetworkConfig;

/// One adapter per snapshot record, sampled together on every tick.
pub struct AdapterSet {
    cpu: MetricSourceAdapter<CpuReading>,
    memory: MetricSourceAdapter<MemoryReading>,
    gpu: MetricSourceAdapter<GpuReading>,
    screen: MetricSourceAdapter<ScreenReading>,
    browser: MetricSourceAdapter<BrowserReading>,
    network: MetricSourceAdapter<NetworkReading>,
    host: MetricSourceAdapter<HostReading>,
}

impl AdapterSet {
    pub fn platform_default(network: &NetworkConfig) -> Self {
        AdapterSet {
            cpu: MetricSourceAdapter::new(CpuSource::new()),
            memory: MetricSourceAdapter::new(MemorySource::new()),
            gpu: MetricSourceAdapter::new(GpuSource),
            screen: MetricSourceAdapter::new(DisplaySource),
            browser: MetricSourceAdapter::new(RuntimeSource::default()),
            network: MetricSourceAdapter::new(NetworkSource::new(
                network.rtt_probe.clone(),
                Duration::from_millis(network.rtt_timeout_ms),
            )),
            host: MetricSourceAdapter::new(HostSource::default()),
        }
    }

    /// Every record served from fixed readings; swap the CPU or GPU source
    /// with `with_cpu` / `with_gpu`.
    pub fn from_static(readings: Readings) -> Self {
        AdapterSet {
            cpu: MetricSourceAdapter::new(StaticSource::new("cpu", readings.cpu)),
            memory: MetricSourceAdapter::new(StaticSource::new("memory", readings.memory)),
            gpu: MetricSourceAdapter::new(StaticSource::new("gpu", readings.gpu)),
            screen: MetricSourceAdapter::new(StaticSource::new("display", readings.screen)),
            browser: MetricSourceAdapter::new(StaticSource::new("runtime", readings.browser)),
            network: MetricSourceAdapter::new(StaticSource::new("network", readings.network)),
            host: MetricSourceAdapter::new(StaticSource::new("host", readings.host)),
        }
    }

    pub fn with_cpu(mut self, source: impl MetricSource<Reading = CpuReading> + 'static) -> Self {
        self.cpu = MetricSourceAdapter::new(source);
        self
    }

    pub fn with_gpu(mut self, source: impl MetricSource<Reading = GpuReading> + 'static) -> Self {
        self.gpu = MetricSourceAdapter::new(source);
        self
    }

    /// Sample all adapters concurrently. Never fails: unreadable sources
    /// contribute their fallback.
    pub async fn sample_all(&self) -> Readings {
        let (cpu, memory, gpu, screen, browser, network, host) = tokio::join!(
            self.cpu.sample(),
            self.memory.sample(),
            self.gpu.sample(),
            self.screen.sample(),
            self.browser.sample(),
            self.network.sample(),
            self.host.sample(),
        );

        let unsupported: Vec<&str> = [
            (self.cpu.name(), cpu.is_supported()),
            (self.memory.name(), memory.is_supported()),
            (self.gpu.name(), gpu.is_supported()),
            (self.screen.name(), screen.is_supported()),
            (self.browser.name(), browser.is_supported()),
            (self.network.name(), network.is_supported()),
            (self.host.name(), host.is_supported()),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect();
        if !unsupported.is_empty() {
            debug!(sources = ?unsupported, "sampled with fallbacks");
        }

        Readings {
            cpu: cpu.into_value(),
            memory: memory.into_value(),
            gpu: gpu.into_value(),
            screen: screen.into_value(),
            browser: browser.into_value(),
            network: network.into_value(),
            host: host.into_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::ProbeError;
    use crate::system::snapshot::tests::sample_readings;

    struct NoGpu;

    #[async_trait]
    impl MetricSource for NoGpu {
        type Reading = GpuReading;

        fn name(&self) -> &'static str {
            "gpu"
        }

        async fn probe(&self) -> Result<GpuReading, ProbeError> {
            Err(ProbeError::Unsupported("gpu"))
        }

        fn fallback(&self) -> GpuReading {
            GpuReading {
                vendor: "Unknown".into(),
                renderer: "Unknown".into(),
                memory: 0,
            }
        }
    }

    #[tokio::test]
    async fn static_set_reproduces_readings() {
        let readings = sample_readings(8);
        let set = AdapterSet::from_static(readings.clone());
        assert_eq!(set.sample_all().await, readings);
    }

    #[tokio::test]
    async fn one_failing_source_does_not_block_the_rest() {
        let readings = sample_readings(8);
        let set = AdapterSet::from_static(readings.clone()).with_gpu(NoGpu);
        let sampled = set.sample_all().await;
        assert_eq!(sampled.gpu.vendor, "Unknown");
        assert_eq!(sampled.cpu, readings.cpu);
        assert_eq!(sampled.memory, readings.memory);
    }
}
