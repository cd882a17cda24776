#![allow(dead_code)]

use std::sync::Arc;

use wsdiag::system::collector::AdapterSet;
use wsdiag::system::engine::{EngineSettings, SamplingEngine};
use wsdiag::system::snapshot::{
    BrowserReading, CpuReading, EffectiveType, GpuReading, HostReading, MemoryReading,
    NetworkReading, Readings, ScreenReading, Snapshot,
};

pub fn readings(cores: usize) -> Readings {
    Readings {
        cpu: CpuReading {
            cores,
            usage: (0..cores).map(|i| (i as f64 * 12.5) % 100.0).collect(),
            temperature: 52.0,
            frequency: 3.6,
        },
        memory: MemoryReading {
            total: 16.0,
            used: 4.0,
        },
        gpu: GpuReading {
            vendor: "AMD".to_string(),
            renderer: "AMD Radeon RX 7900 XTX".to_string(),
            memory: 24,
        },
        screen: ScreenReading {
            width: 1920,
            height: 1080,
            color_depth: 24,
            refresh_rate: 60,
        },
        browser: BrowserReading {
            name: "Ghostty".to_string(),
            version: "1.1.0".to_string(),
            engine: "xterm-ghostty".to_string(),
            user_agent: "Ghostty/1.1.0 (xterm-ghostty; truecolor)".to_string(),
            truecolor: true,
        },
        network: NetworkReading {
            effective_type: EffectiveType::FourG,
            downlink: 940.0,
            rtt: 18.0,
            online: true,
        },
        host: HostReading {
            platform: "TestOS".to_string(),
            language: "en-US".to_string(),
            hostname: "rig-7".to_string(),
        },
    }
}

pub fn engine(cores: usize) -> SamplingEngine {
    SamplingEngine::new(
        AdapterSet::from_static(readings(cores)),
        EngineSettings::default(),
    )
}

pub async fn committed(engine: &SamplingEngine) -> Arc<Snapshot> {
    engine.tick().await.expect("tick commits")
}
