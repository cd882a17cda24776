use std::time::{Duration, Instant};

use async_trait::async_trait;
use sysinfo::Networks;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::ProbeError;
use crate::system::platform;
use crate::system::snapshot::{EffectiveType, NetworkReading};
use crate::system::source::MetricSource;

pub struct NetworkSource {
    rtt_probe: Option<String>,
    rtt_timeout: Duration,
}

impl NetworkSource {
    pub fn new(rtt_probe: Option<String>, rtt_timeout: Duration) -> Self {
        NetworkSource {
            rtt_probe,
            rtt_timeout,
        }
    }

    /// TCP connect time to the configured probe address, in milliseconds.
    async fn measure_rtt(&self) -> Option<f64> {
        let addr = self.rtt_probe.as_deref()?;
        let started = Instant::now();
        match tokio::time::timeout(self.rtt_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => Some(started.elapsed().as_secs_f64() * 1000.0),
            Ok(Err(err)) => {
                debug!(addr, error = %err, "rtt probe failed");
                None
            }
            Err(_) => {
                debug!(addr, "rtt probe timed out");
                None
            }
        }
    }
}

fn any_interface_online(networks: &Networks) -> bool {
    networks.list().iter().any(|(name, data)| {
        name != "lo" && data.ip_networks().iter().any(|ip| !ip.addr.is_loopback())
    })
}

#[async_trait]
impl MetricSource for NetworkSource {
    type Reading = NetworkReading;

    fn name(&self) -> &'static str {
        "network"
    }

    async fn probe(&self) -> Result<NetworkReading, ProbeError> {
        let online = {
            let networks = Networks::new_with_refreshed_list();
            if networks.list().is_empty() {
                return Err(ProbeError::Unsupported("network interfaces"));
            }
            any_interface_online(&networks)
        };

        let downlink = if online {
            platform::link_speed_mbps().unwrap_or(0.0)
        } else {
            0.0
        };
        let rtt = if online {
            self.measure_rtt().await.unwrap_or(0.0)
        } else {
            0.0
        };

        Ok(NetworkReading {
            effective_type: EffectiveType::from_link(downlink, rtt),
            downlink,
            rtt,
            online,
        })
    }

    fn fallback(&self) -> NetworkReading {
        NetworkReading {
            effective_type: EffectiveType::Unknown,
            downlink: 0.0,
            rtt: 0.0,
            online: false,
        }
    }
}
