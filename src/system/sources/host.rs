use async_trait::async_trait;
use sysinfo::System;

use super::{EnvLookup, process_env};
use crate::error::ProbeError;
use crate::system::snapshot::HostReading;
use crate::system::source::MetricSource;

pub const FALLBACK_LANGUAGE: &str = "en-US";
pub const FALLBACK_HOSTNAME: &str = "localhost";

pub struct HostSource {
    env: EnvLookup,
}

impl Default for HostSource {
    fn default() -> Self {
        Self::new(process_env())
    }
}

impl HostSource {
    pub fn new(env: EnvLookup) -> Self {
        HostSource { env }
    }

    fn language(&self) -> Option<String> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .find_map(|key| (self.env)(key))
            .and_then(|raw| normalize_locale(&raw))
    }
}

/// "en_US.UTF-8" -> "en-US". POSIX placeholders yield `None`.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let tag = raw.split(['.', '@']).next()?.trim();
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag.replace('_', "-"))
}

#[async_trait]
impl MetricSource for HostSource {
    type Reading = HostReading;

    fn name(&self) -> &'static str {
        "host"
    }

    async fn probe(&self) -> Result<HostReading, ProbeError> {
        let platform = System::long_os_version()
            .or_else(System::name)
            .ok_or(ProbeError::Unsupported("os version"))?;
        Ok(HostReading {
            platform,
            language: self
                .language()
                .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string()),
            hostname: System::host_name().unwrap_or_else(|| FALLBACK_HOSTNAME.to_string()),
        })
    }

    fn fallback(&self) -> HostReading {
        HostReading {
            platform: std::env::consts::OS.to_string(),
            language: self
                .language()
                .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string()),
            hostname: FALLBACK_HOSTNAME.to_string(),
        }
    }
}
