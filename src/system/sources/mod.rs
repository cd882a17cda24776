pub mod cpu;
pub mod display;
pub mod gpu;
pub mod host;
pub mod memory;
pub mod network;
pub mod runtime;

use std::sync::Arc;

pub use cpu::CpuSource;
pub use display::DisplaySource;
pub use gpu::GpuSource;
pub use host::HostSource;
pub use memory::MemorySource;
pub use network::NetworkSource;
pub use runtime::RuntimeSource;

/// Environment variable lookup, injectable so sources can be tested
/// against a stub environment.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub fn process_env() -> EnvLookup {
    Arc::new(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

#[cfg(test)]
pub(crate) fn stub_env(pairs: &[(&str, &str)]) -> EnvLookup {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Arc::new(move |key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
}
