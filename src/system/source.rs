use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::debug;

use crate::error::ProbeError;

/// A single platform probe. Implementations only query the environment.
#[async_trait]
pub trait MetricSource: Send + Sync {
    type Reading: Clone + Send + 'static;

    fn name(&self) -> &'static str;

    async fn probe(&self) -> Result<Self::Reading, ProbeError>;

    /// Value substituted whenever `probe` fails.
    fn fallback(&self) -> Self::Reading;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Capability<T> {
    Supported(T),
    Unsupported(T),
}

impl<T> Capability<T> {
    pub fn into_value(self) -> T {
        match self {
            Capability::Supported(v) | Capability::Unsupported(v) => v,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported(_))
    }
}

/// Source that always reports the same reading.
pub struct StaticSource<R> {
    name: &'static str,
    reading: R,
}

impl<R> StaticSource<R> {
    pub fn new(name: &'static str, reading: R) -> Self {
        StaticSource { name, reading }
    }
}

#[async_trait]
impl<R: Clone + Send + Sync + 'static> MetricSource for StaticSource<R> {
    type Reading = R;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn probe(&self) -> Result<R, ProbeError> {
        Ok(self.reading.clone())
    }

    fn fallback(&self) -> R {
        self.reading.clone()
    }
}

pub struct MetricSourceAdapter<R> {
    source: Box<dyn MetricSource<Reading = R>>,
}

impl<R: Clone + Send + 'static> MetricSourceAdapter<R> {
    pub fn new(source: impl MetricSource<Reading = R> + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn name(&self) -> &'static str {
        self.source.name()
    }

    /// Sample the wrapped source. Errors and panics both resolve to the
    /// source's fallback.
    pub async fn sample(&self) -> Capability<R> {
        let outcome = AssertUnwindSafe(self.source.probe()).catch_unwind().await;
        let err = match outcome {
            Ok(Ok(reading)) => return Capability::Supported(reading),
            Ok(Err(err)) => err,
            Err(_) => ProbeError::Panicked,
        };
        debug!(source = self.source.name(), error = %err, "adapter fallback");
        Capability::Unsupported(self.source.fallback())
    }
}
