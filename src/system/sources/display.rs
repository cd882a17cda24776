use async_trait::async_trait;

use crate::error::ProbeError;
use crate::system::platform::{self, DisplayInfo};
use crate::system::snapshot::{DEFAULT_REFRESH_RATE, ScreenReading};
use crate::system::source::MetricSource;

pub const FALLBACK_WIDTH: u32 = 1920;
pub const FALLBACK_HEIGHT: u32 = 1080;
pub const FALLBACK_COLOR_DEPTH: u32 = 24;

pub struct DisplaySource;

impl DisplaySource {
    pub fn reading_from(info: DisplayInfo) -> ScreenReading {
        ScreenReading {
            width: info.width,
            height: info.height,
            color_depth: info.color_depth.unwrap_or(FALLBACK_COLOR_DEPTH),
            refresh_rate: info
                .refresh_rate
                .filter(|r| *r > 0)
                .unwrap_or(DEFAULT_REFRESH_RATE),
        }
    }
}

#[async_trait]
impl MetricSource for DisplaySource {
    type Reading = ScreenReading;

    fn name(&self) -> &'static str {
        "display"
    }

    async fn probe(&self) -> Result<ScreenReading, ProbeError> {
        platform::display_info()
            .map(Self::reading_from)
            .ok_or(ProbeError::Unsupported("display"))
    }

    fn fallback(&self) -> ScreenReading {
        ScreenReading {
            width: FALLBACK_WIDTH,
            height: FALLBACK_HEIGHT,
            color_depth: FALLBACK_COLOR_DEPTH,
            refresh_rate: DEFAULT_REFRESH_RATE,
        }
    }
}
