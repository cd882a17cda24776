use super::{DisplayInfo, GpuInfo, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn gpu_info() -> Option<GpuInfo> {
        // IOKit queries are not wired up; the adapter falls back.
        None
    }

    fn display_info() -> Option<DisplayInfo> {
        None
    }

    fn link_speed_mbps() -> Option<f64> {
        None
    }
}
