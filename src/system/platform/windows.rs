use super::{DisplayInfo, GpuInfo, PlatformExtensions};

pub struct Platform;

#[cfg(target_os = "windows")]
use windows_sys::Win32::{
    Graphics::Gdi::{BITSPIXEL, GetDC, GetDeviceCaps, ReleaseDC, VREFRESH},
    UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN},
};

impl PlatformExtensions for Platform {
    fn gpu_info() -> Option<GpuInfo> {
        // DXGI enumeration is not wired up; the adapter falls back.
        None
    }

    #[cfg(target_os = "windows")]
    fn display_info() -> Option<DisplayInfo> {
        unsafe {
            let width = GetSystemMetrics(SM_CXSCREEN);
            let height = GetSystemMetrics(SM_CYSCREEN);
            if width <= 0 || height <= 0 {
                return None;
            }
            let hdc = GetDC(std::ptr::null_mut());
            let (color_depth, refresh_rate) = if hdc.is_null() {
                (None, None)
            } else {
                let depth = GetDeviceCaps(hdc, BITSPIXEL as _);
                let refresh = GetDeviceCaps(hdc, VREFRESH as _);
                ReleaseDC(std::ptr::null_mut(), hdc);
                // A refresh of 0 or 1 means "hardware default".
                (
                    (depth > 0).then_some(depth as u32),
                    (refresh > 1).then_some(refresh as u32),
                )
            };
            Some(DisplayInfo {
                width: width as u32,
                height: height as u32,
                color_depth,
                refresh_rate,
            })
        }
    }

    #[cfg(not(target_os = "windows"))]
    fn display_info() -> Option<DisplayInfo> {
        None
    }

    fn link_speed_mbps() -> Option<f64> {
        None
    }
}
