#[derive(Clone, Debug, PartialEq)]
pub struct GpuInfo {
    pub vendor: String,
    pub renderer: String,
    pub memory_bytes: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayInfo {
    pub width: u32,
    pub height: u32,
    pub color_depth: Option<u32>,
    pub refresh_rate: Option<u32>,
}

pub trait PlatformExtensions {
    fn gpu_info() -> Option<GpuInfo>;
    fn display_info() -> Option<DisplayInfo>;
    fn link_speed_mbps() -> Option<f64>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn gpu_info() -> Option<GpuInfo> {
    platform_impl::Platform::gpu_info()
}

pub fn display_info() -> Option<DisplayInfo> {
    platform_impl::Platform::display_info()
}

pub fn link_speed_mbps() -> Option<f64> {
    platform_impl::Platform::link_speed_mbps()
}

/// Map a PCI vendor id ("0x10de" or "10de") to a vendor name.
pub fn pci_vendor_name(id: &str) -> Option<&'static str> {
    let id = id.trim();
    let hex = id
        .strip_prefix("0x")
        .or_else(|| id.strip_prefix("0X"))
        .unwrap_or(id);
    match u16::from_str_radix(hex, 16).ok()? {
        0x10de => Some("NVIDIA"),
        0x1002 | 0x1022 => Some("AMD"),
        0x8086 => Some("Intel"),
        0x106b => Some("Apple"),
        0x15ad => Some("VMware"),
        0x1af4 => Some("Red Hat VirtIO"),
        0x1414 => Some("Microsoft"),
        _ => None,
    }
}

/// Parse a DRM mode line such as "1920x1080" or "2560x1440i".
pub fn parse_mode(line: &str) -> Option<(u32, u32)> {
    let (w, h) = line.trim().split_once('x')?;
    let h: String = h.chars().take_while(|c| c.is_ascii_digit()).collect();
    let width = w.parse().ok()?;
    let height = h.parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}
