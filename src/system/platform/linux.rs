use std::fs;
use std::path::{Path, PathBuf};

use super::{DisplayInfo, GpuInfo, PlatformExtensions, parse_mode, pci_vendor_name};

pub struct Platform;

const DRM_ROOT: &str = "/sys/class/drm";
const NET_ROOT: &str = "/sys/class/net";

impl PlatformExtensions for Platform {
    fn gpu_info() -> Option<GpuInfo> {
        // Primary card nodes are "cardN"; connectors are "cardN-<connector>".
        let card = sorted_entries(Path::new(DRM_ROOT))
            .into_iter()
            .find(|p| file_name(p).is_some_and(|n| n.starts_with("card") && !n.contains('-')))?;
        let device = card.join("device");

        let vendor_id = read_trimmed(&device.join("vendor"))?;
        let device_id = read_trimmed(&device.join("device")).unwrap_or_default();
        let vendor = pci_vendor_name(&vendor_id)
            .map(str::to_string)
            .unwrap_or(vendor_id);

        let driver = fs::read_to_string(device.join("uevent"))
            .ok()
            .and_then(|uevent| {
                uevent
                    .lines()
                    .find_map(|l| l.strip_prefix("DRIVER=").map(str::to_string))
            });
        let renderer = match driver {
            Some(driver) => format!("{vendor} [{device_id}] ({driver})"),
            None => format!("{vendor} [{device_id}]"),
        };

        // Only amdgpu exposes VRAM size through sysfs.
        let memory_bytes = read_trimmed(&device.join("mem_info_vram_total"))
            .and_then(|v| v.parse().ok());

        Some(GpuInfo {
            vendor,
            renderer,
            memory_bytes,
        })
    }

    fn display_info() -> Option<DisplayInfo> {
        for connector in sorted_entries(Path::new(DRM_ROOT)) {
            let Some(name) = file_name(&connector) else {
                continue;
            };
            if !name.contains('-') {
                continue;
            }
            if read_trimmed(&connector.join("status")).as_deref() != Some("connected") {
                continue;
            }
            let Ok(modes) = fs::read_to_string(connector.join("modes")) else {
                continue;
            };
            // The preferred mode is listed first.
            if let Some((width, height)) = modes.lines().next().and_then(parse_mode) {
                return Some(DisplayInfo {
                    width,
                    height,
                    color_depth: None,
                    refresh_rate: None,
                });
            }
        }
        None
    }

    fn link_speed_mbps() -> Option<f64> {
        sorted_entries(Path::new(NET_ROOT))
            .into_iter()
            .filter(|iface| file_name(iface) != Some("lo"))
            .filter(|iface| read_trimmed(&iface.join("operstate")).as_deref() == Some("up"))
            .filter_map(|iface| read_trimmed(&iface.join("speed"))?.parse::<f64>().ok())
            // Virtual interfaces report -1.
            .filter(|speed| *speed > 0.0)
            .reduce(f64::max)
    }
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    };
    entries.sort();
    entries
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}
