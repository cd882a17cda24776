use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub export: ExportConfig,
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub sample_interval_ms: u64,
    pub clock_interval_ms: u64,
    pub locale: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            sample_interval_ms: 2000,
            clock_interval_ms: 1000,
            locale: "en".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where captured images and reports are saved. Defaults to the user's
    /// download directory.
    pub directory: Option<PathBuf>,
    pub image_scale: u32,
    pub report_wrap_columns: usize,
    /// External command that receives the shared summary on stdin.
    pub share_command: Option<String>,
    pub clipboard: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            directory: None,
            image_scale: 2,
            report_wrap_columns: 90,
            share_command: None,
            clipboard: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// `host:port` used to time a TCP connect for the rtt figure.
    pub rtt_probe: Option<String>,
    pub rtt_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            rtt_probe: None,
            rtt_timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: None,
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("wsdiag")
                .join("wsdiag.log")
        })
    }
}

impl Config {
    /// Replace out-of-range values with their defaults.
    pub fn sanitize(&mut self) {
        let general = GeneralConfig::default();
        if self.general.sample_interval_ms == 0 {
            self.general.sample_interval_ms = general.sample_interval_ms;
        }
        if self.general.clock_interval_ms == 0 {
            self.general.clock_interval_ms = general.clock_interval_ms;
        }
        let export = ExportConfig::default();
        if !(1..=8).contains(&self.export.image_scale) {
            self.export.image_scale = export.image_scale;
        }
        if self.export.report_wrap_columns < 20 {
            self.export.report_wrap_columns = export.report_wrap_columns;
        }
        if self.network.rtt_timeout_ms == 0 {
            self.network.rtt_timeout_ms = NetworkConfig::default().rtt_timeout_ms;
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wsdiag").join("config.toml"))
}

/// A resolved config plus the reason defaults were used, if any. Loading
/// happens before logging is installed, so the caller reports `warning`.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub warning: Option<ConfigError>,
}

pub fn load_config() -> LoadedConfig {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => LoadedConfig::default(),
    }
}

/// A missing file is not an error; an unreadable or invalid one falls back
/// to defaults and is reported in `warning`.
pub fn load_config_from_path(path: &Path) -> LoadedConfig {
    let (mut config, warning) = match read_config(path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    config.sanitize();
    LoadedConfig { config, warning }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.sample_interval_ms, 2000);
        assert_eq!(config.general.clock_interval_ms, 1000);
        assert_eq!(config.general.locale, "en");
        assert_eq!(config.export.image_scale, 2);
        assert_eq!(config.export.report_wrap_columns, 90);
        assert!(config.export.clipboard);
        assert!(config.export.share_command.is_none());
        assert_eq!(config.network.rtt_timeout_ms, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
sample_interval_ms = 500
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.sample_interval_ms, 500);
        // Other fields should be defaults
        assert_eq!(config.general.clock_interval_ms, 1000);
        assert_eq!(config.export.report_wrap_columns, 90);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
sample_interval_ms = 1000
clock_interval_ms = 250
locale = "ko"

[export]
directory = "/tmp/wsdiag"
image_scale = 3
share_command = "wl-copy"
clipboard = false

[network]
rtt_probe = "1.1.1.1:443"
rtt_timeout_ms = 300

[logging]
level = "debug"
json = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.clock_interval_ms, 250);
        assert_eq!(config.general.locale, "ko");
        assert_eq!(config.export.directory, Some(PathBuf::from("/tmp/wsdiag")));
        assert_eq!(config.export.image_scale, 3);
        assert_eq!(config.export.share_command.as_deref(), Some("wl-copy"));
        assert!(!config.export.clipboard);
        assert_eq!(config.network.rtt_probe.as_deref(), Some("1.1.1.1:443"));
        assert_eq!(config.network.rtt_timeout_ms, 300);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn sanitize_restores_zero_intervals() {
        let mut config: Config = toml::from_str(
            r#"
[general]
sample_interval_ms = 0
[export]
image_scale = 40
report_wrap_columns = 3
"#,
        )
        .unwrap();
        config.sanitize();
        assert_eq!(config.general.sample_interval_ms, 2000);
        assert_eq!(config.export.image_scale, 2);
        assert_eq!(config.export.report_wrap_columns, 90);
    }

    #[test]
    fn missing_file_returns_default() {
        let loaded = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(loaded.config.general.sample_interval_ms, 2000);
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn invalid_toml_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not valid toml {{{{").unwrap();
        let loaded = load_config_from_path(&path);
        assert_eq!(loaded.config.general.sample_interval_ms, 2000);
        assert!(matches!(
            &loaded.warning,
            Some(ConfigError::Parse { path: reported, .. }) if *reported == path
        ));
    }

    #[test]
    fn valid_file_loads_without_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nsample_interval_ms = 750\n").unwrap();
        let loaded = load_config_from_path(&path);
        assert_eq!(loaded.config.general.sample_interval_ms, 750);
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn explicit_log_file_wins() {
        let logging = LoggingConfig {
            file: Some(PathBuf::from("/tmp/x.log")),
            ..LoggingConfig::default()
        };
        assert_eq!(logging.resolved_file(), PathBuf::from("/tmp/x.log"));
        assert!(
            LoggingConfig::default()
                .resolved_file()
                .ends_with("wsdiag/wsdiag.log")
        );
    }
}
