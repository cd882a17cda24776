use async_trait::async_trait;

use super::{EnvLookup, process_env};
use crate::error::ProbeError;
use crate::format::UNKNOWN;
use crate::system::snapshot::BrowserReading;
use crate::system::source::MetricSource;

/// Identifies the terminal emulator the dashboard is presented through.
pub struct RuntimeSource {
    env: EnvLookup,
}

impl Default for RuntimeSource {
    fn default() -> Self {
        Self::new(process_env())
    }
}

impl RuntimeSource {
    pub fn new(env: EnvLookup) -> Self {
        RuntimeSource { env }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.env)(key)
    }

    fn detect_name(&self) -> Option<String> {
        if let Some(program) = self.get("TERM_PROGRAM") {
            let name = match program.as_str() {
                "iTerm.app" => "iTerm2",
                "Apple_Terminal" => "Terminal",
                "vscode" => "VS Code",
                "WezTerm" => "WezTerm",
                "ghostty" => "Ghostty",
                other => return Some(other.to_string()),
            };
            return Some(name.to_string());
        }
        let markers = [
            ("WT_SESSION", "Windows Terminal"),
            ("KITTY_WINDOW_ID", "kitty"),
            ("ALACRITTY_SOCKET", "Alacritty"),
            ("ALACRITTY_LOG", "Alacritty"),
            ("WEZTERM_EXECUTABLE", "WezTerm"),
            ("KONSOLE_VERSION", "Konsole"),
            ("VTE_VERSION", "VTE"),
        ];
        markers
            .iter()
            .find(|(key, _)| self.get(key).is_some())
            .map(|(_, name)| name.to_string())
    }

    fn detect_version(&self, name: &str) -> Option<String> {
        self.get("TERM_PROGRAM_VERSION").or_else(|| match name {
            "Konsole" => self.get("KONSOLE_VERSION"),
            "VTE" => self.get("VTE_VERSION"),
            _ => None,
        })
    }
}

#[async_trait]
impl MetricSource for RuntimeSource {
    type Reading = BrowserReading;

    fn name(&self) -> &'static str {
        "runtime"
    }

    async fn probe(&self) -> Result<BrowserReading, ProbeError> {
        let term = self.get("TERM");
        let name = self.detect_name();
        if term.is_none() && name.is_none() {
            return Err(ProbeError::Unsupported("terminal identification"));
        }

        let name = name.unwrap_or_else(|| UNKNOWN.to_string());
        let version = self
            .detect_version(&name)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let engine = term.unwrap_or_else(|| UNKNOWN.to_string());
        let colorterm = self.get("COLORTERM");
        let truecolor = colorterm
            .as_deref()
            .map(|c| {
                let c = c.to_lowercase();
                c.contains("truecolor") || c.contains("24bit")
            })
            .unwrap_or(false);
        let user_agent = format!(
            "{name}/{version} ({engine}; {})",
            colorterm.as_deref().unwrap_or("no-colorterm")
        );

        Ok(BrowserReading {
            name,
            version,
            engine,
            user_agent,
            truecolor,
        })
    }

    fn fallback(&self) -> BrowserReading {
        BrowserReading {
            name: UNKNOWN.to_string(),
            version: UNKNOWN.to_string(),
            engine: UNKNOWN.to_string(),
            user_agent: UNKNOWN.to_string(),
            truecolor: false,
        }
    }
}
