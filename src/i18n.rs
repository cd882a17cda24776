//! Operator-facing notices in English and Korean.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, TimeZone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    /// Accepts bare language codes and full tags ("ko", "ko-KR", "ko_KR.UTF-8").
    /// Anything unrecognized is English.
    pub fn parse(tag: &str) -> Locale {
        let lang = tag
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "ko" => Locale::Ko,
            _ => Locale::En,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Ko => "ko-KR",
        }
    }

    /// 24-hour date and time in the locale's conventional order.
    pub fn format_timestamp<Tz: TimeZone>(self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let pattern = match self {
            Locale::En => "%m/%d/%Y, %H:%M:%S",
            Locale::Ko => "%Y. %m. %d. %H:%M:%S",
        };
        at.format(pattern).to_string()
    }

    pub fn notice(self, notice: &Notice) -> String {
        match (self, notice) {
            (Locale::En, Notice::CaptureSaved(path)) => {
                format!("Capture saved to {}", path.display())
            }
            (Locale::Ko, Notice::CaptureSaved(path)) => {
                format!("스냅샷이 저장되었습니다: {}", path.display())
            }
            (Locale::En, Notice::CaptureFailed) => {
                "Snapshot capture failed. Check terminal permissions.".to_string()
            }
            (Locale::Ko, Notice::CaptureFailed) => {
                "스냅샷 생성에 실패했습니다. 터미널 설정을 확인해주세요.".to_string()
            }
            (Locale::En, Notice::ReportSaved(path)) => {
                format!("Report saved to {}", path.display())
            }
            (Locale::Ko, Notice::ReportSaved(path)) => {
                format!("리포트가 저장되었습니다: {}", path.display())
            }
            (Locale::En, Notice::ReportFailed) => "PDF report generation failed.".to_string(),
            (Locale::Ko, Notice::ReportFailed) => "PDF 리포트 생성에 실패했습니다.".to_string(),
            (Locale::En, Notice::Shared) => "System specs shared.".to_string(),
            (Locale::Ko, Notice::Shared) => "시스템 사양이 공유되었습니다.".to_string(),
            (Locale::En, Notice::Copied) => "System specs copied to clipboard!".to_string(),
            (Locale::Ko, Notice::Copied) => "시스템 사양이 클립보드에 복사되었습니다!".to_string(),
            (Locale::En, Notice::ShareFailed) => "Sharing failed.".to_string(),
            (Locale::Ko, Notice::ShareFailed) => "공유에 실패했습니다.".to_string(),
            (Locale::En, Notice::NoSnapshot) => "No telemetry sampled yet.".to_string(),
            (Locale::Ko, Notice::NoSnapshot) => "아직 수집된 데이터가 없습니다.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CaptureSaved(std::path::PathBuf),
    CaptureFailed,
    ReportSaved(std::path::PathBuf),
    ReportFailed,
    Shared,
    Copied,
    ShareFailed,
    NoSnapshot,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::CaptureFailed | Notice::ReportFailed | Notice::ShareFailed | Notice::NoSnapshot
        )
    }

    pub fn saved_path(&self) -> Option<&Path> {
        match self {
            Notice::CaptureSaved(path) | Notice::ReportSaved(path) => Some(path),
            _ => None,
        }
    }
}
