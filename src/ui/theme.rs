use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub accent: Color,
    pub background: Color,
    pub surface_bg: Color,
    pub panel_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub status_ok: Color,
    pub status_warn: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub gauge_unfilled: Color,
    pub gauge_low: Color,
    pub gauge_mid: Color,
    pub gauge_high: Color,
}

impl Theme {
    /// Honors `NO_COLOR`; otherwise the cyan-on-slate dashboard palette.
    pub fn detect() -> Self {
        match std::env::var_os("NO_COLOR") {
            Some(v) if !v.is_empty() => Self::mono(),
            _ => Self::dashboard(),
        }
    }

    pub fn dashboard() -> Self {
        Theme {
            name: "dashboard",
            accent: Color::Rgb(34, 211, 238),      // #22d3ee
            background: Color::Rgb(17, 24, 39),    // #111827
            surface_bg: Color::Rgb(31, 41, 55),    // #1f2937
            panel_border: Color::Rgb(34, 211, 238),
            text_primary: Color::Rgb(255, 255, 255),
            text_secondary: Color::Rgb(156, 163, 175), // #9ca3af
            text_muted: Color::Rgb(107, 114, 128),    // #6b7280
            status_ok: Color::Rgb(74, 222, 128),      // #4ade80
            status_warn: Color::Rgb(250, 204, 21),    // #facc15
            status_err: Color::Rgb(248, 113, 113),    // #f87171
            statusbar_bg: Color::Rgb(31, 41, 55),
            pill_key_bg: Color::Rgb(34, 211, 238),
            pill_key_fg: Color::Rgb(17, 24, 39),
            pill_desc_fg: Color::Rgb(229, 231, 235),
            gauge_unfilled: Color::Rgb(55, 65, 81), // #374151
            gauge_low: Color::Rgb(34, 211, 238),
            gauge_mid: Color::Rgb(250, 204, 21),
            gauge_high: Color::Rgb(248, 113, 113),
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            accent: Color::White,
            background: Color::Reset,
            surface_bg: Color::Reset,
            panel_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            status_ok: Color::White,
            status_warn: Color::White,
            status_err: Color::White,
            statusbar_bg: Color::Reset,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::Gray,
            gauge_unfilled: Color::DarkGray,
            gauge_low: Color::White,
            gauge_mid: Color::White,
            gauge_high: Color::White,
        }
    }

    /// Load color for a 0-100 percentage: above 80 is high, above 60 mid.
    pub fn load_color(&self, percent: f64) -> Color {
        if percent > 80.0 {
            self.gauge_high
        } else if percent > 60.0 {
            self.gauge_mid
        } else {
            self.gauge_low
        }
    }
}
