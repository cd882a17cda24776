use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::{format_gb, truncate_unicode};
use crate::system::snapshot::{EffectiveType, Snapshot};
use crate::ui::header::cpu_label;
use crate::ui::theme::Theme;

pub const RENDERER_WIDTH: usize = 45;

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.panel_border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
}

fn heading<'a>(text: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn value<'a>(text: String, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {text}"),
        Style::default()
            .fg(theme.text_primary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn detail<'a>(text: String, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(theme.text_secondary),
    ))
}

fn field<'a>(label: &'a str, text: String, color: Color, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {label}: "), Style::default().fg(theme.text_secondary)),
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

/// (label, signal bars out of 5)
pub fn connection_quality(effective_type: EffectiveType) -> (&'static str, usize) {
    match effective_type {
        EffectiveType::FourG => ("EXCELLENT", 5),
        EffectiveType::ThreeG => ("GOOD", 3),
        EffectiveType::TwoG => ("POOR", 1),
        EffectiveType::Unknown => ("UNKNOWN", 0),
    }
}

pub fn latency_status(rtt_ms: f64) -> &'static str {
    if rtt_ms < 50.0 {
        "EXCELLENT"
    } else if rtt_ms < 100.0 {
        "GOOD"
    } else if rtt_ms < 200.0 {
        "FAIR"
    } else {
        "POOR"
    }
}

/// Zero means the figure could not be measured.
fn or_na(v: f64, unit: &str) -> String {
    if v > 0.0 {
        format!("{v:.0} {unit}")
    } else {
        format!("N/A {unit}")
    }
}

/// Fixed-width bar of full blocks over light shade.
pub fn usage_bar(percent: f64, width: usize) -> (String, String) {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    (
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled),
    )
}

pub fn render_hardware(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let block = panel("HARDWARE CONFIGURATION", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cpu = &snapshot.cpu;
    let memory = &snapshot.memory;
    let screen = &snapshot.screen;
    let gpu = &snapshot.gpu;
    let browser = &snapshot.browser;
    let primary = theme.text_primary;

    let lines = vec![
        heading("CENTRAL PROCESSING UNIT", theme),
        value(cpu_label(snapshot), theme),
        detail(
            format!(
                "Temperature: {:.1}\u{00B0}C | Utilization: {:.1}%",
                cpu.temperature,
                cpu.average_usage()
            ),
            theme,
        ),
        Line::default(),
        heading("SYSTEM MEMORY MODULE", theme),
        value(format!("{}GB", format_gb(memory.total)), theme),
        detail(
            format!(
                "Active: {:.1}GB | Available: {:.1}GB | Pressure: {:.1}%",
                memory.used,
                memory.available(),
                memory.pressure() * 100.0
            ),
            theme,
        ),
        Line::default(),
        heading("DISPLAY SUBSYSTEM", theme),
        value(
            format!(
                "{}\u{00D7}{}@{}Hz",
                screen.width, screen.height, screen.refresh_rate
            ),
            theme,
        ),
        detail(
            format!(
                "Color Depth: {}-bit | Aspect Ratio: {:.2}:1",
                screen.color_depth,
                screen.aspect_ratio()
            ),
            theme,
        ),
        Line::default(),
        heading("GRAPHICS PROCESSING UNIT", theme),
        value(format!("{} {}GB VRAM", gpu.vendor, gpu.memory), theme),
        detail(truncate_unicode(&gpu.renderer, RENDERER_WIDTH), theme),
        Line::default(),
        heading("RUNTIME ENVIRONMENT", theme),
        field("ENGINE", browser.engine.clone(), primary, theme),
        field(
            "TERMINAL",
            format!("{} v{}", browser.name, browser.version),
            primary,
            theme,
        ),
        field("PLATFORM", snapshot.host.platform.clone(), primary, theme),
        field("LOCALE", snapshot.host.language.to_uppercase(), primary, theme),
        field(
            "UPTIME",
            format!("{}s", (snapshot.system.uptime_ms / 1000.0).floor() as u64),
            primary,
            theme,
        ),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_telemetry(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let block = panel("TELEMETRY ANALYSIS", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let memory = &snapshot.memory;
    let percent = memory.pressure() * 100.0;
    frame.render_widget(
        Paragraph::new(heading("MEMORY SUBSYSTEM STATUS", theme)),
        rows[0],
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(
                Style::default()
                    .fg(theme.load_color(percent))
                    .bg(theme.gauge_unfilled),
            )
            .ratio(memory.pressure().clamp(0.0, 1.0))
            .label(format!("ACTIVE MEMORY {percent:.1}%")),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(detail(
            format!(
                "USED: {:.1}GB   TOTAL: {}GB",
                memory.used,
                format_gb(memory.total)
            ),
            theme,
        )),
        rows[2],
    );

    let bar_width = (inner.width as usize).saturating_sub(18).clamp(4, 40);
    let mut cores = vec![heading("PROCESSOR CORE UTILIZATION", theme)];
    for (index, usage) in snapshot.cpu.usage.iter().enumerate() {
        let (filled, empty) = usage_bar(*usage, bar_width);
        cores.push(Line::from(vec![
            Span::styled(
                format!(" CORE-{index:02} "),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(filled, Style::default().fg(theme.load_color(*usage))),
            Span::styled(empty, Style::default().fg(theme.gauge_unfilled)),
            Span::styled(
                format!(" {usage:>5.1}%"),
                Style::default().fg(theme.text_primary),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(cores), rows[4]);
}

pub fn render_network(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let block = panel("NETWORK DIAGNOSTICS", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let network = &snapshot.network;
    let (quality, signal) = connection_quality(network.effective_type);
    let quality_color = match signal {
        5 => theme.status_ok,
        3 => theme.status_warn,
        1 => theme.status_err,
        _ => theme.text_secondary,
    };
    let primary = theme.text_primary;

    let bars: Vec<Span> = ['\u{2582}', '\u{2583}', '\u{2585}', '\u{2586}', '\u{2588}']
        .iter()
        .enumerate()
        .map(|(i, ch)| {
            let color = if i < signal {
                theme.accent
            } else {
                theme.gauge_unfilled
            };
            Span::styled(ch.to_string(), Style::default().fg(color))
        })
        .collect();
    let mut strength = vec![Span::styled(
        " SIGNAL STRENGTH: ",
        Style::default().fg(theme.text_secondary),
    )];
    strength.extend(bars);

    let online = if network.online {
        ("CONNECTED", theme.status_ok)
    } else {
        ("OFFLINE", theme.status_err)
    };

    let lines = vec![
        heading("NETWORK INTERFACE STATUS", theme),
        field(
            "CONNECTION TYPE",
            network.effective_type.as_str().to_uppercase(),
            primary,
            theme,
        ),
        field("SIGNAL QUALITY", quality.to_string(), quality_color, theme),
        Line::from(strength),
        field("ONLINE STATUS", online.0.to_string(), online.1, theme),
        Line::default(),
        heading("BANDWIDTH ANALYSIS", theme),
        field("DOWNLINK CAPACITY", or_na(network.downlink, "Mbps"), primary, theme),
        field("ROUND TRIP TIME", or_na(network.rtt, "ms"), primary, theme),
        field(
            "LATENCY STATUS",
            latency_status(network.rtt).to_string(),
            theme.accent,
            theme,
        ),
        Line::default(),
        heading("HOST", theme),
        field("HOSTNAME", snapshot.host.hostname.clone(), primary, theme),
        field(
            "TRUECOLOR",
            if snapshot.browser.truecolor { "YES" } else { "NO" }.to_string(),
            primary,
            theme,
        ),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
