use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::format_gb;
use crate::system::snapshot::Snapshot;
use crate::system::store::ClockTime;
use crate::ui::theme::Theme;

pub const APP_TITLE: &str = "ENGINEERING WORKSTATION DIAGNOSTICS";

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    clock: Option<ClockTime>,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(area);

    render_title(frame, rows[0], snapshot, clock, theme);
    render_strip(frame, rows[1], snapshot, theme);
}

fn render_title(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    clock: Option<ClockTime>,
    theme: &Theme,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(36)])
        .split(area);

    let left = vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "ADVANCED HARDWARE TELEMETRY SYSTEM v{}",
                env!("CARGO_PKG_VERSION")
            ),
            Style::default().fg(theme.text_secondary),
        )),
    ];
    frame.render_widget(Paragraph::new(left), cols[0]);

    let (time, date) = match clock {
        Some(c) => (c.time_label(), c.date_label()),
        None => ("--:--:--".to_string(), "--/--/----".to_string()),
    };
    let right = vec![
        Line::from(Span::styled(
            time,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(date, Style::default().fg(theme.text_secondary))),
        Line::from(Span::styled(
            format!("SESSION: {}", snapshot.system.session_id.as_str().to_uppercase()),
            Style::default().fg(theme.text_muted),
        )),
    ];
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), cols[1]);
}

fn render_strip(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.panel_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let value = Style::default().fg(theme.text_primary);
    let sep = Span::raw("   ");
    let line = Line::from(vec![
        Span::styled("\u{25CF} ", Style::default().fg(theme.status_ok)),
        Span::styled(
            "SYSTEM NOMINAL",
            Style::default()
                .fg(theme.status_ok)
                .add_modifier(Modifier::BOLD),
        ),
        sep.clone(),
        Span::styled(
            format!(
                "{}x{}@{}Hz",
                snapshot.screen.width, snapshot.screen.height, snapshot.screen.refresh_rate
            ),
            value,
        ),
        sep.clone(),
        Span::styled(cpu_label(snapshot), value),
        sep.clone(),
        Span::styled(format!("{}GB RAM", format_gb(snapshot.memory.total)), value),
        sep,
        Span::styled(
            snapshot.network.effective_type.as_str().to_uppercase(),
            value,
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// "8C/16T @ 3.2GHz"
pub fn cpu_label(snapshot: &Snapshot) -> String {
    format!(
        "{}C/{}T @ {:.1}GHz",
        snapshot.cpu.cores,
        snapshot.cpu.cores * 2,
        snapshot.cpu.frequency
    )
}
