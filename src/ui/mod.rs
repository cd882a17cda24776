pub mod header;
pub mod panels;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::app::App;
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let Some(snapshot) = app.snapshot.as_deref() else {
        draw_loading(frame, area, &app.theme);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(frame, chunks[0], snapshot, app.clock, &app.theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);
    panels::render_hardware(frame, columns[0], snapshot, &app.theme);
    panels::render_telemetry(frame, columns[1], snapshot, &app.theme);
    panels::render_network(frame, columns[2], snapshot, &app.theme);

    statusbar::render(
        frame,
        chunks[2],
        app.locale,
        app.status_message.as_ref(),
        app.capturing,
        &app.theme,
    );
}

fn draw_loading(frame: &mut Frame, area: Rect, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .split(area);
    let lines = vec![
        Line::styled(
            "INITIALIZING DIAGNOSTIC PROTOCOLS...",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            "SCANNING HARDWARE SUBSYSTEMS",
            Style::default().fg(theme.text_secondary),
        ),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rows[1]);
}

#[cfg(test)]
mod tests;
