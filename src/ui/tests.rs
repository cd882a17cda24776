use std::sync::Arc;
use std::time::Instant;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::app::App;
use crate::i18n::{Locale, Notice};
use crate::system::snapshot::Snapshot;
use crate::system::snapshot::tests::{sample_readings, sample_system};
use crate::ui::theme::Theme;
use crate::ui::{panels, statusbar};

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn make_snapshot(cores: usize) -> Arc<Snapshot> {
    Arc::new(
        Snapshot::assemble(
            sample_readings(cores),
            1,
            sample_system(1_700_000_000_000),
            None,
        )
        .unwrap(),
    )
}

fn make_app() -> App {
    let mut app = App::new(Locale::En, Theme::dashboard());
    app.on_snapshot(make_snapshot(8));
    app
}

#[test]
fn loading_screen_before_first_snapshot() {
    let app = App::new(Locale::En, Theme::dashboard());
    let output = render_to_string(80, 12, |frame| crate::ui::draw(frame, &app));
    assert!(output.contains("INITIALIZING DIAGNOSTIC PROTOCOLS..."));
    assert!(output.contains("SCANNING HARDWARE SUBSYSTEMS"));
}

#[test]
fn dashboard_shows_header_and_panels() {
    let app = make_app();
    let output = render_to_string(180, 40, |frame| crate::ui::draw(frame, &app));
    assert!(output.contains("ENGINEERING WORKSTATION DIAGNOSTICS"));
    assert!(output.contains("SESSION: K3J2H1G0F9D8S"));
    assert!(output.contains("2560x1440@144Hz"));
    assert!(output.contains("8C/16T @ 3.2GHz"));
    assert!(output.contains("HARDWARE CONFIGURATION"));
    assert!(output.contains("TELEMETRY ANALYSIS"));
    assert!(output.contains("NETWORK DIAGNOSTICS"));
}

#[test]
fn hardware_panel_derives_memory_figures() {
    let snapshot = make_snapshot(4);
    let output = render_to_string(70, 26, |frame| {
        panels::render_hardware(frame, Rect::new(0, 0, 70, 26), &snapshot, &Theme::dashboard());
    });
    assert!(output.contains("Active: 4.0GB | Available: 12.0GB | Pressure: 25.0%"));
    assert!(output.contains("Temperature: 48.0°C | Utilization: 25.0%"));
    assert!(output.contains("NVIDIA 10GB VRAM"));
    assert!(output.contains("TERMINAL: WezTerm v20240203"));
}

#[test]
fn long_renderer_is_truncated() {
    let mut snapshot = (*make_snapshot(4)).clone();
    snapshot.gpu.renderer = "ANGLE (NVIDIA, NVIDIA GeForce RTX 3080 Direct3D11 vs_5_0 ps_5_0)".into();
    let output = render_to_string(70, 26, |frame| {
        panels::render_hardware(frame, Rect::new(0, 0, 70, 26), &snapshot, &Theme::dashboard());
    });
    assert!(output.contains("ANGLE (NVIDIA, NVIDIA GeForce RTX 3080 Direc\u{2026}"));
    assert!(!output.contains("vs_5_0"));
}

#[test]
fn telemetry_panel_lists_every_core() {
    let snapshot = make_snapshot(8);
    let output = render_to_string(60, 20, |frame| {
        panels::render_telemetry(frame, Rect::new(0, 0, 60, 20), &snapshot, &Theme::dashboard());
    });
    assert!(output.contains("ACTIVE MEMORY 25.0%"));
    for core in 0..8 {
        assert!(output.contains(&format!("CORE-{core:02}")));
    }
    assert!(output.contains(" 80.0%"));
}

#[test]
fn network_panel_grades_connection() {
    let snapshot = make_snapshot(4);
    let output = render_to_string(60, 20, |frame| {
        panels::render_network(frame, Rect::new(0, 0, 60, 20), &snapshot, &Theme::dashboard());
    });
    assert!(output.contains("CONNECTION TYPE: 4G"));
    assert!(output.contains("SIGNAL QUALITY: EXCELLENT"));
    assert!(output.contains("ONLINE STATUS: CONNECTED"));
    assert!(output.contains("DOWNLINK CAPACITY: 1000 Mbps"));
    assert!(output.contains("LATENCY STATUS: EXCELLENT"));
}

#[test]
fn statusbar_shows_capturing_latch() {
    let output = render_to_string(100, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 100, 1),
            Locale::En,
            None,
            true,
            &Theme::dashboard(),
        );
    });
    assert!(output.contains("CAPTURING..."));
    assert!(output.contains("PDF Report"));
}

#[test]
fn statusbar_notice_is_localized() {
    let notice = (Notice::ReportFailed, Instant::now());
    let output = render_to_string(60, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 60, 1),
            Locale::Ko,
            Some(&notice),
            false,
            &Theme::dashboard(),
        );
    });
    assert!(output.contains("PDF"));
    assert!(output.contains('리'));
}
