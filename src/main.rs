use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;
use ratatui::Terminal;
use ratatui::backend::{Backend, TestBackend};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use wsdiag::app::{App, Command, ExportOutcome, ExportRequest, run_export};
use wsdiag::config::{Config, LoadedConfig, load_config, load_config_from_path};
use wsdiag::event::{Event, EventHandler};
use wsdiag::export::share::{CommandShare, Osc52Clipboard};
use wsdiag::export::sink::ArtifactSink;
use wsdiag::export::surface::SharedSurface;
use wsdiag::export::{ExportPipeline, ExportSettings, summary_text};
use wsdiag::i18n::Locale;
use wsdiag::logging;
use wsdiag::system::collector::AdapterSet;
use wsdiag::system::engine::{EngineSettings, SamplingEngine};
use wsdiag::system::store::ClockTime;
use wsdiag::ui;
use wsdiag::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "wsdiag",
    about = "Workstation diagnostics dashboard with live telemetry and PNG/PDF export"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling interval in milliseconds
    #[arg(long)]
    sample_interval: Option<u64>,

    /// Display clock interval in milliseconds
    #[arg(long)]
    clock_interval: Option<u64>,

    /// Notice language: en, ko
    #[arg(long)]
    locale: Option<String>,

    /// Directory for captured images and reports
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Sample, render and export without an interactive terminal.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Number of sampling ticks in headless mode.
    #[arg(long, default_value_t = 3)]
    headless_ticks: usize,

    /// Headless terminal width.
    #[arg(long, default_value_t = 160)]
    headless_width: u16,

    /// Headless terminal height.
    #[arg(long, default_value_t = 50)]
    headless_height: u16,
}

struct Services {
    engine: SamplingEngine,
    pipeline: ExportPipeline,
    sink: ArtifactSink,
    surface: SharedSurface,
    locale: Locale,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let LoadedConfig { config, warning } = load_config_for_cli(&cli);

    let log_path = config.logging.resolved_file();
    let logging_ready = match logging::init(&config.logging, &log_path) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("warning: logging disabled: {err}");
            false
        }
    };
    if let Some(err) = warning {
        warn!(error = %err, "config not loaded, using defaults");
        if !logging_ready {
            eprintln!("warning: {err}; using defaults");
        }
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        log = %log_path.display(),
        "wsdiag starting"
    );

    if cli.headless {
        return run_headless(config, &cli).await;
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, config).await;
    ratatui::restore();

    result
}

fn build_services(config: &Config, interactive: bool) -> Services {
    let engine = SamplingEngine::new(
        AdapterSet::platform_default(&config.network),
        EngineSettings {
            sample_interval: Duration::from_millis(config.general.sample_interval_ms),
            clock_interval: Duration::from_millis(config.general.clock_interval_ms),
        },
    );
    let locale = Locale::parse(&config.general.locale);
    let surface = SharedSurface::new();
    let mut pipeline = ExportPipeline::new(
        engine.store(),
        Arc::new(surface.clone()),
        ExportSettings {
            image_scale: config.export.image_scale,
            wrap_columns: config.export.report_wrap_columns,
            locale,
        },
    );
    if let Some(share) = config
        .export
        .share_command
        .as_deref()
        .and_then(CommandShare::parse)
    {
        pipeline = pipeline.with_share(share);
    }
    if interactive && config.export.clipboard {
        pipeline = pipeline.with_clipboard(Osc52Clipboard);
    }
    let sink = ArtifactSink::resolve(config.export.directory.as_deref());

    Services {
        engine,
        pipeline,
        sink,
        surface,
        locale,
    }
}

fn draw<B>(terminal: &mut Terminal<B>, app: &App, surface: &SharedSurface) -> Result<()>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let completed = terminal.draw(|frame| ui::draw(frame, app))?;
    surface.publish(completed.buffer);
    Ok(())
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: Config) -> Result<()> {
    let Services {
        mut engine,
        pipeline,
        sink,
        surface,
        locale,
    } = build_services(&config, true);
    let mut app = App::new(locale, Theme::detect());
    let mut events = EventHandler::new();
    let bus = engine.bus();
    let mut snapshots = bus.subscribe_snapshots();
    let mut clock = bus.subscribe_clock();
    let (export_tx, mut export_rx) = mpsc::unbounded_channel::<ExportOutcome>();

    engine.start();
    draw(terminal, &app, &surface)?;

    while app.running {
        tokio::select! {
            Some(event) = events.next() => match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let action = app.map_key(key);
                    match app.dispatch(action) {
                        Some(Command::Export(request)) => {
                            let pipeline = pipeline.clone();
                            let sink = sink.clone();
                            let tx = export_tx.clone();
                            tokio::spawn(async move {
                                let outcome = run_export(request, &pipeline, &sink).await;
                                let _ = tx.send(outcome);
                            });
                        }
                        Some(Command::Refresh) => {
                            let handle = engine.handle();
                            tokio::spawn(async move {
                                if let Err(skipped) = handle.tick().await {
                                    debug!(reason = %skipped, "manual refresh skipped");
                                }
                            });
                        }
                        None => {}
                    }
                }
                Event::Key(_) => continue,
                Event::Resize => {}
            },
            Some(snapshot) = snapshots.recv() => {
                app.on_snapshot(snapshot);
            }
            Some(time) = clock.recv() => app.on_clock(time),
            Some(outcome) = export_rx.recv() => app.on_export(outcome),
            else => break,
        }
        draw(terminal, &app, &surface)?;
    }

    snapshots.unsubscribe();
    clock.unsubscribe();
    engine.shutdown();
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> LoadedConfig {
    let mut loaded = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };
    let config = &mut loaded.config;

    if let Some(ms) = cli.sample_interval {
        config.general.sample_interval_ms = ms;
    }
    if let Some(ms) = cli.clock_interval {
        config.general.clock_interval_ms = ms;
    }
    if let Some(ref locale) = cli.locale {
        config.general.locale = locale.clone();
    }
    if let Some(ref dir) = cli.export_dir {
        config.export.directory = Some(dir.clone());
    }
    if let Some(ref file) = cli.log_file {
        config.logging.file = Some(file.clone());
    }
    config.sanitize();

    loaded
}

async fn run_headless(config: Config, cli: &Cli) -> Result<()> {
    if cli.headless_ticks == 0 {
        return Err(eyre!("--headless-ticks must be greater than 0"));
    }
    if cli.headless_width == 0 || cli.headless_height == 0 {
        return Err(eyre!(
            "--headless-width and --headless-height must be greater than 0"
        ));
    }

    let Services {
        engine,
        pipeline,
        sink,
        surface,
        locale,
    } = build_services(&config, false);
    let mut app = App::new(locale, Theme::dashboard());
    let backend = TestBackend::new(cli.headless_width, cli.headless_height);
    let mut terminal = Terminal::new(backend)?;

    for _ in 0..cli.headless_ticks {
        match engine.tick().await {
            Ok(snapshot) => {
                app.on_snapshot(snapshot);
            }
            Err(skipped) => warn!(reason = %skipped, "headless tick skipped"),
        }
        app.on_clock(ClockTime::now());
        draw(&mut terminal, &app, &surface)?;
    }

    let snapshot = engine
        .store()
        .current()
        .ok_or_else(|| eyre!("no snapshot was committed"))?;

    for request in [ExportRequest::Image, ExportRequest::Report] {
        match run_export(request, &pipeline, &sink).await {
            ExportOutcome::ImageSaved(path) | ExportOutcome::ReportSaved(path) => {
                println!("{}", path.display());
            }
            other => return Err(eyre!("export failed: {other:?}")),
        }
    }
    if config.export.share_command.is_some()
        && let ExportOutcome::Failed(_) =
            run_export(ExportRequest::Summary, &pipeline, &sink).await
    {
        warn!("share command failed in headless mode");
    }

    println!("{}", summary_text(&snapshot));
    println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    Ok(())
}
