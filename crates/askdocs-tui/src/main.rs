use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

mod action;
mod app;
mod backend;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use askdocs_core::{ApiClient, StatusPoller, config_file};
use app::App;
use tui_event::BackendCommand;

const DEFAULT_SERVER: &str = "http://localhost:8000";

/// askdocs TUI — upload documents, watch them index, and ask questions
/// with streamed, citation-linked answers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Files to upload on startup (pdf, docx, txt, jpg, jpeg, png)
    files: Vec<PathBuf>,

    /// Server base URL
    #[arg(long)]
    server: Option<String>,

    /// Delay between document status polls, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Upload size ceiling in megabytes
    #[arg(long)]
    max_upload_mb: Option<u64>,

    /// Color theme: dark (default) or light
    #[arg(long)]
    theme: Option<String>,
}

/// Route tracing to a log file; the terminal belongs to ratatui.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::state_dir().or_else(dirs::cache_dir)?.join("askdocs");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, "askdocs.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    // Validate any upload paths provided on the command line
    for path in &args.files {
        if !path.exists() {
            anyhow::bail!("file not found: {}", path.display());
        }
    }

    // Resolve config from CLI flags > env vars > config file > defaults
    let config = config_file::load_config();
    let base_url = args
        .server
        .or_else(|| std::env::var("ASKDOCS_SERVER").ok())
        .or_else(|| config.server.as_ref().and_then(|s| s.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let poll_interval = args
        .poll_interval_ms
        .or_else(|| config.polling.as_ref().and_then(|p| p.interval_ms))
        .map(Duration::from_millis)
        .unwrap_or(askdocs_core::DEFAULT_POLL_INTERVAL);
    let max_upload_mb = args
        .max_upload_mb
        .or_else(|| config.upload.as_ref().and_then(|u| u.max_file_size_mb))
        .unwrap_or(askdocs_core::DEFAULT_MAX_UPLOAD_MB);
    let theme_name = args
        .theme
        .or_else(|| config.display.as_ref().and_then(|d| d.theme.clone()))
        .unwrap_or_default();
    let theme = match theme_name.as_str() {
        "light" => theme::Theme::light(),
        _ => theme::Theme::dark(),
    };

    tracing::info!(%base_url, poll_ms = poll_interval.as_millis() as u64, "starting");

    let api = ApiClient::new(&base_url).with_max_upload_bytes(max_upload_mb * 1024 * 1024);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(theme);

    // Wire up the backend listener and the status poller
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    let (poll_tx, mut poll_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let mut poller = StatusPoller::new(Arc::new(api.clone()), poll_interval, poll_tx);
    tokio::spawn(backend::run(
        api,
        cmd_rx,
        event_tx.clone(),
        cancel.clone(),
    ));
    app.backend_cmd_tx = Some(cmd_tx.clone());

    // Seed the registry, then upload any files from the command line
    let _ = cmd_tx.send(BackendCommand::RefreshDocuments);
    for path in args.files {
        let _ = cmd_tx.send(BackendCommand::Upload { path });
    }

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        // Draw
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            // Backend events (non-blocking drain)
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            // Poll events from the status poller
            maybe_event = poll_rx.recv() => {
                if let Some(poll_event) = maybe_event {
                    app.apply_poll_event(poll_event);
                    while let Ok(evt) = poll_rx.try_recv() {
                        app.apply_poll_event(evt);
                    }
                }
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
        }

        // Process tick
        app.update(action::Action::Tick);

        // The registry changed: recompute which documents need a timer.
        if app.take_registry_dirty() {
            poller.sync(&app.documents());
        }

        if app.should_quit {
            cancel.cancel();
            poller.shutdown();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
