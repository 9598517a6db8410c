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
use tracing_subscriber::EnvFilter;

use paperfeed_core::config_file::{self, ConfigFile};
use paperfeed_core::{FeedController, FeedSettings, HttpBatchSource, InteractionLock};

mod action;
mod app;
mod backend;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;

const DEFAULT_PREVIEW_CHARS: usize = 300;

/// Paperfeed: swipe through research papers and get recommendations from what you like.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the recommendation backend
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Papers requested per fallback batch
    #[arg(long)]
    fallback_limit: Option<usize>,

    /// Fetch recommendations after every N actions (0 disables)
    #[arg(long)]
    recommend_every: Option<u64>,

    /// How long input is locked after a swipe, in milliseconds
    #[arg(long)]
    lock_ms: Option<u64>,

    /// Color theme: paper (default) or midnight
    #[arg(long)]
    theme: Option<String>,

    /// Write logs here instead of the platform data directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Settings after layering CLI flags > `PAPERFEED_*` env vars > config files.
#[derive(Debug, PartialEq)]
struct Resolved {
    base_url: String,
    timeout: Option<Duration>,
    feed: FeedSettings,
    theme: String,
    abstract_preview_chars: usize,
    log_file: Option<PathBuf>,
}

fn resolve(args: Args, file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Resolved {
    let env_parse = |key: &str| env(key).and_then(|v| v.trim().parse::<u64>().ok());

    let mut feed = file.feed_settings();
    if let Some(limit) = args
        .fallback_limit
        .or_else(|| env("PAPERFEED_FALLBACK_LIMIT").and_then(|v| v.trim().parse::<usize>().ok()))
        .filter(|n| *n > 0)
    {
        feed.fallback_limit = limit;
    }
    if let Some(every) = args
        .recommend_every
        .or_else(|| env_parse("PAPERFEED_RECOMMEND_EVERY"))
    {
        feed.recommend_every = every;
    }
    if let Some(ms) = args.lock_ms.or_else(|| env_parse("PAPERFEED_LOCK_MS")) {
        feed.lock_duration = Duration::from_millis(ms);
    }

    let base_url = args
        .base_url
        .or_else(|| env("PAPERFEED_BASE_URL"))
        .unwrap_or_else(|| file.base_url());
    let timeout = args
        .timeout_secs
        .or_else(|| env_parse("PAPERFEED_TIMEOUT_SECS"))
        .map(Duration::from_secs)
        .or_else(|| file.timeout());
    let theme = args
        .theme
        .or_else(|| env("PAPERFEED_THEME"))
        .or_else(|| file.display.as_ref().and_then(|d| d.theme.clone()))
        .unwrap_or_else(|| "paper".to_string());
    let abstract_preview_chars = file
        .display
        .as_ref()
        .and_then(|d| d.abstract_preview_chars)
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_PREVIEW_CHARS);
    let log_file = args
        .log_file
        .or_else(|| env("PAPERFEED_LOG_FILE").map(PathBuf::from));

    Resolved {
        base_url,
        timeout,
        feed,
        theme,
        abstract_preview_chars,
        log_file,
    }
}

/// `<data_dir>/paperfeed/paperfeed.log`
fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("paperfeed").join("paperfeed.log"))
}

/// Send tracing output to a file; stdout belongs to the terminal UI.
/// The returned guard flushes the writer when dropped.
fn init_logging(path: Option<PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let path = path.or_else(default_log_path)?;
    let dir = path.parent()?.to_path_buf();
    let file_name = path.file_name()?.to_os_string();
    std::fs::create_dir_all(&dir).ok()?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = config_file::load_config();
    let resolved = resolve(args, &config, |key| std::env::var(key).ok());

    let _log_guard = init_logging(resolved.log_file.clone());
    tracing::info!(
        base_url = %resolved.base_url,
        fallback_limit = resolved.feed.fallback_limit,
        recommend_every = resolved.feed.recommend_every,
        "starting paperfeed"
    );

    let source = HttpBatchSource::new(resolved.base_url.clone()).with_timeout(resolved.timeout);

    let lock = Arc::new(InteractionLock::new());
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let controller = FeedController::new(Arc::new(source), resolved.feed.clone())
        .with_lock(Arc::clone(&lock));
    let controller = backend::forward_snapshots(controller, event_tx);
    let feed_task = tokio::spawn(backend::run_feed(controller, cmd_rx, cancel.clone()));

    let mut app = App::new(
        theme::Theme::by_name(&resolved.theme),
        lock,
        resolved.feed.lock_duration,
        resolved.abstract_preview_chars,
    );
    app.feed_cmd_tx = Some(cmd_tx);

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

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(feed_event) = maybe_event {
                    app.handle_feed_event(feed_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_feed_event(evt);
                    }
                }
            }
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        app.update(input::map_event(&evt));
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    // A command may still be waiting on a fetch; fetches have no timeout by default.
    feed_task.abort();
    tracing::info!("shutting down");
    Ok(())
}
