//! Golden Thought Entry Point
//!
//! Launches the terminal quote client.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults
//! golden-thought
//!
//! # Preselect a tag for the next refresh
//! golden-thought --tag wisdom
//!
//! # Point at a self-hosted Quotable instance
//! golden-thought --api-url http://localhost:4000
//!
//! # Verbose logging to a file
//! RUST_LOG=debug golden-thought --log-file /tmp/golden-thought.log
//! ```

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use thought_core::config::{load_config, load_config_from_path, ConfigOverrides, ThoughtConfig};
use thought_core::{FileStore, QuotableBackend, TagCacheManager, TagStore, ViewComposer};
use thought_tui::App;

/// Golden Thought - random quotes in your terminal
#[derive(Parser, Debug)]
#[command(name = "golden-thought")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "GOLDEN_THOUGHT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Quote service base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Directory for the tag cache
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Tag to filter by once you ask for a new thought
    #[arg(short = 't', long, value_name = "TAG")]
    tag: Option<String>,

    /// Write logs here instead of <cache dir>/golden-thought.log
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    init_logging(&config.log_path())?;

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: golden-thought requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or the");
        eprintln!("session has no terminal (CI, ssh without -t).");
        std::process::exit(1);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(config, args.tag))
}

/// Load config with CLI > env > file > defaults
fn resolve_config(args: &Args) -> Result<ThoughtConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            load_config_from_path(Some(path.as_path()))?
        }
        None => load_config()?,
    };

    let mut overrides = ConfigOverrides::new();
    if let Some(url) = &args.api_url {
        overrides = overrides.with_api_base_url(url.clone());
    }
    if let Some(dir) = &args.cache_dir {
        overrides = overrides.with_cache_dir(dir.clone());
    }
    if let Some(file) = &args.log_file {
        overrides = overrides.with_log_file(file.clone());
    }
    overrides.apply(&mut config)?;

    Ok(config)
}

/// Install the tracing subscriber
///
/// The UI owns the terminal while the app runs, so events never go to
/// stderr; they are appended to `path` with ANSI colors off.
fn init_logging(path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {path:?}"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

async fn run(config: ThoughtConfig, tag: Option<String>) -> Result<()> {
    info!(
        base_url = %config.api.base_url,
        base_url_source = %config.source_of("api.base_url"),
        cache_dir = %config.cache.dir.display(),
        "Starting Golden Thought"
    );

    let backend = Arc::new(
        QuotableBackend::from_config(&config.api).context("Failed to build HTTP client")?,
    );
    let storage = Arc::new(FileStore::new(config.cache.dir.clone()));
    let loader = TagCacheManager::new(Arc::clone(&backend), storage, TagStore::new())
        .with_ttl(config.cache.tag_ttl);
    let view = ViewComposer::new(backend, loader).with_selected_tag(tag.as_deref());

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(view);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}
