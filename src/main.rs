//! qsync - drive the debounced query-sync controller from the command line
//!
//! Command-line usage:
//!   qsync navigate --url <URL> <KEYSTROKE>...    - page filter, prints each navigation
//!   qsync search --site <URL> <KEYSTROKE>...     - dropdown against a live endpoint
//!   qsync param --url <URL> set <KEY> <VALUE>    - single parameter merge
//!   qsync param --url <URL> delete <KEY>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qsync::controller::ControlEvent;
use qsync::core::Message;
use qsync::error::parse_url;
use qsync::{
    delete_param, set_param, ControlHandle, HttpSearchClient, MemoryNavigator, Navigator,
    PageReset, QsyncConfig, QuerySyncController, SearchSurface,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

#[derive(Parser)]
#[command(name = "qsync", version, about = "Debounced query-sync controller")]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type keystrokes into a page-filter search and print the navigations
    Navigate {
        /// Current page URL
        #[arg(long)]
        url: String,
        /// Debounce delay override
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Pause between keystrokes
        #[arg(long, default_value_t = 100)]
        gap_ms: u64,
        #[arg(long, value_enum)]
        page_reset: Option<PageReset>,
        /// Successive input values, e.g. `l la lam lamp`
        keystrokes: Vec<String>,
    },
    /// Type keystrokes into a dropdown search against a live endpoint
    Search {
        /// Site root, e.g. https://shop.example
        #[arg(long)]
        site: String,
        #[arg(long)]
        delay_ms: Option<u64>,
        #[arg(long, default_value_t = 100)]
        gap_ms: u64,
        /// How long to wait for responses after the last keystroke
        #[arg(long, default_value_t = 10_000)]
        wait_ms: u64,
        keystrokes: Vec<String>,
    },
    /// Apply a single parameter change to a URL
    Param {
        #[arg(long)]
        url: String,
        #[command(subcommand)]
        op: ParamOp,
    },
}

#[derive(Subcommand)]
enum ParamOp {
    Set { key: String, value: String },
    Delete { key: String },
}

/// Search surface that prints panel updates to stdout.
#[derive(Default)]
struct StdoutSurface {
    value: Mutex<String>,
}

impl SearchSurface for StdoutSurface {
    fn value(&self) -> String {
        self.value.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn set_value(&self, value: &str) {
        if let Ok(mut current) = self.value.lock() {
            *current = value.to_string();
        }
    }

    fn show_panel(&self, html: &str) {
        println!("[panel] {}", html);
    }

    fn reveal_panel(&self) {
        println!("[panel] (shown)");
    }

    fn hide_panel(&self) {
        println!("[panel] (hidden)");
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<QsyncConfig> {
    match path {
        Some(path) => QsyncConfig::load(path).with_context(|| format!("loading {:?}", path)),
        None => Ok(QsyncConfig::default()),
    }
}

/// Feed keystrokes with `gap` between them
async fn type_keystrokes(
    handle: &ControlHandle,
    keystrokes: &[String],
    gap: Duration,
) -> Result<()> {
    for (i, keystroke) in keystrokes.iter().enumerate() {
        if i > 0 {
            sleep(gap).await;
        }
        handle.input(keystroke.clone()).context("controller stopped")?;
    }
    Ok(())
}

/// Print notifications until none arrive for `window`
async fn drain_events(rx: &mut mpsc::UnboundedReceiver<Message<ControlEvent>>, window: Duration) {
    while let Ok(Some(message)) = timeout(window, rx.recv()).await {
        match message.payload {
            ControlEvent::Navigated(url) => println!("navigate {}", url),
            ControlEvent::Settled(query) => log::info!("settled {:?}", query),
            ControlEvent::Resolved(query) => log::info!("resolved {:?}", query),
            other => log::debug!("event {:?}", other),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Navigate {
            url,
            delay_ms,
            gap_ms,
            page_reset,
            keystrokes,
        } => {
            let mut controller_config = config.search.clone();
            if let Some(delay_ms) = delay_ms {
                controller_config.delay_ms = delay_ms;
            }
            if let Some(page_reset) = page_reset {
                controller_config.page_reset = page_reset;
            }
            let settle_window = controller_config.delay() + Duration::from_millis(gap_ms) * 2;

            let navigator = Arc::new(MemoryNavigator::new(parse_url(&url)?));
            let surface = Arc::new(StdoutSurface::default());
            let (tx, mut rx) = mpsc::unbounded_channel();
            let controller =
                QuerySyncController::page_filter(surface.clone(), navigator.clone(), controller_config);
            let mut handle = controller.spawn(tx);

            type_keystrokes(&handle, &keystrokes, Duration::from_millis(gap_ms))
                .await?;
            drain_events(&mut rx, settle_window).await;
            handle.shutdown();

            println!("final {}", navigator.location());
        }
        Command::Search {
            site,
            delay_ms,
            gap_ms,
            wait_ms,
            keystrokes,
        } => {
            let mut controller_config = config.navbar.clone();
            if let Some(delay_ms) = delay_ms {
                controller_config.delay_ms = delay_ms;
            }

            let client = Arc::new(
                HttpSearchClient::for_site(&site, &config.search_path)
                    .context("building search client")?,
            );
            let surface = Arc::new(StdoutSurface::default());
            let (tx, mut rx) = mpsc::unbounded_channel();
            let controller = QuerySyncController::dropdown(surface.clone(), client, controller_config);
            let mut handle = controller.spawn(tx);

            type_keystrokes(&handle, &keystrokes, Duration::from_millis(gap_ms))
                .await?;
            drain_events(&mut rx, Duration::from_millis(wait_ms)).await;
            handle.shutdown();
        }
        Command::Param { url, op } => {
            let url = parse_url(&url)?;
            let result = match op {
                ParamOp::Set { key, value } => set_param(&url, &key, &value),
                ParamOp::Delete { key } => delete_param(&url, &key),
            };
            println!("{}", result);
        }
    }

    Ok(())
}
