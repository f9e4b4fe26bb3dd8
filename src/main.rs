use std::io;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn, Level};

mod charts;
mod config;
mod entry_builder;
mod error;
mod models;
mod queries;
mod shell;
mod store;
mod viewer;

use config::{TrackerConfig, CONFIG_FILE};
use shell::Shell;
use store::RecordStore;

fn main() -> anyhow::Result<()> {
    let loaded = TrackerConfig::load(Path::new(CONFIG_FILE));
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&config.log_level);
    if let Err(e) = &loaded {
        warn!(error = %e, "using default configuration");
    }

    let store = RecordStore::new(&config);
    store.ensure_initialized()?;
    debug!(path = %store.path().display(), "workout log ready");

    let window = config.chart_window;
    let stdin = io::stdin();
    let mut shell = Shell::new(
        store,
        stdin.lock(),
        io::stdout(),
        Box::new(move |entries| viewer::show_charts(entries, window)),
    );
    shell.run()?;
    Ok(())
}

/// Logs go to stderr so the menu on stdout stays readable.
fn init_logging(level: &str) {
    let level = Level::from_str(level).unwrap_or(Level::WARN);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
