//! Casa Shell - hosts the home dashboard and bridges it to native capabilities.

#[cfg(feature = "webkit")]
mod app;
mod config;
mod console;
mod devices;
mod ipc;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "casa-shell")]
#[command(about = "Native shell for the home dashboard External Bus")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "casa-shell.toml")]
    config: PathBuf,

    /// Dashboard URL, overriding the configuration file
    #[arg(short, long)]
    url: Option<String>,

    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Read wire messages from stdin instead of opening a window
    #[arg(long)]
    console: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Casa Shell v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;
    if let Some(url) = args.url {
        config.shell.dashboard_url = url;
    }

    info!(
        dashboard = %config.shell.dashboard_url,
        handler = %config.shell.message_handler,
        "Configuration loaded"
    );

    if args.console || !cfg!(feature = "webkit") {
        console::run(&config)?;
        return Ok(());
    }

    run_window(config)
}

#[cfg(feature = "webkit")]
fn run_window(config: config::Config) -> Result<()> {
    let code = app::run(config);
    if code != gtk::glib::ExitCode::SUCCESS {
        anyhow::bail!("shell exited with {code:?}");
    }
    Ok(())
}

#[cfg(not(feature = "webkit"))]
fn run_window(_config: config::Config) -> Result<()> {
    anyhow::bail!("built without the `webkit` feature; run with --console")
}
