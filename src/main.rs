//! Scanline: terminal client for a breast-imaging analysis service.
//!
//! Main entry point: logging, tokio runtime, HTTP client, then the TUI.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scanline::adapters::sanitize::SanitizingMakeWriter;
use scanline::adapters::HttpApi;
use scanline::tui::App;

fn main() -> Result<()> {
    // Initialize logging.
    //
    // IMPORTANT: writing logs to the terminal corrupts the TUI (alternate
    // screen). Default behavior:
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let log_mode = std::env::var("SCANLINE_LOG_MODE").unwrap_or_else(|_| "auto".to_string());
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        // auto
        _ => std::io::stdout().is_terminal(),
    };

    let (writer, _guard) = if use_file {
        let log_file =
            std::env::var("SCANLINE_LOG_FILE").unwrap_or_else(|_| "scanline.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting scanline");

    // All requests run on this runtime; the TUI loop itself stays sync.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let api = Arc::new(HttpApi::from_env()?);

    let mut app = App::new(api, runtime.handle().clone());
    app.run()?;

    tracing::info!("scanline shutdown complete");
    Ok(())
}
