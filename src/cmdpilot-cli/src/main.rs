//! cmdpilot CLI - Main entry point.
//!
//! - Interactive shell (default)
//! - One-shot `run`
//! - `extract` and `classify` inspection commands

use anyhow::Result;
use clap::Parser;

use cmdpilot_cli::cli::{Cli, ColorMode, LogLevel, dispatch_command};
use cmdpilot_cli::styled_output::print_error;

/// Environment variable for the log level.
const LOG_LEVEL_ENV: &str = "CMDPILOT_LOG_LEVEL";

/// Guard that ensures debug log file is properly flushed when dropped.
struct DebugLogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Set up debug file logging that writes ALL trace-level logs to ./debug.txt.
fn setup_debug_file_logging() -> Result<DebugLogGuard> {
    use std::fs::File;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let debug_file_path = std::env::current_dir()?.join("debug.txt");

    let file = File::create(&debug_file_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create debug.txt: {}. Check write permissions.",
            e
        )
    })?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("trace"))
        .with(file_layer)
        .init();

    eprintln!(
        "Debug mode enabled: logging to {}",
        debug_file_path.display()
    );

    Ok(DebugLogGuard { _guard: guard })
}

/// Level from `--trace`, `-v`, `CMDPILOT_LOG_LEVEL`, then `--log-level`.
fn resolve_log_level(cli: &Cli) -> LogLevel {
    if cli.trace {
        LogLevel::Trace
    } else if cli.verbose {
        LogLevel::Debug
    } else if let Ok(env_level) = std::env::var(LOG_LEVEL_ENV) {
        LogLevel::from_str_loose(&env_level).unwrap_or(cli.log_level)
    } else {
        cli.log_level
    }
}

fn init_logging(log_level: LogLevel) {
    // RUST_LOG set: keep dependencies quiet, apply the level to our crates
    let filter_str = match std::env::var("RUST_LOG") {
        Ok(rust_log) if !rust_log.is_empty() => {
            let level = log_level.as_filter_str();
            format!(
                "error,cmdpilot={level},cmdpilot_cli={level},cmdpilot_exec={level},cmdpilot_extract={level},cmdpilot_safety={level},{rust_log}"
            )
        }
        _ => log_level.as_filter_str().to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(&filter_str)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    cmdpilot_cli::install_panic_hook();

    let cli = Cli::parse();

    // SAFETY: Environment variable mutations happen early before threads spawn
    match cli.color {
        ColorMode::Never => unsafe { std::env::set_var("NO_COLOR", "1") },
        ColorMode::Always => unsafe { std::env::remove_var("NO_COLOR") },
        ColorMode::Auto => {}
    }

    let debug_guard = if cli.debug {
        Some(setup_debug_file_logging()?)
    } else {
        init_logging(resolve_log_level(&cli));
        None
    };

    let result = dispatch_command(cli).await;
    if let Err(e) = &result {
        tracing::debug!(error = ?e, "command failed");
        print_error(&format!("{:#}", e));
    }

    // Flush ./debug.txt before exiting
    drop(debug_guard);
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}
