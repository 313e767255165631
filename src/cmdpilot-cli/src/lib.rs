//! cmdpilot CLI library module.
//!
//! - `cli/` - argument parsing and command dispatch
//! - `config` - `config.toml` discovery and parsing
//! - `repl` - the interactive shell
//! - `terminal` - stdin confirmation and terminal progress rendering
//! - `styled_output` - themed terminal output formatting

use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod cli;
pub mod config;
pub mod repl;
pub mod styled_output;
pub mod terminal;

static PANIC_HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install a panic hook that points at `RUST_BACKTRACE` before the
/// standard panic output.
pub fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if let Some(location) = panic_info.location() {
            eprintln!(
                "Panic in thread '{}' at {}:{}:{}",
                std::thread::current().name().unwrap_or("<unnamed>"),
                location.file(),
                location.line(),
                location.column()
            );
        }

        if std::env::var_os("RUST_BACKTRACE").is_none() {
            eprintln!("Run with RUST_BACKTRACE=1 for a backtrace.");
        }

        original_hook(panic_info);
    }));
}
