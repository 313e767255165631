//! CLI styling and formatting.

use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Help theme: cyan headers, green literals.
pub fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Cyan.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

/// After-help section with examples, environment variables and paths.
pub const AFTER_HELP: &str = color_print::cstr!(
    r#"<cyan,bold>QUICK START</>
    <green,bold>cmdpilot</>                                   Start the interactive shell
    <green,bold>cmdpilot run</> <dim>"buat file index.js di src"</>     Build and run commands for one request
    <green,bold>cmdpilot run --dry-run</> <dim>"install express"</>   Preview without running
    <green,bold>cmdpilot extract --response-file</> <dim>answer.md</>  List commands in a model answer
    <green,bold>cmdpilot classify</> <dim>rm -rf build</>              Show a command's safety tier

<cyan,bold>ENVIRONMENT VARIABLES</>
    <yellow>CMDPILOT_HOME</>        Config directory (default: ~/.cmdpilot)
    <yellow>CMDPILOT_CONFIG</>      Config file path
    <yellow>CMDPILOT_LOG_LEVEL</>   Log verbosity (error, warn, info, debug, trace)
    <yellow>NO_COLOR</>             Disable colored output (set to '1' or 'true')

<cyan,bold>PATHS</>
    <dim>Config</>      ~/.cmdpilot/config.toml"#
);
