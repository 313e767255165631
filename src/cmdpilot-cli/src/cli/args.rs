//! CLI argument structures and parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::styles::{AFTER_HELP, get_styles};

/// Log verbosity level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Color output mode for CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Automatically detect if output is a terminal
    #[default]
    Auto,
    /// Always output with colors
    Always,
    /// Never output with colors
    Never,
}

/// cmdpilot - natural-language requests to confirmed shell commands
///
/// If no subcommand is specified, starts the interactive shell.
#[derive(Debug, Parser)]
#[command(name = "cmdpilot")]
#[command(author, version)]
#[command(about = "Turn natural-language requests into confirmed shell commands", long_about = None)]
#[command(styles = get_styles(), after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to config.toml (overrides CMDPILOT_CONFIG and CMDPILOT_HOME)
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (same as --log-level debug)
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Enable trace-level logging for debugging
    #[arg(long = "trace", global = true)]
    pub trace: bool,

    /// Log verbosity
    #[arg(long = "log-level", global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Control color output: auto (default), always, or never
    #[arg(long = "color", global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Write trace-level logs to ./debug.txt
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the interactive shell
    #[command(visible_alias = "repl")]
    Shell(ShellArgs),

    /// Build commands for one request and run them
    Run(RunArgs),

    /// Print the commands found in a model response
    Extract(ExtractArgs),

    /// Print the safety tier of a command
    Classify(ClassifyArgs),
}

/// Arguments for the interactive shell.
#[derive(Args, Debug, Default)]
pub struct ShellArgs {
    /// Run commands without confirmation, dangerous ones included
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

/// Arguments for a one-shot run.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// The request, e.g. "buat file index.js di src"
    #[arg(required = true, num_args = 1.., value_name = "PROMPT")]
    pub prompt: Vec<String>,

    /// Read the model's response from a file
    #[arg(long = "response-file", value_name = "FILE", conflicts_with = "response")]
    pub response_file: Option<PathBuf>,

    /// The model's response as text; `-` reads it from stdin
    #[arg(long = "response", value_name = "TEXT")]
    pub response: Option<String>,

    /// Run without confirmation, dangerous commands included
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,

    /// Show the candidate commands and their tiers without running them
    #[arg(long = "dry-run", conflicts_with = "yes")]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn prompt_text(&self) -> String {
        self.prompt.join(" ")
    }
}

/// Arguments for extraction.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Read the response from a file instead of stdin
    #[arg(long = "response-file", value_name = "FILE")]
    pub response_file: Option<PathBuf>,
}

/// Arguments for classification.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The command, as one quoted argument or as separate words
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl ClassifyArgs {
    pub fn command_text(&self) -> String {
        self.command.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str_loose() {
        assert_eq!(LogLevel::from_str_loose("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str_loose(" trace "), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str_loose("loud"), None);
    }

    #[test]
    fn test_no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["cmdpilot"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::try_parse_from([
            "cmdpilot",
            "run",
            "buat",
            "file",
            "index.js",
            "--yes",
            "--response-file",
            "answer.md",
        ])
        .unwrap();

        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.prompt_text(), "buat file index.js");
        assert!(args.yes);
        assert_eq!(args.response_file, Some(PathBuf::from("answer.md")));
    }

    #[test]
    fn test_run_requires_prompt() {
        assert!(Cli::try_parse_from(["cmdpilot", "run"]).is_err());
    }

    #[test]
    fn test_response_sources_conflict() {
        let result = Cli::try_parse_from([
            "cmdpilot",
            "run",
            "x",
            "--response",
            "-",
            "--response-file",
            "a.md",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dry_run_conflicts_with_yes() {
        assert!(Cli::try_parse_from(["cmdpilot", "run", "x", "--yes", "--dry-run"]).is_err());
    }

    #[test]
    fn test_classify_accepts_hyphenated_words() {
        let cli = Cli::try_parse_from(["cmdpilot", "classify", "rm", "-rf", "/"]).unwrap();
        let Some(Commands::Classify(args)) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.command_text(), "rm -rf /");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cmdpilot", "repl", "--color", "never", "-v"]).unwrap();
        assert_eq!(cli.color, ColorMode::Never);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Shell(_))));
    }
}
