//! Styled terminal output with theme-aware colors.
//!
//! Messages carry a plain-text icon (`[OK]`, `[ERROR]`, ...) so they stay
//! readable when colors are off. Colors are dropped when `NO_COLOR` is set or
//! the target stream is not a terminal.
//!
//! ```
//! use cmdpilot_cli::styled_output::{println_success, print_warning};
//!
//! println_success("created directory src");
//! print_warning("skipping dangerous command: rm -rf build");
//! ```

use std::io::{IsTerminal, Write};

use cmdpilot_safety::SafetyTier;

/// Check if colors should be disabled based on NO_COLOR env var.
fn colors_disabled() -> bool {
    std::env::var("NO_COLOR")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

fn is_terminal_output(stderr: bool) -> bool {
    if stderr {
        std::io::stderr().is_terminal()
    } else {
        std::io::stdout().is_terminal()
    }
}

fn use_colors(stderr: bool) -> bool {
    !colors_disabled() && is_terminal_output(stderr)
}

/// ANSI color codes for light terminal backgrounds.
mod light_theme {
    pub const SUCCESS: &str = "\x1b[38;2;0;150;125m";
    pub const ERROR: &str = "\x1b[38;2;217;61;61m";
    pub const WARNING: &str = "\x1b[38;2;201;154;46m";
    pub const INFO: &str = "\x1b[38;2;0;100;160m";
    pub const DIM: &str = "\x1b[38;2;100;100;100m";
}

/// ANSI color codes for dark terminal backgrounds.
mod dark_theme {
    pub const SUCCESS: &str = "\x1b[38;2;0;245;212m";
    pub const ERROR: &str = "\x1b[38;2;255;107;107m";
    pub const WARNING: &str = "\x1b[38;2;255;200;87m";
    pub const INFO: &str = "\x1b[38;2;72;202;228m";
    pub const DIM: &str = "\x1b[38;2;130;154;177m";
}

const RESET: &str = "\x1b[0m";

/// Detect a light background from `COLORFGBG` or the iTerm profile name.
/// Defaults to dark.
fn is_light_theme() -> bool {
    // COLORFGBG is "fg;bg", bg 7 and above is light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG")
        && let Some(bg_str) = colorfgbg.split(';').next_back()
        && let Ok(bg_num) = bg_str.parse::<u8>()
    {
        return bg_num >= 7;
    }

    std::env::var("ITERM_PROFILE")
        .map(|profile| profile.to_lowercase().contains("light"))
        .unwrap_or(false)
}

/// Message type for styled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
    Warning,
    Info,
    /// Secondary information
    Dim,
}

impl MessageType {
    fn icon(&self) -> &'static str {
        match self {
            MessageType::Success => "[OK]",
            MessageType::Error => "[ERROR]",
            MessageType::Warning => "[WARN]",
            MessageType::Info => "[INFO]",
            MessageType::Dim => "-",
        }
    }

    fn color(&self) -> &'static str {
        let light = is_light_theme();
        match (self, light) {
            (MessageType::Success, true) => light_theme::SUCCESS,
            (MessageType::Success, false) => dark_theme::SUCCESS,
            (MessageType::Error, true) => light_theme::ERROR,
            (MessageType::Error, false) => dark_theme::ERROR,
            (MessageType::Warning, true) => light_theme::WARNING,
            (MessageType::Warning, false) => dark_theme::WARNING,
            (MessageType::Info, true) => light_theme::INFO,
            (MessageType::Info, false) => dark_theme::INFO,
            (MessageType::Dim, true) => light_theme::DIM,
            (MessageType::Dim, false) => dark_theme::DIM,
        }
    }
}

fn format_styled(msg_type: MessageType, message: &str, to_stderr: bool) -> String {
    if use_colors(to_stderr) {
        format!("{}{} {}{}", msg_type.color(), msg_type.icon(), message, RESET)
    } else {
        format!("{} {}", msg_type.icon(), message)
    }
}

fn print_styled_internal(msg_type: MessageType, message: &str, to_stderr: bool) {
    let formatted = format_styled(msg_type, message, to_stderr);
    if to_stderr {
        let _ = writeln!(std::io::stderr(), "{}", formatted);
    } else {
        let _ = writeln!(std::io::stdout(), "{}", formatted);
    }
}

// ============================================================
// STDERR - diagnostics
// ============================================================

pub fn print_error(message: &str) {
    print_styled_internal(MessageType::Error, message, true);
}

pub fn print_warning(message: &str) {
    print_styled_internal(MessageType::Warning, message, true);
}

pub fn print_info(message: &str) {
    print_styled_internal(MessageType::Info, message, true);
}

// ============================================================
// STDOUT - operator-facing progress
// ============================================================

pub fn println_success(message: &str) {
    print_styled_internal(MessageType::Success, message, false);
}

pub fn println_error(message: &str) {
    print_styled_internal(MessageType::Error, message, false);
}

pub fn println_warning(message: &str) {
    print_styled_internal(MessageType::Warning, message, false);
}

pub fn println_info(message: &str) {
    print_styled_internal(MessageType::Info, message, false);
}

pub fn println_dim(message: &str) {
    print_styled_internal(MessageType::Dim, message, false);
}

// ============================================================
// LABELS - inline colored text for stdout
// ============================================================

/// Color `label` for stdout without adding an icon.
pub fn styled_label(msg_type: MessageType, label: &str) -> String {
    if use_colors(false) {
        format!("{}{}{}", msg_type.color(), label, RESET)
    } else {
        label.to_string()
    }
}

/// Message type used to color a safety tier.
pub fn tier_message_type(tier: SafetyTier) -> MessageType {
    match tier {
        SafetyTier::Safe => MessageType::Success,
        SafetyTier::Dangerous => MessageType::Error,
        SafetyTier::Unknown => MessageType::Warning,
    }
}

/// `[SAFE]`, `[DANGEROUS]` or `[UNKNOWN]`, colored for stdout.
pub fn tier_label(tier: SafetyTier) -> String {
    styled_label(tier_message_type(tier), &format!("[{}]", tier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_message_type_icons() {
        assert_eq!(MessageType::Success.icon(), "[OK]");
        assert_eq!(MessageType::Error.icon(), "[ERROR]");
        assert_eq!(MessageType::Warning.icon(), "[WARN]");
        assert_eq!(MessageType::Info.icon(), "[INFO]");
        assert_eq!(MessageType::Dim.icon(), "-");
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(tier_message_type(SafetyTier::Safe), MessageType::Success);
        assert_eq!(tier_message_type(SafetyTier::Dangerous), MessageType::Error);
        assert_eq!(tier_message_type(SafetyTier::Unknown), MessageType::Warning);
    }

    #[test]
    #[serial]
    fn test_no_color_gives_plain_text() {
        // SAFETY: These tests run serially and we restore env vars immediately
        unsafe { std::env::set_var("NO_COLOR", "1") };
        let message = format_styled(MessageType::Success, "created src", false);
        let label = tier_label(SafetyTier::Dangerous);
        unsafe { std::env::remove_var("NO_COLOR") };

        assert_eq!(message, "[OK] created src");
        assert_eq!(label, "[DANGEROUS]");
    }

    #[test]
    #[serial]
    fn test_colors_disabled() {
        // SAFETY: These tests run serially and we restore env vars immediately
        unsafe { std::env::set_var("NO_COLOR", "1") };
        assert!(colors_disabled());
        unsafe { std::env::set_var("NO_COLOR", "true") };
        assert!(colors_disabled());
        unsafe { std::env::set_var("NO_COLOR", "0") };
        assert!(!colors_disabled());
        unsafe { std::env::set_var("NO_COLOR", "false") };
        assert!(!colors_disabled());
        unsafe { std::env::set_var("NO_COLOR", "") };
        assert!(!colors_disabled());
        unsafe { std::env::remove_var("NO_COLOR") };
    }

    #[test]
    #[serial]
    fn test_light_theme_detection() {
        // SAFETY: These tests run serially and we restore env vars immediately
        unsafe { std::env::set_var("COLORFGBG", "0;15") };
        assert!(is_light_theme());
        unsafe { std::env::set_var("COLORFGBG", "15;0") };
        assert!(!is_light_theme());
        unsafe { std::env::remove_var("COLORFGBG") };
    }
}
