//! Engine tunables.

use std::time::Duration;

use crate::shell::ShellOptions;

/// Per-command shell timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum output size to capture per stream.
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024; // 1MB

/// Pause between consecutive commands.
pub const DEFAULT_COMMAND_DELAY: Duration = Duration::from_millis(500);

/// Entries shown by history displays.
pub const DEFAULT_HISTORY_DISPLAY_LIMIT: usize = 10;

/// Configuration for [`crate::ExecutionEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Shell dispatch timeout.
    pub timeout: Duration,
    /// Output cap for shell dispatch, in bytes.
    pub max_output_bytes: usize,
    /// Delay between commands. Zero disables it.
    pub command_delay: Duration,
    /// How many ledger entries a display shows.
    pub history_display_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_output_bytes: MAX_OUTPUT_SIZE,
            command_delay: DEFAULT_COMMAND_DELAY,
            history_display_limit: DEFAULT_HISTORY_DISPLAY_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn shell_options(&self) -> ShellOptions {
        ShellOptions {
            timeout: self.timeout,
            max_output_bytes: self.max_output_bytes,
        }
    }
}
