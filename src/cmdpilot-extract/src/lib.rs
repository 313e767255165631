//! cmdpilot Extract - Turning text into candidate shell commands.
//!
//! Two independent sources feed the execution engine:
//! - [`extract_commands`] reads the model's answer and pulls commands out of
//!   shell-tagged fenced blocks and keyword lines.
//! - [`ContextualGenerator`] reads the user's original request, infers a set
//!   of [`Intent`]s and synthesizes commands from textual patterns. It covers
//!   answers that contain no fenced block at all.
//!
//! Neither source ever fails: text that matches nothing yields fewer
//! candidates.


mod extractor;
mod intent;
mod synthesis;

use indexmap::IndexSet;

pub use extractor::{INLINE_KEYWORDS, SHELL_FENCE_TAGS, extract_commands};
pub use intent::{Intent, IntentSet, infer_intents};
pub use synthesis::{
    ContextualGenerator, DEFAULT_PLACEHOLDER_NAME, NAME_PATTERNS, PACKAGE_MANAGERS,
    PackageManager, SynthesisOptions, TRANSFER_PATTERNS,
};

/// Removes duplicate commands, keeping the first occurrence of each.
///
/// Identity is exact string equality: `"mkdir x"` and `"mkdir  x"` are
/// distinct.
pub fn dedup_preserving_order<I, S>(commands: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    commands
        .into_iter()
        .map(Into::into)
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}
