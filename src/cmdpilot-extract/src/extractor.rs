//! Command extraction from model output.
//!
//! Recognises two shapes of command in free-form text:
//! - lines inside fenced blocks tagged with a shell language
//! - prose or untagged-fence lines containing a file-operation keyword
//!
//! Output order follows the text; duplicates keep their first position.

use std::sync::LazyLock;

use regex::Regex;

use crate::dedup_preserving_order;

/// Fence tags treated as shell content (compared case-insensitively).
pub const SHELL_FENCE_TAGS: &[&str] = &["bash", "sh", "shell", "zsh", "console", "terminal"];

/// Keywords that mark an un-fenced line as carrying a command.
pub const INLINE_KEYWORDS: &[&str] = &["mkdir", "touch", "cp", "mv", "cat", "echo"];

const FENCE: &str = "```";

/// A one-line fence such as "```bash mkdir a```", with three or more backticks.
static ONE_LINE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^`{3,}[ \t]*([A-Za-z0-9_+-]+)[ \t]+(.+?)[ \t]*`{3,}$")
        .expect("one-line fence regex is valid")
});

/// Keyword followed by at least one argument, running to end of line.
static KEYWORD_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:mkdir|touch|cp|mv|cat|echo)[ \t]+\S+(?:[ \t]+\S+)*")
        .expect("keyword command regex is valid")
});

/// Same as [`KEYWORD_COMMAND`] but anchored, for inline code span content.
static KEYWORD_AT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:mkdir|touch|cp|mv|cat|echo)[ \t]+\S").expect("keyword prefix regex is valid")
});

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("inline code regex is valid"));

static PROMPT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\s*").expect("prompt marker regex is valid"));

/// What kind of fenced block the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Outside,
    Shell,
    Untagged,
    Other,
}

impl Block {
    fn from_tag(tag: &str) -> Self {
        if tag.is_empty() {
            Block::Untagged
        } else if is_shell_tag(tag) {
            Block::Shell
        } else {
            Block::Other
        }
    }
}

fn is_shell_tag(tag: &str) -> bool {
    SHELL_FENCE_TAGS
        .iter()
        .any(|t| t.eq_ignore_ascii_case(tag))
}

/// Extracts an ordered, deduplicated list of candidate commands from model
/// output. Text without fenced blocks or keyword lines yields an empty list.
pub fn extract_commands(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut block = Block::Outside;

    for line in text.lines() {
        let trimmed = line.trim();

        if block == Block::Outside {
            if let Some(rest) = trimmed.strip_prefix(FENCE) {
                if let Some(caps) = ONE_LINE_FENCE.captures(trimmed) {
                    if is_shell_tag(&caps[1]) {
                        found.extend(shell_line(&caps[2]));
                    } else {
                        found.extend(keyword_command(trimmed.trim_matches('`')));
                    }
                    continue;
                }
                // Longer fences ("````bash") open the same way.
                let rest = rest.trim_start_matches('`');
                // Info strings may carry attributes after the language.
                let tag = rest.split_whitespace().next().unwrap_or("");
                block = Block::from_tag(tag);
                continue;
            }
            found.extend(keyword_command(line));
            continue;
        }

        if trimmed.starts_with(FENCE) {
            block = Block::Outside;
            continue;
        }

        match block {
            Block::Shell => found.extend(shell_line(trimmed)),
            Block::Untagged => found.extend(keyword_command(line)),
            Block::Other | Block::Outside => {}
        }
    }

    let commands = dedup_preserving_order(found);
    tracing::debug!(count = commands.len(), "extracted commands from model output");
    commands
}

/// Normalises one line of a shell block: drops blanks and comments, strips a
/// leading `$` prompt marker.
fn shell_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let stripped = PROMPT_MARKER.replace(line, "");
    let stripped = stripped.trim();
    if stripped.is_empty() || stripped.starts_with('#') {
        return None;
    }

    Some(stripped.to_string())
}

/// Finds the minimal command substring on a keyword line.
///
/// An inline code span that starts with a keyword is taken verbatim.
/// Otherwise the command runs from the keyword to the end of the line, minus
/// trailing prose punctuation.
fn keyword_command(line: &str) -> Option<String> {
    for caps in INLINE_CODE.captures_iter(line) {
        let span = PROMPT_MARKER.replace(caps[1].trim(), "");
        if KEYWORD_AT_START.is_match(&span) {
            return Some(span.trim().to_string());
        }
    }

    let m = KEYWORD_COMMAND.find(line)?;
    let command = m
        .as_str()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '`' | '*'))
        .trim_end();

    // Trimming may have eaten the only argument ("run `mkdir`.").
    if command.split_whitespace().count() < 2 {
        return None;
    }

    Some(command.to_string())
}
