//! Allow/deny vocabularies.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SafetyError;

/// Base executables that are considered safe to run.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "mkdir", "touch", "cp", "mv", "ls", "cat", "echo", "pwd", "find", "grep", "head", "tail", "wc",
    "sort", "uniq", "chmod", "chown",
];

/// Base executables that are never run without explicit caller vetting.
pub const DEFAULT_DENY_LIST: &[&str] = &[
    "rm",
    "rmdir",
    "dd",
    "format",
    "fdisk",
    "mkfs",
    "kill",
    "killall",
    "shutdown",
    "reboot",
    "halt",
    "init",
    "service",
    "systemctl",
];

/// Immutable allow/deny vocabularies injected into a [`crate::SafetyClassifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVocabulary {
    /// Allow-listed base executables.
    allow: HashSet<String>,

    /// Deny-listed base executables.
    deny: HashSet<String>,
}

impl SafetyVocabulary {
    /// Build a vocabulary from explicit lists.
    ///
    /// Entries are trimmed. An entry that is empty or contains inner
    /// whitespace is rejected, since it could never equal a first token.
    pub fn new<A, D, S>(allow: A, deny: D) -> Result<Self, SafetyError>
    where
        A: IntoIterator<Item = S>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            allow: validate("allow", allow)?,
            deny: validate("deny", deny)?,
        })
    }

    /// A vocabulary with both lists empty. Every command is `Unknown`.
    pub fn empty() -> Self {
        Self {
            allow: HashSet::new(),
            deny: HashSet::new(),
        }
    }

    /// Add entries on top of the current lists.
    pub fn extended<A, D, S>(mut self, allow: A, deny: D) -> Result<Self, SafetyError>
    where
        A: IntoIterator<Item = S>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allow.extend(validate("allow", allow)?);
        self.deny.extend(validate("deny", deny)?);
        Ok(self)
    }

    /// Builder: add a single allow-listed executable.
    #[must_use]
    pub fn with_allowed(mut self, program: impl Into<String>) -> Self {
        self.allow.insert(program.into());
        self
    }

    /// Builder: add a single deny-listed executable.
    #[must_use]
    pub fn with_denied(mut self, program: impl Into<String>) -> Self {
        self.deny.insert(program.into());
        self
    }

    pub fn is_allowed(&self, program: &str) -> bool {
        self.allow.contains(program)
    }

    pub fn is_denied(&self, program: &str) -> bool {
        self.deny.contains(program)
    }

    /// Allow-list entries, sorted for stable display.
    pub fn allowed(&self) -> Vec<&str> {
        sorted(&self.allow)
    }

    /// Deny-list entries, sorted for stable display.
    pub fn denied(&self) -> Vec<&str> {
        sorted(&self.deny)
    }
}

impl Default for SafetyVocabulary {
    fn default() -> Self {
        Self {
            allow: DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect(),
            deny: DEFAULT_DENY_LIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn validate<I, S>(list: &'static str, entries: I) -> Result<HashSet<String>, SafetyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = HashSet::new();
    for entry in entries {
        let trimmed = entry.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SafetyError::EmptyEntry { list });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(SafetyError::EntryWithWhitespace {
                list,
                entry: trimmed.to_string(),
            });
        }
        out.insert(trimmed.to_string());
    }
    Ok(out)
}

fn sorted(set: &HashSet<String>) -> Vec<&str> {
    let mut items: Vec<&str> = set.iter().map(String::as_str).collect();
    items.sort_unstable();
    items
}
