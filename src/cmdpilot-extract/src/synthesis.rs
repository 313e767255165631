//! Contextual command synthesis.
//!
//! Builds commands straight from the user's request, independent of what
//! the model answered. Every rule is an ordered pattern table so that
//! priority lives in data:
//!
//! 1. copy/move with explicit endpoints ([`TRANSFER_PATTERNS`])
//! 2. package installation ([`PACKAGE_MANAGERS`])
//! 3. file/folder creation ([`NAME_PATTERNS`])
//! 4. directory listing
//!
//! Deletion is never synthesized. Only the model's own suggestion can
//! introduce a delete, and the engine filters it as dangerous.

use std::sync::LazyLock;

use regex::Regex;

use crate::intent::{Intent, IntentSet, infer_intents};

/// Name used when no naming pattern matches.
pub const DEFAULT_PLACEHOLDER_NAME: &str = "new-file";

/// A package manager the request may mention by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageManager {
    /// Word that selects this manager in the request.
    pub name: &'static str,
    /// Command prefix the package list is appended to.
    pub install: &'static str,
}

/// Known package managers, checked in order.
pub const PACKAGE_MANAGERS: &[PackageManager] = &[
    PackageManager {
        name: "npm",
        install: "npm install",
    },
    PackageManager {
        name: "yarn",
        install: "yarn add",
    },
    PackageManager {
        name: "pnpm",
        install: "pnpm add",
    },
    PackageManager {
        name: "pip",
        install: "pip install",
    },
];

impl PackageManager {
    /// Looks up a manager by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static PackageManager> {
        PACKAGE_MANAGERS
            .iter()
            .find(|pm| pm.name.eq_ignore_ascii_case(name))
    }
}

/// Words that end the package list: "install express pakai yarn".
const PACKAGE_LIST_TERMINATORS: &[&str] = &[
    "with",
    "using",
    "via",
    "for",
    "to",
    "in",
    "into",
    "pakai",
    "pake",
    "dengan",
    "menggunakan",
    "lewat",
    "untuk",
    "di",
    "ke",
];

/// Words that join package names: "install express and lodash".
const PACKAGE_LIST_CONJUNCTIONS: &[&str] = &["and", "dan"];

/// Words that are never package names.
const PACKAGE_LIST_FILLER: &[&str] = &["package", "packages", "paket", "library", "module"];

/// Words a naming pattern can capture that never name a target.
const NAME_STOPWORDS: &[&str] = &[
    "file",
    "files",
    "folder",
    "direktori",
    "directory",
    "buat",
    "create",
    "bikin",
    "new",
    "baru",
    "a",
    "an",
    "the",
];

/// `<verb> <src> (ke|to) <dst>`, copy before move; the first match wins.
///
/// Verbs only match as whole words, so "scp" and "remove" do not count.
pub static TRANSFER_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "cp",
            r#"(?i)\b(?:copy|salin|cp)\s+['"]?([^'".\s]+(?:\.[a-z]+)?)['"]?\s+(?:ke|to)\s+['"]?([^'"\s]+)['"]?"#,
        ),
        (
            "mv",
            r#"(?i)\b(?:move|mv|pindah(?:kan)?)\s+['"]?([^'".\s]+(?:\.[a-z]+)?)['"]?\s+(?:ke|to)\s+['"]?([^'"\s]+)['"]?"#,
        ),
    ]
    .into_iter()
    .map(|(program, pattern)| {
        (
            program,
            Regex::new(pattern).expect("transfer regex patterns are valid"),
        )
    })
    .collect()
});

/// Target-name patterns, most explicit first. Group 1 is the name.
pub static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "file index.js", "folder called components"
        r#"(?i)\b(?:file|folder|direktori|directory)\s+(?:(?:called|named|bernama|namanya)\s+)?['"]?([^'".\s]+(?:\.[a-z]+)?)['"]?"#,
        // "buat components", "create a new app.py"
        r#"(?i)(?:buat|create|bikin)\s+(?:(?:a|an|the|new|sebuah|baru)\s+)*(?:file|folder|direktori|directory)?\s*['"]?([^'".\s]+(?:\.[a-z]+)?)['"]?"#,
        // "'notes'"
        r#"['"]([^'".\s]+(?:\.[a-z]+)?)['"]"#,
        // "app.tsx"
        r"(?i)\b([a-zA-Z0-9_-]+\.(?:js|ts|jsx|tsx|py|java|cpp|c|php|rb|go|rs|html|css|json|md|txt))\b",
        // "components folder"
        r"(?i)\b([a-zA-Z0-9_-]+)\s*(?:folder|direktori|directory)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("name regex patterns are valid"))
    .collect()
});

static INSTALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:install|pasang)\s+([a-zA-Z0-9@_./-]+(?:[\s,&]+[a-zA-Z0-9@_./-]+)*)")
        .expect("install regex is valid")
});

static FOLDER_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)folder|direktori|directory").expect("folder regex is valid")
});

static CONTAINING_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:di|in|dalam)\s+([a-zA-Z0-9/_-]+)").expect("path regex is valid")
});

static LISTING_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:list|tampilkan|show)\s+(?:file|folder|direktori)")
        .expect("listing regex is valid")
});

/// Tunables for synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Name used for create requests that name nothing.
    pub placeholder_name: String,
    /// Manager used when the request names none.
    pub default_package_manager: &'static PackageManager,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            placeholder_name: DEFAULT_PLACEHOLDER_NAME.to_string(),
            default_package_manager: &PACKAGE_MANAGERS[0],
        }
    }
}

/// Infers intents and synthesizes commands from a natural-language request.
#[derive(Debug, Clone, Default)]
pub struct ContextualGenerator {
    options: SynthesisOptions,
}

impl ContextualGenerator {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// See [`infer_intents`].
    pub fn infer_intents(&self, prompt: &str) -> IntentSet {
        infer_intents(prompt)
    }

    /// Infers intents, then synthesizes from them.
    pub fn generate(&self, prompt: &str) -> Vec<String> {
        let intents = self.infer_intents(prompt);
        self.synthesize(prompt, &intents)
    }

    /// Synthesizes candidate commands for a request.
    pub fn synthesize(&self, prompt: &str, intents: &IntentSet) -> Vec<String> {
        let mut commands = Vec::new();

        let transfer = transfer_command(prompt);
        let has_transfer = transfer.is_some();
        commands.extend(transfer);

        if intents.contains(&Intent::InstallPackage) {
            commands.extend(self.install_command(prompt));
        }

        // An explicit copy/move already says what to do with the named file.
        if intents.contains(&Intent::CreateFile) && !has_transfer {
            commands.extend(self.create_commands(prompt));
        }

        if LISTING_REQUEST.is_match(prompt) {
            commands.push("ls -la".to_string());
        }

        commands.retain(|c| !c.trim().is_empty());
        tracing::debug!(?commands, "synthesized commands");
        commands
    }

    fn install_command(&self, prompt: &str) -> Option<String> {
        let caps = INSTALL_PATTERN.captures(prompt)?;

        let packages: Vec<&str> = caps[1]
            .split(|c: char| c.is_whitespace() || matches!(c, ',' | '&'))
            .filter(|token| !token.is_empty())
            .take_while(|token| {
                !PACKAGE_LIST_TERMINATORS
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(token))
            })
            .map(|token| token.trim_end_matches('.'))
            .filter(|token| {
                !token.is_empty()
                    && PackageManager::by_name(token).is_none()
                    && !PACKAGE_LIST_CONJUNCTIONS
                        .iter()
                        .any(|c| c.eq_ignore_ascii_case(token))
                    && !PACKAGE_LIST_FILLER
                        .iter()
                        .any(|f| f.eq_ignore_ascii_case(token))
            })
            .collect();

        if packages.is_empty() {
            return None;
        }

        let manager =
            mentioned_package_manager(prompt).unwrap_or(self.options.default_package_manager);
        Some(format!("{} {}", manager.install, packages.join(" ")))
    }

    fn create_commands(&self, prompt: &str) -> Vec<String> {
        let name = resolve_target_name(prompt)
            .unwrap_or_else(|| self.options.placeholder_name.clone());
        let program = if FOLDER_MENTION.is_match(prompt) {
            "mkdir"
        } else {
            "touch"
        };

        match containing_path(prompt) {
            Some(path) => vec![
                format!("mkdir -p {path}"),
                format!("{program} {path}/{name}"),
            ],
            None => vec![format!("{program} {name}")],
        }
    }
}

/// First copy/move phrasing in the request, as a `cp`/`mv` command.
fn transfer_command(prompt: &str) -> Option<String> {
    TRANSFER_PATTERNS.iter().find_map(|(program, pattern)| {
        pattern
            .captures(prompt)
            .map(|caps| format!("{program} {} {}", &caps[1], &caps[2]))
    })
}

/// First name produced by the ordered naming table.
fn resolve_target_name(prompt: &str) -> Option<String> {
    NAME_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(prompt)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| {
                !name.is_empty() && !NAME_STOPWORDS.iter().any(|w| w.eq_ignore_ascii_case(name))
            })
    })
}

fn containing_path(prompt: &str) -> Option<String> {
    let caps = CONTAINING_PATH.captures(prompt)?;
    let path = caps[1].trim_end_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

fn mentioned_package_manager(prompt: &str) -> Option<&'static PackageManager> {
    let words: Vec<String> = prompt
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    PACKAGE_MANAGERS
        .iter()
        .find(|pm| words.iter().any(|w| w == pm.name))
}
