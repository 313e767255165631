//! Intent inference from the user's request.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Coarse category of user goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CreateFile,
    MoveFile,
    CopyFile,
    DeleteFile,
    ModifyCode,
    InstallPackage,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CreateFile => "create_file",
            Intent::MoveFile => "move_file",
            Intent::CopyFile => "copy_file",
            Intent::DeleteFile => "delete_file",
            Intent::ModifyCode => "modify_code",
            Intent::InstallPackage => "install_package",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of inferred intents. Ordering carries no meaning.
pub type IntentSet = BTreeSet<Intent>;

/// One pattern per intent, each evaluated independently.
///
/// A bare Indonesian verb such as "buat" (also inside "membuat") is enough.
/// The short English aliases need an object noun later in the sentence.
static INTENT_PATTERNS: LazyLock<Vec<(Intent, Regex)>> = LazyLock::new(|| {
    [
        (
            Intent::CreateFile,
            r"(?i)buat|create|bikin.*?(?:file|folder|direktori|directory)",
        ),
        (Intent::MoveFile, r"(?i)pindah|move|mv.*?(?:file|folder)"),
        (Intent::CopyFile, r"(?i)copy|salin|cp.*?(?:file|folder)"),
        (
            Intent::DeleteFile,
            r"(?i)hapus|delete|remove|rm.*?(?:file|folder)",
        ),
        (
            Intent::ModifyCode,
            r"(?i)ubah|edit|modify|change.*?(?:code|kode|file)",
        ),
        (
            Intent::InstallPackage,
            r"(?i)install|pasang.*?(?:package|npm|yarn)",
        ),
    ]
    .into_iter()
    .map(|(intent, pattern)| {
        (
            intent,
            Regex::new(pattern).expect("intent regex patterns are valid"),
        )
    })
    .collect()
});

/// Infers every intent whose pattern matches the request.
pub fn infer_intents(prompt: &str) -> IntentSet {
    let intents: IntentSet = INTENT_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(prompt))
        .map(|(intent, _)| *intent)
        .collect();
    tracing::debug!(?intents, "inferred intents");
    intents
}
