//! Safety tier types.

use serde::{Deserialize, Serialize};

/// Safety tier of a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyTier {
    /// Base executable is allow-listed.
    Safe,
    /// Base executable is deny-listed.
    Dangerous,
    /// Base executable is on neither list.
    Unknown,
}

impl SafetyTier {
    /// Returns true if commands of this tier are filtered out of a batch.
    pub fn is_dangerous(&self) -> bool {
        matches!(self, SafetyTier::Dangerous)
    }

    /// Returns true if the command is allow-listed.
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyTier::Safe)
    }

    /// Operator-facing explanation shown next to a previewed command.
    pub fn describe(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "safe to run",
            SafetyTier::Dangerous => "may damage the system",
            SafetyTier::Unknown => "unrecognised command, review before running",
        }
    }
}

impl std::fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SafetyTier::Safe => write!(f, "SAFE"),
            SafetyTier::Dangerous => write!(f, "DANGEROUS"),
            SafetyTier::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
