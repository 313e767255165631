//! Safety classifier.

use serde::{Deserialize, Serialize};

use crate::command::base_command;
use crate::tier::SafetyTier;
use crate::vocabulary::SafetyVocabulary;

/// A command paired with its tier, as shown in previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCommand {
    pub command: String,
    pub tier: SafetyTier,
}

/// Maps commands to safety tiers using an injected vocabulary.
#[derive(Debug, Clone, Default)]
pub struct SafetyClassifier {
    vocabulary: SafetyVocabulary,
}

impl SafetyClassifier {
    /// Creates a classifier over the given vocabulary.
    pub fn new(vocabulary: SafetyVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Returns a reference to the vocabulary in use.
    pub fn vocabulary(&self) -> &SafetyVocabulary {
        &self.vocabulary
    }

    /// Classifies a command by its first token.
    ///
    /// The deny-list is consulted before the allow-list, so an executable
    /// listed in both is `Dangerous`. Empty input is `Unknown`.
    pub fn classify(&self, command: &str) -> SafetyTier {
        let Some(program) = base_command(command) else {
            return SafetyTier::Unknown;
        };

        if self.vocabulary.is_denied(program) {
            return SafetyTier::Dangerous;
        }

        if self.vocabulary.is_allowed(program) {
            return SafetyTier::Safe;
        }

        tracing::trace!(program, "command not in either vocabulary");
        SafetyTier::Unknown
    }

    /// Classifies each command, preserving order.
    pub fn classify_all<S: AsRef<str>>(&self, commands: &[S]) -> Vec<ClassifiedCommand> {
        commands
            .iter()
            .map(|c| ClassifiedCommand {
                command: c.as_ref().to_string(),
                tier: self.classify(c.as_ref()),
            })
            .collect()
    }
}
