//! cmdpilot Safety - Safety tier classification for shell commands.
//!
//! Every command proposed by the model or synthesized from the user's
//! request is assigned one of three tiers:
//! - `Safe` - base executable is on the allow-list
//! - `Dangerous` - base executable is on the deny-list
//! - `Unknown` - neither list mentions it
//!
//! Only the first whitespace-delimited token is inspected. Arguments never
//! change the tier, so `rm -i notes.txt` is exactly as dangerous as
//! `rm -rf /`.
//!
//! # Lookup Order
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │          Command (first token)             │
//! └────────────────────┬───────────────────────┘
//!                      │
//!                      ▼
//! ┌────────────────────────────────────────────┐
//! │          On the deny-list?                 │
//! └────────────────────┬───────────────────────┘
//!        ┌─────────────┴─────────────┐
//!        ▼                           ▼
//!      [Yes]                        [No]
//!        │                           │
//!        ▼                           ▼
//!  ┌───────────┐           ┌───────────────────┐
//!  │ DANGEROUS │           │ On the allow-list?│
//!  └───────────┘           └─────────┬─────────┘
//!                        ┌───────────┴───────────┐
//!                        ▼                       ▼
//!                      [Yes]                    [No]
//!                        │                       │
//!                        ▼                       ▼
//!                   ┌─────────┐            ┌─────────┐
//!                   │  SAFE   │            │ UNKNOWN │
//!                   └─────────┘            └─────────┘
//! ```

#[cfg(test)]
mod tests;

mod classifier;
mod command;
mod error;
mod tier;
mod vocabulary;

pub use classifier::{ClassifiedCommand, SafetyClassifier};
pub use command::base_command;
pub use error::SafetyError;
pub use tier::SafetyTier;
pub use vocabulary::{DEFAULT_ALLOW_LIST, DEFAULT_DENY_LIST, SafetyVocabulary};

/// Quick classification with the default vocabularies.
pub fn classify(command: &str) -> SafetyTier {
    SafetyClassifier::default().classify(command)
}
