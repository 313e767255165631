//! Confirmation gate.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

/// Answers accepted as "yes", compared case-insensitively after trimming.
pub const AFFIRMATIVE_ANSWERS: &[&str] = &["y", "yes", "ya"];

/// Whether a free-form answer counts as consent.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    AFFIRMATIVE_ANSWERS
        .iter()
        .any(|a| a.eq_ignore_ascii_case(answer))
}

/// Asks the operator a yes/no question.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn ask_yes_no(&self, prompt: &str) -> bool;
}

/// Approves everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Confirmer for AutoConfirm {
    async fn ask_yes_no(&self, _prompt: &str) -> bool {
        true
    }
}

/// Replays canned answers in order; declines once they run out.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts asked so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn ask_yes_no(&self, prompt: &str) -> bool {
        self.prompts.lock().push(prompt.to_string());
        let answer = self.answers.lock().pop_front().unwrap_or_default();
        is_affirmative(&answer)
    }
}
