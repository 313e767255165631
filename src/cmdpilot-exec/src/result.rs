//! Per-command results and run summaries.

use cmdpilot_safety::ClassifiedCommand;
use serde::{Deserialize, Serialize};

/// Outcome of one command. Exactly one of `output` and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub command: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: true,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failed(command: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: false,
            output: None,
            error: Some(error.into()),
        }
    }
}

/// How a run went overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    AllSucceeded,
    /// Some failures, but fewer than successes.
    MostlySucceeded,
    MostlyFailed,
}

/// Counts and failures of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    /// `(command, error)` for every failed command, in run order.
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let failures: Vec<(String, String)> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| (r.command.clone(), r.error.clone().unwrap_or_default()))
            .collect();

        Self {
            succeeded: results.len() - failures.len(),
            failed: failures.len(),
            total: results.len(),
            failures,
        }
    }

    pub fn status(&self) -> SummaryStatus {
        if self.failed == 0 {
            SummaryStatus::AllSucceeded
        } else if self.failed < self.succeeded {
            SummaryStatus::MostlySucceeded
        } else {
            SummaryStatus::MostlyFailed
        }
    }
}

/// Terminal state of one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// No commands were given.
    Empty,
    /// Every command was filtered as dangerous.
    NothingToRun,
    /// The operator declined.
    Cancelled,
    Completed,
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Dangerous commands removed before confirmation.
    pub rejected: Vec<ClassifiedCommand>,
    pub results: Vec<ExecutionResult>,
    pub summary: RunSummary,
}

impl RunReport {
    pub(crate) fn without_results(outcome: RunOutcome, rejected: Vec<ClassifiedCommand>) -> Self {
        Self {
            outcome,
            rejected,
            results: Vec::new(),
            summary: RunSummary::default(),
        }
    }
}
