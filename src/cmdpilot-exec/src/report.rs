//! Operator-visibility sink.

use cmdpilot_safety::ClassifiedCommand;

use crate::result::{ExecutionResult, RunSummary, SummaryStatus};

/// Receives engine progress as it happens.
pub trait Reporter: Send + Sync {
    /// Every candidate with its tier, before anything is filtered.
    fn preview(&self, commands: &[ClassifiedCommand]);

    /// Dangerous commands that will not run.
    fn dangerous_rejected(&self, rejected: &[ClassifiedCommand]);

    /// Filtering left nothing to execute.
    fn nothing_to_run(&self) {}

    fn cancelled(&self);

    /// Called before dispatch. `index` is 1-based.
    fn running(&self, index: usize, total: usize, command: &str);

    fn finished(&self, result: &ExecutionResult);

    fn summary(&self, summary: &RunSummary);
}

/// Writes progress to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn preview(&self, commands: &[ClassifiedCommand]) {
        for (i, c) in commands.iter().enumerate() {
            tracing::info!(index = i + 1, tier = %c.tier, command = %c.command, "proposed command");
        }
    }

    fn dangerous_rejected(&self, rejected: &[ClassifiedCommand]) {
        for c in rejected {
            tracing::warn!(command = %c.command, "skipping dangerous command");
        }
    }

    fn nothing_to_run(&self) {
        tracing::info!("no safe commands to execute");
    }

    fn cancelled(&self) {
        tracing::info!("execution cancelled");
    }

    fn running(&self, index: usize, total: usize, command: &str) {
        tracing::info!(index, total, command, "running");
    }

    fn finished(&self, result: &ExecutionResult) {
        if result.success {
            tracing::info!(command = %result.command, "command succeeded");
        } else {
            tracing::warn!(
                command = %result.command,
                error = result.error.as_deref().unwrap_or(""),
                "command failed"
            );
        }
    }

    fn summary(&self, summary: &RunSummary) {
        match summary.status() {
            SummaryStatus::AllSucceeded => tracing::info!(
                succeeded = summary.succeeded,
                total = summary.total,
                "all commands succeeded"
            ),
            _ => tracing::warn!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                total = summary.total,
                "some commands failed"
            ),
        }
    }
}
