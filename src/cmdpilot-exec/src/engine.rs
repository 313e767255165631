//! Execution engine.
//!
//! One call to [`ExecutionEngine::run_detailed`] walks this sequence:
//!
//! ```text
//! Idle ─► Previewed ─┬─► Warned ─► FilteredDangerous ─┐
//!                    └────────────────────────────────┤
//!                                                     ▼
//!                                       AwaitingConfirmation ─► Cancelled
//!                                                     │
//!                                                     ▼
//!                                 Confirmed ─► Executing ─► Summarized ─► Idle
//! ```
//!
//! The warning and confirmation steps are skipped when `auto_execute` is set.
//! Commands run strictly one after another; a failure is recorded and the
//! next command still runs.

use std::path::Path;
use std::sync::Arc;

use cmdpilot_safety::{ClassifiedCommand, SafetyClassifier};

use crate::config::EngineConfig;
use crate::confirm::{Confirmer, ScriptedConfirmer};
use crate::file_ops::{FileOperations, LocalFileOps};
use crate::history::{HistoryEntry, HistoryLedger};
use crate::report::{Reporter, TracingReporter};
use crate::result::{ExecutionResult, RunOutcome, RunReport, RunSummary};
use crate::shell::{ShellDispatcher, SystemShell};

/// Question put to the operator before a batch runs.
pub const CONFIRMATION_PROMPT: &str = "Execute these commands?";

/// Characters that need a real shell to interpret.
const SHELL_METACHARACTERS: &[char] = &[
    '\'', '"', '`', '$', '|', '&', ';', '<', '>', '*', '?', '(', ')', '{', '}', '~', '\\',
];

/// Short options that take no argument, alone or bundled ("-rf").
const ARGUMENT_FREE_FLAGS: &[char] = &['p', 'v', 'r', 'R', 'f', 'n'];

/// Verbs the engine carries out through [`FileOperations`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum NativeOp<'a> {
    CreateDirectories(Vec<&'a str>),
    CreateFiles(Vec<&'a str>),
    Copy(&'a str, &'a str),
    Move(&'a str, &'a str),
}

impl<'a> NativeOp<'a> {
    /// Recognises a native verb with usable operands. Anything else goes to
    /// the shell.
    fn parse(command: &'a str) -> Option<Self> {
        if command.contains(SHELL_METACHARACTERS) {
            return None;
        }

        let mut tokens = command.split_whitespace();
        let verb = tokens.next()?;
        let (flags, operands): (Vec<&str>, Vec<&str>) = tokens.partition(|t| t.starts_with('-'));

        // Anything else ("-m 755", "--parents") may consume an operand.
        if !flags.iter().all(|flag| is_argument_free_flag(flag)) {
            return None;
        }

        match verb {
            "mkdir" if !operands.is_empty() => Some(Self::CreateDirectories(operands)),
            "touch" if !operands.is_empty() => Some(Self::CreateFiles(operands)),
            "cp" if operands.len() == 2 => Some(Self::Copy(operands[0], operands[1])),
            "mv" if operands.len() == 2 => Some(Self::Move(operands[0], operands[1])),
            _ => None,
        }
    }
}

fn is_argument_free_flag(flag: &str) -> bool {
    let letters = &flag[1..];
    !letters.is_empty() && letters.chars().all(|c| ARGUMENT_FREE_FLAGS.contains(&c))
}

/// Classifies, confirms and runs batches of commands, keeping a ledger of
/// everything it executed.
pub struct ExecutionEngine {
    classifier: SafetyClassifier,
    file_ops: Arc<dyn FileOperations>,
    shell: Arc<dyn ShellDispatcher>,
    confirmer: Arc<dyn Confirmer>,
    reporter: Arc<dyn Reporter>,
    config: EngineConfig,
    history: HistoryLedger,
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("classifier", &self.classifier)
            .field("config", &self.config)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl ExecutionEngine {
    /// Creates an engine on the local filesystem and system shell.
    ///
    /// The default confirmer declines every batch; install a real one with
    /// [`ExecutionEngine::with_confirmer`].
    pub fn new(config: EngineConfig) -> Self {
        Self {
            classifier: SafetyClassifier::default(),
            file_ops: Arc::new(LocalFileOps::new()),
            shell: Arc::new(SystemShell::new()),
            confirmer: Arc::new(ScriptedConfirmer::default()),
            reporter: Arc::new(TracingReporter),
            config,
            history: HistoryLedger::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: SafetyClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_file_ops(mut self, file_ops: Arc<dyn FileOperations>) -> Self {
        self.file_ops = file_ops;
        self
    }

    pub fn with_shell(mut self, shell: Arc<dyn ShellDispatcher>) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &SafetyClassifier {
        &self.classifier
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    /// The last `history_display_limit` ledger entries, oldest first.
    pub fn recent_history(&self) -> &[HistoryEntry] {
        self.history.recent(self.config.history_display_limit)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        tracing::info!("command history cleared");
    }

    /// Runs a batch and returns one result per executed command.
    ///
    /// Returns an empty list when nothing was given, everything was filtered,
    /// or the operator declined.
    pub async fn run<S: AsRef<str>>(
        &mut self,
        commands: &[S],
        auto_execute: bool,
    ) -> Vec<ExecutionResult> {
        self.run_detailed(commands, auto_execute).await.results
    }

    /// Same as [`ExecutionEngine::run`], also reporting what was filtered and
    /// how the run ended.
    pub async fn run_detailed<S: AsRef<str>>(
        &mut self,
        commands: &[S],
        auto_execute: bool,
    ) -> RunReport {
        let commands: Vec<&str> = commands
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .collect();

        if commands.is_empty() {
            tracing::debug!("no commands to run");
            return RunReport::without_results(RunOutcome::Empty, Vec::new());
        }

        let classified = self.classifier.classify_all(&commands);
        tracing::info!(count = classified.len(), auto_execute, "previewing commands");
        self.reporter.preview(&classified);

        let (rejected, runnable): (Vec<ClassifiedCommand>, Vec<ClassifiedCommand>) = classified
            .into_iter()
            .partition(|c| !auto_execute && c.tier.is_dangerous());

        if !rejected.is_empty() {
            for c in &rejected {
                tracing::warn!(command = %c.command, "dangerous command filtered");
            }
            self.reporter.dangerous_rejected(&rejected);
        }

        if runnable.is_empty() {
            tracing::info!("no safe commands to execute");
            self.reporter.nothing_to_run();
            return RunReport::without_results(RunOutcome::NothingToRun, rejected);
        }

        if !auto_execute && !self.confirmer.ask_yes_no(CONFIRMATION_PROMPT).await {
            tracing::info!("execution cancelled by operator");
            self.reporter.cancelled();
            return RunReport::without_results(RunOutcome::Cancelled, rejected);
        }

        let total = runnable.len();
        let mut results = Vec::with_capacity(total);
        for (i, candidate) in runnable.iter().enumerate() {
            self.reporter.running(i + 1, total, &candidate.command);

            let result = self.execute_one(&candidate.command).await;
            if !result.success {
                tracing::warn!(
                    command = %result.command,
                    error = result.error.as_deref().unwrap_or(""),
                    "command failed"
                );
            }
            self.history.record(HistoryEntry::from(&result));
            self.reporter.finished(&result);
            results.push(result);

            if i + 1 < total && !self.config.command_delay.is_zero() {
                tokio::time::sleep(self.config.command_delay).await;
            }
        }

        let summary = RunSummary::from_results(&results);
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "execution finished"
        );
        self.reporter.summary(&summary);

        RunReport {
            outcome: RunOutcome::Completed,
            rejected,
            results,
            summary,
        }
    }

    async fn execute_one(&self, command: &str) -> ExecutionResult {
        match NativeOp::parse(command) {
            Some(op) => {
                tracing::debug!(command, ?op, "native dispatch");
                self.execute_native(command, op).await
            }
            None => {
                tracing::debug!(command, "shell dispatch");
                self.execute_shell(command).await
            }
        }
    }

    async fn execute_native(&self, command: &str, op: NativeOp<'_>) -> ExecutionResult {
        let outcome = match op {
            NativeOp::CreateDirectories(paths) => self.create_each(&paths, true).await,
            NativeOp::CreateFiles(paths) => self.create_each(&paths, false).await,
            NativeOp::Copy(from, to) => {
                if self.file_ops.copy_path(Path::new(from), Path::new(to)).await {
                    Ok(format!("copied {from} to {to}"))
                } else {
                    Err(format!("could not copy {from} to {to}"))
                }
            }
            NativeOp::Move(from, to) => {
                if self.file_ops.move_path(Path::new(from), Path::new(to)).await {
                    Ok(format!("moved {from} to {to}"))
                } else {
                    Err(format!("could not move {from} to {to}"))
                }
            }
        };

        match outcome {
            Ok(output) => ExecutionResult::succeeded(command, output),
            Err(error) => ExecutionResult::failed(command, error),
        }
    }

    /// Creates each path in order, stopping at the first failure.
    async fn create_each(&self, paths: &[&str], directories: bool) -> Result<String, String> {
        let (done, failed) = if directories {
            ("created directory", "could not create directory")
        } else {
            ("created file", "could not create file")
        };

        let mut lines = Vec::with_capacity(paths.len());
        for path in paths {
            let created = if directories {
                self.file_ops.create_directory(Path::new(path)).await
            } else {
                self.file_ops.create_file(Path::new(path)).await
            };
            if !created {
                return Err(format!("{failed} {path}"));
            }
            lines.push(format!("{done} {path}"));
        }
        Ok(lines.join("\n"))
    }

    async fn execute_shell(&self, command: &str) -> ExecutionResult {
        match self.shell.run(command, &self.config.shell_options()).await {
            Ok(output) => ExecutionResult::succeeded(command, output.text()),
            Err(err) => ExecutionResult::failed(command, err.to_string()),
        }
    }
}
