//! cmdpilot Exec - Confirmation-gated command execution.
//!
//! The [`ExecutionEngine`] takes a list of candidate commands, previews them
//! with their safety tier, drops dangerous ones, asks for confirmation and
//! runs the rest one by one. `mkdir`, `touch`, `cp` and `mv` go through a
//! [`FileOperations`] collaborator; everything else goes through a
//! [`ShellDispatcher`] with a timeout and an output cap.
//!
//! Every collaborator sits behind a trait so the engine can be driven
//! without touching the filesystem or spawning processes:
//!
//! | Trait | Default |
//! |---|---|
//! | [`FileOperations`] | [`LocalFileOps`] |
//! | [`ShellDispatcher`] | [`SystemShell`] |
//! | [`Confirmer`] | [`ScriptedConfirmer`] with no answers (declines) |
//! | [`Reporter`] | [`TracingReporter`] |
//!
//! [`CommandPipeline`] puts extraction, synthesis and execution together.


mod config;
mod confirm;
mod engine;
mod error;
mod file_ops;
mod history;
mod pipeline;
mod report;
mod result;
mod shell;

pub use config::{
    DEFAULT_COMMAND_DELAY, DEFAULT_HISTORY_DISPLAY_LIMIT, DEFAULT_TIMEOUT, EngineConfig,
    MAX_OUTPUT_SIZE,
};
pub use confirm::{AFFIRMATIVE_ANSWERS, AutoConfirm, Confirmer, ScriptedConfirmer, is_affirmative};
pub use engine::{CONFIRMATION_PROMPT, ExecutionEngine};
pub use error::ExecError;
pub use file_ops::{FileOperations, LocalFileOps};
pub use history::{HistoryEntry, HistoryLedger};
pub use pipeline::CommandPipeline;
pub use report::{Reporter, TracingReporter};
pub use result::{ExecutionResult, RunOutcome, RunReport, RunSummary, SummaryStatus};
pub use shell::{ShellDispatcher, ShellError, ShellOptions, ShellOutput, SystemShell};
