//! Terminal-facing collaborators for the execution engine.
//!
//! [`InputLines`] is the single line source shared by the REPL and the
//! confirmation prompt, so both read from the same buffered stdin.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use cmdpilot_exec::{Confirmer, ExecutionResult, Reporter, RunSummary, SummaryStatus, is_affirmative};
use cmdpilot_safety::ClassifiedCommand;

use crate::styled_output::{
    MessageType, println_dim, println_error, println_info, println_success, println_warning,
    styled_label, tier_label,
};

type LineSource = Box<dyn AsyncBufRead + Unpin + Send>;

/// Shared, line-oriented operator input.
#[derive(Clone)]
pub struct InputLines {
    reader: Arc<Mutex<LineSource>>,
}

impl InputLines {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        Self {
            reader: Arc::new(Mutex::new(Box::new(reader))),
        }
    }

    /// Canned input, one line per `\n`.
    pub fn from_text(text: &str) -> Self {
        Self::from_reader(std::io::Cursor::new(text.as_bytes().to_vec()))
    }

    /// Next line without its line ending, or `None` at end of input.
    pub async fn next_line(&self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let read = self.reader.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Print `prompt` without a newline and flush stdout.
pub fn show_prompt(prompt: &str) {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "{}", prompt);
    let _ = stdout.flush();
}

/// Asks on stdout and reads the answer from [`InputLines`].
///
/// End of input or a read error counts as "no".
#[derive(Clone)]
pub struct LineConfirmer {
    input: InputLines,
}

impl LineConfirmer {
    pub fn new(input: InputLines) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirmer for LineConfirmer {
    async fn ask_yes_no(&self, prompt: &str) -> bool {
        show_prompt(&confirmation_text(prompt));
        match self.input.next_line().await {
            Ok(Some(answer)) => is_affirmative(&answer),
            Ok(None) => {
                println!();
                tracing::debug!("end of input at confirmation prompt");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation answer");
                false
            }
        }
    }
}

pub fn confirmation_text(prompt: &str) -> String {
    format!("{} (y/N): ", prompt)
}

/// `  1. [SAFE] mkdir -p src`
pub fn preview_line(index: usize, tier: &str, command: &str) -> String {
    format!("  {}. {} {}", index, tier, command)
}

/// `[2/3] Running: touch src/index.js`
pub fn progress_line(index: usize, total: usize, command: &str) -> String {
    format!("[{}/{}] Running: {}", index, total, command)
}

pub fn summary_line(summary: &RunSummary) -> String {
    match summary.status() {
        SummaryStatus::AllSucceeded => format!(
            "All {} command{} completed successfully",
            summary.total,
            if summary.total == 1 { "" } else { "s" }
        ),
        SummaryStatus::MostlySucceeded | SummaryStatus::MostlyFailed => format!(
            "{} of {} commands succeeded, {} failed",
            summary.succeeded, summary.total, summary.failed
        ),
    }
}

/// Text printed after a command ran.
pub fn result_line(result: &ExecutionResult) -> String {
    if result.success {
        let output = result.output.as_deref().unwrap_or("").trim();
        if output.is_empty() {
            format!("Done: {}", result.command)
        } else {
            format!("Done: {}\n{}", result.command, indent(output))
        }
    } else {
        format!(
            "Failed: {}: {}",
            result.command,
            result.error.as_deref().unwrap_or("unknown error")
        )
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders engine progress on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn preview(&self, commands: &[ClassifiedCommand]) {
        println!();
        println!("Commands to execute:");
        for (i, c) in commands.iter().enumerate() {
            println!("{}", preview_line(i + 1, &tier_label(c.tier), &c.command));
        }
        println!();
    }

    fn dangerous_rejected(&self, rejected: &[ClassifiedCommand]) {
        println_warning("Dangerous commands will be skipped:");
        for c in rejected {
            println!("    {}", styled_label(MessageType::Error, &c.command));
        }
    }

    fn nothing_to_run(&self) {
        println_info("No safe commands to execute");
    }

    fn cancelled(&self) {
        println_dim("Execution cancelled");
    }

    fn running(&self, index: usize, total: usize, command: &str) {
        println_info(&progress_line(index, total, command));
    }

    fn finished(&self, result: &ExecutionResult) {
        if result.success {
            println_success(&result_line(result));
        } else {
            println_error(&result_line(result));
        }
    }

    fn summary(&self, summary: &RunSummary) {
        println!();
        let line = summary_line(summary);
        match summary.status() {
            SummaryStatus::AllSucceeded => println_success(&line),
            SummaryStatus::MostlySucceeded => println_warning(&line),
            SummaryStatus::MostlyFailed => println_error(&line),
        }
        for (command, error) in &summary.failures {
            println!("    {}: {}", command, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_input_lines_strip_line_endings() {
        let input = InputLines::from_text("first\r\nsecond\nlast");
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("last"));
        assert_eq!(input.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_one_reader() {
        let input = InputLines::from_text("a\nb\n");
        let other = input.clone();
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("a"));
        assert_eq!(other.next_line().await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_line_confirmer_answers() {
        let confirmer = LineConfirmer::new(InputLines::from_text("YA\nn\n"));
        assert!(confirmer.ask_yes_no("Execute these commands?").await);
        assert!(!confirmer.ask_yes_no("Execute these commands?").await);
        // input exhausted
        assert!(!confirmer.ask_yes_no("Execute these commands?").await);
    }

    #[test]
    fn test_confirmation_text() {
        assert_eq!(
            confirmation_text("Execute these commands?"),
            "Execute these commands? (y/N): "
        );
    }

    #[test]
    fn test_preview_and_progress_lines() {
        assert_eq!(preview_line(1, "[SAFE]", "mkdir -p src"), "  1. [SAFE] mkdir -p src");
        assert_eq!(
            progress_line(2, 3, "touch src/index.js"),
            "[2/3] Running: touch src/index.js"
        );
    }

    #[test]
    fn test_summary_lines() {
        let ok = RunSummary::from_results(&[ExecutionResult::succeeded("ls", "")]);
        assert_eq!(summary_line(&ok), "All 1 command completed successfully");

        let mixed = RunSummary::from_results(&[
            ExecutionResult::succeeded("ls", ""),
            ExecutionResult::succeeded("pwd", ""),
            ExecutionResult::failed("cat nope", "no such file"),
        ]);
        assert_eq!(summary_line(&mixed), "2 of 3 commands succeeded, 1 failed");
    }

    #[test]
    fn test_result_lines() {
        assert_eq!(
            result_line(&ExecutionResult::succeeded("mkdir src", "created directory src")),
            "Done: mkdir src\n    created directory src"
        );
        assert_eq!(
            result_line(&ExecutionResult::succeeded("true", "  ")),
            "Done: true"
        );
        assert_eq!(
            result_line(&ExecutionResult::failed("cp a b", "could not copy a to b")),
            "Failed: cp a b: could not copy a to b"
        );
    }
}
