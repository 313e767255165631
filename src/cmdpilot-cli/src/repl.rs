//! Line-based interactive shell.
//!
//! `/do <request>` runs the pipeline on a request. Model text pasted with
//! `/paste` (ended by a lone `.`) is attached to the next `/do` and then
//! dropped.

use anyhow::Result;

use cmdpilot_exec::{CommandPipeline, HistoryEntry, RunOutcome};

use crate::styled_output::{MessageType, println_dim, println_info, println_warning, styled_label};
use crate::terminal::{InputLines, show_prompt};

const PROMPT: &str = "cmdpilot> ";

/// Ends a `/paste` block.
const PASTE_TERMINATOR: &str = ".";

const HELP: &str = "\
Commands:
  /do <request>        Build commands for a request and run them
  /paste               Attach model text to the next /do (end with a lone '.')
  history              Show recently executed commands
  history clear        Clear the command history
  help                 Show this help
  exit, quit           Leave the shell";

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplFlow {
    Continue,
    Exit,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    /// `/do` with its request, possibly empty.
    Do(String),
    Paste,
    History,
    ClearHistory,
    Help,
    Exit,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match (head.to_lowercase().as_str(), rest) {
            ("/do", request) => ReplCommand::Do(request.to_string()),
            ("/paste", "") => ReplCommand::Paste,
            ("history" | "cmd-history", "") => ReplCommand::History,
            ("history" | "cmd-history", arg) if arg.eq_ignore_ascii_case("clear") => {
                ReplCommand::ClearHistory
            }
            ("help" | "/help", "") => ReplCommand::Help,
            ("exit" | "quit" | "/exit" | "/quit", "") => ReplCommand::Exit,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

/// `2026-10-18 14:03:11 [OK] mkdir -p src`
pub fn format_history_entry(entry: &HistoryEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    if entry.success {
        format!("{} [OK] {}", timestamp, entry.command)
    } else {
        format!(
            "{} [FAILED] {} ({})",
            timestamp,
            entry.command,
            entry.error.as_deref().unwrap_or("unknown error")
        )
    }
}

pub struct Repl {
    pipeline: CommandPipeline,
    input: InputLines,
    pending_response: Option<String>,
    auto_execute: bool,
}

impl Repl {
    /// `input` should be the same source the pipeline's confirmer reads.
    pub fn new(pipeline: CommandPipeline, input: InputLines, auto_execute: bool) -> Self {
        Self {
            pipeline,
            input,
            pending_response: None,
            auto_execute,
        }
    }

    pub fn pipeline(&self) -> &CommandPipeline {
        &self.pipeline
    }

    /// Model text waiting for the next `/do`.
    pub fn pending_response(&self) -> Option<&str> {
        self.pending_response.as_deref()
    }

    pub async fn run(&mut self) -> Result<()> {
        println_info("cmdpilot interactive shell. Type 'help' for commands.");
        if self.auto_execute {
            println_warning("Auto-execute is on: commands run without confirmation");
        }

        loop {
            show_prompt(PROMPT);
            let Some(line) = self.input.next_line().await? else {
                println!();
                break;
            };
            if self.handle_line(&line).await? == ReplFlow::Exit {
                break;
            }
        }

        tracing::debug!("interactive shell finished");
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<ReplFlow> {
        match ReplCommand::parse(line) {
            ReplCommand::Empty => {}
            ReplCommand::Do(request) if request.is_empty() => {
                println_warning("Usage: /do <request>");
            }
            ReplCommand::Do(request) => self.run_request(&request).await,
            ReplCommand::Paste => self.read_paste().await?,
            ReplCommand::History => self.show_history(),
            ReplCommand::ClearHistory => {
                self.pipeline.engine_mut().clear_history();
                println_dim("Command history cleared");
            }
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Exit => return Ok(ReplFlow::Exit),
            ReplCommand::Unknown(text) => {
                tracing::debug!(input = %text, "unrecognised shell input");
                println_dim("Unknown command. Use '/do <request>' or type 'help'.");
            }
        }
        Ok(ReplFlow::Continue)
    }

    async fn run_request(&mut self, request: &str) {
        let response = self.pending_response.take().unwrap_or_default();
        tracing::debug!(request, response_len = response.len(), "handling request");

        let report = self
            .pipeline
            .process(request, &response, self.auto_execute)
            .await;
        if report.outcome == RunOutcome::Empty {
            println_dim("No commands found for this request");
        }
    }

    async fn read_paste(&mut self) -> Result<()> {
        println_dim("Paste the model response, then a line with a single '.'");

        let mut lines = Vec::new();
        while let Some(line) = self.input.next_line().await? {
            if line.trim() == PASTE_TERMINATOR {
                break;
            }
            lines.push(line);
        }

        if lines.is_empty() {
            self.pending_response = None;
            println_dim("Nothing pasted");
        } else {
            println_info(&format!(
                "Attached {} line{} to the next /do",
                lines.len(),
                if lines.len() == 1 { "" } else { "s" }
            ));
            self.pending_response = Some(lines.join("\n"));
        }
        Ok(())
    }

    fn show_history(&self) {
        let entries = self.pipeline.engine().recent_history();
        if entries.is_empty() {
            println_dim("No commands executed yet");
            return;
        }

        println!("Recent commands:");
        for entry in entries {
            let line = format_history_entry(entry);
            if entry.success {
                println!("  {}", line);
            } else {
                println!("  {}", styled_label(MessageType::Error, &line));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{Local, TimeZone};
    use cmdpilot_exec::{EngineConfig, ExecutionEngine, LocalFileOps, SystemShell};
    use cmdpilot_extract::ContextualGenerator;
    use pretty_assertions::assert_eq;

    use crate::terminal::LineConfirmer;

    fn repl_in(dir: &std::path::Path, input: &str, auto_execute: bool) -> Repl {
        let input = InputLines::from_text(input);
        let engine = ExecutionEngine::new(EngineConfig {
            command_delay: Duration::ZERO,
            ..EngineConfig::default()
        })
        .with_file_ops(Arc::new(LocalFileOps::rooted(dir)))
        .with_shell(Arc::new(SystemShell::in_dir(dir)))
        .with_confirmer(Arc::new(LineConfirmer::new(input.clone())));
        let pipeline = CommandPipeline::new(ContextualGenerator::default(), engine);
        Repl::new(pipeline, input, auto_execute)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(
            ReplCommand::parse("/do buat file a.js"),
            ReplCommand::Do("buat file a.js".to_string())
        );
        assert_eq!(ReplCommand::parse("/do"), ReplCommand::Do(String::new()));
        assert_eq!(ReplCommand::parse("/paste"), ReplCommand::Paste);
        assert_eq!(ReplCommand::parse("cmd-history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse("history CLEAR"), ReplCommand::ClearHistory);
        assert_eq!(ReplCommand::parse("QUIT"), ReplCommand::Exit);
        assert_eq!(
            ReplCommand::parse("hello there"),
            ReplCommand::Unknown("hello there".to_string())
        );
        assert_eq!(
            ReplCommand::parse("history please"),
            ReplCommand::Unknown("history please".to_string())
        );
    }

    #[test]
    fn test_format_history_entry() {
        let timestamp = Local.with_ymd_and_hms(2026, 10, 18, 9, 5, 0).unwrap();
        let ok = HistoryEntry {
            command: "mkdir src".to_string(),
            timestamp,
            success: true,
            error: None,
        };
        assert_eq!(format_history_entry(&ok), "2026-10-18 09:05:00 [OK] mkdir src");

        let failed = HistoryEntry {
            command: "cp a b".to_string(),
            timestamp,
            success: false,
            error: Some("could not copy a to b".to_string()),
        };
        assert_eq!(
            format_history_entry(&failed),
            "2026-10-18 09:05:00 [FAILED] cp a b (could not copy a to b)"
        );
    }

    #[tokio::test]
    async fn test_do_runs_after_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut repl = repl_in(dir.path(), "y\n", false);

        let flow = repl.handle_line("/do buat file index.js di src").await.unwrap();

        assert_eq!(flow, ReplFlow::Continue);
        assert!(dir.path().join("src/index.js").is_file());
        assert_eq!(repl.pipeline().engine().history().len(), 2);
    }

    #[tokio::test]
    async fn test_declined_request_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut repl = repl_in(dir.path(), "n\n", false);

        repl.handle_line("/do create folder docs").await.unwrap();

        assert!(!dir.path().join("docs").exists());
        assert!(repl.pipeline().engine().history().is_empty());
    }

    #[tokio::test]
    async fn test_paste_is_used_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut repl = repl_in(dir.path(), "```bash\nmkdir pasted\n```\n.\n", true);

        repl.handle_line("/paste").await.unwrap();
        assert_eq!(repl.pending_response(), Some("```bash\nmkdir pasted\n```"));

        repl.handle_line("/do set it up").await.unwrap();
        assert!(dir.path().join("pasted").is_dir());
        assert_eq!(repl.pending_response(), None);
    }

    #[tokio::test]
    async fn test_history_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut repl = repl_in(dir.path(), "", true);

        repl.handle_line("/do create folder logs").await.unwrap();
        assert_eq!(repl.pipeline().engine().history().len(), 1);

        repl.handle_line("history").await.unwrap();
        repl.handle_line("history clear").await.unwrap();
        assert!(repl.pipeline().engine().history().is_empty());
    }

    #[tokio::test]
    async fn test_exit_and_unknown_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut repl = repl_in(dir.path(), "", false);

        assert_eq!(repl.handle_line("what now").await.unwrap(), ReplFlow::Continue);
        assert_eq!(repl.handle_line("/do").await.unwrap(), ReplFlow::Continue);
        assert_eq!(repl.handle_line("exit").await.unwrap(), ReplFlow::Exit);
    }

    #[tokio::test]
    async fn test_run_stops_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut repl = repl_in(dir.path(), "help\n/do create folder out\ny\n", false);

        repl.run().await.unwrap();

        assert!(dir.path().join("out").is_dir());
    }
}
