//! Command handlers and dispatch.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;

use cmdpilot_exec::{CommandPipeline, ExecutionEngine, RunOutcome};
use cmdpilot_extract::{ContextualGenerator, extract_commands};
use cmdpilot_safety::{ClassifiedCommand, SafetyClassifier};

use super::args::{ClassifyArgs, Cli, Commands, ExtractArgs, RunArgs, ShellArgs};
use crate::config::{CmdpilotConfig, load_config};
use crate::repl::Repl;
use crate::styled_output::{print_info, print_warning, println_dim, tier_label};
use crate::terminal::{InputLines, LineConfirmer, TerminalReporter, preview_line};

/// Value of `--response` that means "read stdin".
const STDIN_MARKER: &str = "-";

/// Dispatch the parsed command line.
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        None => run_shell(&config, ShellArgs::default()).await,
        Some(Commands::Shell(args)) => run_shell(&config, args).await,
        Some(Commands::Run(args)) => run_once(&config, args).await,
        Some(Commands::Extract(args)) => run_extract(&config, args).await,
        Some(Commands::Classify(args)) => run_classify(&config, args),
    }
}

/// Pipeline wired to the terminal, confirming through `input`.
pub fn build_pipeline(config: &CmdpilotConfig, input: InputLines) -> Result<CommandPipeline> {
    let engine = ExecutionEngine::new(config.engine_config()?)
        .with_classifier(config.classifier()?)
        .with_confirmer(Arc::new(LineConfirmer::new(input)))
        .with_reporter(Arc::new(TerminalReporter));
    let generator = ContextualGenerator::new(config.synthesis_options()?);
    Ok(CommandPipeline::new(generator, engine))
}

async fn run_shell(config: &CmdpilotConfig, args: ShellArgs) -> Result<()> {
    let input = InputLines::stdin();
    let pipeline = build_pipeline(config, input.clone())?;
    Repl::new(pipeline, input, args.yes).run().await
}

async fn run_once(config: &CmdpilotConfig, args: RunArgs) -> Result<()> {
    let prompt = args.prompt_text();
    let response = match (&args.response_file, args.response.as_deref()) {
        (Some(path), _) => read_response_file(path).await?,
        (None, Some(STDIN_MARKER)) => read_stdin().await?,
        (None, Some(text)) => text.to_string(),
        (None, None) => String::new(),
    };

    let mut pipeline = build_pipeline(config, InputLines::stdin())?;

    if args.dry_run {
        let candidates = pipeline.candidates(&prompt, &response);
        let classified = pipeline.engine().classifier().classify_all(&candidates);
        print_dry_run(&classified);
        return Ok(());
    }

    if args.yes {
        print_warning("--yes runs every command without confirmation, dangerous ones included");
    }

    let report = pipeline.process(&prompt, &response, args.yes).await;
    match report.outcome {
        RunOutcome::Empty => println_dim("No commands found for this request"),
        RunOutcome::Completed if report.summary.failed > 0 => bail!(
            "{} of {} commands failed",
            report.summary.failed,
            report.summary.total
        ),
        _ => {}
    }
    Ok(())
}

fn print_dry_run(classified: &[ClassifiedCommand]) {
    if classified.is_empty() {
        println_dim("No commands found for this request");
        return;
    }

    println!("Commands that would run:");
    for (i, c) in classified.iter().enumerate() {
        println!("{}", preview_line(i + 1, &tier_label(c.tier), &c.command));
    }

    let dangerous = classified.iter().filter(|c| c.tier.is_dangerous()).count();
    if dangerous > 0 {
        print_warning(&format!(
            "{} dangerous command{} would be skipped without --yes",
            dangerous,
            if dangerous == 1 { "" } else { "s" }
        ));
    }
}

async fn run_extract(config: &CmdpilotConfig, args: ExtractArgs) -> Result<()> {
    let text = match &args.response_file {
        Some(path) => read_response_file(path).await?,
        None => read_stdin().await?,
    };

    let classified = classify_extracted(&config.classifier()?, &text);
    if classified.is_empty() {
        print_info("No commands found");
        return Ok(());
    }

    for c in &classified {
        println!("{} {}", tier_label(c.tier), c.command);
    }
    Ok(())
}

/// Commands found in `text`, with their tiers.
pub fn classify_extracted(classifier: &SafetyClassifier, text: &str) -> Vec<ClassifiedCommand> {
    classifier.classify_all(&extract_commands(text))
}

fn run_classify(config: &CmdpilotConfig, args: ClassifyArgs) -> Result<()> {
    let command = args.command_text();
    let tier = config.classifier()?.classify(&command);
    tracing::debug!(command = %command, tier = %tier, "classified");
    println!("{} {}", tier_label(tier), tier.describe());
    Ok(())
}

async fn read_response_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read response file {}", path.display()))
}

async fn read_stdin() -> Result<String> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read response from stdin")?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdpilot_safety::SafetyTier;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_pipeline_uses_config() {
        let config = CmdpilotConfig::from_toml(
            "[safety]\ndeny = [\"curl\"]\n[execution]\nhistory_display_limit = 2\n",
            Path::new("test.toml"),
        )
        .unwrap();

        let pipeline = build_pipeline(&config, InputLines::from_text("")).unwrap();

        assert_eq!(pipeline.engine().config().history_display_limit, 2);
        assert_eq!(
            pipeline.engine().classifier().classify("curl example.com"),
            SafetyTier::Dangerous
        );
    }

    #[test]
    fn test_build_pipeline_rejects_bad_config() {
        let config = CmdpilotConfig::from_toml(
            "[synthesis]\ndefault_package_manager = \"brew\"\n",
            Path::new("test.toml"),
        )
        .unwrap();
        assert!(build_pipeline(&config, InputLines::from_text("")).is_err());
    }

    #[test]
    fn test_classify_extracted() {
        let text = "Run this:\n```bash\nmkdir -p src\nrm -rf build\n```\n";
        let classified = classify_extracted(&SafetyClassifier::default(), text);

        let tiers: Vec<(&str, SafetyTier)> = classified
            .iter()
            .map(|c| (c.command.as_str(), c.tier))
            .collect();
        assert_eq!(
            tiers,
            vec![
                ("mkdir -p src", SafetyTier::Safe),
                ("rm -rf build", SafetyTier::Dangerous),
            ]
        );
    }

    #[tokio::test]
    async fn test_read_response_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.md");
        std::fs::write(&path, "touch a.txt\n").unwrap();

        assert_eq!(read_response_file(&path).await.unwrap(), "touch a.txt\n");
        assert!(read_response_file(&dir.path().join("missing.md")).await.is_err());
    }

    #[test]
    fn test_dry_run_candidates_merge_response_and_prompt() {
        let pipeline = build_pipeline(&CmdpilotConfig::default(), InputLines::from_text("")).unwrap();

        let candidates = pipeline.candidates(
            "buat file index.js di src",
            "```sh\nmkdir -p src\nnpm init -y\n```",
        );

        assert_eq!(
            candidates,
            vec!["mkdir -p src", "npm init -y", "touch src/index.js"]
        );
    }
}
