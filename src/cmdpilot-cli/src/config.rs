//! Configuration loading.
//!
//! The config file is looked up in this order:
//! 1. `--config <PATH>` (must exist)
//! 2. `CMDPILOT_CONFIG` environment variable
//! 3. `$CMDPILOT_HOME/config.toml`
//! 4. `~/.cmdpilot/config.toml`
//!
//! Only an explicit `--config` path is required to exist; otherwise a
//! missing file means defaults. The file is never written.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use cmdpilot_exec::{
    DEFAULT_COMMAND_DELAY, DEFAULT_HISTORY_DISPLAY_LIMIT, DEFAULT_TIMEOUT, EngineConfig,
    MAX_OUTPUT_SIZE,
};
use cmdpilot_extract::{DEFAULT_PLACEHOLDER_NAME, PACKAGE_MANAGERS, PackageManager, SynthesisOptions};
use cmdpilot_safety::{SafetyClassifier, SafetyVocabulary};

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable for a custom config file path.
pub const CMDPILOT_CONFIG_ENV: &str = "CMDPILOT_CONFIG";

/// Environment variable for a custom config directory.
pub const CMDPILOT_HOME_ENV: &str = "CMDPILOT_HOME";

/// Contents of `config.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmdpilotConfig {
    pub safety: SafetyConfig,
    pub execution: ExecutionConfig,
    pub synthesis: SynthesisConfig,
}

/// `[safety]`: vocabulary additions or replacements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafetyConfig {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    /// Use `allow`/`deny` alone instead of adding them to the built-in lists.
    pub replace_defaults: bool,
}

/// `[execution]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    pub timeout_secs: u64,
    pub max_output_bytes: usize,
    pub command_delay_ms: u64,
    pub history_display_limit: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_output_bytes: MAX_OUTPUT_SIZE,
            command_delay_ms: u64::try_from(DEFAULT_COMMAND_DELAY.as_millis()).unwrap_or(500),
            history_display_limit: DEFAULT_HISTORY_DISPLAY_LIMIT,
        }
    }
}

/// `[synthesis]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisConfig {
    pub default_package_manager: String,
    pub placeholder_name: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            default_package_manager: PACKAGE_MANAGERS[0].name.to_string(),
            placeholder_name: DEFAULT_PLACEHOLDER_NAME.to_string(),
        }
    }
}

impl CmdpilotConfig {
    /// Parses config text. `origin` only labels errors.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).with_context(|| format!("Invalid config file {}", origin.display()))
    }

    pub fn classifier(&self) -> Result<SafetyClassifier> {
        let safety = &self.safety;
        let vocabulary = if safety.replace_defaults {
            SafetyVocabulary::new(&safety.allow, &safety.deny)
        } else {
            SafetyVocabulary::default().extended(&safety.allow, &safety.deny)
        }
        .context("Invalid [safety] lists")?;
        Ok(SafetyClassifier::new(vocabulary))
    }

    pub fn engine_config(&self) -> Result<EngineConfig> {
        let execution = &self.execution;
        if execution.timeout_secs == 0 {
            bail!("[execution] timeout_secs must be greater than zero");
        }
        if execution.max_output_bytes == 0 {
            bail!("[execution] max_output_bytes must be greater than zero");
        }

        Ok(EngineConfig {
            timeout: Duration::from_secs(execution.timeout_secs),
            max_output_bytes: execution.max_output_bytes,
            command_delay: Duration::from_millis(execution.command_delay_ms),
            history_display_limit: execution.history_display_limit,
        })
    }

    pub fn synthesis_options(&self) -> Result<SynthesisOptions> {
        let synthesis = &self.synthesis;
        let Some(manager) = PackageManager::by_name(&synthesis.default_package_manager) else {
            let known: Vec<&str> = PACKAGE_MANAGERS.iter().map(|pm| pm.name).collect();
            bail!(
                "Unknown package manager '{}' in [synthesis]. Expected one of: {}",
                synthesis.default_package_manager,
                known.join(", ")
            );
        };

        let placeholder = synthesis.placeholder_name.trim();
        if placeholder.is_empty() || placeholder.contains(char::is_whitespace) {
            bail!("[synthesis] placeholder_name must be a single non-empty word");
        }

        Ok(SynthesisOptions {
            placeholder_name: placeholder.to_string(),
            default_package_manager: manager,
        })
    }
}

/// Find the cmdpilot home directory: `CMDPILOT_HOME`, else `~/.cmdpilot`.
pub fn find_cmdpilot_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(CMDPILOT_HOME_ENV)
        && !val.is_empty()
    {
        let path = PathBuf::from(&val);
        debug!(path = %path.display(), "Using CMDPILOT_HOME");
        return Some(path);
    }

    dirs::home_dir().map(|home| home.join(".cmdpilot"))
}

/// Resolve which config file to read, without checking that it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(val) = std::env::var(CMDPILOT_CONFIG_ENV)
        && !val.is_empty()
    {
        let path = PathBuf::from(&val);
        debug!(path = %path.display(), "Using CMDPILOT_CONFIG");
        return Some(path);
    }

    find_cmdpilot_home().map(|home| home.join(CONFIG_FILE))
}

/// Load the configuration, falling back to defaults when no file exists.
pub fn load_config(explicit: Option<&Path>) -> Result<CmdpilotConfig> {
    let Some(path) = resolve_config_path(explicit) else {
        debug!("No home directory found, using default config");
        return Ok(CmdpilotConfig::default());
    };

    if !path.exists() {
        if explicit.is_some() {
            bail!("Config file not found: {}", path.display());
        }
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(CmdpilotConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    debug!(path = %path.display(), "Loaded config file");
    CmdpilotConfig::from_toml(&text, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdpilot_safety::SafetyTier;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn parse(text: &str) -> CmdpilotConfig {
        CmdpilotConfig::from_toml(text, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse(""), CmdpilotConfig::default());
        let engine = parse("").engine_config().unwrap();
        assert_eq!(engine, EngineConfig::default());
    }

    #[test]
    fn test_execution_section() {
        let config = parse(
            r#"
            [execution]
            timeout_secs = 5
            command_delay_ms = 0
            history_display_limit = 3
            "#,
        );
        let engine = config.engine_config().unwrap();
        assert_eq!(engine.timeout, Duration::from_secs(5));
        assert_eq!(engine.command_delay, Duration::ZERO);
        assert_eq!(engine.history_display_limit, 3);
        assert_eq!(engine.max_output_bytes, MAX_OUTPUT_SIZE);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = parse("[execution]\ntimeout_secs = 0\n");
        assert!(config.engine_config().is_err());
    }

    #[test]
    fn test_safety_lists_extend_defaults() {
        let config = parse(
            r#"
            [safety]
            allow = ["git"]
            deny = ["curl"]
            "#,
        );
        let classifier = config.classifier().unwrap();
        assert_eq!(classifier.classify("git status"), SafetyTier::Safe);
        assert_eq!(classifier.classify("curl x"), SafetyTier::Dangerous);
        assert_eq!(classifier.classify("rm -rf x"), SafetyTier::Dangerous);
        assert_eq!(classifier.classify("mkdir x"), SafetyTier::Safe);
    }

    #[test]
    fn test_safety_lists_replace_defaults() {
        let config = parse(
            r#"
            [safety]
            allow = ["ls"]
            replace_defaults = true
            "#,
        );
        let classifier = config.classifier().unwrap();
        assert_eq!(classifier.classify("ls"), SafetyTier::Safe);
        assert_eq!(classifier.classify("rm x"), SafetyTier::Unknown);
    }

    #[test]
    fn test_invalid_safety_entry() {
        let config = parse("[safety]\nallow = [\"git status\"]\n");
        assert!(config.classifier().is_err());
    }

    #[test]
    fn test_synthesis_section() {
        let config = parse(
            r#"
            [synthesis]
            default_package_manager = "pnpm"
            placeholder_name = "untitled"
            "#,
        );
        let options = config.synthesis_options().unwrap();
        assert_eq!(options.default_package_manager.install, "pnpm add");
        assert_eq!(options.placeholder_name, "untitled");
    }

    #[test]
    fn test_unknown_package_manager() {
        let config = parse("[synthesis]\ndefault_package_manager = \"cargo\"\n");
        let err = config.synthesis_options().unwrap_err();
        assert!(err.to_string().contains("cargo"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = CmdpilotConfig::from_toml("[execution]\ntimeout = 3\n", Path::new("x.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[execution]\nhistory_display_limit = 4\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.execution.history_display_limit, 4);
    }

    #[test]
    #[serial]
    fn test_config_env_var() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.toml");
        std::fs::write(&path, "[synthesis]\nplaceholder_name = \"draft\"\n").unwrap();

        // SAFETY: These tests run serially and we restore env vars immediately
        unsafe { std::env::set_var(CMDPILOT_CONFIG_ENV, &path) };
        let config = load_config(None);
        unsafe { std::env::remove_var(CMDPILOT_CONFIG_ENV) };

        assert_eq!(config.unwrap().synthesis.placeholder_name, "draft");
    }

    #[test]
    #[serial]
    fn test_home_env_var_without_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        // SAFETY: These tests run serially and we restore env vars immediately
        unsafe { std::env::set_var(CMDPILOT_HOME_ENV, dir.path()) };
        let resolved = resolve_config_path(None);
        let config = load_config(None);
        unsafe { std::env::remove_var(CMDPILOT_HOME_ENV) };

        assert_eq!(resolved, Some(dir.path().join(CONFIG_FILE)));
        assert_eq!(config.unwrap(), CmdpilotConfig::default());
    }
}
