//! Configuration management for the highlight harness
//!
//! Loads tool, path and flag-value settings from TOML files and provides
//! runtime access.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolConfig,
    #[serde(default)]
    pub paths: HarnessPaths,
    #[serde(default)]
    pub values: FlagValues,
}

/// The tool under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Wall-clock bound per invocation in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Fixed filesystem locations shared by every frame.
///
/// Frames run one at a time; these paths are reused and reset on each
/// iteration, so two runs must never share a working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessPaths {
    /// Where the fixture is written when the file exists
    #[serde(default = "default_fixture")]
    pub fixture: PathBuf,
    /// Path handed to the tool when the file is missing
    #[serde(default = "default_missing_fixture")]
    pub missing_fixture: PathBuf,
    /// Target of `-o` for the `file_path` output mode
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Target of `-o` for the `restricted` output mode. Must be unwritable in
    /// the test environment; the harness never creates or protects it.
    #[serde(default = "default_restricted_output")]
    pub restricted_output: PathBuf,
}

/// Concrete flag values used for each category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagValues {
    /// Lexer matching the fixture's language
    #[serde(default = "default_lexer_match")]
    pub lexer_match: String,
    /// Real lexer for an unrelated language
    #[serde(default = "default_lexer_mismatch")]
    pub lexer_mismatch: String,
    /// Name that is not a lexer
    #[serde(default = "default_lexer_invalid")]
    pub lexer_invalid: String,
    #[serde(default = "default_formatter_valid")]
    pub formatter_valid: String,
    #[serde(default = "default_formatter_invalid")]
    pub formatter_invalid: String,
}

// Default value functions
fn default_program() -> String { "pygmentize".to_string() }
fn default_timeout_ms() -> u64 { 5_000 }
fn default_fixture() -> PathBuf { PathBuf::from("test_input.py") }
fn default_missing_fixture() -> PathBuf { PathBuf::from("non_existent_file.py") }
fn default_output() -> PathBuf { PathBuf::from("out.html") }
fn default_restricted_output() -> PathBuf { PathBuf::from("/nonexistent/restricted/out.html") }
fn default_lexer_match() -> String { "python".to_string() }
fn default_lexer_mismatch() -> String { "c".to_string() }
fn default_lexer_invalid() -> String { "fakelexer".to_string() }
fn default_formatter_valid() -> String { "html".to_string() }
fn default_formatter_invalid() -> String { "fakeformat".to_string() }

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for HarnessPaths {
    fn default() -> Self {
        Self {
            fixture: default_fixture(),
            missing_fixture: default_missing_fixture(),
            output: default_output(),
            restricted_output: default_restricted_output(),
        }
    }
}

impl Default for FlagValues {
    fn default() -> Self {
        Self {
            lexer_match: default_lexer_match(),
            lexer_mismatch: default_lexer_mismatch(),
            lexer_invalid: default_lexer_invalid(),
            formatter_valid: default_formatter_valid(),
            formatter_invalid: default_formatter_invalid(),
        }
    }
}

impl HarnessPaths {
    /// All paths rooted under `dir` (the restricted path is left alone)
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let defaults = Self::default();
        Self {
            fixture: dir.join(defaults.fixture),
            missing_fixture: dir.join(defaults.missing_fixture),
            output: dir.join(defaults.output),
            restricted_output: defaults.restricted_output,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HarnessError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, HarnessError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| HarnessError::config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = [
            "harness.toml",
            "config/harness.toml",
            "highlight-harness/config/harness.toml",
        ];

        for path in &config_paths {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", path, e),
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), HarnessError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HarnessError::config(e.to_string()))?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings no run could succeed with
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.tool.program.trim().is_empty() {
            return Err(HarnessError::config("tool.program must not be empty"));
        }
        if self.tool.timeout_ms == 0 {
            return Err(HarnessError::config("tool.timeout_ms must be greater than zero"));
        }
        if self.paths.fixture == self.paths.missing_fixture {
            return Err(HarnessError::config(
                "paths.fixture and paths.missing_fixture must differ",
            ));
        }
        if self.paths.fixture == self.paths.output {
            return Err(HarnessError::config("paths.fixture and paths.output must differ"));
        }
        if self.paths.missing_fixture == self.paths.output {
            return Err(HarnessError::config(
                "paths.missing_fixture and paths.output must differ",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tool.program, "pygmentize");
        assert_eq!(config.tool.timeout_ms, 5_000);
        assert_eq!(config.paths.fixture, PathBuf::from("test_input.py"));
        assert_eq!(config.values.lexer_match, "python");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
[tool]
program = "/opt/pygments/bin/pygmentize"

[values]
lexer_mismatch = "rust"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.tool.program, "/opt/pygments/bin/pygmentize");
        assert_eq!(config.tool.timeout_ms, 5_000);
        assert_eq!(config.values.lexer_mismatch, "rust");
        assert_eq!(config.values.lexer_invalid, "fakelexer");
        assert_eq!(config.paths, HarnessPaths::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[tool\nprogram = 1").unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_toml("[tool]\ntimeout_ms = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_shared_fixture_paths_rejected() {
        let toml = r#"
[paths]
fixture = "same.py"
missing_fixture = "same.py"
"#;
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("harness.toml");
        let mut config = Config::default();
        config.tool.timeout_ms = 250;
        config.save_toml(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_paths_in_dir() {
        let paths = HarnessPaths::in_dir("/tmp/run");
        assert_eq!(paths.fixture, PathBuf::from("/tmp/run/test_input.py"));
        assert_eq!(paths.output, PathBuf::from("/tmp/run/out.html"));
        assert_eq!(paths.restricted_output, HarnessPaths::default().restricted_output);
    }

    #[test]
    fn test_shipped_sample_matches_defaults() {
        let sample = include_str!("../config/harness.toml");
        assert_eq!(Config::from_toml(sample).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_fixture_shared_with_output_rejected() {
        let toml = r#"
[paths]
missing_fixture = "out.html"
"#;
        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("missing_fixture"));
    }
}
