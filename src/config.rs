//! Configuration management for stepgate
//!
//! Settings are loaded from environment variables with fallback defaults, and
//! command-line flags override them afterwards.
//!
//! # Environment Variables
//!
//! - `STEPGATE_PROJECT_ROOT`: Student project directory - default: "."
//! - `STEPGATE_PROGRESS_FILE`: Progress record path - default: "/tmp/current_step.txt"
//! - `STEPGATE_LOG_LEVEL`: Logging level - default: "warn"
//! - `STEPGATE_SMOKE_URL`: Registration endpoint for `stepgate smoke`
//! - `CURRENT_STEP`: Forces the step whose battery `stepgate test` runs. It is
//!   parsed only by that command.
//! - `GITHUB_ACTIONS`: When set, `stepgate detect` also emits CI annotations

use crate::progress::DEFAULT_PROGRESS_FILE;
use crate::smoke::DEFAULT_SMOKE_URL;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "warn";
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone)]
pub struct StepgateConfig {
    pub project_root: PathBuf,
    pub progress_file: PathBuf,
    /// Raw `CURRENT_STEP` value, parsed on demand by [`StepgateConfig::step_override`]
    pub current_step_env: Option<String>,
    pub ci: bool,
    pub log_level: String,
    pub smoke_url: String,
}

impl Default for StepgateConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            progress_file: PathBuf::from(DEFAULT_PROGRESS_FILE),
            current_step_env: None,
            ci: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            smoke_url: DEFAULT_SMOKE_URL.to_string(),
        }
    }
}

impl StepgateConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let project_root = env::var("STEPGATE_PROJECT_ROOT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.project_root);

        let progress_file = env::var("STEPGATE_PROGRESS_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.progress_file);

        let current_step_env = env::var("CURRENT_STEP").ok().filter(|v| !v.trim().is_empty());

        let ci = env::var_os("GITHUB_ACTIONS").is_some();

        let log_level = env::var("STEPGATE_LOG_LEVEL")
            .unwrap_or(defaults.log_level)
            .to_lowercase();

        let smoke_url = env::var("STEPGATE_SMOKE_URL").unwrap_or(defaults.smoke_url);

        Self {
            project_root,
            progress_file,
            current_step_env,
            ci,
            log_level,
            smoke_url,
        }
    }

    /// The step forced through `CURRENT_STEP`, if any
    pub fn step_override(&self) -> Result<Option<u32>, ConfigError> {
        self.current_step_env
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .map_err(|e| ConfigError::ParseError {
                        field: "CURRENT_STEP".to_string(),
                        error: format!("{:?} is not a step number ({})", raw, e),
                    })
            })
            .transpose()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid levels: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if self.smoke_url.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Smoke URL cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for StepgateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stepgate Configuration:")?;
        writeln!(f, "  Project Root: {}", self.project_root.display())?;
        writeln!(f, "  Progress File: {}", self.progress_file.display())?;
        if let Some(ref step) = self.current_step_env {
            writeln!(f, "  Current Step Override: {}", step)?;
        }
        writeln!(f, "  CI: {}", self.ci)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Smoke URL: {}", self.smoke_url)?;
        Ok(())
    }
}
