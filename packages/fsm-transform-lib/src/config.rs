use serde::{Deserialize, Serialize};

use crate::logger::LogLevel;

/// Controls the logger the CLI wires into a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub enabled: bool,
    pub log_file: Option<String>,
    pub log_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            enabled: true,
            log_file: None,
            log_level: LogLevel::Warn,
        }
    }
}

/// Controls the behavior-equivalence check run after a transformation.
/// The check is exhaustive over all words up to `max_word_length`, so the
/// default bound is small.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub max_word_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            enabled: false,
            max_word_length: 6,
        }
    }
}

/// Tool-level configuration, read from an optional TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub logger: LoggerConfig,
    pub validation: ValidationConfig,
}

impl ToolConfig {
    pub fn from_optional_file(path: Option<&str>) -> anyhow::Result<ToolConfig> {
        match path {
            Some(path) => Ok(toml::from_str(&std::fs::read_to_string(path)?)?),
            None => Ok(ToolConfig::default()),
        }
    }
}
