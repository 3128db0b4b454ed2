use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    str::FromStr,
    sync::Mutex,
};

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_colored(&self) -> ColoredString {
        match self {
            LogLevel::Debug => "DBG".bright_cyan(),
            LogLevel::Info => "INF".bright_green(),
            LogLevel::Warn => "WAR".yellow(),
            LogLevel::Error => "ERR".bright_red(),
        }
    }

    pub fn as_plain(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WAR",
            LogLevel::Error => "ERR",
        }
    }

    /// Whether a message at this level is shown under the configured level
    /// `other`.
    pub fn show(&self, other: &LogLevel) -> bool {
        match self {
            LogLevel::Debug => *other == LogLevel::Debug,
            LogLevel::Info => *other == LogLevel::Debug || *other == LogLevel::Info,
            LogLevel::Warn => *other != LogLevel::Error,
            LogLevel::Error => true,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// A leveled logger with colored stdout output and an optional plain-text
/// log file.
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    file: Option<Mutex<BufWriter<File>>>,
    debug_prefix: String,
    info_prefix: String,
    warn_prefix: String,
    error_prefix: String,
}

impl Logger {
    pub fn new(level: LogLevel, name: String, log_file_path: Option<String>) -> Self {
        let n = format!("{name}:").dimmed();
        let file = log_file_path.map(|path| {
            let file = File::create(path).unwrap();
            Mutex::new(BufWriter::new(file))
        });

        Logger {
            level,
            file,
            debug_prefix: format!("[{}] {}", LogLevel::Debug.as_colored(), n),
            info_prefix: format!("[{}] {}", LogLevel::Info.as_colored(), n),
            warn_prefix: format!("[{}] {}", LogLevel::Warn.as_colored(), n),
            error_prefix: format!("[{}] {}", LogLevel::Error.as_colored(), n),
        }
    }

    /// Builds a logger from its configuration, or nothing when logging is
    /// disabled.
    pub fn from_config(config: &LoggerConfig, name: String) -> Option<Logger> {
        config
            .enabled
            .then(|| Logger::new(config.log_level, name, config.log_file.clone()))
    }

    fn prefix(&self, level: &LogLevel) -> &str {
        match level {
            LogLevel::Debug => &self.debug_prefix,
            LogLevel::Info => &self.info_prefix,
            LogLevel::Warn => &self.warn_prefix,
            LogLevel::Error => &self.error_prefix,
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if !level.show(&self.level) {
            return;
        }

        println!("{} {}", self.prefix(&level), message);

        if let Some(file) = &self.file {
            let mut writer = file.lock().unwrap();
            let _ = writeln!(writer, "[{}] {}", level.as_plain(), message);
            let _ = writer.flush();
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}
