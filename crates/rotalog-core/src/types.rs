//! Core types for rotalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

use crate::constants::*;
use crate::error::Error;

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
        }
    }

    /// `tracing` filter admitting this severity and above.
    ///
    /// `tracing` has no level above error, so fatal and panic thresholds
    /// admit every error event.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Severity::Trace => LevelFilter::TRACE,
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warn => LevelFilter::WARN,
            Severity::Error | Severity::Fatal | Severity::Panic => LevelFilter::ERROR,
        }
    }

    /// Parse a level name, falling back to info for anything unrecognised
    pub fn parse_or_info(s: &str) -> Self {
        s.parse().unwrap_or(Severity::Info)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "panic" => Ok(Severity::Panic),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

/// Rotation settings read from the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRotationSettings {
    pub base_filename: String,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub rotate_days: u32,
    #[serde(rename = "maxRemainCnt")]
    pub max_remain_count: u32,
}

impl Default for LogRotationSettings {
    fn default() -> Self {
        Self {
            base_filename: DEFAULT_BASE_FILENAME.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            rotate_days: DEFAULT_ROTATE_DAYS,
            max_remain_count: DEFAULT_MAX_REMAIN_COUNT,
        }
    }
}

impl LogRotationSettings {
    /// Build settings from raw values, replacing empty strings and zeros
    /// with the defaults
    pub fn from_raw(
        base_filename: String,
        log_dir: String,
        log_level: String,
        rotate_days: u64,
        max_remain_count: u64,
    ) -> Self {
        let default = Self::default();
        Self {
            base_filename: non_empty(base_filename).unwrap_or(default.base_filename),
            log_dir: non_empty(log_dir).map(PathBuf::from).unwrap_or(default.log_dir),
            log_level: non_empty(log_level).unwrap_or(default.log_level),
            rotate_days: non_zero(rotate_days).unwrap_or(default.rotate_days),
            max_remain_count: non_zero(max_remain_count).unwrap_or(default.max_remain_count),
        }
    }

    /// Severity threshold for these settings; unknown levels mean info
    pub fn threshold(&self) -> Severity {
        Severity::parse_or_info(&self.log_level)
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn non_zero(n: u64) -> Option<u32> {
    match n {
        0 => None,
        n => Some(u32::try_from(n).unwrap_or(u32::MAX)),
    }
}
