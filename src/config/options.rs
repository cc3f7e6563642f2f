// src/config/options.rs
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use super::consts::*;
use crate::pages::TableKind;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppOptions {
    pub paths: PathOptions,
    pub logging: LogOptions,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathOptions {
    /// Fresh snapshots written by the extractors.
    pub source_dir: PathBuf,
    /// Historical stores, rewritten by each run.
    pub dest_dir: PathBuf,
    /// File name overrides; kinds not listed use their default name.
    pub files: BTreeMap<TableKind, String>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            dest_dir: PathBuf::from(DEFAULT_DEST_DIR),
            files: BTreeMap::new(),
        }
    }
}

impl PathOptions {
    pub fn file_name(&self, kind: TableKind) -> &str {
        self.files.get(&kind).map(String::as_str).unwrap_or(kind.default_file())
    }

    pub fn source(&self, kind: TableKind) -> PathBuf {
        self.source_dir.join(self.file_name(kind))
    }

    pub fn dest(&self, kind: TableKind) -> PathBuf {
        self.dest_dir.join(self.file_name(kind))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Unknown log level: {other}")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogOptions {
    pub level: LogLevel,
    /// Append log lines here instead of stderr.
    pub file: Option<PathBuf>,
}
