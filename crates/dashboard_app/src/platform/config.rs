//! Settings resolution for dashboard_app.
//!
//! Precedence: command-line flags, then the optional RON settings file, then
//! the engine defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use dashboard_engine::ClientSettings;
use engine_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

/// Search a backend and watch its processed results.
#[derive(Debug, Parser)]
#[command(name = "dashboard_app", version)]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:5000
    #[arg(long)]
    pub base_url: Option<String>,
    /// RON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Snapshot poll interval in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
    /// Log file used by `file` and `both`
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
    /// Log at debug level
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

/// On-disk settings; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub snapshot_timeout_ms: Option<u64>,
    pub write_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply(&self, settings: &mut ClientSettings) {
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            settings.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.snapshot_timeout_ms {
            settings.snapshot_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.write_timeout_ms {
            settings.write_timeout = Some(Duration::from_millis(ms));
        }
        if let Some(ms) = self.connect_timeout_ms {
            settings.connect_timeout = Some(Duration::from_millis(ms));
        }
    }
}

pub fn resolve_settings(cli: &Cli) -> Result<ClientSettings, ConfigError> {
    let mut settings = ClientSettings::default();
    if let Some(path) = &cli.config {
        SettingsFile::load(path)?.apply(&mut settings);
    }
    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(ms) = cli.poll_interval_ms {
        settings.poll_interval = Duration::from_millis(ms);
    }
    Ok(settings)
}
