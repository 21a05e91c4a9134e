use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url {0:?} cannot carry a path")]
    NotABase(String),
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub poll_interval: Duration,
    pub snapshot_timeout: Duration,
    /// Timeout for `/search` and `/process`; `None` waits indefinitely.
    pub write_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            poll_interval: Duration::from_millis(1000),
            snapshot_timeout: Duration::from_millis(5000),
            write_timeout: None,
            connect_timeout: None,
        }
    }
}

/// Absolute URLs of the three backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub search: String,
    pub process: String,
    pub results: String,
}

impl Endpoints {
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SettingsError> {
        if settings.poll_interval.is_zero() {
            return Err(SettingsError::ZeroPollInterval);
        }
        let base = Url::parse(&settings.base_url).map_err(|source| SettingsError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(SettingsError::NotABase(settings.base_url.clone()));
        }

        let join = |path: &str| -> Result<String, SettingsError> {
            base.join(path)
                .map(String::from)
                .map_err(|source| SettingsError::InvalidBaseUrl {
                    url: settings.base_url.clone(),
                    source,
                })
        };

        Ok(Self {
            search: join("/search")?,
            process: join("/process")?,
            results: join("/api/results")?,
        })
    }
}
