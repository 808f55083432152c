//! Report configuration.
//!
//! Configuration is read from a TOML file:
//!
//! ```toml
//! group_id = "2204685680"
//! start_datetime = "2024-03-01 00:00:00"
//! end_datetime = "2024-03-31 23:59:59"
//! last_member_name = "Jane Doe"
//! api_pages = 10
//!
//! [graph]
//! access_token = "..."
//!
//! [points]
//! topic = 2
//! comment = 1
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Format of `start_datetime` and `end_datetime`. Values are read as UTC.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Graph ID of the group to report on.
    pub group_id: String,

    /// Start of the reporting window, also used as the feed's `since`.
    pub start_datetime: String,

    /// End of the reporting window. Defaults to the time the report runs.
    #[serde(default)]
    pub end_datetime: Option<String>,

    /// Name of the newest member seen by the previous report.
    #[serde(default)]
    pub last_member_name: String,

    /// Maximum number of member pages to walk; `0` walks every page.
    #[serde(default)]
    pub api_pages: usize,

    /// How many contributors the summary keeps.
    #[serde(default = "default_top_users")]
    pub top_users: usize,

    /// Directory receiving the topic, contributor and new member logs.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub points: PointsConfig,
}

/// Graph API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub base_url: String,
    pub version: String,
    pub access_token: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            base_url: "https://graph.facebook.com".to_string(),
            version: "v2.12".to_string(),
            access_token: String::new(),
            timeout_secs: 30,
            user_agent: concat!("groupstats/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Points a contributor earns per authored record and per like received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    pub topic: u64,
    pub comment: u64,
    pub reply: u64,
    pub like: u64,
}

impl Default for PointsConfig {
    fn default() -> Self {
        PointsConfig {
            topic: 1,
            comment: 1,
            reply: 1,
            like: 0,
        }
    }
}

fn default_top_users() -> usize {
    10
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.group_id.trim().is_empty() {
            return Err(Error::config("group_id is empty"));
        }
        if self.graph.timeout_secs == 0 {
            return Err(Error::config("graph.timeout_secs must be > 0"));
        }
        if self.graph.base_url.trim().is_empty() {
            return Err(Error::config("graph.base_url is empty"));
        }

        let start = self.start_datetime()?;
        if let Some(end) = self.end_datetime()? {
            if end < start {
                return Err(Error::config(format!(
                    "end_datetime {} is before start_datetime {}",
                    end.format(DATETIME_FORMAT),
                    start.format(DATETIME_FORMAT)
                )));
            }
        }
        Ok(())
    }

    pub fn start_datetime(&self) -> Result<DateTime<Utc>> {
        parse_datetime("start_datetime", &self.start_datetime)
    }

    pub fn end_datetime(&self) -> Result<Option<DateTime<Utc>>> {
        self.end_datetime
            .as_deref()
            .map(|s| parse_datetime("end_datetime", s))
            .transpose()
    }

    /// The reporting window, closing at `now` when no end is configured.
    pub fn window(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((self.start_datetime()?, self.end_datetime()?.unwrap_or(now)))
    }
}

fn parse_datetime(key: &str, value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| Error::config(format!("{key} '{value}' is not {DATETIME_FORMAT}: {e}")))
}
