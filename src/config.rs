use crate::error::{Result, SieveError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub whitelist: WhitelistConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub feeds: HashMap<String, FeedConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WhitelistConfig {
    /// Hand-maintained patterns.
    #[serde(default = "default_manual_path")]
    pub manual: PathBuf,
    /// URLs of external allow-lists, one per line.
    #[serde(default = "default_sources_path")]
    pub sources: PathBuf,
    /// Generated allow-list consumed by the filter step.
    #[serde(default = "default_master_path")]
    pub master: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub on_feed_failure: FeedFailurePolicy,
}

/// What to do when an upstream feed cannot be fetched.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedFailurePolicy {
    /// Fail the run before any output is written.
    #[default]
    Abort,
    /// Leave the affected output files as they are on disk.
    KeepPrevious,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FeedConfig {
    pub url: String,
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Tracker data set JSON with categories and resource lists.
    TrackerRadar {
        #[serde(default)]
        min_resources: usize,
        #[serde(default = "default_excluded_categories")]
        excluded_categories: Vec<String>,
        #[serde(default)]
        excluded_prefixes: Vec<String>,
    },
    /// Line-based tracker database; generic infrastructure labels are dropped.
    TrackerDb {
        #[serde(default = "default_generic_prefixes")]
        generic_prefixes: Vec<String>,
    },
    Generic {
        #[serde(default)]
        wildcard_prefix: bool,
        #[serde(default)]
        merge_into: Option<String>,
    },
}

// Defaults
fn default_output_dir() -> PathBuf {
    PathBuf::from("hosts")
}
fn default_manual_path() -> PathBuf {
    PathBuf::from("whitelist/manual.txt")
}
fn default_sources_path() -> PathBuf {
    PathBuf::from("whitelist/sources.txt")
}
fn default_master_path() -> PathBuf {
    PathBuf::from("whitelist/generated.txt")
}
fn default_user_agent() -> String {
    concat!("hostsieve/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}
pub fn default_excluded_categories() -> Vec<String> {
    ["CDN", "Payment", "Non-Tracking"]
        .into_iter()
        .map(String::from)
        .collect()
}
pub fn default_generic_prefixes() -> Vec<String> {
    ["www", "api", "cdn", "static", "img", "m"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            whitelist: WhitelistConfig::default(),
            fetch: FetchConfig::default(),
            logging: LoggingConfig::default(),
            feeds: HashMap::new(),
        }
    }
}

impl Default for WhitelistConfig {
    fn default() -> Self {
        Self {
            manual: default_manual_path(),
            sources: default_sources_path(),
            master: default_master_path(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            on_feed_failure: FeedFailurePolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig::Generic {
            wildcard_prefix: false,
            merge_into: None,
        }
    }
}

impl FeedConfig {
    /// Output target this feed contributes to: its own name unless merged elsewhere.
    pub fn target<'a>(&'a self, name: &'a str) -> &'a str {
        match &self.policy {
            PolicyConfig::Generic {
                merge_into: Some(target),
                ..
            } => target,
            _ => name,
        }
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| SieveError::from_read(path, "pass an existing config file", e))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| SieveError::InvalidConfig(format!("failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects unknown, self-referencing or chained merge targets and bad URLs.
    pub fn validate(&self) -> Result<()> {
        for (name, feed) in &self.feeds {
            if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
                return Err(SieveError::InvalidConfig(format!(
                    "feed name '{}' cannot be used as an output file name",
                    name
                )));
            }
            url::Url::parse(&feed.url).map_err(|e| {
                SieveError::InvalidConfig(format!("feed '{}' has invalid url '{}': {}", name, feed.url, e))
            })?;

            let target = feed.target(name);
            if target == name {
                continue;
            }
            let Some(into) = self.feeds.get(target) else {
                return Err(SieveError::InvalidConfig(format!(
                    "feed '{}' merges into unknown feed '{}'",
                    name, target
                )));
            };
            if into.target(target) != target {
                return Err(SieveError::InvalidConfig(format!(
                    "feed '{}' merges into '{}', which itself merges elsewhere",
                    name, target
                )));
            }
        }
        Ok(())
    }

    pub fn get_feeds_sorted(&self) -> Vec<(String, FeedConfig)> {
        let mut list: Vec<_> = self
            .feeds
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        list
    }
}
