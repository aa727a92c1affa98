//! Fetching raw lists. Everything upstream of the parser goes through [`ListSource`].

use crate::config::FetchConfig;
use crate::error::{Result, SieveError};
use futures::StreamExt;
use reqwest::Client;
use rustc_hash::FxHashMap;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::io::StreamReader;
use tracing::{debug, info};
use url::Url;

/// Fetches a list as raw lines.
#[async_trait::async_trait]
pub trait ListSource: Send + Sync {
    async fn fetch_lines(&self, url: &str) -> Result<Vec<String>>;
}

fn fetch_failure(url: &str, reason: impl ToString) -> SieveError {
    SieveError::FetchFailure {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// Streams `http(s)://` bodies and reads `file://` URLs from disk.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SieveError::InvalidConfig(format!("http client: {}", e)))?;
        Ok(Self { client })
    }

    async fn read_local(url: &str, parsed: &Url) -> Result<Vec<String>> {
        let path = parsed
            .to_file_path()
            .map_err(|_| fetch_failure(url, "not a local file path"))?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| fetch_failure(url, e))?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

#[async_trait::async_trait]
impl ListSource for HttpSource {
    async fn fetch_lines(&self, url: &str) -> Result<Vec<String>> {
        let parsed = Url::parse(url).map_err(|e| fetch_failure(url, e))?;
        if parsed.scheme() == "file" {
            return Self::read_local(url, &parsed).await;
        }

        info!("Fetching {}", url);
        let resp = self
            .client
            .get(parsed)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_failure(url, e))?;

        let stream = resp
            .bytes_stream()
            .map(|result| result.map_err(std::io::Error::other));
        let reader = StreamReader::new(stream);
        let mut lines = BufReader::new(reader).lines();
        let mut out = Vec::new();

        while let Some(line) = lines.next_line().await.map_err(|e| fetch_failure(url, e))? {
            out.push(line);
        }

        debug!("Read {} lines from {}", out.len(), url);
        Ok(out)
    }
}

/// Serves fixed list bodies keyed by URL; unknown URLs fail like an unreachable host.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    lists: FxHashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.lists.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait::async_trait]
impl ListSource for MemorySource {
    async fn fetch_lines(&self, url: &str) -> Result<Vec<String>> {
        self.lists
            .get(url)
            .map(|body| body.lines().map(str::to_string).collect())
            .ok_or_else(|| fetch_failure(url, "no such list"))
    }
}
