//! Per-feed admission rules layered between the parser and the allow-list.

mod generic;
mod tracker_db;
mod tracker_radar;

pub use generic::GenericPolicy;
pub use tracker_db::TrackerDbPolicy;
pub use tracker_radar::TrackerRadarPolicy;

use crate::config::PolicyConfig;
use crate::error::Result;
use crate::parser::{parse_line, ParsedLine};

/// A parsed upstream domain plus the metadata admission rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub domain: String,
    /// Feed the entry came from.
    pub feed: String,
    /// Source line carried a `*.` marker.
    pub wildcard: bool,
    pub categories: Vec<String>,
    pub resources: Option<usize>,
}

impl DomainEntry {
    pub fn from_parsed(parsed: ParsedLine, feed: &str) -> Self {
        Self {
            domain: parsed.domain,
            feed: feed.to_string(),
            wildcard: parsed.wildcard,
            categories: Vec::new(),
            resources: None,
        }
    }

    pub fn leftmost_label(&self) -> &str {
        self.domain.split('.').next().unwrap_or_default()
    }

    pub fn label_count(&self) -> usize {
        self.domain.split('.').count()
    }
}

/// Source-specific admission on top of the shared line grammar.
pub trait AdmissionPolicy: Send + Sync {
    /// Turns a fetched list into entries. Line-based feeds keep the default.
    fn decode(&self, feed: &str, lines: &[String]) -> Result<Vec<DomainEntry>> {
        Ok(decode_lines(feed, lines))
    }

    /// Returns false to drop the entry before allow-list filtering.
    fn admit(&self, entry: &DomainEntry) -> bool;

    /// Text written after the sink address for an admitted entry.
    fn output_token(&self, entry: &DomainEntry) -> String {
        entry.domain.clone()
    }
}

pub fn decode_lines(feed: &str, lines: &[String]) -> Vec<DomainEntry> {
    lines
        .iter()
        .filter_map(|line| parse_line(line))
        .map(|parsed| DomainEntry::from_parsed(parsed, feed))
        .collect()
}

/// Selects the policy implementation for a feed's configuration.
pub fn build_policy(config: &PolicyConfig) -> Box<dyn AdmissionPolicy> {
    match config {
        PolicyConfig::TrackerRadar {
            min_resources,
            excluded_categories,
            excluded_prefixes,
        } => Box::new(TrackerRadarPolicy::new(
            *min_resources,
            excluded_categories,
            excluded_prefixes,
        )),
        PolicyConfig::TrackerDb { generic_prefixes } => {
            Box::new(TrackerDbPolicy::new(generic_prefixes))
        }
        PolicyConfig::Generic {
            wildcard_prefix, ..
        } => Box::new(GenericPolicy::new(*wildcard_prefix)),
    }
}

/// Subdomain pattern excluded from a feed: `*.` for entries listed as
/// wildcards upstream, `label.` for entries whose leftmost label is `label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixPattern {
    Wildcard,
    Label(String),
}

impl PrefixPattern {
    pub fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim().to_lowercase();
        let label = pattern.trim_end_matches('.');
        match label {
            "" => None,
            "*" => Some(PrefixPattern::Wildcard),
            _ => Some(PrefixPattern::Label(label.to_string())),
        }
    }

    pub fn matches(&self, entry: &DomainEntry) -> bool {
        match self {
            PrefixPattern::Wildcard => entry.wildcard,
            PrefixPattern::Label(label) => entry.label_count() > 2 && entry.leftmost_label() == label,
        }
    }
}
