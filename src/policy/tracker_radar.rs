use super::{AdmissionPolicy, DomainEntry, PrefixPattern};
use crate::error::{Result, SieveError};
use crate::parser::parse_line;
use rustc_hash::FxHashSet;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TrackerData {
    #[serde(default)]
    trackers: BTreeMap<String, Tracker>,
}

#[derive(Debug, Deserialize)]
struct Tracker {
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    resources: Option<Vec<IgnoredAny>>,
}

/// Category-aware feed backed by a tracker data set document.
#[derive(Debug, Clone)]
pub struct TrackerRadarPolicy {
    min_resources: usize,
    // Lowercased
    excluded_categories: FxHashSet<String>,
    excluded_prefixes: Vec<PrefixPattern>,
}

impl TrackerRadarPolicy {
    pub fn new(min_resources: usize, excluded_categories: &[String], excluded_prefixes: &[String]) -> Self {
        Self {
            min_resources,
            excluded_categories: excluded_categories.iter().map(|c| c.to_lowercase()).collect(),
            excluded_prefixes: excluded_prefixes
                .iter()
                .filter_map(|p| PrefixPattern::parse(p))
                .collect(),
        }
    }
}

impl AdmissionPolicy for TrackerRadarPolicy {
    fn decode(&self, feed: &str, lines: &[String]) -> Result<Vec<DomainEntry>> {
        let data: TrackerData =
            serde_json::from_str(&lines.join("\n")).map_err(|e| SieveError::InvalidSourceData {
                feed: feed.to_string(),
                reason: e.to_string(),
            })?;

        let mut entries = Vec::with_capacity(data.trackers.len());
        for (key, tracker) in data.trackers {
            let Some(parsed) = parse_line(&key) else {
                debug!(feed, key = %key, "skipping tracker key");
                continue;
            };
            let mut entry = DomainEntry::from_parsed(parsed, feed);
            entry.categories = tracker.categories;
            entry.resources = tracker.resources.map(|r| r.len());
            entries.push(entry);
        }
        Ok(entries)
    }

    fn admit(&self, entry: &DomainEntry) -> bool {
        if entry
            .categories
            .iter()
            .any(|c| self.excluded_categories.contains(&c.to_lowercase()))
        {
            return false;
        }
        if entry.resources.unwrap_or(0) < self.min_resources {
            return false;
        }
        !self.excluded_prefixes.iter().any(|p| p.matches(entry))
    }
}
