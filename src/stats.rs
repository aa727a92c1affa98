use std::collections::BTreeMap;
use tracing::{info, warn};

/// Counts for one feed across the parse → admit → allow-list stages.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    /// Raw lines fetched.
    pub lines: usize,
    /// Entries the decoder produced.
    pub parsed: usize,
    pub rejected_by_policy: usize,
    pub allow_listed: usize,
    /// Distinct output tokens contributed.
    pub emitted: usize,
}

/// Summary of one filter run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    feeds: BTreeMap<String, FeedStats>,
    skipped_feeds: Vec<String>,
    written: BTreeMap<String, usize>,
    kept_previous: Vec<String>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_feed(&mut self, feed: &str, stats: FeedStats) {
        self.feeds.insert(feed.to_string(), stats);
    }

    pub fn record_skipped(&mut self, feed: &str) {
        self.skipped_feeds.push(feed.to_string());
    }

    pub fn record_written(&mut self, target: &str, domains: usize) {
        self.written.insert(target.to_string(), domains);
    }

    pub fn record_kept_previous(&mut self, target: &str) {
        self.kept_previous.push(target.to_string());
    }

    pub fn feed(&self, feed: &str) -> Option<&FeedStats> {
        self.feeds.get(feed)
    }

    pub fn skipped_feeds(&self) -> &[String] {
        &self.skipped_feeds
    }

    pub fn written(&self) -> &BTreeMap<String, usize> {
        &self.written
    }

    pub fn kept_previous(&self) -> &[String] {
        &self.kept_previous
    }

    pub fn log_summary(&self) {
        for (name, s) in &self.feeds {
            info!(
                "Feed '{}': {} lines, {} parsed, {} rejected by policy, {} allow-listed, {} emitted",
                name, s.lines, s.parsed, s.rejected_by_policy, s.allow_listed, s.emitted
            );
        }
        for name in &self.skipped_feeds {
            warn!("Feed '{}' was skipped", name);
        }
        for target in &self.kept_previous {
            warn!("Target '{}' kept its previous output", target);
        }
        let total: usize = self.written.values().sum();
        info!(
            "Run complete: {} targets written, {} domains total",
            self.written.len(),
            total
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records() {
        let mut stats = RunStats::new();
        let feed = FeedStats {
            lines: 10,
            parsed: 8,
            rejected_by_policy: 1,
            allow_listed: 2,
            emitted: 5,
        };
        stats.record_feed("exodus", feed);
        stats.record_skipped("down");
        stats.record_written("exodus", 5);
        stats.record_kept_previous("down");

        assert_eq!(stats.feed("exodus"), Some(&feed));
        assert_eq!(stats.feed("missing"), None);
        assert_eq!(stats.skipped_feeds(), ["down".to_string()]);
        assert_eq!(stats.written()["exodus"], 5);
        assert_eq!(stats.kept_previous(), ["down".to_string()]);
        stats.log_summary();
    }
}
