//! One batch run: allow-list build, then per-feed filtering into output targets.

use crate::config::{Config, FeedFailurePolicy};
use crate::engine::{build_store, parse_source_urls, AllowList, WhitelistMatcher, WhitelistStore};
use crate::error::{Result, SieveError};
use crate::merge::{BlocklistOutput, Merger};
use crate::output::{write_replacing, OutputWriter};
use crate::policy::{build_policy, AdmissionPolicy};
use crate::source::ListSource;
use crate::stats::{FeedStats, RunStats};
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;
use tracing::{info, trace, warn};

/// Runs a feed's lines through decode, admission and allow-list exclusion.
pub fn process_feed(
    feed: &str,
    lines: &[String],
    policy: &dyn AdmissionPolicy,
    allow: &dyn AllowList,
) -> Result<(BlocklistOutput, FeedStats)> {
    let entries = policy.decode(feed, lines)?;
    let mut stats = FeedStats {
        lines: lines.len(),
        parsed: entries.len(),
        ..FeedStats::default()
    };

    let mut out = BlocklistOutput::new();
    for entry in &entries {
        if !policy.admit(entry) {
            stats.rejected_by_policy += 1;
            continue;
        }
        if allow.is_allowed(&entry.domain) {
            trace!(feed, domain = %entry.domain, "allow-listed");
            stats.allow_listed += 1;
            continue;
        }
        out.insert(policy.output_token(entry));
    }
    stats.emitted = out.len();
    Ok((out, stats))
}

async fn read_required(path: &Path, hint: &'static str) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| SieveError::from_read(path, hint, e))
}

pub struct Pipeline<S> {
    config: Config,
    source: S,
}

impl<S: ListSource> Pipeline<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rebuilds the master allow-list file from the manual list and external sources.
    pub async fn build_whitelist(&self) -> Result<WhitelistStore> {
        let wl = &self.config.whitelist;
        let manual = read_required(&wl.manual, "create the manual allow-list").await?;
        let sources = read_required(&wl.sources, "create the allow-list sources file").await?;
        let urls = parse_source_urls(&sources);

        info!("Building allow-list from {} external sources", urls.len());
        let store = build_store(&manual, &urls, &self.source).await;

        write_replacing(&wl.master, &store.render()).await?;
        info!(
            "Wrote {} allow-list patterns to {}",
            store.len(),
            wl.master.display()
        );
        Ok(store)
    }

    /// Filters every configured feed against the master allow-list and writes targets.
    pub async fn filter_feeds(&self) -> Result<RunStats> {
        let store = WhitelistStore::load_master(&self.config.whitelist.master).await?;
        let matcher = WhitelistMatcher::new(&store);
        info!("Loaded {} allow-list patterns", store.len());

        let mut merger = Merger::new();
        let mut stats = RunStats::new();
        let mut stale_targets = BTreeSet::new();

        for (name, feed) in self.config.get_feeds_sorted() {
            let target = feed.target(&name);
            merger.ensure_target(target);

            // A fetch or decode failure only takes out this feed's targets.
            let policy = build_policy(&feed.policy);
            let outcome = match self.source.fetch_lines(&feed.url).await {
                Ok(lines) => process_feed(&name, &lines, policy.as_ref(), &matcher),
                Err(e) => Err(e),
            };
            let (domains, feed_stats) = match outcome {
                Ok(processed) => processed,
                Err(e) => match self.config.fetch.on_feed_failure {
                    FeedFailurePolicy::Abort => return Err(e),
                    FeedFailurePolicy::KeepPrevious => {
                        warn!("Feed '{}' failed, keeping previous '{}': {}", name, target, e);
                        stale_targets.insert(target.to_string());
                        stats.record_skipped(&name);
                        continue;
                    }
                },
            };
            info!(
                "Feed '{}' -> '{}': {} domains after filtering",
                name,
                target,
                domains.len()
            );
            merger.add(target, domains);
            stats.record_feed(&name, feed_stats);
        }

        let writer = OutputWriter::new(&self.config.output_dir);
        for (target, domains) in merger.into_targets() {
            if stale_targets.contains(&target) {
                stats.record_kept_previous(&target);
                continue;
            }
            writer.write(&target, &domains).await?;
            stats.record_written(&target, domains.len());
        }

        stats.log_summary();
        Ok(stats)
    }

    /// Full run: allow-list build followed by feed filtering.
    pub async fn run(&self) -> Result<RunStats> {
        self.build_whitelist().await?;
        self.filter_feeds().await
    }
}
