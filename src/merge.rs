//! Per-target union of feed outputs.

use std::collections::{BTreeMap, BTreeSet};

/// Output tokens for one target. Ordered so serialization is stable.
pub type BlocklistOutput = BTreeSet<String>;

/// Plain set union; order of the inputs does not matter.
pub fn merge<I>(sets: I) -> BlocklistOutput
where
    I: IntoIterator<Item = BlocklistOutput>,
{
    let mut merged = BlocklistOutput::new();
    for set in sets {
        merged.extend(set);
    }
    merged
}

/// Collects feed contributions keyed by output target.
#[derive(Debug, Default)]
pub struct Merger {
    targets: BTreeMap<String, BlocklistOutput>,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target so it is written even if every feed for it comes up empty.
    pub fn ensure_target(&mut self, target: &str) {
        self.targets.entry(target.to_string()).or_default();
    }

    pub fn add(&mut self, target: &str, domains: BlocklistOutput) {
        self.targets.entry(target.to_string()).or_default().extend(domains);
    }

    pub fn get(&self, target: &str) -> Option<&BlocklistOutput> {
        self.targets.get(target)
    }

    pub fn into_targets(self) -> BTreeMap<String, BlocklistOutput> {
        self.targets
    }
}
