use super::{AdmissionPolicy, DomainEntry};
use rustc_hash::FxHashSet;

/// Drops entries whose leftmost label is generic infrastructure (`www`, `api`, ...).
/// Those hosts are assumed to serve the apex domain itself rather than a tracker.
#[derive(Debug, Clone)]
pub struct TrackerDbPolicy {
    generic_prefixes: FxHashSet<String>,
}

impl TrackerDbPolicy {
    pub fn new(generic_prefixes: &[String]) -> Self {
        Self {
            generic_prefixes: generic_prefixes.iter().map(|p| p.trim().to_lowercase()).collect(),
        }
    }
}

impl AdmissionPolicy for TrackerDbPolicy {
    fn admit(&self, entry: &DomainEntry) -> bool {
        // With only two labels the "prefix" is the registrable name itself.
        if entry.label_count() <= 2 {
            return true;
        }
        !self.generic_prefixes.contains(entry.leftmost_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_generic_prefixes;
    use crate::parser::parse_line;

    fn entry(domain: &str) -> DomainEntry {
        DomainEntry::from_parsed(parse_line(domain).unwrap(), "exodus")
    }

    #[test]
    fn test_generic_prefix_dropped() {
        let policy = TrackerDbPolicy::new(&["api".to_string()]);
        assert!(!policy.admit(&entry("api.tracker.io")));
        assert!(policy.admit(&entry("collect.tracker.io")));
        assert!(policy.admit(&entry("tracker.io")));
    }

    #[test]
    fn test_default_prefixes() {
        let policy = TrackerDbPolicy::new(&default_generic_prefixes());
        assert!(!policy.admit(&entry("www.tracker.io")));
        assert!(!policy.admit(&entry("CDN.tracker.io")));
        assert!(!policy.admit(&entry("static.deep.tracker.io")));
        // Apex names are never treated as prefixed
        assert!(policy.admit(&entry("api.io")));
        assert!(policy.admit(&entry("metrics.www.tracker.io")));
    }
}
