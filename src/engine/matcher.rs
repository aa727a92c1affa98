use super::store::{WhitelistEntry, WhitelistStore};
use super::traits::AllowList;
use crate::parser::normalize_domain;
use rustc_hash::FxHashSet;

/// Hash-indexed view over a [`WhitelistStore`], built once per run.
#[derive(Debug, Default)]
pub struct WhitelistMatcher {
    exact: FxHashSet<Box<str>>,
    // Base domains of `*.base` patterns
    wildcard: FxHashSet<Box<str>>,
}

impl WhitelistMatcher {
    pub fn new(store: &WhitelistStore) -> Self {
        let mut exact = FxHashSet::default();
        let mut wildcard = FxHashSet::default();
        for entry in store.entries() {
            match entry {
                WhitelistEntry::Exact(d) => exact.insert(d.clone().into_boxed_str()),
                WhitelistEntry::WildcardSubtree(d) => wildcard.insert(d.clone().into_boxed_str()),
            };
        }
        Self { exact, wildcard }
    }
}

impl AllowList for WhitelistMatcher {
    fn is_allowed(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        if domain.is_empty() {
            return false;
        }

        // 1. Exact match never covers subdomains
        if self.exact.contains(domain.as_str()) {
            return true;
        }

        // 2. Walk parent suffixes against wildcard bases
        let mut part = domain.as_str();
        loop {
            if self.wildcard.contains(part) {
                return true;
            }

            // Strip leading label
            match part.find('.') {
                Some(idx) => {
                    part = &part[idx + 1..];
                    if part.is_empty() {
                        break;
                    }
                }
                None => break,
            }
        }

        false
    }
}

/// One-off check without keeping a matcher around.
pub fn is_allowed(domain: &str, store: &WhitelistStore) -> bool {
    WhitelistMatcher::new(store).is_allowed(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(patterns: &str) -> WhitelistMatcher {
        WhitelistMatcher::new(&WhitelistStore::parse_master(patterns))
    }

    #[test]
    fn test_exact_does_not_cover_subdomains() {
        let m = matcher("adapty.io\nexample.com\ngoogle.com\n*.blokada.org\n");

        assert!(m.is_allowed("adapty.io"));
        assert!(m.is_allowed("ADAPTY.IO"));
        assert!(m.is_allowed("example.com."));

        assert!(!m.is_allowed("track.adapty.io"));
        assert!(!m.is_allowed("api.example.com"));
        assert!(!m.is_allowed("www.google.com"));
        assert!(!m.is_allowed("subdomain.test.google.com"));
        assert!(!m.is_allowed("notgoogle.com"));
        assert!(!m.is_allowed("example.net"));
        assert!(!m.is_allowed("malware.com"));
    }

    #[test]
    fn test_wildcard_covers_subtree() {
        let m = matcher("adapty.io\n*.blokada.org\n");

        assert!(m.is_allowed("blokada.org"));
        assert!(m.is_allowed("api.blokada.org"));
        assert!(m.is_allowed("www.blokada.org"));
        assert!(m.is_allowed("sub.domain.blokada.org"));

        assert!(!m.is_allowed("notblokada.org"));
        assert!(!m.is_allowed("blokada.com"));
    }

    #[test]
    fn test_exact_and_wildcard_properties() {
        let store = WhitelistStore::parse_master("exact.net\nsecond.exact.io\n*.tree.com\n*.deep.tree.org\n");
        let m = WhitelistMatcher::new(&store);

        for entry in store.entries() {
            let d = entry.domain();
            match entry {
                WhitelistEntry::Exact(_) => {
                    assert!(m.is_allowed(d), "{} should be allowed", d);
                    assert!(!m.is_allowed(&format!("x.{}", d)), "x.{} should be blocked", d);
                }
                WhitelistEntry::WildcardSubtree(_) => {
                    assert!(m.is_allowed(d));
                    assert!(m.is_allowed(&format!("x.{}", d)));
                    assert!(m.is_allowed(&format!("y.{}", d)));
                    assert!(m.is_allowed(&format!("a.b.{}", d)));
                }
            }
        }
    }

    #[test]
    fn test_empty_store_and_input() {
        let m = WhitelistMatcher::default();
        assert!(!m.is_allowed("anything.com"));

        let m = matcher("*.com\n");
        assert!(!m.is_allowed(""));
        assert!(!m.is_allowed("   "));
    }

    #[test]
    fn test_free_function() {
        let store = WhitelistStore::parse_master("example.com\n*.ads.example.org\n");
        assert!(is_allowed("example.com", &store));
        assert!(is_allowed("x.ads.example.org", &store));
        assert!(!is_allowed("track.example.com", &store));
    }
}
