use crate::error::{Result, SieveError};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tokio::fs;

/// One allow-list pattern. The `*.` marker lives in the variant, never in the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WhitelistEntry {
    /// Matches the literal domain only.
    Exact(String),
    /// Matches the domain and everything beneath it.
    WildcardSubtree(String),
}

impl WhitelistEntry {
    /// Parses a manual-list pattern: `domain.com` or `*.domain.com`, optionally quoted.
    pub fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() || pattern.starts_with('#') {
            return None;
        }
        let pattern = pattern.trim_matches('"').trim().to_lowercase();
        let (wildcard, domain) = match pattern.strip_prefix("*.") {
            Some(base) => (true, base),
            None => (false, pattern.as_str()),
        };
        let domain = domain.trim_end_matches('.');
        if domain.is_empty() {
            return None;
        }
        Some(Self::new(domain, wildcard))
    }

    pub fn new(domain: &str, wildcard: bool) -> Self {
        if wildcard {
            WhitelistEntry::WildcardSubtree(domain.to_string())
        } else {
            WhitelistEntry::Exact(domain.to_string())
        }
    }

    pub fn domain(&self) -> &str {
        match self {
            WhitelistEntry::Exact(d) | WhitelistEntry::WildcardSubtree(d) => d,
        }
    }

    /// The normalized pattern text the store is keyed by.
    pub fn pattern(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WhitelistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhitelistEntry::Exact(d) => f.write_str(d),
            WhitelistEntry::WildcardSubtree(d) => write!(f, "*.{}", d),
        }
    }
}

/// Deduplicated allow-list, ordered by pattern text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistStore {
    entries: BTreeMap<String, WhitelistEntry>,
}

impl WhitelistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern. Returns false if it was already present.
    pub fn insert(&mut self, entry: WhitelistEntry) -> bool {
        let key = entry.pattern();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry);
        true
    }

    pub fn contains(&self, entry: &WhitelistEntry) -> bool {
        self.entries.contains_key(&entry.pattern())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &WhitelistEntry> {
        self.entries.values()
    }

    /// Reads patterns in the manual-list grammar, skipping comments and blanks.
    pub fn parse_master(text: &str) -> Self {
        text.lines().filter_map(WhitelistEntry::parse).collect()
    }

    /// Loads the generated master allow-list. Its absence is fatal for filtering.
    pub async fn load_master(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).await.map_err(|e| {
            SieveError::from_read(path, "regenerate it with the whitelist step first", e)
        })?;
        Ok(Self::parse_master(&text))
    }

    /// Serializes the store as the generated master allow-list.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for key in self.entries.keys() {
            out.push_str(key);
            out.push('\n');
        }
        out
    }
}

impl FromIterator<WhitelistEntry> for WhitelistStore {
    fn from_iter<I: IntoIterator<Item = WhitelistEntry>>(iter: I) -> Self {
        let mut store = WhitelistStore::new();
        for entry in iter {
            store.insert(entry);
        }
        store
    }
}

impl Extend<WhitelistEntry> for WhitelistStore {
    fn extend<I: IntoIterator<Item = WhitelistEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_patterns() {
        assert_eq!(
            WhitelistEntry::parse("Example.COM"),
            Some(WhitelistEntry::Exact("example.com".into()))
        );
        assert_eq!(
            WhitelistEntry::parse("  *.blokada.org  "),
            Some(WhitelistEntry::WildcardSubtree("blokada.org".into()))
        );
        assert_eq!(
            WhitelistEntry::parse("\"adapty.io\""),
            Some(WhitelistEntry::Exact("adapty.io".into()))
        );
        assert_eq!(
            WhitelistEntry::parse("dotted.net."),
            Some(WhitelistEntry::Exact("dotted.net".into()))
        );
        assert_eq!(WhitelistEntry::parse("# comment"), None);
        assert_eq!(WhitelistEntry::parse(""), None);
        assert_eq!(WhitelistEntry::parse("*."), None);
    }

    #[test]
    fn test_duplicates_collapse() {
        let store = WhitelistStore::parse_master(
            "# allow-list\nadapty.io\nADAPTY.IO\n\nexample.com\n*.blokada.org\n*.Blokada.org\n",
        );
        assert_eq!(store.len(), 3);
        assert!(store.contains(&WhitelistEntry::Exact("adapty.io".into())));
        assert!(store.contains(&WhitelistEntry::WildcardSubtree("blokada.org".into())));
        assert!(!store.contains(&WhitelistEntry::Exact("blokada.org".into())));
    }

    #[test]
    fn test_exact_and_wildcard_coexist() {
        let mut store = WhitelistStore::new();
        assert!(store.insert(WhitelistEntry::Exact("example.com".into())));
        assert!(store.insert(WhitelistEntry::WildcardSubtree("example.com".into())));
        assert!(!store.insert(WhitelistEntry::Exact("example.com".into())));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_render_is_sorted_and_reloadable() {
        let store = WhitelistStore::parse_master("zeta.org\n*.ads.example.org\nalpha.com\n");
        let rendered = store.render();
        assert_eq!(rendered, "*.ads.example.org\nalpha.com\nzeta.org\n");
        assert_eq!(WhitelistStore::parse_master(&rendered), store);
    }

    #[tokio::test]
    async fn test_load_master_missing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = WhitelistStore::load_master(dir.path().join("generated.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, SieveError::MissingInput { .. }));
    }
}
