use super::store::{WhitelistEntry, WhitelistStore};
use crate::parser::parse_line;
use crate::source::ListSource;
use tracing::{info, warn};

/// Reads the external-sources file: one URL per line, `#` comments allowed.
pub fn parse_source_urls(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Builds the allow-list from manual patterns plus every reachable external list.
///
/// External lists go through the blocklist line grammar; a `*.` marker on the
/// source line yields a wildcard pattern. Unreachable sources are skipped.
pub async fn build_store(manual: &str, urls: &[String], source: &dyn ListSource) -> WhitelistStore {
    let mut store = WhitelistStore::parse_master(manual);
    info!("Loaded {} manual allow-list patterns", store.len());

    for url in urls {
        let lines = match source.fetch_lines(url).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Skipping allow-list source: {}", e);
                continue;
            }
        };

        let before = store.len();
        store.extend(
            lines
                .iter()
                .filter_map(|line| parse_line(line))
                .map(|parsed| WhitelistEntry::new(&parsed.domain, parsed.wildcard)),
        );
        info!(
            "Added {} allow-list patterns from {} ({} lines)",
            store.len() - before,
            url,
            lines.len()
        );
    }

    store
}
