use hostsieve::config::{Config, FeedConfig, PolicyConfig};
use std::path::Path;

/// Config rooted in a temp dir, with manual allow-list and sources files written.
pub fn config_in(root: &Path, manual: &str, sources: &str) -> Config {
    let mut config = Config::default();
    config.output_dir = root.join("hosts");
    config.whitelist.manual = root.join("whitelist/manual.txt");
    config.whitelist.sources = root.join("whitelist/sources.txt");
    config.whitelist.master = root.join("whitelist/generated.txt");

    std::fs::create_dir_all(root.join("whitelist")).unwrap();
    std::fs::write(&config.whitelist.manual, manual).unwrap();
    std::fs::write(&config.whitelist.sources, sources).unwrap();
    config
}

pub fn add_feed(config: &mut Config, name: &str, url: &str, policy: PolicyConfig) {
    config.feeds.insert(
        name.to_string(),
        FeedConfig {
            url: url.to_string(),
            policy,
        },
    );
}

pub fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}
