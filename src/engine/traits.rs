/// Read-only allow-list lookup consulted by every feed.
pub trait AllowList: Send + Sync {
    /// Returns true if the domain must be kept out of the blocklist.
    fn is_allowed(&self, domain: &str) -> bool;
}
