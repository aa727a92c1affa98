mod builder;
mod matcher;
mod store;
mod traits;

pub use builder::{build_store, parse_source_urls};
pub use matcher::{is_allowed, WhitelistMatcher};
pub use store::{WhitelistEntry, WhitelistStore};
pub use traits::AllowList;
