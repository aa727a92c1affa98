//! Builds per-source hosts blocklists from tracker feeds, minus a curated allow-list.
//!
//! Raw upstream text flows through [`parser`], a per-feed [`policy`], the
//! allow-list [`engine`] and the [`merge`] step before [`output`] writes it.

pub mod config;
pub mod engine;
pub mod error;
pub mod init;
pub mod merge;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod policy;
pub mod source;
pub mod stats;

pub use error::{Result, SieveError};
