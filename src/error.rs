//! Error taxonomy for a pipeline run.
//!
//! Unparseable lines are not errors: the parser drops them and the run goes on.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = SieveError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SieveError {
    /// A required input file is absent.
    #[error("required input {} not found; {hint}", .path.display())]
    MissingInput { path: PathBuf, hint: &'static str },

    /// A list source could not be fetched.
    #[error("failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A feed delivered a document its policy cannot decode.
    #[error("feed '{feed}' delivered unreadable data: {reason}")]
    InvalidSourceData { feed: String, reason: String },
}

impl SieveError {
    /// Maps a read failure to `MissingInput` when the file is absent.
    pub(crate) fn from_read(path: impl Into<PathBuf>, hint: &'static str, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            SieveError::MissingInput { path, hint }
        } else {
            SieveError::Io { path, source: err }
        }
    }
}
