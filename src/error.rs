use crate::provider::ProviderError;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the cache and accounting layer.
///
/// A cache miss is not an error; lookups report it as `Ok(None)` and the
/// orchestrator proceeds to the remote call.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or conflicting configuration. Raised before any remote call
    /// or ledger mutation.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Storage read/write failure in a cache backend. No partial state is
    /// retained and the ledgers are untouched.
    #[error("cache backend I/O error at {path}: {source}")]
    Backend {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding or decoding failure for a request or cache entry.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote provider rejected or failed to answer the call. The
    /// failure is surfaced unmodified; nothing was cached or recorded.
    #[error("remote call failed: {0}")]
    Remote(#[from] ProviderError),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn backend(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Backend {
            path: path.into(),
            source,
        }
    }
}
