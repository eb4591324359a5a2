//! Errors reported by preference stores and environment signal sources.
//!
//! The resolver never surfaces these: it logs them and falls back. They are
//! public so hosts using a store or signal directly can see real failures.

use std::path::PathBuf;

/// Error returned by a [`PreferenceStore`](crate::PreferenceStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No persistence is available in this execution context.
    #[error("preference store is unavailable")]
    Unavailable,
    /// Reading or writing the backing file failed.
    #[error("preference file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The preference map could not be encoded.
    #[error("failed to encode preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error returned by an [`EnvironmentSignal`](crate::EnvironmentSignal).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// The host cannot report a preferred color scheme.
    #[error("environment color scheme signal is unavailable")]
    Unavailable,
}
