//! Storage errors
//!
//! Only persistence can fail. Gameplay has no error paths.

use core::fmt;

/// Failure to persist something. Never fatal: callers log and carry on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No storage backend in this host (private mode, sandboxed iframe, ...)
    Unavailable,
    Write { key: &'static str, reason: String },
    Encode(String),
}

impl StoreError {
    /// Wrap a backend write failure
    pub fn write(key: &'static str, reason: impl fmt::Debug) -> Self {
        Self::Write {
            key,
            reason: format!("{reason:?}"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Write { key, reason } => write!(f, "failed to write {key}: {reason}"),
            Self::Encode(reason) => write!(f, "failed to encode value: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}
