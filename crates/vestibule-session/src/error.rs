//! Error types for the session layer.
//!
//! None of these ever reach a caller of `login`, `logout` or
//! `initialize`: the manager logs them and degrades (a failed write keeps
//! the in-memory session, a failed read starts anonymous). They exist so
//! the store implementations and the manager's persistence helper can use
//! `?` internally.

/// Errors from a [`SessionStore`](crate::SessionStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying file system operation failed.
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage is disabled or otherwise not usable at all.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// The key can't be mapped onto the backend (e.g. it would escape the
    /// store's directory).
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// Errors that can occur while persisting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The profile couldn't be serialized to JSON.
    #[error("failed to encode session record: {0}")]
    Encode(#[source] serde_json::Error),

    /// The store rejected the read or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}
