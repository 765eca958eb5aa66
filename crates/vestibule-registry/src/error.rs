//! Error types for the registry layer.
//!
//! Every variant here is a startup failure. A registry that fails to load
//! must stop the process: there is no sensible "partially trusted" list of
//! users to fall back to.

use crate::UserId;

/// Errors that can occur while loading or validating a [`UserRegistry`].
///
/// [`UserRegistry`]: crate::UserRegistry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The registry is not valid JSON, or does not have the shape of a
    /// list of identity records (missing fields, wrong types).
    #[error("malformed registry: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record has an empty `username`. Empty usernames would make the
    /// login form's "required" check the only thing standing between an
    /// empty submission and a match.
    #[error("identity {0} has an empty username")]
    EmptyUsername(UserId),

    /// A record has an empty credential digest.
    #[error("identity {0} has an empty credential digest")]
    EmptyDigest(UserId),

    /// A record's credential digest is in a format the configured
    /// verifier can't reproduce (e.g. a legacy unsalted hash), so nobody
    /// could ever sign in as that user.
    #[error("identity {0} has an unsupported credential digest")]
    UnsupportedDigest(UserId),

    /// Two records share a username. Lookups are exact-match, so the
    /// second record could never be reached.
    #[error("duplicate username {0:?}")]
    DuplicateUsername(String),

    /// Two records share an id.
    #[error("duplicate identity id {0}")]
    DuplicateId(UserId),
}
