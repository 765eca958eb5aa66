//! Session types: what the application knows about the current visitor.
//!
//! A session is in exactly one of three states:
//!
//! ```text
//!   Initializing ──(initialize)──→ Anonymous ⇄ Authenticated(profile)
//!        │                                        ↑
//!        └───────(initialize, record found)───────┘
//! ```
//!
//! The profile lives inside the `Authenticated` variant, so there is no
//! way to build a session that is "anonymous but has a user".

use std::fmt;

use serde::{Deserialize, Serialize};
use vestibule_registry::Profile;

/// Storage key for the persisted profile.
pub const DEFAULT_STORAGE_KEY: &str = "user";

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Key under which the signed-in profile is persisted.
    ///
    /// Default: `"user"`.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// The state of a [`Session`] without its payload.
///
/// Handy for logging and for comparisons where the profile doesn't matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Initializing,
    Anonymous,
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::Anonymous => write!(f, "anonymous"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The current session.
///
/// - **Initializing**: the persisted record hasn't been read yet. Views
///   show a loading indicator.
/// - **Anonymous**: nobody is signed in.
/// - **Authenticated**: a user is signed in; carries their sanitized
///   profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Initializing,
    Anonymous,
    Authenticated(Profile),
}

impl Session {
    /// Returns the payload-free status.
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Initializing => SessionStatus::Initializing,
            Self::Anonymous => SessionStatus::Anonymous,
            Self::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    /// The signed-in profile, if any.
    pub fn identity(&self) -> Option<&Profile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
