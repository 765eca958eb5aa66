//! Identity types.
//!
//! Two shapes of the same person live here:
//!
//! - [`Identity`] is what the registry file stores, including the
//!   credential digest.
//! - [`Profile`] is the sanitized projection handed to the rest of the
//!   application and written to the session store. It has no digest field
//!   at all, so "never persist the digest" is enforced by the type system
//!   rather than by remembering to strip a field.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// A unique, stable identifier for a registered user.
///
/// Newtype over `u64` so a user id can't be confused with any other
/// integer. `#[serde(transparent)]` keeps the JSON form a plain number:
/// `UserId(1)` is written as `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A registry entry: one known user and their stored credential digest.
///
/// Loaded once at startup and never mutated afterwards.
///
/// The JSON shape uses camelCase keys. The aliases accept the field names
/// of older registry files (`name` for the display name, `password` for
/// the digest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique id, never reused.
    pub id: UserId,

    /// Login key. Unique and case-sensitive.
    pub username: String,

    /// Opaque digest produced by a credential verifier. Compared for
    /// equality only; never leaves this type.
    #[serde(alias = "password")]
    pub credential_digest: String,

    /// Human-readable name shown in the UI.
    #[serde(alias = "name")]
    pub display_name: String,

    pub email: String,

    /// Descriptive only. No access decision in Vestibule looks at it.
    pub role: String,
}

impl Identity {
    /// Returns the sanitized projection of this identity: every field
    /// except the credential digest.
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The sanitized identity of a signed-in user.
///
/// This is exactly what the session store persists:
///
/// ```json
/// { "id": 1, "username": "user", "displayName": "Demo User",
///   "email": "user@example.com", "role": "user" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    #[serde(alias = "name")]
    pub display_name: String,
    pub email: String,
    pub role: String,
}

// =========================================================================
// Tests
// =========================================================================
