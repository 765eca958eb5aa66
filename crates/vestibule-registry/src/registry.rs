//! The user registry: a read-only, validated list of identities.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::{Identity, RegistryError};

/// The static collection of known identities.
///
/// Built once at startup and then only read. Lookups go through an index
/// from username to position, so `find_by_username` doesn't scan.
///
/// There are no mutation methods. Share it with `Arc<UserRegistry>`.
#[derive(Debug, Clone)]
pub struct UserRegistry {
    identities: Vec<Identity>,
    by_username: HashMap<String, usize>,
}

impl UserRegistry {
    /// Builds a registry from already-parsed identities.
    ///
    /// # Errors
    /// - [`RegistryError::EmptyUsername`] / [`RegistryError::EmptyDigest`]
    ///   for incomplete records
    /// - [`RegistryError::DuplicateUsername`] / [`RegistryError::DuplicateId`]
    ///   when the uniqueness invariants are violated
    pub fn from_identities(identities: Vec<Identity>) -> Result<Self, RegistryError> {
        let mut by_username = HashMap::with_capacity(identities.len());
        let mut ids = HashSet::with_capacity(identities.len());

        for (index, identity) in identities.iter().enumerate() {
            if identity.username.is_empty() {
                return Err(RegistryError::EmptyUsername(identity.id));
            }
            if identity.credential_digest.is_empty() {
                return Err(RegistryError::EmptyDigest(identity.id));
            }
            if !ids.insert(identity.id) {
                return Err(RegistryError::DuplicateId(identity.id));
            }
            if by_username.insert(identity.username.clone(), index).is_some() {
                return Err(RegistryError::DuplicateUsername(identity.username.clone()));
            }
        }

        tracing::debug!(count = identities.len(), "user registry loaded");

        Ok(Self {
            identities,
            by_username,
        })
    }

    /// Parses and validates a registry from a JSON array of identity
    /// records.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let identities: Vec<Identity> = serde_json::from_str(json)?;
        Self::from_identities(identities)
    }

    /// Same as [`from_json_str`](Self::from_json_str), from raw bytes.
    pub fn from_json_slice(json: &[u8]) -> Result<Self, RegistryError> {
        let identities: Vec<Identity> = serde_json::from_slice(json)?;
        Self::from_identities(identities)
    }

    /// Reads, parses and validates the registry file at `path`.
    ///
    /// # Errors
    /// [`RegistryError::Io`] if the file can't be read, plus everything
    /// [`from_identities`](Self::from_identities) can return.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json_slice(&bytes)?;
        tracing::info!(
            path = %path.display(),
            users = registry.len(),
            "registry file loaded"
        );
        Ok(registry)
    }

    /// Looks up an identity by exact, case-sensitive username.
    ///
    /// Not finding anyone is a normal outcome, not an error.
    pub fn find_by_username(&self, username: &str) -> Option<&Identity> {
        self.by_username
            .get(username)
            .map(|&index| &self.identities[index])
    }

    /// Checks every stored digest with `accepts`.
    ///
    /// The registry can't know which digest formats are usable; whoever
    /// pairs it with a verifier calls this once at startup.
    ///
    /// # Errors
    /// [`RegistryError::UnsupportedDigest`] for the first identity whose
    /// digest is rejected.
    pub fn ensure_digests(&self, accepts: impl Fn(&str) -> bool) -> Result<(), RegistryError> {
        match self
            .identities
            .iter()
            .find(|identity| !accepts(&identity.credential_digest))
        {
            Some(identity) => Err(RegistryError::UnsupportedDigest(identity.id)),
            None => Ok(()),
        }
    }

    /// Iterates over all identities in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.identities.iter()
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Returns `true` if nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
