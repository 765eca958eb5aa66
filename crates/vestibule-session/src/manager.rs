//! The session manager: the single owner of the current session.
//!
//! Responsibilities:
//! - Restoring the session from the store at startup ([`initialize`])
//! - Checking credentials against the registry ([`login`])
//! - Ending the session ([`logout`])
//! - Publishing every transition to subscribers ([`subscribe`])
//!
//! # Concurrency note
//!
//! Every mutating method takes `&mut self`, so two logins can never
//! interleave on the same manager. Code that shares the manager between
//! tasks wraps it in a `tokio::sync::Mutex`, which makes that lock the
//! single-flight guard for the persisted record. Readers that only need
//! to react to changes hold a `watch::Receiver` instead of the manager.
//!
//! [`initialize`]: SessionManager::initialize
//! [`login`]: SessionManager::login
//! [`logout`]: SessionManager::logout
//! [`subscribe`]: SessionManager::subscribe

use std::sync::Arc;

use tokio::sync::watch;
use vestibule_registry::{Profile, UserRegistry};

use crate::{CredentialVerifier, Session, SessionConfig, SessionError, SessionStore};

/// Owns the current [`Session`] and every transition of it.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ [Initializing] ──initialize()──→ [Anonymous] ──login()──→ [Authenticated]
///                 │                                ↑                      │  ↺ login()
///                 └───initialize(), record found───┼──────────────────→   │
///                                                  └──────logout()────────┘
/// ```
///
/// Failures inside the manager never escape: a wrong password is `false`,
/// a corrupt record is an anonymous start, a broken store is a warning in
/// the log.
pub struct SessionManager<V: CredentialVerifier, S: SessionStore> {
    registry: Arc<UserRegistry>,
    verifier: V,
    store: S,
    config: SessionConfig,

    /// The current session. The sender side of a watch channel doubles as
    /// the storage for the value, so `current_session` and subscribers
    /// always agree.
    state: watch::Sender<Session>,
}

impl<V: CredentialVerifier, S: SessionStore> SessionManager<V, S> {
    /// Creates a manager in the `Initializing` state.
    ///
    /// Nothing is read from the store until [`initialize`](Self::initialize).
    pub fn new(
        registry: Arc<UserRegistry>,
        verifier: V,
        store: S,
        config: SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(Session::Initializing);
        Self {
            registry,
            verifier,
            store,
            config,
            state,
        }
    }

    /// Restores the persisted session, if any.
    ///
    /// - record present and valid → `Authenticated`
    /// - no record, or the store can't be read → `Anonymous`
    /// - record present but unparsable → record removed, `Anonymous`
    ///
    /// Never fails and never leaves the manager `Initializing`. Only the
    /// first call does anything; later calls return the current session.
    pub fn initialize(&mut self) -> Session {
        let initializing = self.state.borrow().is_initializing();
        if !initializing {
            tracing::warn!("session already initialized, ignoring repeated initialize");
            return self.current_session();
        }

        let restored = self.restore();
        tracing::debug!(status = %restored.status(), "session initialized");
        self.state.send_replace(restored.clone());
        restored
    }

    /// Checks `username`/`password` and signs the user in on a match.
    ///
    /// Returns `false` for an unknown username and for a wrong password
    /// alike; callers can't tell the two apart. A `false` result leaves the
    /// session untouched. A successful login while already signed in
    /// replaces the current identity.
    ///
    /// Before [`initialize`](Self::initialize) has run this always returns
    /// `false`.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        let initializing = self.state.borrow().is_initializing();
        if initializing {
            tracing::warn!("login attempted before the session was initialized");
            return false;
        }

        let Some(identity) = self.registry.find_by_username(username) else {
            tracing::debug!(username, "login rejected");
            return false;
        };

        let computed = self.verifier.digest(password, &identity.credential_digest);
        if !constant_time_eq(computed.as_bytes(), identity.credential_digest.as_bytes()) {
            tracing::debug!(username, "login rejected");
            return false;
        }

        let profile = identity.profile();
        tracing::info!(user_id = %profile.id, username, "user signed in");
        self.state.send_replace(Session::Authenticated(profile.clone()));

        if let Err(e) = self.persist(&profile) {
            tracing::warn!(error = %e, "could not persist session, keeping it in memory only");
        }
        true
    }

    /// Ends the session and deletes the persisted record.
    ///
    /// Idempotent. Subscribers are only notified when the session actually
    /// changed. Before [`initialize`](Self::initialize) this does nothing.
    pub fn logout(&mut self) {
        let initializing = self.state.borrow().is_initializing();
        if initializing {
            tracing::warn!("logout attempted before the session was initialized");
            return;
        }

        let changed = self.state.send_if_modified(|session| {
            if matches!(session, Session::Anonymous) {
                false
            } else {
                *session = Session::Anonymous;
                true
            }
        });

        if let Err(e) = self.store.remove(&self.config.storage_key) {
            tracing::warn!(error = %e, "could not remove persisted session");
        }

        if changed {
            tracing::info!("user signed out");
        }
    }

    /// Returns the current session. Pure read, no I/O.
    pub fn current_session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribes to session transitions.
    ///
    /// The receiver starts out holding the current session; every later
    /// transition marks it changed. Only the latest value is kept: if
    /// several transitions happen before the receiver looks (a login and
    /// a logout in quick succession), it sees the last one only. Consumers
    /// must act on the current state, not count transitions.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads and parses the persisted record.
    fn restore(&self) -> Session {
        let key = &self.config.storage_key;

        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Session::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "session store unreadable, starting anonymous");
                return Session::Anonymous;
            }
        };

        match serde_json::from_str::<Profile>(&raw) {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, username = %profile.username, "session restored");
                Session::Authenticated(profile)
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed persisted session");
                if let Err(e) = self.store.remove(key) {
                    tracing::warn!(error = %e, "could not remove malformed session record");
                }
                Session::Anonymous
            }
        }
    }

    fn persist(&self, profile: &Profile) -> Result<(), SessionError> {
        let json = serde_json::to_string(profile).map_err(SessionError::Encode)?;
        self.store.set(&self.config.storage_key, &json)?;
        Ok(())
    }
}

/// Compares two byte strings without short-circuiting on the first
/// difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionManager`.
    //!
    //! Naming: `test_{function}_{scenario}_{expected}`.
    //!
    //! Most tests use `PlainVerifier`, a mock that stores passwords as
    //! `plain$<password>`, so they don't pay for PBKDF2. The PBKDF2 path is
    //! covered in `verifier.rs` and in the integration tests.

    use super::*;
    use crate::{MemoryStore, SessionStatus, UnavailableStore};
    use vestibule_registry::{Identity, UserId};

    // -- Helpers ----------------------------------------------------------

    struct PlainVerifier;

    impl CredentialVerifier for PlainVerifier {
        fn digest(&self, password: &str, _reference: &str) -> String {
            format!("plain${password}")
        }
    }

    fn identity(id: u64, username: &str, password: &str) -> Identity {
        Identity {
            id: UserId(id),
            username: username.into(),
            credential_digest: format!("plain${password}"),
            display_name: format!("{username} display"),
            email: format!("{username}@example.com"),
            role: "user".into(),
        }
    }

    fn registry() -> Arc<UserRegistry> {
        Arc::new(
            UserRegistry::from_identities(vec![
                identity(1, "user", "password"),
                identity(2, "speaker", "podium"),
            ])
            .unwrap(),
        )
    }

    fn manager_with(store: MemoryStore) -> SessionManager<PlainVerifier, MemoryStore> {
        SessionManager::new(registry(), PlainVerifier, store, SessionConfig::default())
    }

    /// A manager that has already been initialized with an empty store.
    fn ready_manager() -> SessionManager<PlainVerifier, MemoryStore> {
        let mut mgr = manager_with(MemoryStore::new());
        mgr.initialize();
        mgr
    }

    // =====================================================================
    // new() / initialize()
    // =====================================================================

    #[test]
    fn test_new_starts_initializing() {
        let mgr = manager_with(MemoryStore::new());
        assert_eq!(mgr.current_session(), Session::Initializing);
    }

    #[test]
    fn test_initialize_empty_store_becomes_anonymous() {
        let mut mgr = manager_with(MemoryStore::new());

        let session = mgr.initialize();

        assert_eq!(session, Session::Anonymous);
        assert_eq!(mgr.current_session(), Session::Anonymous);
    }

    #[test]
    fn test_initialize_valid_record_becomes_authenticated() {
        let store = MemoryStore::new();
        store
            .set(
                "user",
                r#"{"id":2,"username":"speaker","displayName":"Speaker","email":"s@example.com","role":"admin"}"#,
            )
            .unwrap();
        let mut mgr = manager_with(store);

        let session = mgr.initialize();

        let profile = session.identity().expect("should be signed in");
        assert_eq!(profile.id, UserId(2));
        assert_eq!(profile.username, "speaker");
        assert_eq!(profile.role, "admin");
    }

    #[test]
    fn test_initialize_malformed_record_clears_it_and_becomes_anonymous() {
        let store = MemoryStore::new();
        store.set("user", "{not json").unwrap();
        let mut mgr = manager_with(store.clone());

        let session = mgr.initialize();

        assert_eq!(session, Session::Anonymous);
        assert_eq!(store.get("user").unwrap(), None, "corrupt record should be removed");
    }

    #[test]
    fn test_initialize_wrong_shape_record_is_treated_as_corrupt() {
        let store = MemoryStore::new();
        store.set("user", r#"{"id":"one"}"#).unwrap();
        let mut mgr = manager_with(store.clone());

        assert_eq!(mgr.initialize(), Session::Anonymous);
        assert!(store.is_empty());
    }

    #[test]
    fn test_initialize_unavailable_store_becomes_anonymous() {
        let mut mgr = SessionManager::new(
            registry(),
            PlainVerifier,
            UnavailableStore,
            SessionConfig::default(),
        );
        assert_eq!(mgr.initialize(), Session::Anonymous);
    }

    #[test]
    fn test_initialize_twice_keeps_current_session() {
        let mut mgr = ready_manager();
        assert!(mgr.login("user", "password"));

        let session = mgr.initialize();

        assert_eq!(session.status(), SessionStatus::Authenticated);
    }

    #[test]
    fn test_initialize_uses_configured_storage_key() {
        let store = MemoryStore::new();
        store
            .set(
                "visitor",
                r#"{"id":1,"username":"user","displayName":"U","email":"e","role":"r"}"#,
            )
            .unwrap();
        let mut mgr = SessionManager::new(
            registry(),
            PlainVerifier,
            store,
            SessionConfig {
                storage_key: "visitor".into(),
            },
        );

        assert!(mgr.initialize().is_authenticated());
    }

    // =====================================================================
    // login()
    // =====================================================================

    #[test]
    fn test_login_correct_credentials_returns_true_and_authenticates() {
        let mut mgr = ready_manager();

        assert!(mgr.login("user", "password"));

        let session = mgr.current_session();
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(session.identity().unwrap().username, "user");
    }

    #[test]
    fn test_login_persists_sanitized_profile() {
        let store = MemoryStore::new();
        let mut mgr = manager_with(store.clone());
        mgr.initialize();

        mgr.login("user", "password");

        let raw = store.get("user").unwrap().expect("record persisted");
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["username"], "user");
        assert_eq!(json["displayName"], "user display");
        assert!(json.get("credentialDigest").is_none());
        assert!(!raw.contains("plain$"), "digest must never be persisted");
    }

    #[test]
    fn test_login_wrong_password_returns_false_and_keeps_state() {
        let mut mgr = ready_manager();

        assert!(!mgr.login("user", "wrong"));

        assert_eq!(mgr.current_session(), Session::Anonymous);
    }

    #[test]
    fn test_login_unknown_user_returns_false_and_keeps_state() {
        let mut mgr = ready_manager();

        assert!(!mgr.login("nouser", "password"));

        assert_eq!(mgr.current_session(), Session::Anonymous);
        assert!(mgr.store().is_empty());
    }

    #[test]
    fn test_login_failure_while_authenticated_keeps_identity() {
        let mut mgr = ready_manager();
        mgr.login("user", "password");

        assert!(!mgr.login("speaker", "wrong"));

        assert_eq!(mgr.current_session().identity().unwrap().username, "user");
    }

    #[test]
    fn test_login_again_replaces_identity() {
        let store = MemoryStore::new();
        let mut mgr = manager_with(store.clone());
        mgr.initialize();
        mgr.login("user", "password");

        assert!(mgr.login("speaker", "podium"));

        assert_eq!(mgr.current_session().identity().unwrap().id, UserId(2));
        assert!(store.get("user").unwrap().unwrap().contains("speaker"));
    }

    #[test]
    fn test_login_username_is_case_sensitive() {
        let mut mgr = ready_manager();
        assert!(!mgr.login("User", "password"));
    }

    #[test]
    fn test_login_before_initialize_returns_false() {
        let mut mgr = manager_with(MemoryStore::new());

        assert!(!mgr.login("user", "password"));

        assert_eq!(mgr.current_session(), Session::Initializing);
    }

    #[test]
    fn test_login_with_unavailable_store_still_authenticates() {
        let mut mgr = SessionManager::new(
            registry(),
            PlainVerifier,
            UnavailableStore,
            SessionConfig::default(),
        );
        mgr.initialize();

        assert!(mgr.login("user", "password"));

        assert!(mgr.current_session().is_authenticated());
    }

    // =====================================================================
    // logout()
    // =====================================================================

    #[test]
    fn test_logout_clears_session_and_record() {
        let store = MemoryStore::new();
        let mut mgr = manager_with(store.clone());
        mgr.initialize();
        mgr.login("user", "password");

        mgr.logout();

        assert_eq!(mgr.current_session(), Session::Anonymous);
        assert_eq!(store.get("user").unwrap(), None);
    }

    #[test]
    fn test_logout_twice_is_idempotent() {
        let mut mgr = ready_manager();
        mgr.login("user", "password");

        mgr.logout();
        assert_eq!(mgr.current_session(), Session::Anonymous);
        mgr.logout();
        assert_eq!(mgr.current_session(), Session::Anonymous);
    }

    #[test]
    fn test_logout_before_initialize_is_noop() {
        let mut mgr = manager_with(MemoryStore::new());
        mgr.logout();
        assert_eq!(mgr.current_session(), Session::Initializing);
    }

    #[test]
    fn test_logout_with_unavailable_store_still_signs_out() {
        let mut mgr = SessionManager::new(
            registry(),
            PlainVerifier,
            UnavailableStore,
            SessionConfig::default(),
        );
        mgr.initialize();
        mgr.login("user", "password");

        mgr.logout();

        assert_eq!(mgr.current_session(), Session::Anonymous);
    }

    // =====================================================================
    // subscribe()
    // =====================================================================

    #[test]
    fn test_subscribe_sees_each_transition() {
        let mut mgr = manager_with(MemoryStore::new());
        let mut rx = mgr.subscribe();
        assert_eq!(*rx.borrow_and_update(), Session::Initializing);

        mgr.initialize();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Session::Anonymous);

        mgr.login("user", "password");
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        mgr.logout();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Session::Anonymous);
    }

    #[test]
    fn test_subscribe_not_notified_by_failed_login_or_redundant_logout() {
        let mut mgr = ready_manager();
        let mut rx = mgr.subscribe();
        rx.borrow_and_update();

        mgr.login("user", "wrong");
        mgr.logout();

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_subscribe_unread_transitions_collapse_to_latest() {
        let mut mgr = ready_manager();
        let mut rx = mgr.subscribe();
        rx.borrow_and_update();

        mgr.login("user", "password");
        mgr.logout();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Session::Anonymous);
        assert!(!rx.has_changed().unwrap());
    }

    // =====================================================================
    // constant_time_eq()
    // =====================================================================

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"digest", b"digest"));
        assert!(!constant_time_eq(b"digest", b"digesT"));
        assert!(!constant_time_eq(b"short", b"longer"));
        assert!(constant_time_eq(b"", b""));
    }
}
