//! `Vestibule` builder and the shared application handle.
//!
//! This is the entry point for embedding the sign-in gate. It ties the
//! layers together: registry → session manager → gate and controls.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use vestibule_gate::{AuthButton, ButtonAction, LoginForm, Navigator, Notice, Route, ViewGate};
use vestibule_registry::UserRegistry;
use vestibule_session::{
    CredentialVerifier, MemoryStore, Pbkdf2Verifier, Session, SessionConfig, SessionManager,
    SessionStore,
};

use crate::VestibuleError;

/// Where the registry comes from.
enum RegistrySource {
    Path(PathBuf),
    Json(String),
    Loaded(Arc<UserRegistry>),
}

/// Builder for configuring a [`Vestibule`].
///
/// Defaults: [`Pbkdf2Verifier`], an in-memory store, the default
/// [`SessionConfig`]. A registry source is required.
///
/// # Example
///
/// ```rust,no_run
/// use vestibule::prelude::*;
///
/// # async fn run() -> Result<(), VestibuleError> {
/// let app = Vestibule::builder()
///     .registry_path("data/users.json")
///     .store(FileStore::new(".vestibule"))
///     .build()?;
/// app.initialize().await;
/// let signed_in = app.login("user", "password").await;
/// # Ok(())
/// # }
/// ```
pub struct VestibuleBuilder<V: CredentialVerifier, S: SessionStore> {
    registry: Option<RegistrySource>,
    session_config: SessionConfig,
    verifier: V,
    store: S,
}

impl VestibuleBuilder<Pbkdf2Verifier, MemoryStore> {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            registry: None,
            session_config: SessionConfig::default(),
            verifier: Pbkdf2Verifier,
            store: MemoryStore::new(),
        }
    }
}

impl Default for VestibuleBuilder<Pbkdf2Verifier, MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: CredentialVerifier, S: SessionStore> VestibuleBuilder<V, S> {
    /// Loads the registry from a JSON file at build time.
    pub fn registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry = Some(RegistrySource::Path(path.into()));
        self
    }

    /// Parses the registry from a JSON string at build time (e.g. a file
    /// bundled with `include_str!`).
    pub fn registry_json(mut self, json: impl Into<String>) -> Self {
        self.registry = Some(RegistrySource::Json(json.into()));
        self
    }

    /// Uses an already loaded registry.
    pub fn registry(mut self, registry: Arc<UserRegistry>) -> Self {
        self.registry = Some(RegistrySource::Loaded(registry));
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Replaces the session store.
    pub fn store<S2: SessionStore>(self, store: S2) -> VestibuleBuilder<V, S2> {
        VestibuleBuilder {
            registry: self.registry,
            session_config: self.session_config,
            verifier: self.verifier,
            store,
        }
    }

    /// Replaces the credential verifier.
    pub fn verifier<V2: CredentialVerifier>(self, verifier: V2) -> VestibuleBuilder<V2, S> {
        VestibuleBuilder {
            registry: self.registry,
            session_config: self.session_config,
            verifier,
            store: self.store,
        }
    }

    /// Loads and validates the registry and assembles the application.
    ///
    /// The session is left `Initializing`; call
    /// [`Vestibule::initialize`] once at startup.
    ///
    /// # Errors
    /// [`VestibuleError::MissingRegistry`] without a registry source, and
    /// [`VestibuleError::Registry`] if it fails to load or holds a digest
    /// the verifier can't check.
    pub fn build(self) -> Result<Vestibule<V, S>, VestibuleError> {
        let registry = match self.registry.ok_or(VestibuleError::MissingRegistry)? {
            RegistrySource::Path(path) => Arc::new(UserRegistry::load(path)?),
            RegistrySource::Json(json) => Arc::new(UserRegistry::from_json_str(&json)?),
            RegistrySource::Loaded(registry) => registry,
        };
        registry.ensure_digests(|digest| self.verifier.accepts(digest))?;

        tracing::debug!(users = registry.len(), "vestibule assembled");

        let manager = SessionManager::new(registry, self.verifier, self.store, self.session_config);
        Ok(Vestibule {
            sessions: Arc::new(Mutex::new(manager)),
        })
    }
}

/// The assembled application: one session manager shared behind a lock.
///
/// Cheap to clone; clones share the same session. The lock serializes
/// sign-ins and sign-outs, so concurrent submissions can't race on the
/// persisted record.
pub struct Vestibule<V: CredentialVerifier, S: SessionStore> {
    sessions: Arc<Mutex<SessionManager<V, S>>>,
}

impl<V: CredentialVerifier, S: SessionStore> Clone for Vestibule<V, S> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl Vestibule<Pbkdf2Verifier, MemoryStore> {
    /// Creates a new builder.
    pub fn builder() -> VestibuleBuilder<Pbkdf2Verifier, MemoryStore> {
        VestibuleBuilder::new()
    }
}

impl<V: CredentialVerifier, S: SessionStore> Vestibule<V, S> {
    /// Restores the persisted session. Call once at startup.
    pub async fn initialize(&self) -> Session {
        self.sessions.lock().await.initialize()
    }

    /// Signs in. Digest computation runs on the blocking pool.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        let mut manager = Arc::clone(&self.sessions).lock_owned().await;
        let (username, password) = (username.to_owned(), password.to_owned());
        tokio::task::spawn_blocking(move || manager.login(&username, &password))
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "sign-in task failed");
                false
            })
    }

    pub async fn logout(&self) {
        self.sessions.lock().await.logout();
    }

    pub async fn current_session(&self) -> Session {
        self.sessions.lock().await.current_session()
    }

    pub async fn subscribe(&self) -> watch::Receiver<Session> {
        self.sessions.lock().await.subscribe()
    }

    /// Submits a sign-in form against the shared session, on the blocking
    /// pool like [`login`](Self::login).
    pub async fn submit(&self, form: &mut LoginForm) -> Notice {
        let mut manager = Arc::clone(&self.sessions).lock_owned().await;
        let username = form.username().to_owned();
        let mut owned = std::mem::take(form);
        let result = tokio::task::spawn_blocking(move || {
            let notice = owned.submit(&mut *manager);
            (owned, notice)
        })
        .await;

        match result {
            Ok((owned, notice)) => {
                *form = owned;
                notice
            }
            Err(e) => {
                tracing::error!(error = %e, "sign-in task failed");
                form.set_username(username);
                Notice::Error("invalid credentials".into())
            }
        }
    }

    /// Presses the header's sign-in / sign-out button.
    pub async fn press_auth_button(&self) -> ButtonAction {
        let mut manager = self.sessions.lock().await;
        AuthButton::press(&mut *manager)
    }

    /// Starts a view gate on `start` that follows this session.
    ///
    /// The task ends, returning the gate, once every handle to the session
    /// manager has been dropped.
    pub async fn spawn_gate<N: Navigator>(
        &self,
        start: Route,
        navigator: N,
    ) -> JoinHandle<ViewGate<N>> {
        let sessions = self.subscribe().await;
        tokio::spawn(ViewGate::new(start, navigator).run(sessions))
    }
}
