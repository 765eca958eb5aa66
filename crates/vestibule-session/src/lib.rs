//! Session management for Vestibule.
//!
//! This crate owns the one piece of mutable state in the application: who
//! is signed in.
//!
//! 1. **Verification**: turning a submitted password into a digest that
//!    can be compared with the registry ([`CredentialVerifier`]).
//! 2. **Persistence**: remembering the signed-in profile across reloads
//!    ([`SessionStore`]).
//! 3. **Session state**: the current [`Session`] and its transitions,
//!    published to subscribers ([`SessionManager`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Gate Layer (above)     ← watches the session, renders and redirects
//!     ↕
//! Session Layer (this crate)  ← initialize / login / logout
//!     ↕
//! Registry Layer (below) ← provides Identity, Profile, UserRegistry
//! ```

mod error;
mod manager;
mod session;
mod store;
mod verifier;

pub use error::{SessionError, StoreError};
pub use manager::SessionManager;
pub use session::{Session, SessionConfig, SessionStatus, DEFAULT_STORAGE_KEY};
pub use store::{FileStore, MemoryStore, SessionStore, UnavailableStore};
pub use verifier::{
    hash_password, hash_password_with, CredentialVerifier, Pbkdf2Verifier,
    DEFAULT_ITERATIONS, MAX_ITERATIONS,
};
