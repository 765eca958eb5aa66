//! # Vestibule
//!
//! A demo sign-in gate for a single-page presentation site.
//!
//! Visitors sign in against a static user registry; the signed-in profile
//! survives reloads through a client-local store; a view gate keeps
//! anonymous visitors on the sign-in page and sends signed-in ones to the
//! presentation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vestibule::prelude::*;
//!
//! # async fn run() -> Result<(), VestibuleError> {
//! let app = Vestibule::builder()
//!     .registry_path("data/users.json")
//!     .build()?;
//!
//! let gate = app.spawn_gate(Route::Login, RecordingNavigator::new()).await;
//! app.initialize().await;
//!
//! let mut form = LoginForm::new();
//! form.set_username("user");
//! form.set_password("password");
//! println!("{}", app.submit(&mut form).await);
//! # drop(gate);
//! # Ok(())
//! # }
//! ```

mod app;
mod error;

pub use app::{Vestibule, VestibuleBuilder};
pub use error::VestibuleError;

pub use vestibule_gate as gate;
pub use vestibule_registry as registry;
pub use vestibule_session as session;

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber that writes to stderr, filtered by
/// `RUST_LOG` (default `info`).
///
/// Meant for binaries. Calling it twice is harmless; the second call does
/// nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Everything an application embedding Vestibule usually needs.
pub mod prelude {
    pub use crate::{init_tracing, Vestibule, VestibuleBuilder, VestibuleError};
    pub use vestibule_gate::{
        AuthButton, ButtonAction, ButtonLabel, LoginForm, Navigator, Notice, RecordingNavigator,
        Render, Route, ViewGate, DEMO_CREDENTIALS_HINT,
    };
    pub use vestibule_registry::{Identity, Profile, RegistryError, UserId, UserRegistry};
    pub use vestibule_session::{
        hash_password, hash_password_with, CredentialVerifier, FileStore, MemoryStore,
        Pbkdf2Verifier, Session, SessionConfig, SessionManager, SessionStatus, SessionStore,
        UnavailableStore,
    };
}
