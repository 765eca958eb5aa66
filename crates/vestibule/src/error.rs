//! Unified error type for Vestibule.

use vestibule_registry::RegistryError;

/// Top-level error returned while assembling the application.
///
/// Sign-in and sign-out never fail with an error (see
/// [`SessionManager`](vestibule_session::SessionManager)); only startup
/// can, and only because of the registry.
#[derive(Debug, thiserror::Error)]
pub enum VestibuleError {
    /// The registry could not be loaded or failed validation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// [`VestibuleBuilder::build`](crate::VestibuleBuilder::build) was
    /// called without a registry source.
    #[error("no user registry configured")]
    MissingRegistry,
}
