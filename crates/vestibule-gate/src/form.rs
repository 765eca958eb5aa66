//! The sign-in form.

use std::fmt;

use vestibule_session::{CredentialVerifier, SessionManager, SessionStore};

/// Shown under the form so visitors of the demo can get in.
pub const DEMO_CREDENTIALS_HINT: &str = "Demo credentials: username \"user\", password \"password\"";

const SIGNED_IN: &str = "signed in";
const SIGNED_OUT: &str = "signed out";
const INVALID_CREDENTIALS: &str = "invalid credentials";
const MISSING_FIELDS: &str = "username and password are required";

/// A short message for the visitor after an action, like a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub(crate) fn signed_in() -> Self {
        Self::Success(SIGNED_IN.into())
    }

    pub(crate) fn signed_out() -> Self {
        Self::Success(SIGNED_OUT.into())
    }

    /// The one message for every failed sign-in. Unknown user and wrong
    /// password get the same message.
    pub(crate) fn invalid_credentials() -> Self {
        Self::Error(INVALID_CREDENTIALS.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Error(msg) => msg,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Username/password entry. Both fields are required.
///
/// The form doesn't navigate. A successful sign-in changes the session,
/// and the [`ViewGate`](crate::ViewGate) takes the visitor to the
/// presentation.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    username: String,
    password: String,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Submits the form.
    ///
    /// Empty fields are rejected before the manager is asked. The password
    /// is cleared afterwards whatever the outcome; the username is kept so
    /// a typo in the password doesn't mean typing both again.
    pub fn submit<V, S>(&mut self, manager: &mut SessionManager<V, S>) -> Notice
    where
        V: CredentialVerifier,
        S: SessionStore,
    {
        if self.username.is_empty() || self.password.is_empty() {
            return Notice::Error(MISSING_FIELDS.into());
        }

        let password = std::mem::take(&mut self.password);
        if manager.login(&self.username, &password) {
            Notice::signed_in()
        } else {
            Notice::invalid_credentials()
        }
    }
}
