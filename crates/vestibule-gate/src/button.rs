//! The sign-in / sign-out control in the page header.

use std::fmt;

use vestibule_session::{CredentialVerifier, Session, SessionManager, SessionStore};

use crate::{Notice, Route};

/// What the button shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonLabel {
    /// Nobody signed in (or still loading): offer to sign in.
    SignIn,
    /// Someone signed in: show who, and offer to sign out.
    SignOut { display_name: String },
}

impl fmt::Display for ButtonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignIn => write!(f, "Sign in"),
            Self::SignOut { display_name } => {
                write!(f, "Signed in as {display_name} | Sign out")
            }
        }
    }
}

/// What pressing the button did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Go to this page (the sign-in form).
    Navigate(Route),
    /// The session was ended. The gate handles the redirect.
    SignedOut(Notice),
}

/// Header control: "Sign in" for visitors, "Sign out" for users.
pub struct AuthButton;

impl AuthButton {
    pub fn label(session: &Session) -> ButtonLabel {
        match session.identity() {
            Some(profile) => ButtonLabel::SignOut {
                display_name: profile.display_name.clone(),
            },
            None => ButtonLabel::SignIn,
        }
    }

    /// Handles a press. Signed-in users are signed out; everyone else is
    /// sent to the sign-in form.
    pub fn press<V, S>(manager: &mut SessionManager<V, S>) -> ButtonAction
    where
        V: CredentialVerifier,
        S: SessionStore,
    {
        if manager.current_session().is_authenticated() {
            manager.logout();
            ButtonAction::SignedOut(Notice::signed_out())
        } else {
            ButtonAction::Navigate(Route::Login)
        }
    }
}
