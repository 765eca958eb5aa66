//! The view gate: reacts to session changes with renders and redirects.

use tokio::sync::watch;
use vestibule_session::Session;

use crate::{Navigator, Render, Route};

/// Decides what to render for the current session and redirects on
/// transitions.
///
/// Rules:
///
/// ```text
/// Initializing                  → Loading, no navigation
/// Authenticated while on Login  → navigate to Home
/// Anonymous     while on Home   → navigate to Login
/// anything else                 → render the current page
/// ```
///
/// The gate never calls `login` or `logout`.
pub struct ViewGate<N: Navigator> {
    current: Route,
    navigator: N,
}

impl<N: Navigator> ViewGate<N> {
    /// Creates a gate that starts out on `start` (the page the visitor
    /// opened).
    pub fn new(start: Route, navigator: N) -> Self {
        Self {
            current: start,
            navigator,
        }
    }

    /// The page currently shown (or about to be shown once loading ends).
    pub fn current_route(&self) -> Route {
        self.current
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Reacts to `session`: possibly navigates, and returns what to render.
    pub fn observe(&mut self, session: &Session) -> Render {
        match session {
            Session::Initializing => Render::Loading,
            Session::Authenticated(_) if self.current == Route::Login => {
                self.redirect(Route::Home)
            }
            Session::Anonymous if self.current == Route::Home => self.redirect(Route::Login),
            _ => Render::Page(self.current),
        }
    }

    /// The visitor opened `route` themselves (typed a URL, clicked a link).
    /// The session rules still apply to the new page.
    pub fn visit(&mut self, route: Route, session: &Session) -> Render {
        self.current = route;
        self.observe(session)
    }

    /// Follows the session until the manager goes away.
    ///
    /// Reacts to the value the receiver holds right now, then to every
    /// change. Returns the gate when the sending side is dropped so the
    /// caller can inspect where it ended up.
    pub async fn run(mut self, mut sessions: watch::Receiver<Session>) -> Self {
        loop {
            let session = sessions.borrow_and_update().clone();
            let render = self.observe(&session);
            tracing::trace!(status = %session.status(), ?render, "gate rendered");

            if sessions.changed().await.is_err() {
                tracing::debug!("session manager dropped, view gate stopping");
                break;
            }
        }
        self
    }

    fn redirect(&mut self, to: Route) -> Render {
        tracing::debug!(from = %self.current, %to, "redirecting");
        self.current = to;
        self.navigator.navigate(to);
        Render::Page(to)
    }
}
