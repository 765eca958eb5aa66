//! Routes, render decisions, and the navigation seam.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// The two pages of the site.
///
/// - **Login**: the sign-in form (`/login`).
/// - **Home**: the presentation itself (`/`), only for signed-in visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Home,
}

impl Route {
    /// The URL path of this page.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Home => "/",
        }
    }

    /// Maps a URL path back to a page. Unknown paths are `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Home),
            "/login" => Some(Self::Login),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// What the gate wants on screen right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// The session hasn't been restored yet. Show a spinner.
    Loading,
    /// Show this page.
    Page(Route),
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Performs navigation on behalf of the gate.
///
/// In a browser this would push a history entry; in the demo it prints;
/// in tests it records.
pub trait Navigator: Send + 'static {
    /// Moves the visitor to `to`.
    fn navigate(&mut self, to: Route);
}

/// Sends every navigation down a channel. A closed channel is ignored:
/// nobody is listening for page changes any more.
impl Navigator for mpsc::UnboundedSender<Route> {
    fn navigate(&mut self, to: Route) {
        let _ = self.send(to);
    }
}

/// A navigator that only remembers where it was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    history: Vec<Route>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every navigation so far, oldest first.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// The most recent navigation, if any.
    pub fn last(&self) -> Option<Route> {
        self.history.last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, to: Route) {
        self.history.push(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Login.to_string(), "/login");
    }

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path(""), Some(Route::Home));
        assert_eq!(Route::from_path("/login"), Some(Route::Login));
        assert_eq!(Route::from_path("/login/"), Some(Route::Login));
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[test]
    fn test_recording_navigator_keeps_history() {
        let mut nav = RecordingNavigator::new();
        assert_eq!(nav.last(), None);

        nav.navigate(Route::Home);
        nav.navigate(Route::Login);

        assert_eq!(nav.history(), &[Route::Home, Route::Login]);
        assert_eq!(nav.last(), Some(Route::Login));
    }

    #[test]
    fn test_channel_navigator_forwards_routes() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        tx.navigate(Route::Home);
        assert_eq!(rx.try_recv().unwrap(), Route::Home);

        drop(rx);
        // Closed channel: silently ignored.
        tx.navigate(Route::Login);
    }
}
