//! Session-aware views for Vestibule.
//!
//! The gate layer decides what the visitor sees. It reads the session, it
//! never changes it: sign-in and sign-out go through the controls in this
//! crate, which call the [`SessionManager`](vestibule_session::SessionManager)
//! directly.
//!
//! # Key types
//!
//! - [`ViewGate`]: renders a loading indicator or a page, and redirects
//!   when the session changes
//! - [`Navigator`]: the seam to whatever actually changes the page
//! - [`Route`] / [`Render`]: the two pages and what to show
//! - [`LoginForm`]: username/password entry
//! - [`AuthButton`]: the sign-in / sign-out control in the header
//! - [`Notice`]: the toast-style message a control reports back

mod button;
mod form;
mod gate;
mod route;

pub use button::{AuthButton, ButtonAction, ButtonLabel};
pub use form::{LoginForm, Notice, DEMO_CREDENTIALS_HINT};
pub use gate::ViewGate;
pub use route::{Navigator, RecordingNavigator, Render, Route};
