//! Static user registry for Vestibule.
//!
//! This crate is the leaf of the stack. It knows WHO can sign in, and
//! nothing about sessions, storage, or views:
//!
//! - **Types** ([`UserId`], [`Identity`], [`Profile`]): a registered
//!   identity and its sanitized projection (everything except the
//!   credential digest).
//! - **Registry** ([`UserRegistry`]): the read-only collection of
//!   identities, loaded and validated once at startup.
//! - **Errors** ([`RegistryError`]): what can go wrong while loading.
//!
//! # Architecture
//!
//! ```text
//! Gate (views) → Session (login/logout) → Registry (this crate)
//! ```
//!
//! A malformed registry is fatal: it defines the whole trust boundary, so
//! loading fails fast instead of degrading to an empty user list.

mod error;
mod registry;
mod types;

pub use error::RegistryError;
pub use registry::UserRegistry;
pub use types::{Identity, Profile, UserId};
