//! `tapdesk-auth` — account directory and session state.
//!
//! Authentication is deliberately a static lookup table: the set of
//! ordering accounts is tiny and managed by hand. This crate is pure —
//! no IO, no HTTP.

pub mod directory;
pub mod session;

pub use directory::{is_allowed, normalize_email, resolve_tier};
pub use session::{AuthSession, UserProfile};
