//! Authentication module for device portal credentials and sessions.
//!
//! This module provides:
//! - `Credentials`: Basic-auth username/password held for the process lifetime
//! - `Session`: In-memory holder of the CSRF token the portal hands out
//!
//! Nothing here is persisted; the token lives only as long as the process.

pub mod credentials;
pub mod session;

pub use credentials::{authorization_header, Credentials};
pub use session::{Session, SessionToken};
