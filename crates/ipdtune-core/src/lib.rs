//! Core library for ipdtune.
//!
//! Talks to a mixed-reality headset's device portal: obtains a CSRF session
//! token with Basic credentials, then posts interpupillary distance updates
//! with at most one update in flight at a time.

pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod ipd;
pub mod utils;

pub use api::{ApiError, ClientOptions, DeviceClient};
pub use auth::{Credentials, Session, SessionToken};
pub use config::Config;
pub use controller::{DisplayState, IpdController};
pub use ipd::{Ack, IpdUpdater, ScaledIpd};
