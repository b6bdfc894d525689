//! HTTP client module for the headset's device portal.
//!
//! This module provides the `DeviceClient` for the two calls the portal
//! needs: a Basic-authenticated GET that hands back a CSRF token in its
//! `Set-Cookie` header, and the POST that changes the IPD setting.

pub mod client;
pub mod error;

pub use client::{ClientOptions, DeviceClient, IPD_SETTINGS_PATH};
pub use error::ApiError;
