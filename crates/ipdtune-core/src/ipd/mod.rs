//! IPD values and the guarded settings updater.

pub mod updater;
pub mod value;

pub use updater::{Ack, IpdUpdater};
pub use value::{ScaledIpd, MAX_IPD_MM, MIN_IPD_MM, SLIDER_MAX, SLIDER_MIN};
