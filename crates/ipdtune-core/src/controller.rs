//! Caller-side glue between a slider-like input and the updater.
//!
//! `IpdController` turns slider positions into scaled IPD values and keeps
//! the two strings a display surface shows: a status line and the IPD label.
//! Rendering is left to whoever owns the controller.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::api::ApiError;
use crate::ipd::{Ack, IpdUpdater, ScaledIpd};

/// Status shown once the portal answered the token request
pub const STATUS_AUTH_RECEIVED: &str = "auth response received";

/// Status shown once the portal accepted an IPD update
pub const STATUS_UPDATE_RECEIVED: &str = "IPD update response received";

/// What a display surface should currently show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub status: String,
    pub ipd_label: String,
}

pub struct IpdController {
    updater: Arc<IpdUpdater>,
    display: Mutex<DisplayState>,
}

impl IpdController {
    pub fn new(updater: Arc<IpdUpdater>) -> Self {
        Self {
            updater,
            display: Mutex::new(DisplayState::default()),
        }
    }

    pub fn updater(&self) -> &Arc<IpdUpdater> {
        &self.updater
    }

    pub fn display(&self) -> DisplayState {
        self.lock_display().clone()
    }

    fn lock_display(&self) -> MutexGuard<'_, DisplayState> {
        self.display.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_status(&self, status: impl Into<String>) {
        self.lock_display().status = status.into();
    }

    /// Authenticate and show the slider's starting value.
    pub async fn start(&self, slider: f32) -> Result<(), ApiError> {
        self.lock_display().ipd_label = ScaledIpd::from_slider(slider).whole_label();

        match self.updater.authenticate().await {
            Ok(_) => {
                self.set_status(STATUS_AUTH_RECEIVED);
                Ok(())
            }
            Err(e) => {
                self.set_status(e.description());
                Err(e)
            }
        }
    }

    /// Slider moved: push the corresponding IPD to the device.
    pub async fn on_slider_changed(&self, slider: f32) -> Result<Ack, ApiError> {
        self.apply(ScaledIpd::from_slider(slider)).await
    }

    /// Push `ipd` and reflect the outcome in the display.
    /// A Busy rejection leaves the display untouched.
    pub async fn apply(&self, ipd: ScaledIpd) -> Result<Ack, ApiError> {
        match self.updater.update(ipd).await {
            Ok(ack) => {
                let mut display = self.lock_display();
                display.status = STATUS_UPDATE_RECEIVED.to_string();
                display.ipd_label = ack.ipd.confirmed_label();
                Ok(ack)
            }
            Err(ApiError::Busy) => {
                debug!(ipd = ipd.value(), "Slider value ignored while busy");
                Err(ApiError::Busy)
            }
            Err(e) => {
                self.set_status(e.description());
                Err(e)
            }
        }
    }
}
