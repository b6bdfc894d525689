use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::api::{ApiError, DeviceClient};
use crate::auth::{Session, SessionToken};

use super::ScaledIpd;

/// Acknowledgement that the device accepted an IPD value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub ipd: ScaledIpd,
}

/// Holds the in-flight flag for the lifetime of one update.
/// Dropping it (success, error or a cancelled future) releases the flag.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends IPD updates with the cached session token, one at a time.
///
/// A call made while another update is outstanding returns
/// `ApiError::Busy` without touching the network. Nothing is queued.
#[derive(Debug)]
pub struct IpdUpdater {
    client: DeviceClient,
    session: Session,
    in_flight: AtomicBool,
}

impl IpdUpdater {
    pub fn new(client: DeviceClient) -> Self {
        Self {
            client,
            session: Session::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &DeviceClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch a fresh token and cache it. On failure the previous token stays.
    pub async fn authenticate(&self) -> Result<SessionToken, ApiError> {
        let token = self.client.authenticate().await?;
        self.session.store(token.clone());
        Ok(token)
    }

    /// Push `ipd` to the device unless an update is already in flight.
    pub async fn update(&self, ipd: ScaledIpd) -> Result<Ack, ApiError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!(ipd = ipd.value(), "IPD update dropped, previous request still in flight");
            return Err(ApiError::Busy);
        };

        let token = self.session.token();
        self.client.post_ipd(&token, ipd).await?;
        Ok(Ack { ipd })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_guard_is_exclusive() {
        let flag = AtomicBool::new(false);
        let first = InFlight::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlight::acquire(&flag).is_none());

        drop(first);
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlight::acquire(&flag).is_some());
    }

    #[test]
    fn test_guard_released_on_unwind() {
        let flag = AtomicBool::new(false);
        let result = std::panic::catch_unwind(|| {
            let _guard = InFlight::acquire(&flag);
            panic!("request blew up");
        });
        assert!(result.is_err());
        assert!(!flag.load(Ordering::Acquire));
    }
}
