use std::fmt;

use crate::utils::{format_one_decimal, format_whole};

/// Smallest IPD the controls offer, in millimeters
pub const MIN_IPD_MM: f32 = 50.0;

/// Largest IPD the controls offer, in millimeters
pub const MAX_IPD_MM: f32 = 80.0;

/// Slider range maps onto MIN_IPD_MM..=MAX_IPD_MM
pub const SLIDER_MIN: f32 = 0.0;
pub const SLIDER_MAX: f32 = MAX_IPD_MM - MIN_IPD_MM;

/// The portal expects millimeters scaled by this factor
const SCALE: f32 = 1000.0;

/// IPD in millimeters x 1000, the unit the settings endpoint takes.
///
/// Range checking is the caller's job; the updater sends whatever it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScaledIpd(u32);

impl ScaledIpd {
    pub const fn new(scaled: u32) -> Self {
        Self(scaled)
    }

    /// Map a slider position in 0..=30 to the scaled IPD: `(s + 50) * 1000`
    pub fn from_slider(slider: f32) -> Self {
        Self::from_millimeters(slider + MIN_IPD_MM)
    }

    pub fn from_millimeters(mm: f32) -> Self {
        Self((mm * SCALE).round().max(0.0) as u32)
    }

    /// Like `from_millimeters`, but only for values inside the supported range
    pub fn checked_from_millimeters(mm: f32) -> Option<Self> {
        if mm.is_finite() && (MIN_IPD_MM..=MAX_IPD_MM).contains(&mm) {
            Some(Self::from_millimeters(mm))
        } else {
            None
        }
    }

    /// Like `from_slider`, but only for positions inside the slider range
    pub fn checked_from_slider(slider: f32) -> Option<Self> {
        if slider.is_finite() && (SLIDER_MIN..=SLIDER_MAX).contains(&slider) {
            Some(Self::from_slider(slider))
        } else {
            None
        }
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub fn millimeters(self) -> f32 {
        self.0 as f32 / SCALE
    }

    /// Whole-millimeter label shown before any update has been confirmed
    pub fn whole_label(self) -> String {
        format_whole(self.millimeters())
    }

    /// One-decimal label shown once the device accepted the value
    pub fn confirmed_label(self) -> String {
        format_one_decimal(self.millimeters())
    }
}

impl fmt::Display for ScaledIpd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_whole_slider_position() {
        for s in 0..=30u32 {
            let ipd = ScaledIpd::from_slider(s as f32);
            assert_eq!(ipd.value(), (s + 50) * 1000);
            assert_eq!(ipd.whole_label(), (s + 50).to_string());
            assert_eq!(ipd.confirmed_label(), format!("{}.0", s + 50));
        }
    }

    #[test]
    fn test_fractional_slider_position() {
        let ipd = ScaledIpd::from_slider(12.5);
        assert_eq!(ipd.value(), 62500);
        assert_eq!(ipd.whole_label(), "63");
        assert_eq!(ipd.confirmed_label(), "62.5");
    }

    #[test]
    fn test_checked_range() {
        assert_eq!(ScaledIpd::checked_from_millimeters(50.0), Some(ScaledIpd::new(50000)));
        assert_eq!(ScaledIpd::checked_from_millimeters(80.0), Some(ScaledIpd::new(80000)));
        assert_eq!(ScaledIpd::checked_from_millimeters(49.9), None);
        assert_eq!(ScaledIpd::checked_from_millimeters(f32::NAN), None);
        assert_eq!(ScaledIpd::checked_from_slider(30.0), Some(ScaledIpd::new(80000)));
        assert_eq!(ScaledIpd::checked_from_slider(-1.0), None);
    }

    #[test]
    fn test_display_is_scaled_integer() {
        assert_eq!(ScaledIpd::new(65000).to_string(), "65000");
        assert_eq!(ScaledIpd::new(65000).millimeters(), 65.0);
    }
}
