//! SOS countdown commands. Transient: never flushed to storage.

use tracing::info;

use super::HealthStore;
use crate::config::SOS_COUNTDOWN_SECS;
use crate::models::{GeoPoint, SosState};

impl HealthStore {
    /// Arm the alert and restart the countdown.
    pub fn trigger_sos(&mut self, location: Option<GeoPoint>) {
        info!(has_location = location.is_some(), "SOS triggered");
        self.sos = SosState {
            active: true,
            countdown: SOS_COUNTDOWN_SECS,
            location,
        };
    }

    pub fn cancel_sos(&mut self) {
        info!("SOS cancelled");
        self.sos = SosState::default();
    }

    /// One timer tick. Stops at zero.
    pub fn decrement_sos_countdown(&mut self) {
        self.sos.countdown = self.sos.countdown.saturating_sub(1);
    }
}
