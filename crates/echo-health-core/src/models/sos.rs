//! Emergency alert countdown state.

use serde::{Deserialize, Serialize};

use crate::config::SOS_COUNTDOWN_SECS;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Transient SOS state. The ticking itself belongs to the UI timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SosState {
    pub active: bool,
    pub countdown: u32,
    pub location: Option<GeoPoint>,
}

impl Default for SosState {
    fn default() -> Self {
        Self {
            active: false,
            countdown: SOS_COUNTDOWN_SECS,
            location: None,
        }
    }
}
