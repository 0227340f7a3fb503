//! Community hazard and safety map pins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a pin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    Safe,
    Caution,
    Danger,
}

impl PinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinType::Safe => "safe",
            PinType::Caution => "caution",
            PinType::Danger => "danger",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "safe" => Some(PinType::Safe),
            "caution" => Some(PinType::Caution),
            "danger" => Some(PinType::Danger),
            _ => None,
        }
    }
}

/// A report as submitted, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCommunityPin {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub pin_type: PinType,
    /// Free-form, e.g. "air quality" or "pharmacy"
    pub category: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// A geotagged hazard or safe-resource report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunityPin {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub pin_type: PinType,
    pub category: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl CommunityPin {
    pub fn from_new(id: String, pin: NewCommunityPin) -> Self {
        Self {
            id,
            lat: pin.lat,
            lng: pin.lng,
            pin_type: pin.pin_type,
            category: pin.category,
            description: pin.description,
            timestamp: pin.timestamp,
        }
    }
}
