//! Vital sign readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of physiological reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    HeartRate,
    Spo2,
    SleepScore,
    Steps,
    Stress,
}

impl VitalType {
    pub const ALL: [VitalType; 5] = [
        VitalType::HeartRate,
        VitalType::Spo2,
        VitalType::SleepScore,
        VitalType::Steps,
        VitalType::Stress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VitalType::HeartRate => "heart_rate",
            VitalType::Spo2 => "spo2",
            VitalType::SleepScore => "sleep_score",
            VitalType::Steps => "steps",
            VitalType::Stress => "stress",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Where a reading came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VitalSource {
    /// Typed in by the user
    Manual,
    /// Camera photoplethysmography
    Ppg,
    /// Lab report scan
    Ocr,
    Wearable,
}

impl VitalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalSource::Manual => "manual",
            VitalSource::Ppg => "ppg",
            VitalSource::Ocr => "ocr",
            VitalSource::Wearable => "wearable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(VitalSource::Manual),
            "ppg" => Some(VitalSource::Ppg),
            "ocr" => Some(VitalSource::Ocr),
            "wearable" => Some(VitalSource::Wearable),
            _ => None,
        }
    }
}

/// A reading as submitted, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVital {
    #[serde(rename = "type")]
    pub vital_type: VitalType,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub source: VitalSource,
}

impl NewVital {
    /// Manual reading taken now.
    pub fn manual(vital_type: VitalType, value: f64, unit: impl Into<String>) -> Self {
        Self {
            vital_type,
            value,
            unit: unit.into(),
            timestamp: Utc::now(),
            source: VitalSource::Manual,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn from_source(mut self, source: VitalSource) -> Self {
        self.source = source;
        self
    }
}

/// A stored reading. Never edited after insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub vital_type: VitalType,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub source: VitalSource,
}

impl VitalEntry {
    pub fn from_new(id: String, vital: NewVital) -> Self {
        Self {
            id,
            vital_type: vital.vital_type,
            value: vital.value,
            unit: vital.unit,
            timestamp: vital.timestamp,
            source: vital.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vital_type_round_trips_through_str() {
        for t in VitalType::ALL {
            assert_eq!(VitalType::parse(t.as_str()), Some(t));
        }
        assert_eq!(VitalType::parse("blood_pressure"), None);
    }

    #[test]
    fn test_vital_serializes_type_field() {
        let entry = VitalEntry::from_new(
            "v1".into(),
            NewVital::manual(VitalType::HeartRate, 62.0, "bpm"),
        );
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["type"], "heart_rate");
        assert_eq!(json["source"], "manual");
    }
}
