//! Vital sign commands and selectors.

use chrono::{DateTime, Duration, Utc};

use super::{generate_id, HealthStore};
use crate::config::VITALS_CAPACITY;
use crate::models::{NewVital, VitalEntry, VitalType};

impl HealthStore {
    /// Record a reading. Newest first; beyond capacity the oldest are evicted.
    /// Values are not range-checked.
    pub fn add_vital(&mut self, vital: NewVital) -> String {
        let id = generate_id(Utc::now());
        let entry = VitalEntry::from_new(id.clone(), vital);
        self.mutate(|state| {
            state.vitals.insert(0, entry);
            state.vitals.truncate(VITALS_CAPACITY);
        });
        id
    }

    /// Readings of one type, newest first.
    pub fn get_vitals_by_type(&self, vital_type: VitalType) -> Vec<&VitalEntry> {
        self.state
            .vitals
            .iter()
            .filter(|v| v.vital_type == vital_type)
            .collect()
    }

    /// Readings strictly newer than `days` days ago.
    pub fn get_recent_vitals(&self, days: u32) -> Vec<&VitalEntry> {
        self.recent_vitals_at(days, Utc::now())
    }

    /// [`get_recent_vitals`](Self::get_recent_vitals) against an explicit clock.
    pub fn recent_vitals_at(&self, days: u32, now: DateTime<Utc>) -> Vec<&VitalEntry> {
        let cutoff = now - Duration::seconds(i64::from(days) * 86_400);
        self.state
            .vitals
            .iter()
            .filter(|v| v.timestamp > cutoff)
            .collect()
    }

    /// Most recent reading of one type.
    pub fn latest_vital(&self, vital_type: VitalType) -> Option<&VitalEntry> {
        self.state.vitals.iter().find(|v| v.vital_type == vital_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut store = HealthStore::in_memory();
        store.add_vital(NewVital::manual(VitalType::HeartRate, 60.0, "bpm"));
        store.add_vital(NewVital::manual(VitalType::Spo2, 98.0, "%"));

        assert_eq!(store.vitals()[0].vital_type, VitalType::Spo2);
        assert_eq!(store.vitals()[1].vital_type, VitalType::HeartRate);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut store = HealthStore::in_memory();
        for i in 0..(VITALS_CAPACITY + 5) {
            store.add_vital(NewVital::manual(VitalType::Steps, i as f64, "steps"));
        }

        assert_eq!(store.vitals().len(), VITALS_CAPACITY);
        assert_eq!(store.vitals()[0].value, (VITALS_CAPACITY + 4) as f64);
        assert_eq!(store.vitals()[VITALS_CAPACITY - 1].value, 5.0);
    }

    #[test]
    fn test_recent_vitals_boundary_is_exclusive() {
        let now = Utc::now();
        let cutoff = now - Duration::days(7);

        let mut store = HealthStore::in_memory();
        store.add_vital(NewVital::manual(VitalType::HeartRate, 1.0, "bpm").at(cutoff));
        store.add_vital(
            NewVital::manual(VitalType::HeartRate, 2.0, "bpm").at(cutoff + Duration::seconds(1)),
        );

        let recent = store.recent_vitals_at(7, now);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].value, 2.0);
    }

    #[test]
    fn test_latest_vital() {
        let mut store = HealthStore::in_memory();
        assert!(store.latest_vital(VitalType::Stress).is_none());

        store.add_vital(NewVital::manual(VitalType::Stress, 40.0, "score"));
        store.add_vital(NewVital::manual(VitalType::Steps, 100.0, "steps"));
        store.add_vital(NewVital::manual(VitalType::Stress, 35.0, "score"));

        assert_eq!(store.latest_vital(VitalType::Stress).unwrap().value, 35.0);
    }
}
