//! Echo Health Core Library
//!
//! Local, single-user health state store with derived scoring, quest
//! gamification and a tamper-evident consultation trail.
//!
//! # Architecture
//!
//! ```text
//!  UI event ──► EchoHealthCore (FFI) ──► HealthStore command
//!                                            │
//!                       ┌────────────────────┼────────────────────┐
//!                       ▼                    ▼                    ▼
//!                  vitals (cap 1000)   health vector       quests / points
//!                                       └─► score           └─► level
//!                                            │
//!                                  flush persisted subset
//!                                            │
//!                                            ▼
//!                              KeyValueStore slot "echo-health-storage"
//!                               (SQLite kv_slots │ in-memory)
//!
//!  Assistant pipeline ──► ConsultationReceipt { sha256(response) } ──► HealthStore
//! ```
//!
//! # Modules
//!
//! - [`db`]: persistence adapter (SQLite slots, in-memory slots)
//! - [`models`]: domain types (VitalEntry, HealthVector, HealthQuest, ...)
//! - [`store`]: the Health State Store and its commands/selectors
//! - [`audit`]: response digests for consultation receipts
//! - [`config`]: limits and store configuration
//! - [`logging`]: tracing subscriber setup

pub mod audit;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use audit::{hash_data, verify_digest, AuditError, Digester, Sha256Digester};
pub use config::StoreConfig;
pub use db::{Database, KeyValueStore, MemoryStorage, StorageError};
pub use logging::init_logging;
pub use models::{
    CommunityPin, ConsultationReceipt, Dimension, GeoPoint, HealthQuest, HealthVector,
    HealthVectorPatch, NewCommunityPin, NewConsultationReceipt, NewVital, PinType,
    QuestCategory, SosState, UserProfile, UserProfilePatch, VitalEntry, VitalSource, VitalType,
};
pub use store::{health_score, HealthStore, PersistedState, SharedStore};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum EchoHealthError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<db::StorageError> for EchoHealthError {
    fn from(e: db::StorageError) -> Self {
        EchoHealthError::StorageError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for EchoHealthError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        EchoHealthError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a store backed by the SQLite file at `path`.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<EchoHealthCore>, EchoHealthError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(EchoHealthCore::new(HealthStore::load(db))))
}

/// Create a session-only store (for testing or when no durable storage exists).
#[uniffi::export]
pub fn open_store_in_memory() -> Arc<EchoHealthCore> {
    Arc::new(EchoHealthCore::new(HealthStore::in_memory()))
}

/// Open the store described by the process environment.
#[uniffi::export]
pub fn open_store_from_env() -> Arc<EchoHealthCore> {
    Arc::new(EchoHealthCore::new(HealthStore::open(&StoreConfig::from_env())))
}

/// Install the tracing subscriber. Safe to call more than once.
#[uniffi::export]
pub fn enable_logging() -> bool {
    init_logging()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct EchoHealthCore {
    store: SharedStore,
}

impl EchoHealthCore {
    pub fn new(store: HealthStore) -> Self {
        Self {
            store: store.into_shared(),
        }
    }

    /// Shared handle for in-process collaborators such as the assistant pipeline.
    pub fn shared_store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }
}

#[uniffi::export]
impl EchoHealthCore {
    // =========================================================================
    // Vitals
    // =========================================================================

    /// Record a reading; returns the generated id.
    pub fn add_vital(&self, vital: FfiNewVital) -> Result<String, EchoHealthError> {
        let vital = NewVital::try_from(vital)?;
        let mut store = self.store.lock()?;
        Ok(store.add_vital(vital))
    }

    /// Readings of one type, newest first.
    pub fn get_vitals_by_type(&self, vital_type: String) -> Result<Vec<FfiVital>, EchoHealthError> {
        let vital_type = parse_vital_type(&vital_type)?;
        let store = self.store.lock()?;
        Ok(store
            .get_vitals_by_type(vital_type)
            .into_iter()
            .map(FfiVital::from)
            .collect())
    }

    /// Readings from the last `days` days, newest first.
    pub fn get_recent_vitals(&self, days: u32) -> Result<Vec<FfiVital>, EchoHealthError> {
        let store = self.store.lock()?;
        Ok(store
            .get_recent_vitals(days)
            .into_iter()
            .map(FfiVital::from)
            .collect())
    }

    pub fn latest_vital(&self, vital_type: String) -> Result<Option<FfiVital>, EchoHealthError> {
        let vital_type = parse_vital_type(&vital_type)?;
        let store = self.store.lock()?;
        Ok(store.latest_vital(vital_type).map(FfiVital::from))
    }

    // =========================================================================
    // Health Vector
    // =========================================================================

    pub fn health_vector(&self) -> Result<FfiHealthVector, EchoHealthError> {
        let store = self.store.lock()?;
        Ok((*store.health_vector()).into())
    }

    pub fn update_health_vector(&self, patch: FfiHealthVectorPatch) -> Result<(), EchoHealthError> {
        let mut store = self.store.lock()?;
        store.update_health_vector(patch.into());
        Ok(())
    }

    pub fn compute_health_score(&self) -> Result<i32, EchoHealthError> {
        let store = self.store.lock()?;
        Ok(store.compute_health_score())
    }

    // =========================================================================
    // Quests & Points
    // =========================================================================

    pub fn quests(&self) -> Result<Vec<FfiQuest>, EchoHealthError> {
        let store = self.store.lock()?;
        Ok(store.quests().iter().map(FfiQuest::from).collect())
    }

    /// Complete a task and pay its share of the quest reward. Ids arriving over
    /// FFI are validated here rather than silently ignored.
    pub fn complete_quest_task(
        &self,
        quest_id: String,
        task_name: String,
    ) -> Result<u64, EchoHealthError> {
        let mut store = self.store.lock()?;
        if !store.has_quest_task(&quest_id, &task_name) {
            return Err(EchoHealthError::NotFound(format!(
                "quest task {} / {}",
                quest_id, task_name
            )));
        }
        Ok(store.complete_quest_task_with_reward(&quest_id, &task_name))
    }

    pub fn add_vita_points(&self, points: u64) -> Result<(), EchoHealthError> {
        let mut store = self.store.lock()?;
        store.add_vita_points(points);
        Ok(())
    }

    /// Register today's activity (`YYYY-MM-DD`) for the streak counter.
    pub fn record_check_in(&self, date: String) -> Result<(), EchoHealthError> {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| EchoHealthError::InvalidInput(format!("date {}: {}", date, e)))?;
        let mut store = self.store.lock()?;
        store.record_check_in(date);
        Ok(())
    }

    pub fn progress(&self) -> Result<FfiProgress, EchoHealthError> {
        let store = self.store.lock()?;
        Ok(FfiProgress {
            vita_points: store.vita_points(),
            level: store.level(),
            streak_days: store.streak_days(),
            health_score: store.compute_health_score(),
        })
    }

    // =========================================================================
    // Community Map
    // =========================================================================

    pub fn add_community_pin(&self, pin: FfiNewPin) -> Result<String, EchoHealthError> {
        let pin = NewCommunityPin::try_from(pin)?;
        let mut store = self.store.lock()?;
        Ok(store.add_community_pin(pin))
    }

    pub fn remove_community_pin(&self, pin_id: String) -> Result<bool, EchoHealthError> {
        let mut store = self.store.lock()?;
        Ok(store.remove_community_pin(&pin_id))
    }

    pub fn community_pins(&self) -> Result<Vec<FfiPin>, EchoHealthError> {
        let store = self.store.lock()?;
        Ok(store.community_pins().iter().map(FfiPin::from).collect())
    }

    // =========================================================================
    // Consultation Receipts
    // =========================================================================

    pub fn consultation_receipts(&self) -> Result<Vec<FfiReceipt>, EchoHealthError> {
        let store = self.store.lock()?;
        Ok(store
            .consultation_receipts()
            .iter()
            .map(FfiReceipt::from)
            .collect())
    }

    /// Whether `response_text` matches the digest recorded in a receipt.
    pub fn verify_receipt(
        &self,
        receipt_id: String,
        response_text: String,
    ) -> Result<bool, EchoHealthError> {
        let store = self.store.lock()?;
        store
            .verify_receipt(&receipt_id, &response_text)
            .ok_or(EchoHealthError::NotFound(receipt_id))
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn user_profile(&self) -> Result<FfiUserProfile, EchoHealthError> {
        let store = self.store.lock()?;
        Ok(store.user_profile().clone().into())
    }

    pub fn update_user_profile(&self, patch: FfiUserProfilePatch) -> Result<(), EchoHealthError> {
        let mut store = self.store.lock()?;
        store.update_user_profile(patch.into());
        Ok(())
    }

    // =========================================================================
    // SOS
    // =========================================================================

    pub fn trigger_sos(&self, lat: Option<f64>, lng: Option<f64>) -> Result<(), EchoHealthError> {
        let location = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            (None, None) => None,
            _ => {
                return Err(EchoHealthError::InvalidInput(
                    "SOS location needs both lat and lng".into(),
                ))
            }
        };
        let mut store = self.store.lock()?;
        store.trigger_sos(location);
        Ok(())
    }

    pub fn cancel_sos(&self) -> Result<(), EchoHealthError> {
        let mut store = self.store.lock()?;
        store.cancel_sos();
        Ok(())
    }

    pub fn decrement_sos_countdown(&self) -> Result<(), EchoHealthError> {
        let mut store = self.store.lock()?;
        store.decrement_sos_countdown();
        Ok(())
    }

    pub fn sos_state(&self) -> Result<FfiSosState, EchoHealthError> {
        let store = self.store.lock()?;
        Ok((*store.sos()).into())
    }
}

fn parse_vital_type(s: &str) -> Result<VitalType, EchoHealthError> {
    VitalType::parse(s).ok_or_else(|| EchoHealthError::InvalidInput(format!("vital type {}", s)))
}

fn parse_timestamp(s: Option<String>) -> Result<DateTime<Utc>, EchoHealthError> {
    match s {
        None => Ok(Utc::now()),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| EchoHealthError::InvalidInput(format!("timestamp {}: {}", s, e))),
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe vital input. `timestamp` is RFC 3339; `None` means now.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewVital {
    pub vital_type: String,
    pub value: f64,
    pub unit: String,
    pub timestamp: Option<String>,
    pub source: String,
}

impl TryFrom<FfiNewVital> for NewVital {
    type Error = EchoHealthError;

    fn try_from(vital: FfiNewVital) -> Result<Self, Self::Error> {
        let source = VitalSource::parse(&vital.source).ok_or_else(|| {
            EchoHealthError::InvalidInput(format!("vital source {}", vital.source))
        })?;
        Ok(NewVital {
            vital_type: parse_vital_type(&vital.vital_type)?,
            value: vital.value,
            unit: vital.unit,
            timestamp: parse_timestamp(vital.timestamp)?,
            source,
        })
    }
}

/// FFI-safe stored vital.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVital {
    pub id: String,
    pub vital_type: String,
    pub value: f64,
    pub unit: String,
    pub timestamp: String,
    pub source: String,
}

impl From<&VitalEntry> for FfiVital {
    fn from(entry: &VitalEntry) -> Self {
        Self {
            id: entry.id.clone(),
            vital_type: entry.vital_type.as_str().to_string(),
            value: entry.value,
            unit: entry.unit.clone(),
            timestamp: entry.timestamp.to_rfc3339(),
            source: entry.source.as_str().to_string(),
        }
    }
}

/// FFI-safe health vector.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthVector {
    pub cardiovascular: f64,
    pub metabolic: f64,
    pub respiratory: f64,
    pub mental_health: f64,
    pub sleep: f64,
    pub activity: f64,
    pub nutrition: f64,
    pub stress: f64,
}

impl From<HealthVector> for FfiHealthVector {
    fn from(v: HealthVector) -> Self {
        Self {
            cardiovascular: v.cardiovascular,
            metabolic: v.metabolic,
            respiratory: v.respiratory,
            mental_health: v.mental_health,
            sleep: v.sleep,
            activity: v.activity,
            nutrition: v.nutrition,
            stress: v.stress,
        }
    }
}

/// FFI-safe partial health vector.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiHealthVectorPatch {
    pub cardiovascular: Option<f64>,
    pub metabolic: Option<f64>,
    pub respiratory: Option<f64>,
    pub mental_health: Option<f64>,
    pub sleep: Option<f64>,
    pub activity: Option<f64>,
    pub nutrition: Option<f64>,
    pub stress: Option<f64>,
}

impl From<FfiHealthVectorPatch> for HealthVectorPatch {
    fn from(p: FfiHealthVectorPatch) -> Self {
        HealthVectorPatch {
            cardiovascular: p.cardiovascular,
            metabolic: p.metabolic,
            respiratory: p.respiratory,
            mental_health: p.mental_health,
            sleep: p.sleep,
            activity: p.activity,
            nutrition: p.nutrition,
            stress: p.stress,
        }
    }
}

/// FFI-safe quest task.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuestTask {
    pub name: String,
    pub complete: bool,
}

/// FFI-safe quest.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub progress: u8,
    pub reward: u64,
    pub deadline: String,
    pub category: String,
    pub tasks: Vec<FfiQuestTask>,
}

impl From<&HealthQuest> for FfiQuest {
    fn from(quest: &HealthQuest) -> Self {
        Self {
            id: quest.id.clone(),
            title: quest.title.clone(),
            description: quest.description.clone(),
            progress: quest.progress,
            reward: quest.reward,
            deadline: quest.deadline.to_rfc3339(),
            category: quest.category.as_str().to_string(),
            tasks: quest
                .tasks
                .iter()
                .map(|t| FfiQuestTask {
                    name: t.name.clone(),
                    complete: t.complete,
                })
                .collect(),
        }
    }
}

/// FFI-safe gamification summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProgress {
    pub vita_points: u64,
    pub level: u32,
    pub streak_days: u32,
    pub health_score: i32,
}

/// FFI-safe pin input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPin {
    pub lat: f64,
    pub lng: f64,
    pub pin_type: String,
    pub category: String,
    pub description: String,
    pub timestamp: Option<String>,
}

impl TryFrom<FfiNewPin> for NewCommunityPin {
    type Error = EchoHealthError;

    fn try_from(pin: FfiNewPin) -> Result<Self, Self::Error> {
        let pin_type = PinType::parse(&pin.pin_type)
            .ok_or_else(|| EchoHealthError::InvalidInput(format!("pin type {}", pin.pin_type)))?;
        Ok(NewCommunityPin {
            lat: pin.lat,
            lng: pin.lng,
            pin_type,
            category: pin.category,
            description: pin.description,
            timestamp: parse_timestamp(pin.timestamp)?,
        })
    }
}

/// FFI-safe pin.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPin {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub pin_type: String,
    pub category: String,
    pub description: String,
    pub timestamp: String,
}

impl From<&CommunityPin> for FfiPin {
    fn from(pin: &CommunityPin) -> Self {
        Self {
            id: pin.id.clone(),
            lat: pin.lat,
            lng: pin.lng,
            pin_type: pin.pin_type.as_str().to_string(),
            category: pin.category.clone(),
            description: pin.description.clone(),
            timestamp: pin.timestamp.to_rfc3339(),
        }
    }
}

/// FFI-safe consultation receipt.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReceipt {
    pub id: String,
    pub timestamp: String,
    pub agent_type: String,
    pub prompt_summary: String,
    pub response_hash: String,
    pub model_version: String,
    pub disclaimer: String,
}

impl From<&ConsultationReceipt> for FfiReceipt {
    fn from(r: &ConsultationReceipt) -> Self {
        Self {
            id: r.id.clone(),
            timestamp: r.timestamp.to_rfc3339(),
            agent_type: r.agent_type.clone(),
            prompt_summary: r.prompt_summary.clone(),
            response_hash: r.response_hash.clone(),
            model_version: r.model_version.clone(),
            disclaimer: r.disclaimer.clone(),
        }
    }
}

/// FFI-safe user profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUserProfile {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
}

impl From<UserProfile> for FfiUserProfile {
    fn from(p: UserProfile) -> Self {
        Self {
            age: p.age,
            gender: p.gender,
            weight: p.weight,
            height: p.height,
            blood_type: p.blood_type,
            emergency_contact: p.emergency_contact,
            conditions: p.conditions,
            medications: p.medications,
        }
    }
}

/// FFI-safe partial profile.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiUserProfilePatch {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
    pub conditions: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
}

impl From<FfiUserProfilePatch> for UserProfilePatch {
    fn from(p: FfiUserProfilePatch) -> Self {
        UserProfilePatch {
            age: p.age,
            gender: p.gender,
            weight: p.weight,
            height: p.height,
            blood_type: p.blood_type,
            emergency_contact: p.emergency_contact,
            conditions: p.conditions,
            medications: p.medications,
        }
    }
}

/// FFI-safe SOS state.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSosState {
    pub active: bool,
    pub countdown: u32,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<SosState> for FfiSosState {
    fn from(s: SosState) -> Self {
        Self {
            active: s.active,
            countdown: s.countdown,
            lat: s.location.map(|l| l.lat),
            lng: s.location.map(|l| l.lng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heart_rate(value: f64) -> FfiNewVital {
        FfiNewVital {
            vital_type: "heart_rate".into(),
            value,
            unit: "bpm".into(),
            timestamp: None,
            source: "wearable".into(),
        }
    }

    #[test]
    fn test_add_and_query_vitals_over_ffi() {
        let core = open_store_in_memory();
        core.add_vital(heart_rate(61.0)).unwrap();
        core.add_vital(heart_rate(64.0)).unwrap();

        let vitals = core.get_vitals_by_type("heart_rate".into()).unwrap();
        assert_eq!(vitals.len(), 2);
        assert_eq!(vitals[0].value, 64.0);
        assert_eq!(vitals[0].source, "wearable");
    }

    #[test]
    fn test_invalid_vital_type_rejected() {
        let core = open_store_in_memory();
        let mut vital = heart_rate(60.0);
        vital.vital_type = "glucose".into();

        assert!(matches!(
            core.add_vital(vital),
            Err(EchoHealthError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_quest_task_rejected_at_boundary() {
        let core = open_store_in_memory();
        let result = core.complete_quest_task("quest-nope".into(), "x".into());
        assert!(matches!(result, Err(EchoHealthError::NotFound(_))));
    }

    #[test]
    fn test_complete_quest_task_pays_reward() {
        let core = open_store_in_memory();
        let paid = core
            .complete_quest_task("quest-mindful".into(), "Write down three gratitudes".into())
            .unwrap();

        assert_eq!(paid, 125);
        assert_eq!(core.progress().unwrap().vita_points, 125);
    }

    #[test]
    fn test_sos_requires_both_coordinates() {
        let core = open_store_in_memory();
        assert!(core.trigger_sos(Some(1.0), None).is_err());

        core.trigger_sos(Some(1.0), Some(2.0)).unwrap();
        let sos = core.sos_state().unwrap();
        assert!(sos.active);
        assert_eq!(sos.lat, Some(1.0));
    }

    #[test]
    fn test_shared_store_sees_ffi_writes() {
        let core = open_store_in_memory();
        core.add_vita_points(1000).unwrap();

        let shared = core.shared_store();
        assert_eq!(shared.lock().unwrap().level(), 2);
    }
}
