//! The Health State Store.
//!
//! One aggregate owns every persisted entity. Each mutating command rewrites the
//! persisted subset ([`PersistedState`]) into a single key-value slot; reads are
//! served from memory. Writes are last-writer-wins: two processes sharing one
//! slot will clobber each other, which is accepted for a single-user device.
//!
//! Construction never fails. A missing blob yields the built-in defaults, a
//! corrupt blob is discarded (and logged), and an unreachable storage backend
//! leaves the store running in memory for the session.

mod catalog;
mod gamification;
mod records;
mod scoring;
mod sos;
mod vitals;

pub use catalog::*;
pub use gamification::level_for_points;
pub use scoring::health_score;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{StoreConfig, STORAGE_NAMESPACE};
use crate::db::{Database, KeyValueStore, MemoryStorage};
use crate::models::{
    CommunityPin, ConsultationReceipt, HealthQuest, HealthVector, SosState, UserProfile,
    VitalEntry,
};

/// Store handle shared between the UI bridge and the assistant pipeline.
pub type SharedStore = Arc<Mutex<HealthStore>>;

/// The persisted subset of store state. SOS state is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersistedState {
    /// Most recent first
    pub vitals: Vec<VitalEntry>,
    pub health_vector: HealthVector,
    pub quests: Vec<HealthQuest>,
    pub vita_points: u64,
    pub level: u32,
    pub streak_days: u32,
    pub last_check_in: Option<NaiveDate>,
    pub community_pins: Vec<CommunityPin>,
    /// Most recent first
    pub consultation_receipts: Vec<ConsultationReceipt>,
    pub user_profile: UserProfile,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            vitals: Vec::new(),
            health_vector: HealthVector::default(),
            quests: seed_quests(Utc::now()),
            vita_points: 0,
            level: 1,
            streak_days: 0,
            last_check_in: None,
            community_pins: Vec::new(),
            consultation_receipts: Vec::new(),
            user_profile: UserProfile::default(),
        }
    }
}

/// Single source of truth for the user's health and gamification data.
pub struct HealthStore {
    state: PersistedState,
    sos: SosState,
    storage: Box<dyn KeyValueStore>,
    namespace: String,
}

impl HealthStore {
    /// Load from `storage` under the default namespace.
    pub fn load(storage: impl KeyValueStore + 'static) -> Self {
        Self::load_with_namespace(storage, STORAGE_NAMESPACE)
    }

    /// Load from `storage` under an explicit slot key.
    pub fn load_with_namespace(storage: impl KeyValueStore + 'static, namespace: &str) -> Self {
        let state = restore(&storage, namespace);
        Self {
            state,
            sos: SosState::default(),
            storage: Box::new(storage),
            namespace: namespace.to_string(),
        }
    }

    /// Fresh store with no durable backing.
    pub fn in_memory() -> Self {
        Self::load(MemoryStorage::new())
    }

    /// Open according to `config`, falling back to memory if the database
    /// cannot be opened.
    pub fn open(config: &StoreConfig) -> Self {
        match &config.db_path {
            Some(path) => match Database::open(path) {
                Ok(db) => Self::load_with_namespace(db, &config.namespace),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "durable storage unavailable; store is session-only");
                    Self::load_with_namespace(MemoryStorage::new(), &config.namespace)
                }
            },
            None => Self::load_with_namespace(MemoryStorage::new(), &config.namespace),
        }
    }

    /// Wrap into the shared handle.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Write the persisted subset to storage. Failures are logged, never raised.
    pub fn flush(&self) {
        let blob = match serde_json::to_string(&self.state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to serialize store state");
                return;
            }
        };
        if let Err(e) = self.storage.write(&self.namespace, &blob) {
            warn!(namespace = %self.namespace, error = %e, "failed to persist store state");
        }
    }

    /// Apply a mutation to persisted state and flush.
    fn mutate<R>(&mut self, f: impl FnOnce(&mut PersistedState) -> R) -> R {
        let result = f(&mut self.state);
        self.flush();
        result
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn snapshot(&self) -> &PersistedState {
        &self.state
    }

    pub fn vitals(&self) -> &[VitalEntry] {
        &self.state.vitals
    }

    pub fn health_vector(&self) -> &HealthVector {
        &self.state.health_vector
    }

    pub fn quests(&self) -> &[HealthQuest] {
        &self.state.quests
    }

    pub fn quest(&self, quest_id: &str) -> Option<&HealthQuest> {
        self.state.quests.iter().find(|q| q.id == quest_id)
    }

    pub fn vita_points(&self) -> u64 {
        self.state.vita_points
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn streak_days(&self) -> u32 {
        self.state.streak_days
    }

    pub fn community_pins(&self) -> &[CommunityPin] {
        &self.state.community_pins
    }

    pub fn consultation_receipts(&self) -> &[ConsultationReceipt] {
        &self.state.consultation_receipts
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.state.user_profile
    }

    pub fn sos(&self) -> &SosState {
        &self.sos
    }
}

fn restore(storage: &dyn KeyValueStore, namespace: &str) -> PersistedState {
    let mut state = match storage.read(namespace) {
        Ok(None) => {
            debug!(namespace, "no persisted store; using defaults");
            PersistedState::default()
        }
        Ok(Some(blob)) => match serde_json::from_str::<PersistedState>(&blob) {
            Ok(state) => state,
            Err(e) => {
                warn!(namespace, error = %e, "discarding corrupt persisted store");
                if let Err(e) = storage.remove(namespace) {
                    warn!(namespace, error = %e, "failed to remove corrupt store blob");
                }
                PersistedState::default()
            }
        },
        Err(e) => {
            warn!(namespace, error = %e, "storage read failed; using defaults");
            PersistedState::default()
        }
    };
    state.level = level_for_points(state.vita_points);
    state
}

/// `<unix millis>-<9 random hex chars>`. Collisions are not guarded against.
pub(crate) fn generate_id(now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.timestamp_millis(), &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{StorageError, StorageResult};
    use crate::models::{NewVital, VitalType};

    /// Backend whose every call fails, standing in for missing durable storage.
    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn read(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("no storage".into()))
        }
        fn write(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("no storage".into()))
        }
        fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("no storage".into()))
        }
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        let store = HealthStore::in_memory();
        assert_eq!(store.vita_points(), 0);
        assert_eq!(store.level(), 1);
        assert_eq!(store.quests().len(), 4);
        assert!(store.vitals().is_empty());
        assert!(!store.sos().active);
    }

    #[test]
    fn test_mutation_flushes_to_namespace() {
        let storage = MemoryStorage::new();
        let mut store = HealthStore::load(storage.clone());
        store.add_vita_points(10);

        let blob = storage.read(STORAGE_NAMESPACE).unwrap().unwrap();
        let persisted: PersistedState = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted.vita_points, 10);
    }

    #[test]
    fn test_corrupt_blob_falls_back_and_is_discarded() {
        let storage = MemoryStorage::new();
        storage.write(STORAGE_NAMESPACE, "{not json").unwrap();

        let store = HealthStore::load(storage.clone());

        assert_eq!(store.vita_points(), 0);
        assert_eq!(store.quests().len(), 4);
        assert_eq!(storage.read(STORAGE_NAMESPACE).unwrap(), None);
    }

    #[test]
    fn test_partial_blob_merges_over_defaults() {
        let storage = MemoryStorage::new();
        storage
            .write(STORAGE_NAMESPACE, r#"{"vita_points": 2500}"#)
            .unwrap();

        let store = HealthStore::load(storage);

        assert_eq!(store.vita_points(), 2500);
        assert_eq!(store.level(), 3);
        assert_eq!(store.quests().len(), 4);
        assert_eq!(*store.health_vector(), HealthVector::default());
    }

    #[test]
    fn test_broken_storage_keeps_working_in_memory() {
        let mut store = HealthStore::load(BrokenStorage);
        store.add_vital(NewVital::manual(VitalType::Steps, 4200.0, "steps"));
        store.add_vita_points(5);

        assert_eq!(store.vitals().len(), 1);
        assert_eq!(store.vita_points(), 5);
    }

    #[test]
    fn test_sos_not_persisted() {
        let storage = MemoryStorage::new();
        let mut store = HealthStore::load(storage.clone());
        store.trigger_sos(None);
        store.add_vita_points(1);

        let blob = storage.read(STORAGE_NAMESPACE).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 10);
        assert!(value.get("sos").is_none());

        let reloaded = HealthStore::load(storage);
        assert!(!reloaded.sos().active);
    }

    #[test]
    fn test_generate_id_shape() {
        let now = Utc::now();
        let id = generate_id(now);
        let (millis, suffix) = id.split_once('-').unwrap();
        assert_eq!(millis, now.timestamp_millis().to_string());
        assert_eq!(suffix.len(), 9);
    }
}
