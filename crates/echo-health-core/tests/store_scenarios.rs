//! End-to-end store scenarios, including reload from SQLite.

use chrono::{Duration, Utc};
use echo_health_core::config::STORAGE_NAMESPACE;
use echo_health_core::db::{Database, KeyValueStore, MemoryStorage};
use echo_health_core::models::{
    Dimension, HealthVectorPatch, NewCommunityPin, NewVital, PinType, UserProfilePatch, VitalType,
};
use echo_health_core::{HealthStore, StoreConfig};

#[test]
fn test_heart_rate_history_newest_first() {
    let mut store = HealthStore::in_memory();
    let t = Utc::now() - Duration::hours(3);

    for (i, bpm) in [60.0, 65.0, 70.0].into_iter().enumerate() {
        store.add_vital(
            NewVital::manual(VitalType::HeartRate, bpm, "bpm").at(t + Duration::hours(i as i64)),
        );
    }
    store.add_vital(NewVital::manual(VitalType::Spo2, 97.0, "%"));

    let values: Vec<f64> = store
        .get_vitals_by_type(VitalType::HeartRate)
        .iter()
        .map(|v| v.value)
        .collect();
    assert_eq!(values, vec![70.0, 65.0, 60.0]);
}

#[test]
fn test_sleep_update_raises_score() {
    let mut store = HealthStore::in_memory();
    let baseline_vector = *store.health_vector();
    let baseline = store.compute_health_score();

    store.update_health_vector(HealthVectorPatch::default().with(Dimension::Sleep, 1.0));

    let vector = store.health_vector();
    assert_eq!(vector.sleep, 1.0);
    assert_eq!(vector.stress, baseline_vector.stress);
    assert_eq!(vector.cardiovascular, baseline_vector.cardiovascular);
    assert!(store.compute_health_score() > baseline);
}

#[test]
fn test_new_store_points_and_level() {
    let mut store = HealthStore::in_memory();
    assert_eq!(store.vita_points(), 0);
    assert_eq!(store.level(), 1);

    store.add_vita_points(1000);
    assert_eq!(store.level(), 2);
}

#[test]
fn test_state_survives_reload_from_sqlite() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = StoreConfig::default().with_db_path(dir.path().join("echo.db"));

    {
        let mut store = HealthStore::open(&config);
        store.add_vital(NewVital::manual(VitalType::Steps, 8123.0, "steps"));
        store.complete_quest_task("quest-hydration", "Drink 8 glasses today");
        store.add_vita_points(1500);
        store.add_community_pin(NewCommunityPin {
            lat: 48.85,
            lng: 2.35,
            pin_type: PinType::Safe,
            category: "pharmacy".into(),
            description: "Open late".into(),
            timestamp: Utc::now(),
        });
        store.update_user_profile(UserProfilePatch {
            emergency_contact: Some("+1 555 0100".into()),
            ..Default::default()
        });
        store.trigger_sos(None);
    }

    let store = HealthStore::open(&config);
    assert_eq!(store.vitals().len(), 1);
    assert_eq!(store.vitals()[0].value, 8123.0);
    assert_eq!(store.quest("quest-hydration").unwrap().progress, 33);
    assert_eq!(store.vita_points(), 1500);
    assert_eq!(store.level(), 2);
    assert_eq!(store.community_pins().len(), 1);
    assert_eq!(
        store.user_profile().emergency_contact.as_deref(),
        Some("+1 555 0100")
    );
    assert!(!store.sos().active);
    Ok(())
}

#[test]
fn test_corrupt_sqlite_blob_recovers_defaults() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("echo.db");
    Database::open(&path)?.write(STORAGE_NAMESPACE, "{\"vitals\": [corrupt")?;

    let store = HealthStore::load(Database::open(&path)?);
    assert_eq!(store.vita_points(), 0);
    assert_eq!(store.quests().len(), 4);
    Ok(())
}

#[test]
fn test_unopenable_database_falls_back_to_memory() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as a database file.
    let config = StoreConfig::default().with_db_path(dir.path());

    let mut store = HealthStore::open(&config);
    store.add_vita_points(42);
    assert_eq!(store.vita_points(), 42);
}

#[test]
fn test_custom_namespace_is_isolated() {
    let storage = MemoryStorage::new();

    let mut a = HealthStore::load_with_namespace(storage.clone(), "profile-a");
    a.add_vita_points(10);

    let b = HealthStore::load_with_namespace(storage.clone(), "profile-b");
    assert_eq!(b.vita_points(), 0);
    assert!(storage.read("profile-a").unwrap().is_some());
}
