//! End-to-end scenarios for the event store.
//!
//! Each test drives the public API the way a presentation layer would:
//! open a store over some storage, mutate it, and list it through a query.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use chrono::NaiveDate;
use gathering_core::{
    DEFAULT_STORAGE_KEY, Durability, EmptySlot, EventError, EventStore, FileStorage, FixedClock,
    MemoryStorage,
};
use gathering_types::{Category, CategoryFilter, Event, EventDraft, EventField, EventId, EventQuery};

// =============================================================================
// Helpers
// =============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 15).expect("valid date")
}

fn seeded() -> EventStore<MemoryStorage> {
    EventStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY).with_clock(FixedClock(today()))
}

fn draft() -> EventDraft {
    EventDraft {
        title: "Neighbourhood Food Drive".to_owned(),
        date: "2030-06-20".to_owned(),
        location: "St. Mary's Hall".to_owned(),
        description: "Bring canned goods for the local food bank.".to_owned(),
        category: "charity".to_owned(),
    }
}

fn listed_ids(store: &EventStore<MemoryStorage>, query: &EventQuery) -> Vec<String> {
    store.query(query).iter().map(|e| e.id.to_string()).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn pinning_seed_event_keeps_it_first() {
    let mut store = seeded();
    store.toggle_pin(&EventId::from("1")).unwrap();

    let listed = store.query(&EventQuery::all());
    let summary: Vec<(&str, bool)> = listed.iter().map(|e| (e.id.as_str(), e.is_pinned)).collect();
    assert_eq!(summary, vec![("1", true), ("2", false)]);
}

#[test]
fn deleting_twice_reports_not_found_and_leaves_list() {
    let mut store = seeded();
    store.delete(&EventId::from("2")).unwrap();
    assert_eq!(listed_ids(&store, &EventQuery::all()), vec!["1"]);

    let err = store.delete(&EventId::from("2")).unwrap_err();
    assert!(matches!(err, EventError::NotFound(ref id) if id.as_str() == "2"));
    assert_eq!(listed_ids(&store, &EventQuery::all()), vec!["1"]);
}

#[test]
fn short_title_is_rejected_and_store_unchanged() {
    let mut store = seeded();
    let before = store.events().to_vec();

    let mut submission = draft();
    submission.title = "Hi".to_owned();
    let err = store.create(&submission).unwrap_err();

    let report = err.field_errors().expect("validation failure");
    assert_eq!(report.get(EventField::Title), Some("must be at least 3 characters"));
    assert_eq!(report.len(), 1);
    assert_eq!(store.events(), before.as_slice());
}

#[test]
fn created_event_is_the_only_one_listed() {
    let mut store = EventStore::open_with(MemoryStorage::new(), DEFAULT_STORAGE_KEY, EmptySlot::Empty)
        .with_clock(FixedClock(today()));

    let created = store.create(&draft()).unwrap().value;
    let listed = store.query(&EventQuery::all());

    assert_eq!(listed, vec![&created]);
    assert!(!created.is_pinned);
    assert_eq!(created.category, Category::Charity);
    assert_eq!(created.location, "St. Mary's Hall");
}

#[test]
fn created_ids_are_unique() {
    let mut store = seeded();
    let a = store.create(&draft()).unwrap().value.id;
    let b = store.create(&draft()).unwrap().value.id;
    assert_ne!(a, b);
    assert_eq!(store.len(), 4);
}

#[test]
fn date_boundary_is_today() {
    let mut store = seeded();

    let mut on_today = draft();
    on_today.date = "2030-06-15".to_owned();
    assert!(store.create(&on_today).is_ok());

    let mut yesterday = draft();
    yesterday.date = "2030-06-14".to_owned();
    let err = store.create(&yesterday).unwrap_err();
    assert_eq!(
        err.field_errors().and_then(|e| e.get(EventField::Date)),
        Some("must be today or in the future")
    );
}

#[test]
fn filters_and_search_narrow_the_listing() {
    let mut store = seeded();
    store.create(&draft()).unwrap();

    let charity = EventQuery::all().with_category(CategoryFilter::Charity);
    let listed = store.query(&charity);
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|e| e.category == Category::Charity));

    let search = EventQuery::all().with_search("FOOD BANK");
    let listed = store.query(&search);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Neighbourhood Food Drive");

    let religious_park = EventQuery::all()
        .with_category(Category::Religious)
        .with_search("park");
    assert!(store.query(&religious_park).is_empty());
}

#[test]
fn edit_round_trip_through_draft_keeps_pin() {
    let mut store = seeded();
    let id = EventId::from("1");
    store.toggle_pin(&id).unwrap();

    let current = store.get(&id).cloned().unwrap();
    let mut edit = EventDraft::from(&current);
    edit.date = "2030-09-01".to_owned();
    edit.location = "Interfaith Centre".to_owned();

    let updated = store.update(&id, edit).unwrap().value;
    assert!(updated.is_pinned);
    assert_eq!(updated.title, current.title);
    assert_eq!(updated.location, "Interfaith Centre");
    assert_eq!(updated.date, NaiveDate::from_ymd_opt(2030, 9, 1).unwrap());
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn reopening_yields_the_persisted_list() {
    let mut store = seeded();
    let created = store.create(&draft()).unwrap().value;
    store.toggle_pin(&EventId::from("2")).unwrap();
    let expected: Vec<Event> = store.events().to_vec();

    let reopened = EventStore::open(store.into_storage(), DEFAULT_STORAGE_KEY);
    assert_eq!(reopened.events(), expected.as_slice());
    assert!(reopened.get(&created.id).is_some());
}

#[test]
fn failed_write_keeps_change_for_the_session() {
    let mut store = seeded();
    store.storage_mut().set_unavailable(true);

    let applied = store.delete(&EventId::from("1")).unwrap();
    assert!(matches!(applied.durability, Durability::AtRisk(_)));
    assert_eq!(applied.notice.title, "Event Deleted");
    assert_eq!(listed_ids(&store, &EventQuery::all()), vec!["2"]);

    store.storage_mut().set_unavailable(false);
    let applied = store.toggle_pin(&EventId::from("2")).unwrap();
    assert!(applied.durability.is_persisted());

    let reopened = EventStore::open(store.into_storage(), DEFAULT_STORAGE_KEY);
    assert_eq!(reopened.len(), 1);
}

#[test]
fn unparsable_snapshot_opens_seed() {
    let storage = MemoryStorage::with_slot(DEFAULT_STORAGE_KEY, "[{\"id\": 7}]");
    let store = EventStore::open(storage, DEFAULT_STORAGE_KEY);
    let ids: Vec<&str> = store.events().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn persisted_empty_list_stays_empty() {
    let mut store = seeded();
    store.delete(&EventId::from("1")).unwrap();
    store.delete(&EventId::from("2")).unwrap();

    let reopened = EventStore::open(store.into_storage(), DEFAULT_STORAGE_KEY);
    assert!(reopened.is_empty());
}

#[test]
fn file_storage_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut store =
        EventStore::open(FileStorage::new(dir.path()), DEFAULT_STORAGE_KEY).with_clock(FixedClock(today()));
    let created = store.create(&draft()).unwrap().into_durable().unwrap();
    drop(store);

    let reopened = EventStore::open(FileStorage::new(dir.path()), DEFAULT_STORAGE_KEY);
    assert_eq!(reopened.len(), 3);
    assert_eq!(reopened.get(&created.id), Some(&created));
}

#[test]
fn snapshot_uses_camel_case_keys() {
    let mut store = seeded();
    store.toggle_pin(&EventId::from("1")).unwrap();

    let raw = store.storage().slot(DEFAULT_STORAGE_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert_eq!(value[0]["isPinned"], serde_json::Value::Bool(true));
    assert_eq!(value[0]["date"], "2024-03-20");
    assert_eq!(value[1]["category"], "charity");
}
