//! The event store: single owner of the event collection.
//!
//! Events are kept in creation order. The store is opened from a snapshot
//! slot (falling back to the built-in seed), mutated only through
//! [`EventStore::create`], [`EventStore::update`], [`EventStore::delete`]
//! and [`EventStore::toggle_pin`], and rewrites the full snapshot after every
//! mutation before returning.
//!
//! A failed snapshot write does not undo the mutation. It is reported on the
//! returned [`Applied`] as [`Durability::AtRisk`] so the caller can warn the
//! user.

use std::collections::HashSet;

use gathering_types::{Event, EventDraft, EventId, EventPatch, EventQuery, Notice};

use crate::clock::{Clock, LocalClock};
use crate::error::{EventError, StorageError};
use crate::notify::{Notifier, TracingNotifier, notices};
use crate::query::run_query;
use crate::seed::seed_events;
use crate::storage::SnapshotStorage;
use crate::validation::{DESCRIPTION_LENGTH, LOCATION_LENGTH, TITLE_LENGTH, validate_draft};

/// What to load when the storage slot holds nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptySlot {
    /// Start from the built-in sample events.
    #[default]
    Seed,
    /// Start with no events.
    Empty,
}

/// Whether the snapshot write after a mutation succeeded.
#[derive(Debug)]
pub enum Durability {
    /// The snapshot matches the in-memory collection.
    Persisted,
    /// The mutation is live for this session but was not saved.
    AtRisk(StorageError),
}

impl Durability {
    /// Whether the snapshot write succeeded.
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted)
    }
}

/// The result of a successful mutation.
#[derive(Debug)]
pub struct Applied<T> {
    /// The created, updated, toggled or removed event.
    pub value: T,
    /// The notice delivered to the notifier.
    pub notice: Notice,
    /// Outcome of the snapshot write.
    pub durability: Durability,
}

impl<T> Applied<T> {
    /// Treat a failed snapshot write as an error.
    ///
    /// The in-memory mutation stays applied either way.
    pub fn into_durable(self) -> Result<T, EventError> {
        match self.durability {
            Durability::Persisted => Ok(self.value),
            Durability::AtRisk(err) => Err(EventError::PersistenceWriteFailed(err)),
        }
    }
}

/// Owns the event collection and its snapshot slot.
pub struct EventStore<S> {
    events: Vec<Event>,
    storage: S,
    key: String,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
    mint_id: Box<dyn Fn() -> EventId>,
}

impl<S: SnapshotStorage> EventStore<S> {
    /// Open the store from `key`, seeding when the slot is empty.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        Self::open_with(storage, key, EmptySlot::Seed)
    }

    /// Open the store from `key`.
    ///
    /// An empty slot loads according to `when_empty`. A slot that cannot be
    /// read or parsed, or whose events break the collection invariants
    /// (empty or repeated ids, text fields outside their length bounds),
    /// always falls back to the seed.
    pub fn open_with(storage: S, key: impl Into<String>, when_empty: EmptySlot) -> Self {
        let key = key.into();
        let events = rehydrate(&storage, &key, when_empty);
        tracing::info!(key = %key, count = events.len(), "Event store opened");

        Self {
            events,
            storage,
            key,
            clock: Box::new(LocalClock),
            notifier: Box::new(TracingNotifier),
            mint_id: Box::new(EventId::generate),
        }
    }

    /// Use `clock` as the source of "today" for validation.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Deliver mutation notices to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Mint ids for new events with `mint` instead of UUID v7.
    #[must_use]
    pub fn with_id_generator(mut self, mint: impl Fn() -> EventId + 'static) -> Self {
        self.mint_id = Box::new(mint);
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All events in creation order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Look up one event.
    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    /// Filtered, display-ordered view of the collection.
    pub fn query(&self, query: &EventQuery) -> Vec<&Event> {
        run_query(&self.events, query)
    }

    /// The snapshot key this store writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the storage backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the storage backend.
    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Consume the store, returning its storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validate `draft` and append it as a new, unpinned event.
    ///
    /// # Errors
    ///
    /// - [`EventError::ValidationFailed`] if any field breaks a rule.
    /// - [`EventError::IdCollision`] if the generated id is already taken.
    pub fn create(&mut self, draft: &EventDraft) -> Result<Applied<Event>, EventError> {
        let fields =
            validate_draft(draft, self.clock.today()).map_err(EventError::ValidationFailed)?;

        let id = (self.mint_id)();
        if self.get(&id).is_some() {
            return Err(EventError::IdCollision(id));
        }

        let event = Event::new(id, fields, false);
        self.events.push(event.clone());
        tracing::info!(id = %event.id, title = %event.title, "Event created");

        Ok(self.commit(event, notices::created()))
    }

    /// Replace every editable field of an existing event.
    ///
    /// The pin flag is kept unless the patch sets it.
    ///
    /// # Errors
    ///
    /// - [`EventError::NotFound`] if no event has `id`.
    /// - [`EventError::ValidationFailed`] if any field breaks a rule.
    pub fn update(
        &mut self,
        id: &EventId,
        patch: impl Into<EventPatch>,
    ) -> Result<Applied<Event>, EventError> {
        let patch = patch.into();
        if self.get(id).is_none() {
            return Err(EventError::NotFound(id.clone()));
        }

        let fields = validate_draft(&patch.draft, self.clock.today())
            .map_err(EventError::ValidationFailed)?;

        let event = self.find_mut(id)?;
        event.apply_fields(fields);
        if let Some(is_pinned) = patch.is_pinned {
            event.is_pinned = is_pinned;
        }
        let event = event.clone();
        tracing::info!(id = %event.id, pinned = event.is_pinned, "Event updated");

        Ok(self.commit(event, notices::updated()))
    }

    /// Remove an event.
    ///
    /// # Errors
    ///
    /// [`EventError::NotFound`] if no event has `id`; nothing changes.
    pub fn delete(&mut self, id: &EventId) -> Result<Applied<Event>, EventError> {
        let index = self
            .events
            .iter()
            .position(|event| &event.id == id)
            .ok_or_else(|| EventError::NotFound(id.clone()))?;

        let removed = self.events.remove(index);
        tracing::info!(id = %removed.id, remaining = self.events.len(), "Event deleted");

        Ok(self.commit(removed, notices::deleted()))
    }

    /// Flip an event's pin flag.
    ///
    /// # Errors
    ///
    /// [`EventError::NotFound`] if no event has `id`.
    pub fn toggle_pin(&mut self, id: &EventId) -> Result<Applied<Event>, EventError> {
        let event = self.find_mut(id)?;
        event.is_pinned = !event.is_pinned;
        let event = event.clone();
        tracing::info!(id = %event.id, pinned = event.is_pinned, "Event pin toggled");

        let notice = notices::pin_toggled(event.is_pinned);
        Ok(self.commit(event, notice))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn find_mut(&mut self, id: &EventId) -> Result<&mut Event, EventError> {
        self.events
            .iter_mut()
            .find(|event| &event.id == id)
            .ok_or_else(|| EventError::NotFound(id.clone()))
    }

    /// Persist the collection, notify, and package the result.
    fn commit<T>(&mut self, value: T, notice: Notice) -> Applied<T> {
        let durability = match self.persist() {
            Ok(()) => Durability::Persisted,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "Snapshot write failed; change is not durable");
                Durability::AtRisk(err)
            }
        };
        self.notifier.notify(&notice);

        Applied {
            value,
            notice,
            durability,
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&self.events)?;
        self.storage.write(&self.key, &payload)
    }
}

impl<S> core::fmt::Debug for EventStore<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventStore")
            .field("key", &self.key)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

/// Load the collection from the slot, falling back as documented on
/// [`EventStore::open_with`].
fn rehydrate<S: SnapshotStorage>(storage: &S, key: &str, when_empty: EmptySlot) -> Vec<Event> {
    let payload = match storage.read(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            tracing::info!(key, ?when_empty, "Storage slot empty");
            return match when_empty {
                EmptySlot::Seed => seed_events(),
                EmptySlot::Empty => Vec::new(),
            };
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "Storage slot unreadable; loading seed events");
            return seed_events();
        }
    };

    let events = match serde_json::from_str::<Vec<Event>>(&payload) {
        Ok(events) => events,
        Err(err) => {
            tracing::warn!(key, error = %err, "Stored snapshot unparsable; loading seed events");
            return seed_events();
        }
    };

    match snapshot_defect(&events) {
        None => events,
        Some(defect) => {
            tracing::warn!(key, defect = %defect, "Stored snapshot inconsistent; loading seed events");
            seed_events()
        }
    }
}

/// First invariant a rehydrated collection breaks, if any.
///
/// Dates are not checked: stored events may lie in the past.
fn snapshot_defect(events: &[Event]) -> Option<String> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        if event.id.as_str().trim().is_empty() {
            return Some("empty id".to_owned());
        }
        if !seen.insert(&event.id) {
            return Some(format!("duplicate id {}", event.id));
        }
        let fields_ok = TITLE_LENGTH.admits(&event.title)
            && LOCATION_LENGTH.admits(&event.location)
            && DESCRIPTION_LENGTH.admits(&event.description);
        if !fields_ok {
            return Some(format!("text field out of bounds on {}", event.id));
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::NaiveDate;
    use gathering_types::{Category, EventField};

    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::{DEFAULT_STORAGE_KEY, MemoryStorage};

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Notice>>>);

    impl Notifier for Recorder {
        fn notify(&self, notice: &Notice) {
            self.0.borrow_mut().push(notice.clone());
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
    }

    fn store() -> EventStore<MemoryStorage> {
        EventStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY).with_clock(FixedClock(today()))
    }

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: title.to_owned(),
            date: "2030-07-01".to_owned(),
            location: "Library Hall".to_owned(),
            description: "An afternoon of board games.".to_owned(),
            category: "social".to_owned(),
        }
    }

    #[test]
    fn opens_with_seed_when_slot_empty() {
        let store = store();
        assert_eq!(store.len(), 2);
        assert!(store.get(&EventId::from("1")).is_some());
    }

    #[test]
    fn opens_empty_when_requested() {
        let store = EventStore::open_with(MemoryStorage::new(), "k", EmptySlot::Empty);
        assert!(store.is_empty());
    }

    #[test]
    fn create_appends_unpinned_event_and_persists() {
        let mut store = store();
        let applied = store.create(&draft("Game Night")).unwrap();

        assert!(applied.durability.is_persisted());
        assert!(!applied.value.is_pinned);
        assert_eq!(store.events().last(), Some(&applied.value));
        assert_eq!(applied.notice.title, "Event Created");

        let saved: Vec<Event> =
            serde_json::from_str(store.storage().slot(DEFAULT_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(saved, store.events());
    }

    #[test]
    fn create_rejects_invalid_draft_without_mutating() {
        let mut store = store();
        let before = store.events().to_vec();

        let err = store.create(&draft("Hi")).unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|e| e.get(EventField::Title)),
            Some("must be at least 3 characters")
        );
        assert_eq!(store.events(), before.as_slice());
        assert!(store.storage().slot(DEFAULT_STORAGE_KEY).is_none());
    }

    #[test]
    fn update_preserves_pin_unless_patched() {
        let mut store = store();
        let id = EventId::from("1");
        store.toggle_pin(&id).unwrap();

        let updated = store.update(&id, draft("Renamed Session")).unwrap().value;
        assert!(updated.is_pinned);
        assert_eq!(updated.title, "Renamed Session");
        assert_eq!(updated.category, Category::Social);
        assert_eq!(updated.id, id);

        let patch = EventPatch::from(draft("Renamed Again")).with_pinned(false);
        let updated = store.update(&id, patch).unwrap().value;
        assert!(!updated.is_pinned);
    }

    #[test]
    fn update_missing_event_is_not_found() {
        let mut store = store();
        let err = store.update(&EventId::from("404"), draft("Whatever")).unwrap_err();
        assert!(matches!(err, EventError::NotFound(id) if id.as_str() == "404"));
    }

    #[test]
    fn update_with_invalid_fields_leaves_event_unchanged() {
        let mut store = store();
        let id = EventId::from("2");
        let before = store.get(&id).cloned();

        let mut bad = draft("Fine Title");
        bad.date = "2030-06-14".to_owned();
        let err = store.update(&id, bad).unwrap_err();

        assert!(err.field_errors().is_some());
        assert_eq!(store.get(&id).cloned(), before);
    }

    #[test]
    fn toggle_pin_twice_restores_event() {
        let mut store = store();
        let id = EventId::from("2");
        let original = store.get(&id).cloned().unwrap();

        let first = store.toggle_pin(&id).unwrap();
        assert!(first.value.is_pinned);
        assert_eq!(first.notice.description, "Event pinned successfully.");

        let second = store.toggle_pin(&id).unwrap();
        assert_eq!(second.notice.description, "Event unpinned successfully.");
        assert_eq!(store.get(&id), Some(&original));
    }

    #[test]
    fn failed_write_keeps_mutation_and_reports_risk() {
        let mut store = store();
        store.storage_mut().set_unavailable(true);

        let applied = store.toggle_pin(&EventId::from("1")).unwrap();
        assert!(matches!(applied.durability, Durability::AtRisk(_)));
        assert!(store.get(&EventId::from("1")).unwrap().is_pinned);

        let err = applied.into_durable().unwrap_err();
        assert!(matches!(err, EventError::PersistenceWriteFailed(_)));
    }

    #[test]
    fn notifier_receives_every_successful_mutation() {
        let recorder = Recorder::default();
        let mut store = store().with_notifier(recorder.clone());

        let created = store.create(&draft("Book Swap")).unwrap().value;
        store.toggle_pin(&created.id).unwrap();
        store.delete(&created.id).unwrap();
        let _ = store.delete(&created.id);

        let titles: Vec<String> = recorder
            .0
            .borrow()
            .iter()
            .map(|n| n.title.clone())
            .collect();
        assert_eq!(titles, vec!["Event Created", "Event Updated", "Event Deleted"]);
    }

    #[test]
    fn unparsable_slot_falls_back_to_seed() {
        let storage = MemoryStorage::with_slot(DEFAULT_STORAGE_KEY, "{not json");
        let store = EventStore::open_with(storage, DEFAULT_STORAGE_KEY, EmptySlot::Empty);
        assert_eq!(store.len(), 2);
    }

    struct UnreadableStorage;

    impl SnapshotStorage for UnreadableStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk offline".to_owned()))
        }

        fn write(&mut self, _key: &str, _payload: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk offline".to_owned()))
        }
    }

    fn ids(store: &EventStore<impl SnapshotStorage>) -> Vec<&str> {
        store.events().iter().map(|e| e.id.as_str()).collect()
    }

    fn snapshot_with(mutate: impl FnOnce(&mut Vec<Event>)) -> MemoryStorage {
        let mut events = vec![Event {
            id: EventId::from("a"),
            title: "Youth Choir Rehearsal".to_owned(),
            date: NaiveDate::from_ymd_opt(2021, 1, 9).unwrap(),
            location: "Chapel Annex".to_owned(),
            description: "Weekly rehearsal for the youth choir.".to_owned(),
            category: Category::Religious,
            is_pinned: true,
        }];
        mutate(&mut events);
        MemoryStorage::with_slot(DEFAULT_STORAGE_KEY, serde_json::to_string(&events).unwrap())
    }

    #[test]
    fn unreadable_slot_falls_back_to_seed() {
        let store = EventStore::open_with(UnreadableStorage, DEFAULT_STORAGE_KEY, EmptySlot::Empty);
        assert_eq!(ids(&store), vec!["1", "2"]);
    }

    #[test]
    fn consistent_snapshot_loads_as_stored_even_with_past_dates() {
        let store = EventStore::open(snapshot_with(|_| {}), DEFAULT_STORAGE_KEY);
        assert_eq!(ids(&store), vec!["a"]);
        assert!(store.events().first().unwrap().is_pinned);
    }

    #[test]
    fn duplicate_ids_fall_back_to_seed() {
        let storage = snapshot_with(|events| {
            let copy = events.first().cloned().unwrap();
            events.push(copy);
        });
        let mut store = EventStore::open(storage, DEFAULT_STORAGE_KEY);
        assert_eq!(ids(&store), vec!["1", "2"]);

        store.delete(&EventId::from("1")).unwrap();
        assert!(matches!(
            store.delete(&EventId::from("1")),
            Err(EventError::NotFound(_))
        ));
    }

    #[test]
    fn out_of_bounds_text_falls_back_to_seed() {
        let empty_title = snapshot_with(|events| events.iter_mut().for_each(|e| e.title = "  ".to_owned()));
        assert_eq!(ids(&EventStore::open(empty_title, DEFAULT_STORAGE_KEY)), vec!["1", "2"]);

        let long_location =
            snapshot_with(|events| events.iter_mut().for_each(|e| e.location = "x".repeat(101)));
        assert_eq!(ids(&EventStore::open(long_location, DEFAULT_STORAGE_KEY)), vec!["1", "2"]);
    }

    #[test]
    fn empty_id_falls_back_to_seed() {
        let storage = snapshot_with(|events| events.iter_mut().for_each(|e| e.id = EventId::from("")));
        assert_eq!(ids(&EventStore::open(storage, DEFAULT_STORAGE_KEY)), vec!["1", "2"]);
    }

    #[test]
    fn colliding_generated_id_is_rejected_without_mutating() {
        let mut store = store().with_id_generator(|| EventId::from("2"));
        let before = store.events().to_vec();

        let err = store.create(&draft("Game Night")).unwrap_err();
        assert!(matches!(err, EventError::IdCollision(ref id) if id.as_str() == "2"));
        assert_eq!(store.events(), before.as_slice());
        assert!(store.storage().slot(DEFAULT_STORAGE_KEY).is_none());
    }

    #[test]
    fn injected_generator_mints_ids() {
        let mut store = store().with_id_generator(|| EventId::from("fixed-id"));
        let created = store.create(&draft("Game Night")).unwrap().value;
        assert_eq!(created.id.as_str(), "fixed-id");
    }
}
