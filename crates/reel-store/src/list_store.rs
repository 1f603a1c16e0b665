use crate::error::StoreError;
use crate::storage::ListStorage;
use reel_models::{ListName, Membership, MovieRecord};
use tracing::{debug, info, warn};

/// Emitted after every completed mutation, naming the list that changed.
/// The view re-renders from store state instead of re-querying storage or
/// re-running its last search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    ListChanged(ListName),
}

pub type Listener = Box<dyn Fn(&StoreEvent) + Send>;

/// The two tracked lists and their invariants.
///
/// An identifier lives in at most one list at a time, insertion order is
/// preserved, and every mutation is mirrored to storage. A failed persist is
/// reported but never rolls the in-memory mutation back; memory is the
/// source of truth for the rest of the session.
pub struct ListStore {
    to_watch: Vec<MovieRecord>,
    watched: Vec<MovieRecord>,
    storage: Box<dyn ListStorage>,
    listeners: Vec<Listener>,
}

impl ListStore {
    /// Load both lists from storage. Absent or malformed blobs come back
    /// empty, so opening never fails.
    pub fn open(storage: Box<dyn ListStorage>) -> Self {
        let to_watch = storage.load(ListName::ToWatch.as_key());
        let watched = storage.load(ListName::Watched.as_key());
        info!(
            "Opened list store: {} to-watch, {} watched",
            to_watch.len(),
            watched.len()
        );
        Self {
            to_watch,
            watched,
            storage,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn to_watch(&self) -> &[MovieRecord] {
        &self.to_watch
    }

    pub fn watched(&self) -> &[MovieRecord] {
        &self.watched
    }

    pub fn membership_of(&self, imdb_id: &str) -> Membership {
        if self.to_watch.iter().any(|r| r.imdb_id == imdb_id) {
            Membership::InToWatch
        } else if self.watched.iter().any(|r| r.imdb_id == imdb_id) {
            Membership::InWatched
        } else {
            Membership::NotTracked
        }
    }

    /// Append to the to-watch list. Fails with `DuplicateEntry` when the
    /// identifier is already tracked in either list.
    pub fn add_to_watch(&mut self, record: MovieRecord) -> Result<(), StoreError> {
        if self.membership_of(&record.imdb_id) != Membership::NotTracked {
            return Err(StoreError::DuplicateEntry {
                id: record.imdb_id,
            });
        }

        debug!("Adding {} ('{}') to the to-watch list", record.imdb_id, record.title);
        self.to_watch.push(record);

        let persisted = self.persist(ListName::ToWatch);
        self.notify(ListName::ToWatch);
        persisted
    }

    /// Append to the watched list. An identifier already sitting in the
    /// to-watch list transfers rather than duplicating.
    pub fn add_to_watched(&mut self, record: MovieRecord) -> Result<(), StoreError> {
        if self.watched.iter().any(|r| r.imdb_id == record.imdb_id) {
            return Err(StoreError::DuplicateEntry {
                id: record.imdb_id,
            });
        }

        let transferred = match self
            .to_watch
            .iter()
            .position(|r| r.imdb_id == record.imdb_id)
        {
            Some(pos) => {
                debug!("Transferring {} from to-watch to watched", record.imdb_id);
                self.to_watch.remove(pos);
                true
            }
            None => false,
        };

        debug!("Adding {} ('{}') to the watched list", record.imdb_id, record.title);
        self.watched.push(record);

        let mut persisted = self.persist(ListName::Watched);
        if transferred {
            let to_watch_persisted = self.persist(ListName::ToWatch);
            if persisted.is_ok() {
                persisted = to_watch_persisted;
            }
            self.notify(ListName::ToWatch);
        }
        self.notify(ListName::Watched);
        persisted
    }

    /// Remove the identifier from the named list. Not an error when absent.
    pub fn remove(&mut self, imdb_id: &str, list: ListName) -> Result<(), StoreError> {
        let records = match list {
            ListName::ToWatch => &mut self.to_watch,
            ListName::Watched => &mut self.watched,
        };

        let Some(pos) = records.iter().position(|r| r.imdb_id == imdb_id) else {
            debug!("{} is not in the {} list, nothing to remove", imdb_id, list);
            return Ok(());
        };

        records.remove(pos);
        debug!("Removed {} from the {} list", imdb_id, list);

        let persisted = self.persist(list);
        self.notify(list);
        persisted
    }

    /// Set the rating on a watched entry. 0 clears the rating. Identifiers
    /// not in the watched list are a no-op.
    pub fn rate(&mut self, imdb_id: &str, rating: u8) -> Result<(), StoreError> {
        if rating > 5 {
            return Err(StoreError::InvalidRating { rating });
        }

        let Some(record) = self.watched.iter_mut().find(|r| r.imdb_id == imdb_id) else {
            debug!("{} is not in the watched list, rating ignored", imdb_id);
            return Ok(());
        };

        record.rating = rating;
        debug!("Rated {} as {}/5", imdb_id, rating);

        let persisted = self.persist(ListName::Watched);
        self.notify(ListName::Watched);
        persisted
    }

    fn persist(&self, list: ListName) -> Result<(), StoreError> {
        let records = match list {
            ListName::ToWatch => &self.to_watch,
            ListName::Watched => &self.watched,
        };

        self.storage.save(list.as_key(), records).map_err(|source| {
            warn!("Failed to persist the {} list: {:#}", list, source);
            StoreError::Persistence { list, source }
        })
    }

    fn notify(&self, list: ListName) {
        let event = StoreEvent::ListChanged(list);
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use anyhow::anyhow;
    use chrono::Utc;
    use reel_models::MediaType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn create_record(imdb_id: &str, title: &str) -> MovieRecord {
        MovieRecord {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "2010".to_string(),
            media_type: MediaType::Movie,
            poster: None,
            rating: 0,
            added_at: Utc::now(),
        }
    }

    fn create_store() -> ListStore {
        ListStore::open(Box::new(MemoryStorage::new()))
    }

    /// Saves fail; loads come back empty.
    struct FailingStorage;

    impl ListStorage for FailingStorage {
        fn load(&self, _key: &str) -> Vec<MovieRecord> {
            Vec::new()
        }

        fn save(&self, key: &str, _records: &[MovieRecord]) -> anyhow::Result<()> {
            Err(anyhow!("quota exceeded writing '{}'", key))
        }
    }

    #[test]
    fn test_add_to_watch_sets_membership() {
        let mut store = create_store();
        store.add_to_watch(create_record("tt001", "Movie 1")).unwrap();

        assert_eq!(store.membership_of("tt001"), Membership::InToWatch);
        assert!(store.watched().is_empty());
    }

    #[test]
    fn test_add_to_watch_duplicate_rejected() {
        let mut store = create_store();
        store.add_to_watch(create_record("tt001", "Movie 1")).unwrap();

        let err = store
            .add_to_watch(create_record("tt001", "Movie 1"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry { ref id } if id == "tt001"));
        assert_eq!(store.to_watch().len(), 1);
    }

    #[test]
    fn test_add_to_watch_rejected_when_already_watched() {
        let mut store = create_store();
        store
            .add_to_watched(create_record("tt001", "Movie 1"))
            .unwrap();

        let err = store
            .add_to_watch(create_record("tt001", "Movie 1"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry { .. }));
    }

    #[test]
    fn test_add_to_watched_transfers_from_to_watch() {
        let mut store = create_store();
        store.add_to_watch(create_record("tt001", "Movie 1")).unwrap();
        store
            .add_to_watched(create_record("tt001", "Movie 1"))
            .unwrap();

        assert_eq!(store.membership_of("tt001"), Membership::InWatched);
        assert!(store.to_watch().is_empty());
        assert_eq!(store.watched().len(), 1);
        assert_eq!(store.watched()[0].rating, 0);
    }

    #[test]
    fn test_add_to_watched_duplicate_rejected() {
        let mut store = create_store();
        store
            .add_to_watched(create_record("tt001", "Movie 1"))
            .unwrap();

        let err = store
            .add_to_watched(create_record("tt001", "Movie 1"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry { .. }));
        assert_eq!(store.watched().len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = create_store();
        store.add_to_watch(create_record("tt001", "Movie 1")).unwrap();

        store.remove("tt001", ListName::ToWatch).unwrap();
        store.remove("tt001", ListName::ToWatch).unwrap();

        assert!(store.to_watch().is_empty());
        assert_eq!(store.membership_of("tt001"), Membership::NotTracked);
    }

    #[test]
    fn test_remove_only_touches_named_list() {
        let mut store = create_store();
        store
            .add_to_watched(create_record("tt001", "Movie 1"))
            .unwrap();

        store.remove("tt001", ListName::ToWatch).unwrap();
        assert_eq!(store.membership_of("tt001"), Membership::InWatched);
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        let mut store = create_store();
        store
            .add_to_watched(create_record("tt001", "Movie 1"))
            .unwrap();

        let err = store.rate("tt001", 6).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRating { rating: 6 }));
        assert_eq!(store.watched()[0].rating, 0);
    }

    #[test]
    fn test_rate_zero_clears_rating() {
        let mut store = create_store();
        store
            .add_to_watched(create_record("tt001", "Movie 1"))
            .unwrap();

        store.rate("tt001", 3).unwrap();
        assert!(store.watched()[0].is_rated());

        store.rate("tt001", 0).unwrap();
        assert!(!store.watched()[0].is_rated());
    }

    #[test]
    fn test_rate_unknown_id_is_noop() {
        let mut store = create_store();
        store.rate("tt999", 4).unwrap();
        assert!(store.watched().is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = create_store();
        store.add_to_watch(create_record("tt001", "Movie 1")).unwrap();
        store.add_to_watch(create_record("tt002", "Movie 2")).unwrap();
        store.add_to_watch(create_record("tt003", "Movie 3")).unwrap();

        let ids: Vec<&str> = store.to_watch().iter().map(|r| r.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt002", "tt003"]);
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let storage = MemoryStorage::new();

        let mut store = ListStore::open(Box::new(storage.clone()));
        store.add_to_watch(create_record("tt001", "Movie 1")).unwrap();
        store
            .add_to_watched(create_record("tt002", "Movie 2"))
            .unwrap();
        store.rate("tt002", 5).unwrap();

        let reopened = ListStore::open(Box::new(storage));
        assert_eq!(reopened.to_watch().len(), 1);
        assert_eq!(reopened.watched().len(), 1);
        assert_eq!(reopened.watched()[0].rating, 5);
    }

    #[test]
    fn test_persistence_failure_keeps_memory() {
        let mut store = ListStore::open(Box::new(FailingStorage));

        let err = store
            .add_to_watch(create_record("tt001", "Movie 1"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Persistence {
                list: ListName::ToWatch,
                ..
            }
        ));

        // The mutation stays; memory is the source of truth for the session
        assert_eq!(store.to_watch().len(), 1);
        assert_eq!(store.membership_of("tt001"), Membership::InToWatch);
    }

    #[test]
    fn test_listeners_notified_per_changed_list() {
        let mut store = create_store();
        let changes = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&changes);
        store.subscribe(Box::new(move |_event| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.add_to_watch(create_record("tt001", "Movie 1")).unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        // Transfer touches both lists
        store
            .add_to_watched(create_record("tt001", "Movie 1"))
            .unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 3);

        // Removing from a list the id is not in changes nothing
        store.remove("tt001", ListName::ToWatch).unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 3);

        store.remove("tt001", ListName::Watched).unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_watched_scenario_with_rating() {
        let mut store = create_store();
        store
            .add_to_watch(create_record("tt1375666", "Inception"))
            .unwrap();

        store
            .add_to_watched(create_record("tt1375666", "Inception"))
            .unwrap();
        assert!(store.to_watch().is_empty());
        assert_eq!(store.watched()[0].rating, 0);

        store.rate("tt1375666", 4).unwrap();
        assert_eq!(store.watched()[0].rating, 4);
    }
}
