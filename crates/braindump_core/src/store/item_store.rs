//! Ordered in-memory item collection.
//!
//! # Responsibility
//! - Hold captured items most-recent-first.
//! - Provide add/update/toggle/delete entry points with listener fan-out.
//!
//! # Invariants
//! - `id` values are unique and non-empty.
//! - New items are prepended; existing relative order never changes.
//! - Insertion timestamps are non-decreasing across `add` calls.

use super::{ItemsListener, StoreError, StoreResult};
use crate::model::item::{Item, ItemPatch, ItemValidationError};
use crate::repo::snapshot_repo::validate_collection;
use log::debug;

#[derive(Default)]
pub struct ItemStore {
    items: Vec<Item>,
    last_timestamp: i64,
    listeners: Vec<Box<dyn ItemsListener>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a persisted collection, keeping its order.
    pub fn from_items(items: Vec<Item>) -> Result<Self, ItemValidationError> {
        validate_collection(&items)?;
        let last_timestamp = items.iter().map(|item| item.timestamp).max().unwrap_or(0);
        Ok(Self {
            items,
            last_timestamp,
            listeners: Vec::new(),
        })
    }

    pub fn subscribe(&mut self, listener: Box<dyn ItemsListener>) {
        self.listeners.push(listener);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Prepends a new item.
    ///
    /// A timestamp older than the last insertion is raised to it so the
    /// collection stays ordered by capture time.
    pub fn add(&mut self, mut item: Item) -> StoreResult<&Item> {
        item.validate()?;
        if self.get(&item.id).is_some() {
            return Err(StoreError::Validation(ItemValidationError::DuplicateId(
                item.id,
            )));
        }
        item.timestamp = item.timestamp.max(self.last_timestamp);
        self.last_timestamp = item.timestamp;

        debug!(
            "event=item_add module=store status=ok type={} content_len={}",
            item.kind,
            item.content.chars().count()
        );
        self.items.insert(0, item);
        self.notify();
        Ok(&self.items[0])
    }

    /// Merges `patch` into the item with `id`.
    pub fn update(&mut self, id: &str, patch: &ItemPatch) -> StoreResult<&Item> {
        let index = self.position(id)?;
        if !patch.is_empty() {
            patch.apply_to(&mut self.items[index]);
            self.notify();
        }
        Ok(&self.items[index])
    }

    /// Flips `completed` and returns the new value.
    pub fn toggle_completed(&mut self, id: &str) -> StoreResult<bool> {
        let index = self.position(id)?;
        let completed = !self.items[index].completed;
        self.items[index].completed = completed;
        debug!("event=item_toggle module=store status=ok completed={completed}");
        self.notify();
        Ok(completed)
    }

    /// Removes exactly the item with `id` and returns it.
    pub fn delete(&mut self, id: &str) -> StoreResult<Item> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        debug!("event=item_delete module=store status=ok remaining={}", self.items.len());
        self.notify();
        Ok(removed)
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener.items_changed(&self.items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ItemStore;
    use crate::model::item::{Item, ItemPatch, ItemType, ItemValidationError};
    use crate::store::{ItemsListener, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingListener(Arc<AtomicUsize>);

    impl ItemsListener for CountingListener {
        fn items_changed(&self, _items: &[Item]) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn item(title: &str, timestamp: i64) -> Item {
        Item::new(ItemType::Note, title, title, "Personal", timestamp)
    }

    #[test]
    fn add_prepends_and_clamps_timestamp() {
        let mut store = ItemStore::new();
        store.add(item("first", 200)).unwrap();
        store.add(item("second", 100)).unwrap();

        assert_eq!(store.items()[0].title, "second");
        assert_eq!(store.items()[0].timestamp, 200);
        assert_eq!(store.items()[1].title, "first");
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut store = ItemStore::new();
        let first = item("first", 1);
        let mut copy = item("copy", 2);
        copy.id = first.id.clone();
        store.add(first).unwrap();

        let err = store.add(copy).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ItemValidationError::DuplicateId(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn every_mutation_notifies_listeners() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = ItemStore::new();
        store.subscribe(Box::new(CountingListener(Arc::clone(&calls))));

        let id = store.add(item("task", 1)).unwrap().id.clone();
        store.toggle_completed(&id).unwrap();
        store.update(&id, &ItemPatch::completed(false)).unwrap();
        store.update(&id, &ItemPatch::default()).unwrap();
        store.delete(&id).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn delete_keeps_relative_order_of_remaining_items() {
        let mut store = ItemStore::new();
        let a = store.add(item("a", 1)).unwrap().id.clone();
        let b = store.add(item("b", 2)).unwrap().id.clone();
        store.add(item("c", 3)).unwrap();

        store.delete(&b).unwrap();

        let titles = store.items().iter().map(|i| i.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["c", "a"]);
        assert!(store.items().iter().any(|i| i.id == a));
    }

    #[test]
    fn unknown_id_is_not_found_and_silent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = ItemStore::new();
        store.subscribe(Box::new(CountingListener(Arc::clone(&calls))));

        assert!(matches!(
            store.delete("missing"),
            Err(StoreError::NotFound(_))
        ));
        assert!(store.toggle_completed("missing").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
