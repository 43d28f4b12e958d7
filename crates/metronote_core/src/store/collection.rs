//! Reactive record collection store.
//!
//! # Responsibility
//! - Own the ordered in-memory collection for one record kind.
//! - Mirror the full collection into the backing store after every mutation.
//! - Push state to observers on attach and after every mutation.
//!
//! # Invariants
//! - Ids are unique within the collection; inserting an existing id is a
//!   logged no-op.
//! - New records are prepended; updates keep position; deletes keep the
//!   relative order of the remaining records.
//! - A successful mutation persists before observers are notified.
//! - Unknown ids make `update`/`delete` silent no-ops (no persist, no notify).
//! - Hydration never fails: unreadable payloads degrade to an empty
//!   collection.

use crate::model::record::{next_timestamp, Record};
use crate::storage::codec::{decode_collection, encode_collection};
use crate::storage::SharedBackingStore;
use crate::store::subscription::{Subscribers, Subscription};
use log::{debug, error, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered, persisted, observable collection of one record kind.
pub struct CollectionStore<R: Record> {
    storage_key: &'static str,
    records: Vec<R>,
    backing: Option<SharedBackingStore>,
    subscribers: Subscribers<[R]>,
}

impl<R: Record> CollectionStore<R> {
    /// Creates the store and hydrates it from `backing` under `storage_key`.
    ///
    /// `backing = None` runs the store in memory only.
    pub fn open(storage_key: &'static str, backing: Option<SharedBackingStore>) -> Self {
        let records = hydrate::<R>(storage_key, backing.as_ref());
        Self {
            storage_key,
            records,
            backing,
            subscribers: Subscribers::new(),
        }
    }

    pub fn storage_key(&self) -> &'static str {
        self.storage_key
    }

    /// Whether mutations are mirrored to a backing store.
    pub fn is_persistent(&self) -> bool {
        self.backing.is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns an owned point-in-time copy of the collection, newest first.
    pub fn snapshot(&self) -> Vec<R> {
        self.records.clone()
    }

    /// Borrowed read-only view of the current collection.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Looks up one record in memory.
    pub fn get(&self, id: &str) -> Option<R> {
        self.position(id).map(|index| self.records[index].clone())
    }

    /// Prepends a freshly built record, persists and notifies.
    ///
    /// Only the kind-specific constructors reach this, and they always
    /// generate a new id. A record whose id is already present is rejected
    /// without persisting or notifying; returns whether it was inserted.
    pub(crate) fn insert(&mut self, record: R) -> bool {
        if self.position(record.id().as_str()).is_some() {
            error!(
                "event=record_create module=store status=skipped reason=duplicate_id kind={} key={}",
                R::KIND,
                self.storage_key
            );
            return false;
        }
        self.records.insert(0, record);
        debug!(
            "event=record_create module=store status=ok kind={} key={} count={}",
            R::KIND,
            self.storage_key,
            self.records.len()
        );
        self.commit();
        true
    }

    /// Merges `patch` into the record with `id` and refreshes `updated_at`.
    ///
    /// Returns `false` (and does nothing) when no record matches.
    pub fn update(&mut self, id: &str, patch: R::Patch) -> bool {
        let Some(index) = self.position(id) else {
            debug!(
                "event=record_update module=store status=skipped reason=not_found kind={}",
                R::KIND
            );
            return false;
        };

        let record = &mut self.records[index];
        let updated_at = next_timestamp(record.updated_at());
        record.apply_patch(patch, updated_at);
        debug!(
            "event=record_update module=store status=ok kind={} key={}",
            R::KIND,
            self.storage_key
        );
        self.commit();
        true
    }

    /// Removes the record with `id`.
    ///
    /// Returns `false` (and does nothing) when no record matches.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            debug!(
                "event=record_delete module=store status=skipped reason=not_found kind={}",
                R::KIND
            );
            return false;
        };

        self.records.remove(index);
        debug!(
            "event=record_delete module=store status=ok kind={} key={} count={}",
            R::KIND,
            self.storage_key,
            self.records.len()
        );
        self.commit();
        true
    }

    /// Registers `observer`, pushing the current state to it immediately.
    pub fn subscribe(&self, observer: impl Fn(&[R]) + Send + Sync + 'static) -> Subscription {
        let observer = Arc::new(observer);
        observer(self.records.as_slice());
        self.subscribers.add(observer)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.id().as_str() == id)
    }

    fn commit(&self) {
        self.persist();
        self.subscribers.notify(self.records.as_slice());
    }

    fn persist(&self) {
        let Some(backing) = self.backing.as_ref() else {
            return;
        };

        let raw = match encode_collection(&self.records) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=collection_persist module=store status=error kind={} key={} error_code=encode_failed error={err}",
                    R::KIND,
                    self.storage_key
                );
                return;
            }
        };

        if let Err(err) = backing.write(self.storage_key, &raw) {
            error!(
                "event=collection_persist module=store status=error kind={} key={} error_code=write_failed error={err}",
                R::KIND,
                self.storage_key
            );
        }
    }
}

fn hydrate<R: Record>(storage_key: &str, backing: Option<&SharedBackingStore>) -> Vec<R> {
    let Some(backing) = backing else {
        debug!(
            "event=collection_hydrate module=store status=skipped reason=no_backing kind={}",
            R::KIND
        );
        return Vec::new();
    };

    let raw = match backing.read(storage_key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(
                "event=collection_hydrate module=store status=ok kind={} key={storage_key} count=0 source=empty",
                R::KIND
            );
            return Vec::new();
        }
        Err(err) => {
            error!(
                "event=collection_hydrate module=store status=error kind={} key={storage_key} error_code=read_failed error={err}",
                R::KIND
            );
            return Vec::new();
        }
    };

    match decode_collection::<R>(&raw) {
        Ok(records) => {
            let records = sanitize_loaded(records);
            debug!(
                "event=collection_hydrate module=store status=ok kind={} key={storage_key} count={}",
                R::KIND,
                records.len()
            );
            records
        }
        Err(err) => {
            error!(
                "event=collection_hydrate module=store status=error kind={} key={storage_key} error_code=decode_failed error={err}",
                R::KIND
            );
            Vec::new()
        }
    }
}

/// Drops later duplicates of an id and repairs reversed timestamps.
fn sanitize_loaded<R: Record>(records: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut sanitized = Vec::with_capacity(records.len());
    for mut record in records {
        if !seen.insert(record.id().clone()) {
            warn!(
                "event=collection_hydrate module=store status=repaired kind={} reason=duplicate_id",
                R::KIND
            );
            continue;
        }
        if record.repair_timestamps() {
            warn!(
                "event=collection_hydrate module=store status=repaired kind={} reason=updated_before_created",
                R::KIND
            );
        }
        sanitized.push(record);
    }
    sanitized
}
