//! Single-value preference store.
//!
//! # Responsibility
//! - Hold one typed scalar under a fixed storage key with a default.
//! - Persist on write, default on absence, degrade on corrupt payloads.
//!
//! # Invariants
//! - Before `load_from_storage` runs, `get()` returns the default and
//!   `is_loaded()` is `false`.
//! - `set` always writes through; observers only hear about actual changes.
//! - Each instance touches only its own storage key.

use crate::storage::codec::{decode_scalar, encode_scalar};
use crate::storage::keys::{BACK_BUTTON_POSITION_KEY, FULLSCREEN_MODE_KEY};
use crate::storage::SharedBackingStore;
use crate::store::subscription::{Subscribers, Subscription};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;

/// Fullscreen mode is on unless the user turned it off.
pub const FULLSCREEN_MODE_DEFAULT: bool = true;
/// Default back-button placement flag.
pub const BACK_BUTTON_POSITION_DEFAULT: bool = true;

/// Persisted, observable scalar preference.
pub struct PreferenceStore<T> {
    storage_key: &'static str,
    default: T,
    value: T,
    loaded: bool,
    backing: Option<SharedBackingStore>,
    subscribers: Subscribers<T>,
}

impl<T> PreferenceStore<T>
where
    T: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Creates an unloaded preference holding `default`.
    pub fn new(storage_key: &'static str, default: T, backing: Option<SharedBackingStore>) -> Self {
        Self {
            storage_key,
            value: default.clone(),
            default,
            loaded: false,
            backing,
            subscribers: Subscribers::new(),
        }
    }

    pub fn storage_key(&self) -> &'static str {
        self.storage_key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Current in-memory value.
    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Hydrates the value from the backing store.
    ///
    /// Absent key keeps the default; an undecodable payload logs and resets
    /// to the default. Without a backing store this is a no-op.
    pub fn load_from_storage(&mut self) {
        let Some(backing) = self.backing.as_ref() else {
            debug!(
                "event=preference_load module=store status=skipped reason=no_backing key={}",
                self.storage_key
            );
            return;
        };

        let loaded = match backing.read(self.storage_key) {
            Ok(Some(raw)) => match decode_scalar::<T>(&raw) {
                Ok(value) => value,
                Err(err) => {
                    error!(
                        "event=preference_load module=store status=error key={} error_code=decode_failed error={err}",
                        self.storage_key
                    );
                    self.default.clone()
                }
            },
            Ok(None) => self.default.clone(),
            Err(err) => {
                error!(
                    "event=preference_load module=store status=error key={} error_code=read_failed error={err}",
                    self.storage_key
                );
                self.default.clone()
            }
        };

        self.loaded = true;
        debug!(
            "event=preference_load module=store status=ok key={} value={loaded:?}",
            self.storage_key
        );
        self.replace(loaded);
    }

    /// Writes `value` through to storage, then updates memory and notifies.
    pub fn set(&mut self, value: T) {
        self.persist(&value);
        self.replace(value);
    }

    /// Read-modify-write through [`PreferenceStore::set`].
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }

    /// Registers `observer`, pushing the current value to it immediately.
    pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let observer = Arc::new(observer);
        observer(&self.value);
        self.subscribers.add(observer)
    }

    fn replace(&mut self, value: T) {
        if self.value == value {
            return;
        }
        self.value = value;
        self.subscribers.notify(&self.value);
    }

    fn persist(&self, value: &T) {
        let Some(backing) = self.backing.as_ref() else {
            return;
        };
        let result = encode_scalar(value)
            .map_err(|err| err.to_string())
            .and_then(|raw| {
                backing
                    .write(self.storage_key, &raw)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = result {
            error!(
                "event=preference_persist module=store status=error key={} error={err}",
                self.storage_key
            );
        }
    }
}

/// Fullscreen-mode flag (`true` = fullscreen on).
pub fn fullscreen_mode(backing: Option<SharedBackingStore>) -> PreferenceStore<bool> {
    PreferenceStore::new(FULLSCREEN_MODE_KEY, FULLSCREEN_MODE_DEFAULT, backing)
}

/// Back-button-position flag.
pub fn back_button_position(backing: Option<SharedBackingStore>) -> PreferenceStore<bool> {
    PreferenceStore::new(
        BACK_BUTTON_POSITION_KEY,
        BACK_BUTTON_POSITION_DEFAULT,
        backing,
    )
}
