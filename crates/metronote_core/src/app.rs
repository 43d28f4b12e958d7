//! Composition root wiring every store to one backing store.
//!
//! # Invariants
//! - Collections are hydrated on construction.
//! - Preferences are loaded right after construction via the explicit
//!   `load_from_storage` step.

use crate::storage::SharedBackingStore;
use crate::store::notes::NotesStore;
use crate::store::preference::{back_button_position, fullscreen_mode, PreferenceStore};
use crate::store::sketches::SketchesStore;
use log::info;

/// All stores of one running app instance.
pub struct AppStores {
    pub notes: NotesStore,
    pub sketches: SketchesStore,
    pub fullscreen_mode: PreferenceStore<bool>,
    pub back_button_position: PreferenceStore<bool>,
}

impl AppStores {
    /// Opens every store against `backing` (`None` = in-memory only).
    pub fn open(backing: Option<SharedBackingStore>) -> Self {
        let persistent = backing.is_some();
        let notes = NotesStore::open_notes(backing.clone());
        let sketches = SketchesStore::open_sketches(backing.clone());
        let mut fullscreen_mode = fullscreen_mode(backing.clone());
        let mut back_button_position = back_button_position(backing);
        fullscreen_mode.load_from_storage();
        back_button_position.load_from_storage();

        info!(
            "event=stores_open module=app status=ok persistent={persistent} notes={} sketches={}",
            notes.len(),
            sketches.len()
        );

        Self {
            notes,
            sketches,
            fullscreen_mode,
            back_button_position,
        }
    }

    /// Opens every store without persistence.
    pub fn in_memory() -> Self {
        Self::open(None)
    }
}
