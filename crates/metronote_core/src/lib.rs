//! Core persistence layer for Metro Notes.
//! This crate is the single source of truth for note/sketch/preference
//! invariants; UI and platform layers only issue commands and observe.

pub mod app;
pub mod db;
pub mod logging;
pub mod model;
pub mod platform;
pub mod storage;
pub mod store;

pub use app::AppStores;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NotePatch, UNTITLED_NOTE_TITLE};
pub use model::record::{BlankRecordId, Record, RecordId, Timestamp};
pub use model::sketch::{Sketch, SketchPatch};
pub use platform::media::{
    MediaCommand, MediaCommandRelay, PlaybackController, PlaybackError, RelayOutcome,
};
pub use storage::{
    BackingStore, MemoryBackingStore, SharedBackingStore, SqliteBackingStore, StorageError,
    StorageResult,
};
pub use store::collection::CollectionStore;
pub use store::notes::NotesStore;
pub use store::preference::{back_button_position, fullscreen_mode, PreferenceStore};
pub use store::sketches::SketchesStore;
pub use store::subscription::Subscription;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
