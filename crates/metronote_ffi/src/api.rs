//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level store operations to Dart via FRB.
//! - Own the process-wide `AppStores` composition root.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Stores are opened once; later calls reuse the same in-memory state.
//! - A database that cannot be opened degrades to in-memory mode.
//! - Media commands reach a playback controller only after the platform
//!   glue linked into this library installs one.

use log::{error, info, warn};
use metronote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppStores, MediaCommandRelay, Note, NotePatch, PlaybackController, SharedBackingStore, Sketch,
    SketchPatch, SqliteBackingStore,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

const STORE_DB_FILE_NAME: &str = "metronote_store.sqlite3";
const STORE_DB_PATH_ENV: &str = "METRONOTE_DB_PATH";

static APP_STORES: OnceLock<Mutex<AppStores>> = OnceLock::new();
static MEDIA_RELAY: OnceLock<Mutex<MediaCommandRelay>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Note view returned to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    pub content: String,
    /// RFC 3339 UTC.
    pub created_at: String,
    /// RFC 3339 UTC.
    pub updated_at: String,
}

/// Sketch view returned to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchItem {
    pub id: String,
    pub image_data: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Creates a note; blank titles become the placeholder title.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_create(title: String, content: String) -> NoteItem {
    with_stores(|stores| to_note_item(&stores.notes.create_note(title, content)))
}

/// Patches a note. `None` fields stay unchanged.
///
/// Returns `false` when no note has `id` (nothing changes).
#[flutter_rust_bridge::frb(sync)]
pub fn notes_update(id: String, title: Option<String>, content: Option<String>) -> bool {
    with_stores(|stores| {
        stores
            .notes
            .update_note(id.as_str(), NotePatch { title, content })
    })
}

/// Deletes a note. Returns `false` when no note has `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(id: String) -> bool {
    with_stores(|stores| stores.notes.delete_note(id.as_str()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_get(id: String) -> Option<NoteItem> {
    with_stores(|stores| stores.notes.get_note(id.as_str()).as_ref().map(to_note_item))
}

/// Lists notes newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> Vec<NoteItem> {
    with_stores(|stores| stores.notes.records().iter().map(to_note_item).collect())
}

#[flutter_rust_bridge::frb(sync)]
pub fn sketches_create(image_data: String) -> SketchItem {
    with_stores(|stores| to_sketch_item(&stores.sketches.create_sketch(image_data)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn sketches_update(id: String, image_data: Option<String>) -> bool {
    with_stores(|stores| {
        stores
            .sketches
            .update_sketch(id.as_str(), SketchPatch { image_data })
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn sketches_delete(id: String) -> bool {
    with_stores(|stores| stores.sketches.delete_sketch(id.as_str()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn sketches_get(id: String) -> Option<SketchItem> {
    with_stores(|stores| {
        stores
            .sketches
            .get_sketch(id.as_str())
            .as_ref()
            .map(to_sketch_item)
    })
}

/// Lists sketches newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn sketches_list() -> Vec<SketchItem> {
    with_stores(|stores| stores.sketches.records().iter().map(to_sketch_item).collect())
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_get_fullscreen_mode() -> bool {
    with_stores(|stores| stores.fullscreen_mode.get())
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_fullscreen_mode(enabled: bool) {
    with_stores(|stores| stores.fullscreen_mode.set(enabled));
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_get_back_button_position() -> bool {
    with_stores(|stores| stores.back_button_position.get())
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_back_button_position(value: bool) {
    with_stores(|stores| stores.back_button_position.set(value));
}

/// Relays one platform media command (`play|pause|skipNext|skipPrevious`).
///
/// # FFI contract
/// - Never fails; returns the relay outcome label
///   (`dispatched|unknown|no_controller|controller_failed`).
/// - Returns `no_controller` for known commands until
///   [`install_media_controller`] has run.
#[flutter_rust_bridge::frb(sync)]
pub fn handle_media_command(command: String) -> String {
    with_media_relay(|relay| relay.relay(command.as_str()).label().to_string())
}

/// Installs (or with `None`, removes) the native playback controller.
///
/// Called by platform glue compiled into the same library, not from Dart.
#[flutter_rust_bridge::frb(ignore)]
pub fn install_media_controller(controller: Option<Arc<dyn PlaybackController>>) {
    let installed = controller.is_some();
    with_media_relay(|relay| relay.set_controller(controller));
    info!("event=media_controller_install module=ffi status=ok installed={installed}");
}

fn with_media_relay<T>(f: impl FnOnce(&mut MediaCommandRelay) -> T) -> T {
    let relay = MEDIA_RELAY.get_or_init(|| Mutex::new(MediaCommandRelay::default()));
    let mut guard = relay.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

fn with_stores<T>(f: impl FnOnce(&mut AppStores) -> T) -> T {
    let stores = APP_STORES.get_or_init(|| Mutex::new(open_app_stores()));
    let mut guard = stores.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

fn open_app_stores() -> AppStores {
    let db_path = resolve_store_db_path();
    match SqliteBackingStore::open(&db_path) {
        Ok(store) => {
            let backing: SharedBackingStore = Arc::new(store);
            AppStores::open(Some(backing))
        }
        Err(err) => {
            error!(
                "event=stores_open module=ffi status=error error_code=store_db_open_failed path={} error={err}",
                db_path.display()
            );
            warn!("event=stores_open module=ffi status=degraded mode=memory");
            AppStores::in_memory()
        }
    }
}

fn resolve_store_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(STORE_DB_FILE_NAME)
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        content: note.content.clone(),
        created_at: note.created_at.to_rfc3339(),
        updated_at: note.updated_at.to_rfc3339(),
    }
}

fn to_sketch_item(sketch: &Sketch) -> SketchItem {
    SketchItem {
        id: sketch.id.to_string(),
        image_data: sketch.image_data.clone(),
        created_at: sketch.created_at.to_rfc3339(),
        updated_at: sketch.updated_at.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, handle_media_command, init_logging, install_media_controller, notes_create,
        notes_delete, notes_get, notes_list, notes_update, ping, resolve_store_db_path,
        sketches_create, sketches_delete, sketches_get, sketches_list, sketches_update,
        STORE_DB_FILE_NAME, STORE_DB_PATH_ENV,
    };
    use metronote_core::{PlaybackController, PlaybackError};
    use std::sync::{Arc, Mutex, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    static TEST_DB_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Points the process-wide stores at a throwaway database before first use.
    fn use_isolated_store() -> &'static TempDir {
        TEST_DB_DIR.get_or_init(|| {
            let dir = tempfile::tempdir().expect("temp dir should be created");
            std::env::set_var(STORE_DB_PATH_ENV, dir.path().join(STORE_DB_FILE_NAME));
            dir
        })
    }

    #[derive(Default)]
    struct RecordingController {
        calls: Mutex<Vec<&'static str>>,
    }

    impl PlaybackController for RecordingController {
        fn toggle_play_pause(&self) -> Result<(), PlaybackError> {
            self.calls.lock().expect("lock").push("toggle");
            Ok(())
        }

        fn play_next(&self) -> Result<(), PlaybackError> {
            self.calls.lock().expect("lock").push("next");
            Ok(())
        }

        fn play_previous(&self) -> Result<(), PlaybackError> {
            self.calls.lock().expect("lock").push("previous");
            Ok(())
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn store_db_path_resolves_into_isolated_dir() {
        let dir = use_isolated_store();
        assert!(resolve_store_db_path().starts_with(dir.path()));
    }

    #[test]
    fn notes_crud_round_trip_through_ffi() {
        use_isolated_store();
        let token = unique_token("ffi-note");
        let created = notes_create(String::new(), token.clone());
        assert_eq!(created.title, "Untitled Note");
        assert_eq!(created.created_at, created.updated_at);

        let listed = notes_list();
        assert!(listed.iter().any(|item| item.id == created.id));

        assert!(notes_update(
            created.id.clone(),
            Some("titled".to_string()),
            None
        ));
        let fetched = notes_get(created.id.clone()).expect("note should exist");
        assert_eq!(fetched.title, "titled");
        assert_eq!(fetched.content, token);

        assert!(notes_delete(created.id.clone()));
        assert!(notes_get(created.id.clone()).is_none());
        assert!(!notes_delete(created.id));
    }

    #[test]
    fn sketches_crud_round_trip_through_ffi() {
        use_isolated_store();
        let created = sketches_create(String::new());
        assert!(sketches_list().iter().any(|item| item.id == created.id));

        assert!(sketches_update(
            created.id.clone(),
            Some("data:image/png;base64,AA==".to_string())
        ));
        let fetched = sketches_get(created.id.clone()).expect("sketch should exist");
        assert_eq!(fetched.image_data, "data:image/png;base64,AA==");

        assert!(sketches_delete(created.id.clone()));
        assert!(!sketches_update(created.id, None));
    }

    #[test]
    fn media_commands_reach_installed_controller() {
        assert_eq!(handle_media_command("play".to_string()), "no_controller");
        assert_eq!(handle_media_command("rewind".to_string()), "unknown");

        let controller = Arc::new(RecordingController::default());
        install_media_controller(Some(controller.clone()));
        assert_eq!(handle_media_command("pause".to_string()), "dispatched");
        assert_eq!(handle_media_command("skipNext".to_string()), "dispatched");
        assert_eq!(*controller.calls.lock().expect("lock"), vec!["toggle", "next"]);

        install_media_controller(None);
        assert_eq!(handle_media_command("skipPrevious".to_string()), "no_controller");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
