use metronote_core::db::migrations::latest_version;
use metronote_core::db::{open_db, open_db_in_memory, DbError};
use metronote_core::{
    BackingStore, NotePatch, NotesStore, SharedBackingStore, SqliteBackingStore, StorageError,
};
use rusqlite::Connection;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metronote.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_entries");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = SqliteBackingStore::open(&path).err().unwrap();
    assert!(matches!(
        err,
        StorageError::Db(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn kv_write_is_an_upsert() {
    let store = SqliteBackingStore::open_in_memory().unwrap();
    assert_eq!(store.read("metro_notes").unwrap(), None);

    store.write("metro_notes", "[]").unwrap();
    store.write("metro_notes", "[1]").unwrap();
    store.write("metro_sketches", "[]").unwrap();

    assert_eq!(store.read("metro_notes").unwrap().as_deref(), Some("[1]"));
    assert_eq!(
        store.keys().unwrap(),
        vec!["metro_notes".to_string(), "metro_sketches".to_string()]
    );
}

#[test]
fn kv_write_stamps_updated_at_in_epoch_milliseconds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stamp.db");
    let store = SqliteBackingStore::open(&path).unwrap();

    let before = epoch_millis();
    store.write("metro_notes", "[]").unwrap();
    let after = epoch_millis();

    let conn = open_db(&path).unwrap();
    let stamped: i64 = conn
        .query_row(
            "SELECT updated_at FROM kv_entries WHERE key = ?1;",
            ["metro_notes"],
            |row| row.get(0),
        )
        .unwrap();
    // Small slack for floating-point julianday conversion.
    assert!(
        stamped >= before - 2 && stamped <= after + 2,
        "updated_at {stamped} outside [{before}, {after}]"
    );
}

#[test]
fn notes_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let expected = {
        let backing: SharedBackingStore = Arc::new(SqliteBackingStore::open(&path).unwrap());
        let mut store = NotesStore::open_notes(Some(backing));
        let kept = store.create_note("kept", "body");
        let dropped = store.create_note("dropped", "");
        store.update_note(kept.id.as_str(), NotePatch::content("edited"));
        store.delete_note(dropped.id.as_str());
        store.snapshot()
    };

    let backing: SharedBackingStore = Arc::new(SqliteBackingStore::open(&path).unwrap());
    let reopened = NotesStore::open_notes(Some(backing));
    assert_eq!(reopened.snapshot(), expected);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.records()[0].content, "edited");
}

fn epoch_millis() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_millis();
    i64::try_from(millis).unwrap()
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
