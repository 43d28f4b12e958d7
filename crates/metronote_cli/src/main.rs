//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `metronote_core` linkage and store wiring outside Flutter.
//! - Print a deterministic summary of the opened stores.
//!
//! Usage: `metronote_cli [DB_PATH]`. Without a path the stores run in memory.

use metronote_core::{AppStores, SharedBackingStore, SqliteBackingStore};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("metronote_core ping={}", metronote_core::ping());
    println!("metronote_core version={}", metronote_core::core_version());

    let stores = match std::env::args().nth(1) {
        Some(path) => match SqliteBackingStore::open(&path) {
            Ok(store) => {
                let backing: SharedBackingStore = Arc::new(store);
                println!("store mode=file path={path}");
                AppStores::open(Some(backing))
            }
            Err(err) => {
                eprintln!("failed to open store `{path}`: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            println!("store mode=memory");
            AppStores::in_memory()
        }
    };

    println!("notes count={}", stores.notes.len());
    println!("sketches count={}", stores.sketches.len());
    println!("fullscreen_mode={}", stores.fullscreen_mode.get());
    println!("back_button_position={}", stores.back_button_position.get());
    ExitCode::SUCCESS
}
