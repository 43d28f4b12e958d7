//! Fixed storage keys. Each key is owned by exactly one store.

/// Note collection envelope.
pub const NOTES_KEY: &str = "metro_notes";
/// Sketch collection envelope.
pub const SKETCHES_KEY: &str = "metro_sketches";
/// Fullscreen-mode boolean. Key name kept for compatibility with
/// payloads written by earlier app builds.
pub const FULLSCREEN_MODE_KEY: &str = "metro_spotify_fullscreen_mode";
/// Back-button-position boolean.
pub const BACK_BUTTON_POSITION_KEY: &str = "metro_back_button_position";

/// All keys, for collision checks.
pub const ALL_KEYS: [&str; 4] = [
    NOTES_KEY,
    SKETCHES_KEY,
    FULLSCREEN_MODE_KEY,
    BACK_BUTTON_POSITION_KEY,
];
