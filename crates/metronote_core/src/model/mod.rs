//! Record models persisted by the collection stores.
//!
//! # Responsibility
//! - Define the note and sketch records and their partial-update shapes.
//! - Keep wire naming (camelCase) stable for on-device payloads.
//!
//! # Invariants
//! - Every record carries an immutable, never-reused `RecordId`.
//! - `updated_at` never precedes `created_at`.

pub mod note;
pub mod record;
pub mod sketch;
