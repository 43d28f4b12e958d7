//! Reactive stores backing the UI command surface.
//!
//! # Responsibility
//! - Own note/sketch collections and scalar preferences in memory.
//! - Mirror every mutation into the backing store, then notify observers.
//!
//! # Invariants
//! - Stores never read the backing store outside hydration.
//! - Storage failures are logged and absorbed; callers never see them.

pub mod collection;
pub mod notes;
pub mod preference;
pub mod sketches;
pub mod subscription;
