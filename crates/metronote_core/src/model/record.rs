//! Shared record identity, timestamps and the `Record` contract.
//!
//! # Responsibility
//! - Generate collision-resistant, time-ordered record ids.
//! - Provide a monotonic "touch" clock for `updated_at` refreshes.
//! - Define what a collection store needs from a record kind.
//!
//! # Invariants
//! - A `RecordId` is never empty.
//! - `next_timestamp(prev)` is always strictly greater than `prev`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// UTC wall-clock instant, serialized as RFC 3339.
pub type Timestamp = DateTime<Utc>;

/// Opaque record identifier.
///
/// New ids are UUIDv7 strings (millisecond time prefix + random bits), but
/// any non-empty string loaded from storage is accepted as-is. Blank ids
/// fail deserialization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

/// Rejected blank record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankRecordId;

impl Display for BlankRecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("record id cannot be blank")
    }
}

impl Error for BlankRecordId {}

impl RecordId {
    /// Generates a fresh id that is unique across sessions.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wraps an existing id string. Returns `None` for blank input.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RecordId {
    type Error = BlankRecordId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value).ok_or(BlankRecordId)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Current wall-clock time.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Returns a timestamp strictly after `previous`.
///
/// Uses the wall clock when it has moved past `previous`; otherwise bumps
/// `previous` by one nanosecond so rapid updates still order correctly.
pub fn next_timestamp(previous: Timestamp) -> Timestamp {
    let current = now();
    if current > previous {
        current
    } else {
        previous + TimeDelta::nanoseconds(1)
    }
}

/// Contract between a record kind and the generic collection store.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Partial-field update accepted by `CollectionStore::update`.
    type Patch;

    /// Human-readable kind label used in log events (`note`, `sketch`).
    const KIND: &'static str;

    fn id(&self) -> &RecordId;
    fn created_at(&self) -> Timestamp;
    fn updated_at(&self) -> Timestamp;

    /// Merges `patch` over this record and stamps `updated_at`.
    ///
    /// Must never touch `id` or `created_at`.
    fn apply_patch(&mut self, patch: Self::Patch, updated_at: Timestamp);

    /// Clamps `updated_at` up to `created_at` for records loaded from storage.
    ///
    /// Returns `true` when a repair happened.
    fn repair_timestamps(&mut self) -> bool;
}
