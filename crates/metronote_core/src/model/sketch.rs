//! Sketch record model.

use crate::model::record::{Record, RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Freehand sketch. `image_data` is an opaque encoded raster (usually a
/// base64 data URL) and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sketch {
    pub id: RecordId,
    #[serde(default)]
    pub image_data: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial update for a sketch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SketchPatch {
    pub image_data: Option<String>,
}

impl SketchPatch {
    pub fn image_data(value: impl Into<String>) -> Self {
        Self {
            image_data: Some(value.into()),
        }
    }
}

impl Sketch {
    pub fn new(image_data: impl Into<String>, at: Timestamp) -> Self {
        Self {
            id: RecordId::generate(),
            image_data: image_data.into(),
            created_at: at,
            updated_at: at,
        }
    }
}

impl Record for Sketch {
    type Patch = SketchPatch;

    const KIND: &'static str = "sketch";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn apply_patch(&mut self, patch: SketchPatch, updated_at: Timestamp) {
        if let Some(image_data) = patch.image_data {
            self.image_data = image_data;
        }
        self.updated_at = updated_at;
    }

    fn repair_timestamps(&mut self) -> bool {
        if self.updated_at < self.created_at {
            self.updated_at = self.created_at;
            return true;
        }
        false
    }
}
