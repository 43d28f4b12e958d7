//! Sketches collection: sketch-specific entry points over `CollectionStore`.

use crate::model::record::now;
use crate::model::sketch::{Sketch, SketchPatch};
use crate::storage::keys::SKETCHES_KEY;
use crate::storage::SharedBackingStore;
use crate::store::collection::CollectionStore;

pub type SketchesStore = CollectionStore<Sketch>;

impl CollectionStore<Sketch> {
    /// Opens the sketches collection under its fixed storage key.
    pub fn open_sketches(backing: Option<SharedBackingStore>) -> Self {
        Self::open(SKETCHES_KEY, backing)
    }

    /// Creates a sketch and prepends it. `image_data` may be empty.
    pub fn create_sketch(&mut self, image_data: impl Into<String>) -> Sketch {
        let sketch = Sketch::new(image_data, now());
        self.insert(sketch.clone());
        sketch
    }

    pub fn update_sketch(&mut self, id: &str, patch: SketchPatch) -> bool {
        self.update(id, patch)
    }

    pub fn delete_sketch(&mut self, id: &str) -> bool {
        self.delete(id)
    }

    pub fn get_sketch(&self, id: &str) -> Option<Sketch> {
        self.get(id)
    }
}
