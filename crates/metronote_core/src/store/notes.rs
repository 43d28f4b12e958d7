//! Notes collection: note-specific entry points over `CollectionStore`.

use crate::model::note::{Note, NotePatch};
use crate::model::record::now;
use crate::storage::keys::NOTES_KEY;
use crate::storage::SharedBackingStore;
use crate::store::collection::CollectionStore;

pub type NotesStore = CollectionStore<Note>;

impl CollectionStore<Note> {
    /// Opens the notes collection under its fixed storage key.
    pub fn open_notes(backing: Option<SharedBackingStore>) -> Self {
        Self::open(NOTES_KEY, backing)
    }

    /// Creates a note and prepends it. A blank title becomes the placeholder.
    pub fn create_note(&mut self, title: impl Into<String>, content: impl Into<String>) -> Note {
        let note = Note::new(title, content, now());
        self.insert(note.clone());
        note
    }

    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> bool {
        self.update(id, patch)
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        self.delete(id)
    }

    pub fn get_note(&self, id: &str) -> Option<Note> {
        self.get(id)
    }
}
