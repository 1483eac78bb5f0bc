//! # Storage Layer
//!
//! The host owns notes and the add-on's saved configuration; this module
//! describes what the add-on needs from it.
//!
//! - [`NoteStore`]: the host's note collection and schema service.
//! - [`ConfigStorage`]: the host's per-add-on configuration storage.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`] / [`fs::FileConfigStorage`]: JSON files, used by the
//!   reference host binary.
//!   ```text
//!   <home>/
//!   ├── collection.json          # note types and notes
//!   └── addons/clozemask/
//!       ├── meta.json            # {"config": {...}}, host storage
//!       └── config.json          # {"config": {...}}, backup copy
//!   ```
//! - [`memory::InMemoryStore`] / [`memory::MemoryConfigStorage`]: no
//!   persistence, with call counters and failure switches for tests.

use crate::error::{ClozeError, Result};
use crate::model::{Note, NoteId, NoteType};
use serde_json::{Map, Value};

pub mod fs;
pub mod memory;

/// The host's note collection.
pub trait NoteStore {
    /// Fetch a note by id
    fn get_note(&self, id: NoteId) -> Result<Note>;

    /// Save an edited note (the batch path)
    fn update_note(&mut self, note: &Note) -> Result<()>;

    /// Persist a single note immediately (the editor path)
    fn flush_note(&mut self, note: &Note) -> Result<()>;

    /// All notes, ordered by id
    fn list_notes(&self) -> Result<Vec<Note>>;

    fn note_type(&self, name: &str) -> Option<NoteType>;

    fn add_note_type(&mut self, note_type: NoteType) -> Result<()>;

    /// Store a brand-new note under its own id
    fn insert_note(&mut self, note: Note) -> Result<()>;

    fn next_id(&self) -> NoteId;

    /// Ordered field names of a note type; `None` when the type is unknown.
    fn field_names(&self, note_type: &str) -> Option<Vec<String>> {
        self.note_type(note_type).map(|nt| nt.fields)
    }

    /// Creates a note of `note_type` with the given field values and stores it.
    fn add_note(&mut self, note_type: &str, values: &[(String, String)]) -> Result<Note> {
        let nt = self
            .note_type(note_type)
            .ok_or_else(|| ClozeError::NoteTypeNotFound(note_type.to_string()))?;
        let mut note = Note::new(self.next_id(), &nt);
        for (name, value) in values {
            note.set(name, value.as_str())?;
        }
        self.insert_note(note.clone())?;
        Ok(note)
    }
}

/// Host-provided configuration storage, keyed by add-on id.
pub trait ConfigStorage {
    /// The saved configuration, or `None` if nothing was ever saved.
    fn get_config(&self, addon_id: &str) -> Result<Option<Map<String, Value>>>;

    fn write_config(&mut self, addon_id: &str, config: &Map<String, Value>) -> Result<()>;
}
