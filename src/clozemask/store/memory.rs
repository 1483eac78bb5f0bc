use super::{ConfigStorage, NoteStore};
use crate::error::{ClozeError, Result};
use crate::model::{Note, NoteId, NoteType};
use serde_json::{Map, Value};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap, HashSet};

/// In-memory note collection for testing.
/// Does NOT persist data.
///
/// Counts every call so tests can assert on host traffic, and can be told to
/// fail specific reads or all writes.
#[derive(Default)]
pub struct InMemoryStore {
    note_types: HashMap<String, NoteType>,
    notes: BTreeMap<NoteId, Note>,
    fetches: Cell<usize>,
    updates: usize,
    flushes: usize,
    broken_notes: HashSet<NoteId>,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    pub fn update_count(&self) -> usize {
        self.updates
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Make `get_note` fail for this id even though the note exists.
    pub fn break_note(&mut self, id: NoteId) {
        self.broken_notes.insert(id);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    fn write(&mut self, note: &Note) -> Result<()> {
        if self.simulate_write_error {
            return Err(ClozeError::Store("simulated write error".to_string()));
        }
        if !self.notes.contains_key(&note.id) {
            return Err(ClozeError::NoteNotFound(note.id));
        }
        self.notes.insert(note.id, note.clone());
        Ok(())
    }
}

impl NoteStore for InMemoryStore {
    fn get_note(&self, id: NoteId) -> Result<Note> {
        self.fetches.set(self.fetches.get() + 1);
        if self.broken_notes.contains(&id) {
            return Err(ClozeError::Store(format!("note {} is unreadable", id)));
        }
        self.notes.get(&id).cloned().ok_or(ClozeError::NoteNotFound(id))
    }

    fn update_note(&mut self, note: &Note) -> Result<()> {
        self.updates += 1;
        self.write(note)
    }

    fn flush_note(&mut self, note: &Note) -> Result<()> {
        self.flushes += 1;
        self.write(note)
    }

    fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(self.notes.values().cloned().collect())
    }

    fn note_type(&self, name: &str) -> Option<NoteType> {
        self.note_types.get(name).cloned()
    }

    fn add_note_type(&mut self, note_type: NoteType) -> Result<()> {
        self.note_types.insert(note_type.name.clone(), note_type);
        Ok(())
    }

    fn insert_note(&mut self, note: Note) -> Result<()> {
        self.notes.insert(note.id, note);
        Ok(())
    }

    fn next_id(&self) -> NoteId {
        self.notes.keys().next_back().map_or(1, |id| id + 1)
    }
}

/// In-memory add-on configuration storage for testing.
#[derive(Default)]
pub struct MemoryConfigStorage {
    configs: HashMap<String, Map<String, Value>>,
    simulate_write_error: bool,
}

impl MemoryConfigStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed storage as if the user had saved `config` earlier.
    pub fn with_config(mut self, addon_id: &str, config: Map<String, Value>) -> Self {
        self.configs.insert(addon_id.to_string(), config);
        self
    }

    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }
}

impl ConfigStorage for MemoryConfigStorage {
    fn get_config(&self, addon_id: &str) -> Result<Option<Map<String, Value>>> {
        Ok(self.configs.get(addon_id).cloned())
    }

    fn write_config(&mut self, addon_id: &str, config: &Map<String, Value>) -> Result<()> {
        if self.simulate_write_error {
            return Err(ClozeError::Store("simulated write error".to_string()));
        }
        self.configs.insert(addon_id.to_string(), config.clone());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub const SENTENCE: &str = "彼は学校に行きます";
    pub const WORD: &str = "学校";

    /// The default field layout: Sentence, Reading, ClozeSentence.
    pub fn vocab_type(name: &str) -> NoteType {
        NoteType::new(name, &["Sentence", "Reading", "ClozeSentence"])
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            let mut store = InMemoryStore::new();
            store.add_note_type(vocab_type("Vocab")).unwrap();
            Self { store }
        }

        pub fn with_note_type(mut self, note_type: NoteType) -> Self {
            self.store.add_note_type(note_type).unwrap();
            self
        }

        /// Adds a note of `note_type` (registering the default layout under that
        /// name if needed) and returns the fixture plus the new id.
        pub fn with_vocab_note(
            mut self,
            note_type: &str,
            sentence: &str,
            word: &str,
        ) -> (Self, NoteId) {
            if self.store.note_type(note_type).is_none() {
                self.store.add_note_type(vocab_type(note_type)).unwrap();
            }
            let note = self
                .store
                .add_note(
                    note_type,
                    &[
                        ("Sentence".to_string(), sentence.to_string()),
                        ("Reading".to_string(), word.to_string()),
                    ],
                )
                .unwrap();
            (self, note.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn ids_are_assigned_sequentially() {
        let (fixture, first) = StoreFixture::new().with_vocab_note("Vocab", SENTENCE, WORD);
        let (fixture, second) = fixture.with_vocab_note("Vocab", "a", "b");
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(fixture.store.list_notes().unwrap().len(), 2);
    }

    #[test]
    fn add_note_rejects_unknown_type_and_field() {
        let mut store = StoreFixture::new().store;
        assert!(matches!(
            store.add_note("Kanji", &[]),
            Err(ClozeError::NoteTypeNotFound(_))
        ));
        assert!(matches!(
            store.add_note("Vocab", &[("Meaning".to_string(), "x".to_string())]),
            Err(ClozeError::FieldNotFound(_))
        ));
    }

    #[test]
    fn counts_traffic_and_simulates_failures() {
        let (fixture, id) = StoreFixture::new().with_vocab_note("Vocab", SENTENCE, WORD);
        let mut store = fixture.store;

        let note = store.get_note(id).unwrap();
        store.update_note(&note).unwrap();
        store.flush_note(&note).unwrap();
        assert_eq!(
            (store.fetch_count(), store.update_count(), store.flush_count()),
            (1, 1, 1)
        );

        store.break_note(id);
        assert!(store.get_note(id).is_err());

        store.set_simulate_write_error(true);
        assert!(store.update_note(&note).is_err());
    }

    #[test]
    fn schema_lookup() {
        let store = StoreFixture::new().store;
        assert_eq!(
            store.field_names("Vocab"),
            Some(vec![
                "Sentence".to_string(),
                "Reading".to_string(),
                "ClozeSentence".to_string()
            ])
        );
        assert_eq!(store.field_names("Missing"), None);
    }
}
