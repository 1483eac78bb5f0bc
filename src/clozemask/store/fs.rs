use super::{ConfigStorage, NoteStore};
use crate::error::{ClozeError, Result};
use crate::model::{Note, NoteId, NoteType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const COLLECTION_FILENAME: &str = "collection.json";
const META_FILENAME: &str = "meta.json";
const BACKUP_FILENAME: &str = "config.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collection {
    #[serde(default)]
    note_types: Vec<NoteType>,
    #[serde(default)]
    notes: Vec<Note>,
}

/// File-backed note collection: one `collection.json` under `root`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn collection_path(&self) -> PathBuf {
        self.root.join(COLLECTION_FILENAME)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(ClozeError::Io)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Collection> {
        let path = self.collection_path();
        if !path.exists() {
            return Ok(Collection::default());
        }
        let content = fs::read_to_string(path).map_err(ClozeError::Io)?;
        let collection: Collection =
            serde_json::from_str(&content).map_err(ClozeError::Serialization)?;
        Ok(collection)
    }

    fn save(&self, collection: &Collection) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content =
            serde_json::to_string_pretty(collection).map_err(ClozeError::Serialization)?;
        fs::write(self.collection_path(), content).map_err(ClozeError::Io)?;
        Ok(())
    }

    fn replace_note(&mut self, note: &Note) -> Result<()> {
        let mut collection = self.load()?;
        let slot = collection
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or(ClozeError::NoteNotFound(note.id))?;
        *slot = note.clone();
        self.save(&collection)
    }
}

impl NoteStore for FileStore {
    fn get_note(&self, id: NoteId) -> Result<Note> {
        self.load()?
            .notes
            .into_iter()
            .find(|n| n.id == id)
            .ok_or(ClozeError::NoteNotFound(id))
    }

    fn update_note(&mut self, note: &Note) -> Result<()> {
        let mut note = note.clone();
        note.touch();
        self.replace_note(&note)
    }

    // The collection is rewritten on every write, so both paths persist at once.
    fn flush_note(&mut self, note: &Note) -> Result<()> {
        self.update_note(note)
    }

    fn list_notes(&self) -> Result<Vec<Note>> {
        let mut notes = self.load()?.notes;
        notes.sort_by_key(|n| n.id);
        Ok(notes)
    }

    fn note_type(&self, name: &str) -> Option<NoteType> {
        self.load()
            .ok()?
            .note_types
            .into_iter()
            .find(|nt| nt.name == name)
    }

    fn add_note_type(&mut self, note_type: NoteType) -> Result<()> {
        let mut collection = self.load()?;
        if collection.note_types.iter().any(|nt| nt.name == note_type.name) {
            return Err(ClozeError::Store(format!(
                "Note type already exists: {}",
                note_type.name
            )));
        }
        collection.note_types.push(note_type);
        self.save(&collection)
    }

    fn insert_note(&mut self, note: Note) -> Result<()> {
        let mut collection = self.load()?;
        if collection.notes.iter().any(|n| n.id == note.id) {
            return Err(ClozeError::Store(format!("Note id already used: {}", note.id)));
        }
        collection.notes.push(note);
        self.save(&collection)
    }

    fn next_id(&self) -> NoteId {
        self.load()
            .map(|c| c.notes.iter().map(|n| n.id).max().unwrap_or(0) + 1)
            .unwrap_or(1)
    }
}

/// Host configuration storage on disk: `<addons_dir>/<addon_id>/meta.json`.
pub struct FileConfigStorage {
    addons_dir: PathBuf,
}

impl FileConfigStorage {
    pub fn new(addons_dir: PathBuf) -> Self {
        Self { addons_dir }
    }

    pub fn addon_dir(&self, addon_id: &str) -> PathBuf {
        self.addons_dir.join(addon_id)
    }

    /// Where the human-readable backup copy of the config lives.
    pub fn backup_path(&self, addon_id: &str) -> PathBuf {
        self.addon_dir(addon_id).join(BACKUP_FILENAME)
    }

    fn meta_path(&self, addon_id: &str) -> PathBuf {
        self.addon_dir(addon_id).join(META_FILENAME)
    }
}

impl ConfigStorage for FileConfigStorage {
    fn get_config(&self, addon_id: &str) -> Result<Option<Map<String, Value>>> {
        let path = self.meta_path(addon_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(ClozeError::Io)?;
        let meta: Value = serde_json::from_str(&content).map_err(ClozeError::Serialization)?;
        match meta.get("config") {
            Some(Value::Object(config)) => Ok(Some(config.clone())),
            Some(_) => Err(ClozeError::Store(format!(
                "{}: \"config\" is not an object",
                META_FILENAME
            ))),
            None => Ok(None),
        }
    }

    fn write_config(&mut self, addon_id: &str, config: &Map<String, Value>) -> Result<()> {
        let dir = self.addon_dir(addon_id);
        fs::create_dir_all(&dir).map_err(ClozeError::Io)?;
        let mut meta = Map::new();
        meta.insert("config".to_string(), Value::Object(config.clone()));
        let content = serde_json::to_string_pretty(&Value::Object(meta))
            .map_err(ClozeError::Serialization)?;
        fs::write(self.meta_path(addon_id), content).map_err(ClozeError::Io)?;
        Ok(())
    }
}
