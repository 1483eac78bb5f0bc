use crate::error::Result;
use crate::mask::DEFAULT_MASK;
use crate::store::ConfigStorage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Identifier the host files this add-on's configuration under.
pub const ADDON_ID: &str = "clozemask";

const DEFAULT_SENTENCE_FIELD: &str = "Sentence";
const DEFAULT_WORD_FIELD: &str = "Reading";
const DEFAULT_DESTINATION_FIELD: &str = "ClozeSentence";
const DEFAULT_BULK_ACTION_LABEL: &str = "Generate Cloze Masks";

/// Every key the add-on understands, in display order.
pub const KEYS: &[&str] = &[
    "sentenceField",
    "wordField",
    "destinationField",
    "noteTypes",
    "maskString",
    "lookupOnAdd",
    "bulkActionLabel",
    "debug",
];

/// User-adjustable options, stored by the host as a JSON object with camelCase keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClozeConfig {
    /// Field holding the full sentence
    pub sentence_field: String,
    /// Field holding the word to mask
    pub word_field: String,
    /// Field the masked sentence is written to
    pub destination_field: String,
    /// Comma-separated note-type name fragments; empty matches every type
    pub note_types: String,
    pub mask_string: String,
    /// Generate when the editor leaves the sentence or word field
    pub lookup_on_add: bool,
    /// Label of the batch command in the note browser
    pub bulk_action_label: String,
    pub debug: bool,
}

impl Default for ClozeConfig {
    fn default() -> Self {
        Self {
            sentence_field: DEFAULT_SENTENCE_FIELD.to_string(),
            word_field: DEFAULT_WORD_FIELD.to_string(),
            destination_field: DEFAULT_DESTINATION_FIELD.to_string(),
            note_types: String::new(),
            mask_string: DEFAULT_MASK.to_string(),
            lookup_on_add: true,
            bulk_action_label: DEFAULT_BULK_ACTION_LABEL.to_string(),
            debug: false,
        }
    }
}

/// `value` unless it is blank, in which case `default`.
pub(crate) fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ClozeConfig {
    /// Loads the config from host storage.
    ///
    /// Starts from defaults and overlays whatever the host has saved. A failing
    /// read leaves the defaults in place.
    pub fn load<C: ConfigStorage>(storage: &C) -> Self {
        match storage.get_config(ADDON_ID) {
            Ok(Some(user)) => Self::from_map(&user),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("could not read add-on config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Overlays `user` onto the defaults key by key.
    ///
    /// A key whose value has the wrong type is dropped; the rest still apply.
    pub fn from_map(user: &Map<String, Value>) -> Self {
        let mut merged = Self::default().to_map();

        for (key, value) in user {
            let mut candidate = merged.clone();
            candidate.insert(key.clone(), value.clone());
            if serde_json::from_value::<ClozeConfig>(Value::Object(candidate.clone())).is_ok() {
                merged = candidate;
            } else {
                warn!(key = %key, "ignoring config value of unexpected type");
            }
        }

        serde_json::from_value::<ClozeConfig>(Value::Object(merged))
            .unwrap_or_default()
            .normalized()
    }

    /// Blank string options fall back to their defaults. `noteTypes` may stay empty.
    pub fn normalized(mut self) -> Self {
        self.sentence_field = or_default(&self.sentence_field, DEFAULT_SENTENCE_FIELD);
        self.word_field = or_default(&self.word_field, DEFAULT_WORD_FIELD);
        self.destination_field = or_default(&self.destination_field, DEFAULT_DESTINATION_FIELD);
        self.mask_string = or_default(&self.mask_string, DEFAULT_MASK);
        self.bulk_action_label = or_default(&self.bulk_action_label, DEFAULT_BULK_ACTION_LABEL);
        self
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Writes the config to host storage, then best-effort to `backup_path`.
    ///
    /// Host storage is authoritative: its errors propagate. The backup only
    /// ever produces a diagnostic.
    pub fn save<C: ConfigStorage>(
        &self,
        storage: &mut C,
        backup_path: Option<&Path>,
    ) -> Result<()> {
        let map = self.to_map();
        storage.write_config(ADDON_ID, &map)?;

        if let Some(path) = backup_path {
            if let Err(e) = write_backup(path, &map) {
                debug!("couldn't write {}: {}", path.display(), e);
            } else {
                debug!("config backup written to {}", path.display());
            }
        }
        Ok(())
    }

    /// Lowercased, trimmed, non-empty filter tokens from `noteTypes`.
    pub fn note_type_filters(&self) -> Vec<String> {
        self.note_types
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// True when the note type passes the filter. An empty filter matches all.
    pub fn matches_note_type(&self, note_type: &str) -> bool {
        let filters = self.note_type_filters();
        if filters.is_empty() {
            return true;
        }
        let name = note_type.to_lowercase();
        filters.iter().any(|t| name.contains(t.as_str()))
    }

    /// Writing the mask over the sentence field replaces the source text.
    pub fn overwrites_sentence(&self) -> bool {
        self.destination_field == self.sentence_field
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "sentenceField" => self.sentence_field.clone(),
            "wordField" => self.word_field.clone(),
            "destinationField" => self.destination_field.clone(),
            "noteTypes" => self.note_types.clone(),
            "maskString" => self.mask_string.clone(),
            "lookupOnAdd" => self.lookup_on_add.to_string(),
            "bulkActionLabel" => self.bulk_action_label.clone(),
            "debug" => self.debug.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Sets one option from its text form, trimming and defaulting like the settings form.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let trimmed = value.trim();
        match key {
            "sentenceField" => self.sentence_field = or_default(trimmed, DEFAULT_SENTENCE_FIELD),
            "wordField" => self.word_field = or_default(trimmed, DEFAULT_WORD_FIELD),
            "destinationField" => {
                self.destination_field = or_default(trimmed, DEFAULT_DESTINATION_FIELD)
            }
            "noteTypes" => self.note_types = trimmed.to_string(),
            "maskString" => self.mask_string = or_default(trimmed, DEFAULT_MASK),
            "bulkActionLabel" => {
                self.bulk_action_label = or_default(trimmed, DEFAULT_BULK_ACTION_LABEL)
            }
            "lookupOnAdd" | "debug" => {
                let flag = parse_bool(trimmed)
                    .ok_or_else(|| format!("Invalid boolean for {}: {}", key, value))?;
                if key == "debug" {
                    self.debug = flag;
                } else {
                    self.lookup_on_add = flag;
                }
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn write_backup(path: &Path, map: &Map<String, Value>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut doc = Map::new();
    doc.insert("config".to_string(), Value::Object(map.clone()));
    let content = serde_json::to_string_pretty(&Value::Object(doc))?;
    fs::write(path, content)?;
    Ok(())
}
