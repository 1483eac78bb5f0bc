use crate::error::{ClozeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type NoteId = i64;

/// Position of `name` in an ordered field list.
pub fn field_index(fields: &[String], name: &str) -> Option<usize> {
    fields.iter().position(|f| f == name)
}

/// A note type: the ordered list of field names every note of this type carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteType {
    pub name: String,
    pub fields: Vec<String>,
}

impl NoteType {
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub note_type: String,
    pub fields: Vec<Field>,
    pub modified_at: DateTime<Utc>,
}

impl Note {
    /// Creates an empty note with every field of `note_type`.
    pub fn new(id: NoteId, note_type: &NoteType) -> Self {
        Self {
            id,
            note_type: note_type.name.clone(),
            fields: note_type
                .fields
                .iter()
                .map(|name| Field {
                    name: name.clone(),
                    value: String::new(),
                })
                .collect(),
            modified_at: Utc::now(),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Writes a field value. Notes never grow fields their type doesn't have.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| ClozeError::FieldNotFound(name.to_string()))?;
        field.value = value.into();
        Ok(())
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
