use crate::commands::{CmdMessage, CmdResult};
use crate::config::{or_default, ClozeConfig};
use crate::error::Result;
use crate::mask::DEFAULT_MASK;
use crate::store::ConfigStorage;
use std::path::Path;

/// The values the options form lets the user edit.
///
/// `bulkActionLabel` is not on the form; saving keeps whatever is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub sentence_field: String,
    pub word_field: String,
    pub destination_field: String,
    pub note_types: String,
    pub mask_string: String,
    pub lookup_on_add: bool,
    pub debug: bool,
}

impl SettingsForm {
    pub fn from_config(config: &ClozeConfig) -> Self {
        Self {
            sentence_field: config.sentence_field.clone(),
            word_field: config.word_field.clone(),
            destination_field: config.destination_field.clone(),
            note_types: config.note_types.clone(),
            mask_string: config.mask_string.clone(),
            lookup_on_add: config.lookup_on_add,
            debug: config.debug,
        }
    }

    /// Trims every text input; blank inputs fall back to defaults, except the
    /// note-type filter, which may be empty.
    pub fn apply(&self, current: &ClozeConfig) -> ClozeConfig {
        let defaults = ClozeConfig::default();
        ClozeConfig {
            sentence_field: or_default(self.sentence_field.trim(), &defaults.sentence_field),
            word_field: or_default(self.word_field.trim(), &defaults.word_field),
            destination_field: or_default(
                self.destination_field.trim(),
                &defaults.destination_field,
            ),
            note_types: self.note_types.trim().to_string(),
            mask_string: or_default(self.mask_string.trim(), DEFAULT_MASK),
            lookup_on_add: self.lookup_on_add,
            bulk_action_label: current.bulk_action_label.clone(),
            debug: self.debug,
        }
    }
}

/// Confirms the form: persists the new config and returns it.
pub fn save<C: ConfigStorage>(
    storage: &mut C,
    backup_path: Option<&Path>,
    current: &ClozeConfig,
    form: &SettingsForm,
) -> Result<CmdResult> {
    let config = form.apply(current);
    config.save(storage, backup_path)?;
    let saved = ClozeConfig::load(&*storage);

    let mut result = CmdResult::default();
    if saved.overwrites_sentence() {
        result.add_message(CmdMessage::warning(format!(
            "Destination field is the sentence field ({}): masking will overwrite the sentence.",
            saved.sentence_field
        )));
    }
    result.add_message(CmdMessage::success("Cloze Mask settings saved."));
    Ok(result.with_config(saved))
}
