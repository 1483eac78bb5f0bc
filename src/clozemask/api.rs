//! # API Facade
//!
//! [`ClozeApi`] is the add-on's context object. It owns the host collaborators
//! (note store, configuration storage) and the cached [`ClozeConfig`], and
//! dispatches host events to the command layer.
//!
//! ## Configuration cache
//!
//! The config is loaded once when the API is built and replaced wholesale by
//! [`ClozeApi::reload_config`]. The facade reloads before a bulk run and before
//! the settings form opens, since the user may just have changed settings
//! elsewhere. The editor hook works from the cached copy.
//!
//! ## Generic Over Storage
//!
//! `ClozeApi<S: NoteStore, C: ConfigStorage>`:
//! - Reference host: `ClozeApi<FileStore, FileConfigStorage>`
//! - Testing: `ClozeApi<InMemoryStore, MemoryConfigStorage>`

use crate::commands;
use crate::config::ClozeConfig;
use crate::error::{ClozeError, Result};
use crate::mask;
use crate::model::{Note, NoteId};
use crate::store::{ConfigStorage, NoteStore};
use std::path::PathBuf;

pub struct ClozeApi<S: NoteStore, C: ConfigStorage> {
    store: S,
    storage: C,
    backup_path: Option<PathBuf>,
    config: ClozeConfig,
}

impl<S: NoteStore, C: ConfigStorage> ClozeApi<S, C> {
    pub fn new(store: S, storage: C) -> Self {
        let config = ClozeConfig::load(&storage);
        Self {
            store,
            storage,
            backup_path: None,
            config,
        }
    }

    /// Also mirror saved settings to this file.
    pub fn with_backup_path(mut self, path: PathBuf) -> Self {
        self.backup_path = Some(path);
        self
    }

    pub fn config(&self) -> &ClozeConfig {
        &self.config
    }

    /// Re-read the config from host storage, replacing the cached copy.
    pub fn reload_config(&mut self) -> &ClozeConfig {
        self.config = ClozeConfig::load(&self.storage);
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Label for the batch command in the host's browser menu.
    pub fn bulk_action_label(&self) -> &str {
        &self.config.bulk_action_label
    }

    pub fn generate(&self, sentence: &str, word: &str) -> Option<String> {
        mask::generate(sentence, word, &self.config.mask_string)
    }

    /// Editor hook for "field lost focus". Returns `flag` unchanged.
    pub fn on_focus_lost(&mut self, flag: bool, note: &mut Note, field_idx: usize) -> bool {
        commands::focus::on_focus_lost(&mut self.store, &self.config, flag, note, field_idx)
    }

    /// Convenience for hosts that address the field by name.
    ///
    /// The note is listed in `affected_notes` only once it has been saved.
    pub fn leave_field(&mut self, id: NoteId, field: &str) -> Result<commands::CmdResult> {
        let mut note = self.store.get_note(id)?;
        let field_idx = commands::focus::resolve_field(&self.store, &note, field)
            .ok_or_else(|| ClozeError::FieldNotFound(field.to_string()))?;

        let mut result = commands::CmdResult::default();
        match commands::focus::handle(&mut self.store, &self.config, &mut note, field_idx) {
            FocusOutcome::Saved => result.affected_notes.push(note),
            FocusOutcome::SaveFailed(e) => result.add_message(CmdMessage::warning(format!(
                "Note {} was masked but not saved: {}",
                id, e
            ))),
            FocusOutcome::Disabled | FocusOutcome::NotMonitored | FocusOutcome::Unchanged => {
                result.add_message(CmdMessage::info("No change"))
            }
        }
        Ok(result)
    }

    /// Batch command over the selected notes.
    pub fn bulk_generate(&mut self, ids: &[NoteId]) -> commands::CmdResult {
        self.reload_config();
        commands::bulk::run(&mut self.store, &self.config, ids)
    }

    /// Fresh values for the options form.
    pub fn open_settings(&mut self) -> SettingsForm {
        self.reload_config();
        SettingsForm::from_config(&self.config)
    }

    pub fn save_settings(&mut self, form: &SettingsForm) -> Result<commands::CmdResult> {
        let result = commands::settings::save(
            &mut self.storage,
            self.backup_path.as_deref(),
            &self.config,
            form,
        )?;
        self.reload_config();
        Ok(result)
    }

    pub fn config_action(&mut self, action: ConfigAction) -> Result<commands::CmdResult> {
        let result =
            commands::config::run(&mut self.storage, self.backup_path.as_deref(), action)?;
        self.reload_config();
        Ok(result)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::focus::FocusOutcome;
pub use crate::commands::populate::{Populated, SkipReason};
pub use crate::commands::settings::SettingsForm;
pub use commands::{BulkSummary, CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ADDON_ID;
    use crate::store::memory::fixtures::*;
    use crate::store::memory::{InMemoryStore, MemoryConfigStorage};
    use serde_json::json;

    fn api_with(note_types: &str) -> (ClozeApi<InMemoryStore, MemoryConfigStorage>, NoteId) {
        let (fixture, id) = StoreFixture::new().with_vocab_note("Vocab", SENTENCE, WORD);
        let mut storage = MemoryConfigStorage::new();
        let config = ClozeConfig {
            note_types: note_types.to_string(),
            ..Default::default()
        };
        config.save(&mut storage, None).unwrap();
        (ClozeApi::new(fixture.store, storage), id)
    }

    #[test]
    fn loads_config_on_construction() {
        let (api, _) = api_with("vocab");
        assert_eq!(api.config().note_types, "vocab");
        assert_eq!(api.bulk_action_label(), "Generate Cloze Masks");
    }

    #[test]
    fn bulk_reloads_before_running() {
        let (mut api, id) = api_with("kanji");
        // Settings changed behind the cached copy.
        let mut changed = ClozeConfig::load(&api.storage);
        changed.note_types = String::new();
        changed.save(&mut api.storage, None).unwrap();

        let result = api.bulk_generate(&[id]);
        assert_eq!(result.summary.unwrap().changed, 1);
        assert_eq!(api.config().note_types, "");
    }

    #[test]
    fn focus_hook_uses_the_cached_config() {
        let (mut api, id) = api_with("kanji");
        let mut changed = ClozeConfig::load(&api.storage);
        changed.note_types = String::new();
        changed.save(&mut api.storage, None).unwrap();

        let result = api.leave_field(id, "Reading").unwrap();
        assert!(result.affected_notes.is_empty());
        assert_eq!(result.messages[0].content, "No change");
        let stored = api.store().get_note(id).unwrap();
        assert_eq!(stored.get("ClozeSentence"), Some(""));

        api.reload_config();
        let result = api.leave_field(id, "Reading").unwrap();
        assert_eq!(
            result.affected_notes[0].get("ClozeSentence"),
            Some("彼は◼◼◼に行きます")
        );
        let stored = api.store().get_note(id).unwrap();
        assert_eq!(stored.get("ClozeSentence"), Some("彼は◼◼◼に行きます"));
    }

    #[test]
    fn leave_field_warns_when_the_save_fails() {
        let (mut api, id) = api_with("");
        api.store_mut().set_simulate_write_error(true);

        let result = api.leave_field(id, "Reading").unwrap();
        assert!(result.affected_notes.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(result.messages[0].content.contains("not saved"));
        api.store_mut().set_simulate_write_error(false);
        let stored = api.store().get_note(id).unwrap();
        assert_eq!(stored.get("ClozeSentence"), Some(""));
    }

    #[test]
    fn leave_unknown_field_is_an_error() {
        let (mut api, id) = api_with("");
        assert!(api.leave_field(id, "Meaning").is_err());
    }

    #[test]
    fn settings_round_trip_through_storage() {
        let storage = MemoryConfigStorage::new().with_config(
            ADDON_ID,
            json!({ "maskString": "[…]" }).as_object().unwrap().clone(),
        );
        let mut api = ClozeApi::new(InMemoryStore::new(), storage);

        let mut form = api.open_settings();
        assert_eq!(form.mask_string, "[…]");
        form.word_field = "Word".to_string();
        api.save_settings(&form).unwrap();

        assert_eq!(api.config().word_field, "Word");
        assert_eq!(api.generate("a word", "word").as_deref(), Some("a […]"));
    }

    #[test]
    fn config_action_refreshes_cache() {
        let (mut api, _) = api_with("");
        api.config_action(ConfigAction::Set("debug".into(), "true".into()))
            .unwrap();
        assert!(api.config().debug);
    }
}
