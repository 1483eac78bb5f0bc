use crate::commands::populate::populate;
use crate::config::ClozeConfig;
use crate::model::{field_index, Note};
use crate::store::NoteStore;
use tracing::{debug, warn};

/// What the editor hook did with a defocus event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    /// `lookupOnAdd` is off
    Disabled,
    /// The field that lost focus is neither the sentence nor the word field
    NotMonitored,
    Unchanged,
    Saved,
    /// The note was masked in memory but the host refused to persist it
    SaveFailed(String),
}

/// Position of `name` in the note's current schema.
///
/// Falls back to the note's own field order when the host doesn't know the
/// note type. `None` means the schema has no such field.
pub fn resolve_field<S: NoteStore>(store: &S, note: &Note, name: &str) -> Option<usize> {
    let names = store
        .field_names(&note.note_type)
        .unwrap_or_else(|| note.field_names());
    field_index(&names, name)
}

/// Positions of the sentence and word fields; `None` means not monitored.
pub fn monitored_indices<S: NoteStore>(
    store: &S,
    config: &ClozeConfig,
    note: &Note,
) -> (Option<usize>, Option<usize>) {
    (
        resolve_field(store, note, &config.sentence_field),
        resolve_field(store, note, &config.word_field),
    )
}

/// Fills the destination field when the sentence or word field lost focus and
/// flushes the note if it changed.
pub fn handle<S: NoteStore>(
    store: &mut S,
    config: &ClozeConfig,
    note: &mut Note,
    field_idx: usize,
) -> FocusOutcome {
    if !config.lookup_on_add {
        return FocusOutcome::Disabled;
    }

    let (sentence_idx, word_idx) = monitored_indices(store, config, note);
    if sentence_idx != Some(field_idx) && word_idx != Some(field_idx) {
        return FocusOutcome::NotMonitored;
    }

    debug!("Field defocus - trying note id {}", note.id);
    if !populate(note, config) {
        return FocusOutcome::Unchanged;
    }

    match store.flush_note(note) {
        Ok(()) => FocusOutcome::Saved,
        Err(e) => {
            warn!(note = note.id, "could not save note after masking: {}", e);
            FocusOutcome::SaveFailed(e.to_string())
        }
    }
}

/// Editor hook: the user left field `field_idx` of `note`.
///
/// Always hands `flag` back untouched so the host's editor flow is unaffected.
pub fn on_focus_lost<S: NoteStore>(
    store: &mut S,
    config: &ClozeConfig,
    flag: bool,
    note: &mut Note,
    field_idx: usize,
) -> bool {
    handle(store, config, note, field_idx);
    flag
}
