//! Fills the destination field of one note with its masked sentence.
//!
//! Checks run in a fixed order and the first one that fails leaves the note
//! untouched:
//!
//! 1. note type passes the `noteTypes` filter
//! 2. sentence, word and destination fields all exist
//! 3. trimmed sentence and word are non-empty
//! 4. the word occurs in the sentence

use crate::config::ClozeConfig;
use crate::error::Result;
use crate::mask;
use crate::model::{Note, NoteId};
use std::fmt;
use tracing::{debug, warn};

/// Why a note was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoteTypeFiltered,
    MissingField,
    EmptyValue,
    WordNotFound,
    Failed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoteTypeFiltered => "note type filtered",
            SkipReason::MissingField => "missing sentence/word/destination field",
            SkipReason::EmptyValue => "empty sentence or word",
            SkipReason::WordNotFound => "word not found in sentence",
            SkipReason::Failed => "note could not be updated",
        };
        f.write_str(text)
    }
}

/// Outcome of populating a single note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Populated {
    Changed(String),
    Skipped(SkipReason),
}

impl Populated {
    pub fn changed(&self) -> bool {
        matches!(self, Populated::Changed(_))
    }
}

/// Returns true when the note's destination field was written.
///
/// Never fails: any error touching the note's fields counts as "not changed".
pub fn populate(note: &mut Note, config: &ClozeConfig) -> bool {
    populate_with_reason(note, config).changed()
}

/// Like [`populate`], but reports why a note was skipped.
pub fn populate_with_reason(note: &mut Note, config: &ClozeConfig) -> Populated {
    let outcome = contained(note.id, try_populate(note, config));
    if let Populated::Skipped(reason) = &outcome {
        debug!(note = note.id, "Skip - {}", reason);
    }
    outcome
}

/// Turns an error touching the note into a [`SkipReason::Failed`] skip.
fn contained(id: NoteId, outcome: Result<Populated>) -> Populated {
    outcome.unwrap_or_else(|e| {
        warn!(note = id, "skipping note: {}", e);
        Populated::Skipped(SkipReason::Failed)
    })
}

pub fn try_populate(note: &mut Note, config: &ClozeConfig) -> Result<Populated> {
    if !config.matches_note_type(&note.note_type) {
        debug!(note = note.id, "note type {} not in filter", note.note_type);
        return Ok(Populated::Skipped(SkipReason::NoteTypeFiltered));
    }

    let (sentence, word) = match (
        note.get(&config.sentence_field),
        note.get(&config.word_field),
        note.has_field(&config.destination_field),
    ) {
        (Some(sentence), Some(word), true) => (sentence.trim(), word.trim()),
        _ => return Ok(Populated::Skipped(SkipReason::MissingField)),
    };

    if config.overwrites_sentence() {
        debug!("Warning - destination field is same as sentence field");
    }

    if sentence.is_empty() || word.is_empty() {
        return Ok(Populated::Skipped(SkipReason::EmptyValue));
    }

    let Some(masked) = mask::generate(sentence, word, &config.mask_string) else {
        debug!(note = note.id, "{:?} not in {:?}", word, sentence);
        return Ok(Populated::Skipped(SkipReason::WordNotFound));
    };

    note.set(&config.destination_field, masked.as_str())?;
    debug!(note = note.id, "Populated cloze: {}", masked);
    Ok(Populated::Changed(masked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClozeError;
    use crate::model::NoteType;

    fn vocab_note(note_type: &str, sentence: &str, word: &str) -> Note {
        let nt = NoteType::new(note_type, &["Sentence", "Reading", "ClozeSentence"]);
        Note::new(1, &nt)
            .with_field("Sentence", sentence)
            .unwrap()
            .with_field("Reading", word)
            .unwrap()
    }

    #[test]
    fn fills_destination_with_default_mask() {
        let mut note = vocab_note("Vocab", "彼は学校に行きます", "学校");
        assert!(populate(&mut note, &ClozeConfig::default()));
        assert_eq!(note.get("ClozeSentence"), Some("彼は◼◼◼に行きます"));
    }

    #[test]
    fn absent_word_leaves_note_unchanged() {
        let mut note = vocab_note("Vocab", "彼は学校に行きます", "存在しない");
        let before = note.clone();
        assert_eq!(
            populate_with_reason(&mut note, &ClozeConfig::default()),
            Populated::Skipped(SkipReason::WordNotFound)
        );
        assert_eq!(note, before);
    }

    #[test]
    fn note_type_filter_excludes_regardless_of_content() {
        let config = ClozeConfig {
            note_types: "verb,adj".to_string(),
            ..Default::default()
        };
        let mut note = vocab_note("Vocab Noun", "彼は学校に行きます", "学校");
        assert_eq!(
            populate_with_reason(&mut note, &config),
            Populated::Skipped(SkipReason::NoteTypeFiltered)
        );
        assert_eq!(note.get("ClozeSentence"), Some(""));
    }

    #[test]
    fn note_type_filter_is_case_insensitive_substring() {
        let config = ClozeConfig {
            note_types: "VERB".to_string(),
            ..Default::default()
        };
        let mut note = vocab_note("Japanese verbs", "食べる", "食");
        assert!(populate(&mut note, &config));
    }

    #[test]
    fn missing_destination_field_is_skipped() {
        let nt = NoteType::new("Vocab", &["Sentence", "Reading"]);
        let mut note = Note::new(1, &nt)
            .with_field("Sentence", "a b c")
            .unwrap()
            .with_field("Reading", "b")
            .unwrap();
        assert_eq!(
            populate_with_reason(&mut note, &ClozeConfig::default()),
            Populated::Skipped(SkipReason::MissingField)
        );
    }

    #[test]
    fn values_are_trimmed_before_masking() {
        let mut note = vocab_note("Vocab", "  I like tea.  ", " tea ");
        assert!(populate(&mut note, &ClozeConfig::default()));
        assert_eq!(note.get("ClozeSentence"), Some("I like ◼◼◼."));
    }

    #[test]
    fn blank_word_is_skipped() {
        let mut note = vocab_note("Vocab", "I like tea.", "   ");
        assert_eq!(
            populate_with_reason(&mut note, &ClozeConfig::default()),
            Populated::Skipped(SkipReason::EmptyValue)
        );
    }

    #[test]
    fn custom_fields_and_mask() {
        let config = ClozeConfig {
            sentence_field: "Example".to_string(),
            word_field: "Word".to_string(),
            destination_field: "Masked".to_string(),
            mask_string: "[...]".to_string(),
            ..Default::default()
        };
        let nt = NoteType::new("Card", &["Word", "Example", "Masked"]);
        let mut note = Note::new(7, &nt)
            .with_field("Example", "Das ist gut.")
            .unwrap()
            .with_field("Word", "gut")
            .unwrap();
        assert!(populate(&mut note, &config));
        assert_eq!(note.get("Masked"), Some("Das ist [...]."));
    }

    #[test]
    fn destination_may_be_the_sentence_field() {
        let config = ClozeConfig {
            destination_field: "Sentence".to_string(),
            ..Default::default()
        };
        let mut note = vocab_note("Vocab", "one two", "two");
        assert!(populate(&mut note, &config));
        assert_eq!(note.get("Sentence"), Some("one ◼◼◼"));
    }

    #[test]
    fn rerunning_with_unchanged_sources_is_stable() {
        let config = ClozeConfig::default();
        let mut note = vocab_note("Vocab", "彼は学校に行きます", "学校");
        assert!(populate(&mut note, &config));
        let first = note.clone();
        assert!(populate(&mut note, &config));
        assert_eq!(note, first);
    }

    #[test]
    fn errors_become_failed_skips() {
        let err = ClozeError::FieldNotFound("ClozeSentence".to_string());
        assert_eq!(
            contained(1, Err(err)),
            Populated::Skipped(SkipReason::Failed)
        );
        assert_eq!(
            contained(1, Ok(Populated::Changed("x".to_string()))),
            Populated::Changed("x".to_string())
        );
    }

    #[test]
    fn skip_reasons_read_as_log_text() {
        assert_eq!(SkipReason::WordNotFound.to_string(), "word not found in sentence");
        assert_eq!(SkipReason::Failed.to_string(), "note could not be updated");
        assert_eq!(
            SkipReason::MissingField.to_string(),
            "missing sentence/word/destination field"
        );
    }
}
