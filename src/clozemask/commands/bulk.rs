use crate::commands::populate::populate;
use crate::commands::{BulkSummary, CmdMessage, CmdResult};
use crate::config::ClozeConfig;
use crate::model::NoteId;
use crate::store::NoteStore;
use tracing::{debug, warn};

/// Batch command: mask every note in `ids`, in order.
///
/// A note that can't be read or saved is logged, counted as failed and
/// skipped; the rest of the batch still runs.
pub fn run<S: NoteStore>(store: &mut S, config: &ClozeConfig, ids: &[NoteId]) -> CmdResult {
    let mut result = CmdResult::default();
    if ids.is_empty() {
        result.add_message(CmdMessage::info("No notes selected"));
        return result;
    }

    let mut summary = BulkSummary::default();
    let mut changed_notes = Vec::new();

    for &id in ids {
        summary.processed += 1;

        let mut note = match store.get_note(id) {
            Ok(note) => note,
            Err(e) => {
                warn!(note = id, "skipping note: {}", e);
                summary.failed += 1;
                continue;
            }
        };

        if !populate(&mut note, config) {
            continue;
        }

        if let Err(e) = store.update_note(&note) {
            warn!(note = id, "could not save masked note: {}", e);
            summary.failed += 1;
            continue;
        }

        summary.changed += 1;
        changed_notes.push(note);
    }

    if summary.changed > 0 {
        result.add_message(CmdMessage::success(format!(
            "Updated {} notes",
            summary.changed
        )));
    } else {
        result.add_message(CmdMessage::info("No notes needed"));
    }
    if summary.failed > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} notes could not be processed",
            summary.failed
        )));
    }
    debug!(
        "Bulk finished - {} of {} changed, {} failed",
        summary.changed, summary.processed, summary.failed
    );

    result.with_affected_notes(changed_notes).with_summary(summary)
}
