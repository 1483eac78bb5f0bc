use crate::config::ClozeConfig;
use crate::model::Note;

pub mod bulk;
pub mod config;
pub mod focus;
pub mod populate;
pub mod settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing notification. The host decides how to show it.
#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Counts from one bulk run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BulkSummary {
    pub processed: usize,
    pub changed: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_notes: Vec<Note>,
    pub summary: Option<BulkSummary>,
    pub config: Option<ClozeConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_notes(mut self, notes: Vec<Note>) -> Self {
        self.affected_notes = notes;
        self
    }

    pub fn with_summary(mut self, summary: BulkSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_config(mut self, config: ClozeConfig) -> Self {
        self.config = Some(config);
        self
    }
}
