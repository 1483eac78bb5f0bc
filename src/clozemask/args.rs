use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clozemask")]
#[command(about = "Fill cloze sentences in a flashcard collection", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Collection directory (defaults to $CLOZEMASK_HOME, then the user data dir)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Debug logging regardless of the add-on's debug setting
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mask a word in a sentence without touching the collection
    Mask {
        sentence: String,
        word: String,

        /// Mask text (defaults to the configured mask)
        #[arg(short, long)]
        mask: Option<String>,
    },

    /// Define a note type and its ordered fields
    NoteType {
        name: String,

        #[arg(required = true, num_args = 1..)]
        fields: Vec<String>,
    },

    /// Add a note: `add Vocab Sentence=... Reading=...`
    #[command(alias = "n")]
    Add {
        note_type: String,

        /// Field assignments as Name=Value
        #[arg(num_args = 0..)]
        fields: Vec<String>,
    },

    /// List notes
    #[command(alias = "ls")]
    List,

    /// Generate cloze masks for the selected notes
    Fill {
        /// Note ids, processed in the given order
        #[arg(num_args = 0..)]
        ids: Vec<i64>,

        /// Select every note in the collection
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },

    /// Simulate the editor leaving a field of a note
    Leave { id: i64, field: String },

    /// Show or set add-on options
    Config {
        key: Option<String>,
        value: Option<String>,
    },

    /// Edit the options form; unspecified values stay as they are
    Settings {
        #[arg(long)]
        sentence_field: Option<String>,

        #[arg(long)]
        word_field: Option<String>,

        #[arg(long)]
        destination_field: Option<String>,

        /// Comma-separated note-type filter ("" matches every type)
        #[arg(long)]
        note_types: Option<String>,

        #[arg(long)]
        mask: Option<String>,

        #[arg(long)]
        lookup_on_add: Option<bool>,

        #[arg(long)]
        debug: Option<bool>,
    },
}
