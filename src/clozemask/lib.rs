//! # Clozemask Architecture
//!
//! Clozemask is a flashcard add-on library. It writes a "masked" copy of a
//! note's sentence, with the note's target word replaced by a placeholder
//! (`◼◼◼` by default), into another field of the same note.
//!
//! The flashcard application is the host. It owns the notes, the editor, the
//! menus and the add-on's saved settings. This crate reaches all of those
//! through traits, so the same core runs inside a real host, in the bundled
//! reference host binary, or in tests.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (main.rs: file-backed reference host / a real app)    │
//! │  - Raises events: field lost focus, batch command, settings │
//! │  - Shows CmdMessages to the user                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - ClozeApi: the context object holding the cached config   │
//! │  - Reloads config before bulk runs and the settings form    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - populate: filters + mask + write-back for one note       │
//! │  - focus / bulk: the two trigger adapters                   │
//! │  - settings / config: editing the stored options            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - NoteStore + ConfigStorage traits                         │
//! │  - FileStore (reference host), InMemoryStore (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure model
//!
//! A note that doesn't qualify (filtered type, missing field, empty value,
//! word not found) is skipped silently; the reason is logged at debug
//! level. Errors while reading or saving one note are logged and contained,
//! so a bad note never stops a batch.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, the entry point for all host events
//! - [`commands`]: Populator and trigger adapters
//! - [`mask`]: The masking function
//! - [`config`]: Options, defaults, load/save
//! - [`store`]: Host storage abstraction and implementations
//! - [`model`]: `Note`, `NoteType`
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types

pub mod logging;

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod mask;
pub mod model;
pub mod store;
