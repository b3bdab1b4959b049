//! memo-core - Core library for memo
//!
//! This crate contains the note models, the `NoteService` persistence
//! boundary, and the `NoteListView` session state driven by the memo
//! clients.

pub mod error;
pub mod models;
pub mod service;
pub mod view;

pub use error::{Error, Result};
pub use models::{Note, NoteDraft, NoteId, PinTarget};
pub use service::{InMemoryNoteService, NoteService};
pub use view::NoteListView;
