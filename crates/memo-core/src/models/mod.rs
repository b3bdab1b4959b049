//! Data models for memo

mod note;

pub use note::{Note, NoteDraft, NoteId, PinTarget};
