//! Service boundary for note persistence
//!
//! The view layer never talks to storage or transport directly; it goes
//! through [`NoteService`], the contract of the external persistence
//! collaborator. Calls are one-shot: no retry, no cancellation, no
//! coordination between requests.

mod memory;

pub use memory::InMemoryNoteService;

use crate::error::Result;
use crate::models::{Note, NoteDraft, NoteId};

/// Trait for the external note persistence collaborator
#[allow(async_fn_in_trait)]
pub trait NoteService {
    /// Fetch the full note collection, in service order
    async fn list_notes(&self) -> Result<Vec<Note>>;

    /// Persist a draft; the returned note carries the assigned identifier
    async fn create_note(&self, draft: &NoteDraft) -> Result<Note>;

    /// Delete the note with the given identifier
    async fn delete_note(&self, id: NoteId) -> Result<()>;
}
