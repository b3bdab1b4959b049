//! In-memory note service
//!
//! Stands in for the remote persistence collaborator during tests and
//! single-session CLI runs. Nothing survives the process.

use tokio::sync::Mutex;

use super::NoteService;
use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId};

/// In-memory implementation of [`NoteService`]
///
/// Identifiers are assigned from a monotonic counter starting at 1,
/// mirroring an autoincrement key on the service side.
pub struct InMemoryNoteService {
    store: Mutex<Store>,
}

struct Store {
    notes: Vec<Note>,
    next_id: u64,
}

impl InMemoryNoteService {
    /// Create an empty service
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                notes: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a service pre-seeded with notes
    ///
    /// Seed notes without an identifier are assigned one; the counter
    /// continues past the highest seeded id.
    #[must_use]
    pub fn with_notes(seed: Vec<Note>) -> Self {
        let mut next_id = 1 + seed
            .iter()
            .filter_map(|note| note.id.map(NoteId::as_u64))
            .max()
            .unwrap_or(0);

        let notes = seed
            .into_iter()
            .map(|mut note| {
                if note.id.is_none() {
                    note.id = Some(NoteId::new(next_id));
                    next_id += 1;
                }
                note
            })
            .collect();

        Self {
            store: Mutex::new(Store { notes, next_id }),
        }
    }
}

impl Default for InMemoryNoteService {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteService for InMemoryNoteService {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let store = self.store.lock().await;
        Ok(store.notes.clone())
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
        let mut store = self.store.lock().await;
        let id = NoteId::new(store.next_id);
        store.next_id += 1;

        let note = draft.clone().into_note(id);
        store.notes.push(note.clone());
        Ok(note)
    }

    async fn delete_note(&self, id: NoteId) -> Result<()> {
        let mut store = self.store.lock().await;
        let position = store
            .notes
            .iter()
            .position(|note| note.id == Some(id))
            .ok_or(Error::NotFound(id))?;

        store.notes.remove(position);
        Ok(())
    }
}
