//! Session view-state over a note collection
//!
//! [`NoteListView`] is the single state holder behind a note-list client:
//! the loaded collection, the pinned subset, the search query with its
//! derived filtered view, and the transient create/edit drafts. All
//! persistence goes through the [`NoteService`] boundary; pinning is
//! session-only state and resets on every reload.
//!
//! Collection membership is keyed by [`NoteId`], so references held from
//! before a reload or an edit merge still resolve.

use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId, PinTarget};
use crate::service::NoteService;

/// Interactive yes/no seam consulted before a deletion proceeds
///
/// Clients implement this over their prompt mechanism; tests pass a
/// closure.
pub trait ConfirmDelete {
    /// Return `true` to proceed with deleting `note`
    fn confirm(&mut self, note: &Note) -> bool;
}

impl<F: FnMut(&Note) -> bool> ConfirmDelete for F {
    fn confirm(&mut self, note: &Note) -> bool {
        self(note)
    }
}

/// Result of a [`NoteListView::delete_note`] call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The service confirmed removal and the note left both collections
    Deleted,
    /// The confirmation prompt was denied; nothing changed
    Cancelled,
}

/// An in-progress creation draft and its destination collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDraft {
    /// The unsaved note being composed
    pub note: NoteDraft,
    /// Collection the persisted note will join
    pub target: PinTarget,
}

/// View-state for a note-list client session
pub struct NoteListView<S> {
    service: S,
    /// The normal (non-pinned) collection
    notes: Vec<Note>,
    /// The pinned collection; disjoint from `notes` by id
    pinned: Vec<Note>,
    query: String,
    filtered: Vec<Note>,
    edit_draft: Option<Note>,
    create_draft: Option<CreateDraft>,
    creating: bool,
}

impl<S: NoteService> NoteListView<S> {
    /// Create an empty view over the given service
    pub fn new(service: S) -> Self {
        Self {
            service,
            notes: Vec::new(),
            pinned: Vec::new(),
            query: String::new(),
            filtered: Vec::new(),
            edit_draft: None,
            create_draft: None,
            creating: false,
        }
    }

    /// The normal (non-pinned) collection
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The pinned collection
    #[must_use]
    pub fn pinned(&self) -> &[Note] {
        &self.pinned
    }

    /// The filtered view derived by the last [`search`](Self::search)
    #[must_use]
    pub fn filtered(&self) -> &[Note] {
        &self.filtered
    }

    /// The current search query
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a creation draft flow is active
    #[must_use]
    pub const fn is_creating(&self) -> bool {
        self.creating
    }

    /// The in-progress creation draft, if any
    #[must_use]
    pub fn create_draft(&self) -> Option<&CreateDraft> {
        self.create_draft.as_ref()
    }

    /// Mutable access to the creation draft for composing title/body
    pub fn create_draft_mut(&mut self) -> Option<&mut CreateDraft> {
        self.create_draft.as_mut()
    }

    /// The in-progress edit copy, if any
    #[must_use]
    pub fn edit_draft(&self) -> Option<&Note> {
        self.edit_draft.as_ref()
    }

    /// Mutable access to the edit copy for isolated mutation
    pub fn edit_draft_mut(&mut self) -> Option<&mut Note> {
        self.edit_draft.as_mut()
    }

    /// Find a note by id in either collection
    #[must_use]
    pub fn find(&self, id: NoteId) -> Option<&Note> {
        self.notes
            .iter()
            .chain(self.pinned.iter())
            .find(|note| note.id == Some(id))
    }

    /// Fetch the full collection from the service
    ///
    /// On success the normal collection is replaced and the pinned
    /// collection resets to empty (pins are session-only). On failure the
    /// error is logged and returned; prior state is unchanged. The
    /// filtered view is only recomputed by [`search`](Self::search).
    pub async fn load(&mut self) -> Result<()> {
        match self.service.list_notes().await {
            Ok(notes) => {
                self.notes = notes;
                self.pinned.clear();
                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, "failed to load notes");
                Err(error)
            }
        }
    }

    /// Recompute the filtered view from `query`
    ///
    /// An empty query yields the full normal collection; otherwise the
    /// view keeps the notes whose title or content contains the query as
    /// a case-insensitive substring. Pure and synchronous.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.filtered = if self.query.is_empty() {
            self.notes.clone()
        } else {
            self.notes
                .iter()
                .filter(|note| note.matches(&self.query))
                .cloned()
                .collect()
        };
    }

    /// Start a creation flow: fresh draft stamped now, destined for
    /// `target`
    pub fn begin_create(&mut self, target: PinTarget) {
        self.creating = true;
        self.create_draft = Some(CreateDraft {
            note: NoteDraft::new(),
            target,
        });
    }

    /// Leave the creation flow; the draft and all other state are kept
    pub fn cancel_create(&mut self) {
        self.creating = false;
    }

    /// Flip a note between the normal and pinned collections
    ///
    /// Membership is tested by id; an id present in neither collection is
    /// a stale reference and the call is a no-op. Self-inverse.
    pub fn toggle_pin(&mut self, id: NoteId) {
        if let Some(position) = self.pinned.iter().position(|note| note.id == Some(id)) {
            let note = self.pinned.remove(position);
            self.notes.push(note);
        } else if let Some(position) = self.notes.iter().position(|note| note.id == Some(id)) {
            let note = self.notes.remove(position);
            self.pinned.push(note);
        }
    }

    /// Copy `note` into the edit draft for isolated mutation
    pub fn begin_edit(&mut self, note: &Note) {
        self.edit_draft = Some(note.clone());
    }

    /// Submit the creation draft to the service
    ///
    /// On success the persisted note joins the collection chosen at
    /// [`begin_create`](Self::begin_create), the draft is cleared and the
    /// creating flag reset. Without a draft in progress this is a no-op.
    /// On failure the error is logged and returned; the draft is kept.
    pub async fn commit_create(&mut self) -> Result<Option<Note>> {
        let Some(draft) = self.create_draft.clone() else {
            return Ok(None);
        };

        match self.service.create_note(&draft.note).await {
            Ok(created) => {
                match draft.target {
                    PinTarget::Normal => self.notes.push(created.clone()),
                    PinTarget::Pinned => self.pinned.push(created.clone()),
                }
                self.create_draft = None;
                self.creating = false;
                Ok(Some(created))
            }
            Err(error) => {
                tracing::error!(%error, "failed to create note");
                Err(error)
            }
        }
    }

    /// Merge the edit draft back into the normal collection by id
    ///
    /// A draft whose id matches no normal-collection entry changes
    /// nothing; pinned entries are never touched, so committing an edit
    /// of a pinned note has no effect. The draft is cleared
    /// unconditionally, and calling without a prior
    /// [`begin_edit`](Self::begin_edit) is a no-op.
    pub fn commit_edit(&mut self) {
        let Some(draft) = self.edit_draft.take() else {
            return;
        };
        let Some(id) = draft.id else {
            return;
        };

        if let Some(entry) = self.notes.iter_mut().find(|note| note.id == Some(id)) {
            entry.merge_edit(&draft);
        }
    }

    /// Delete a note after interactive confirmation
    ///
    /// A denied prompt aborts with zero side effects. A note that was
    /// never persisted cannot be deleted ([`Error::MissingId`]). On
    /// service success the id is removed from both collections; on
    /// failure the error is logged and returned with both collections
    /// unchanged.
    pub async fn delete_note(
        &mut self,
        note: &Note,
        confirm: &mut impl ConfirmDelete,
    ) -> Result<DeleteOutcome> {
        if !confirm.confirm(note) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let Some(id) = note.id else {
            tracing::error!(title = %note.title, "cannot delete note without an identifier");
            return Err(Error::MissingId);
        };

        match self.service.delete_note(id).await {
            Ok(()) => {
                self.notes.retain(|entry| entry.id != Some(id));
                self.pinned.retain(|entry| entry.id != Some(id));
                Ok(DeleteOutcome::Deleted)
            }
            Err(error) => {
                tracing::error!(%error, note_id = %id, "failed to delete note");
                Err(error)
            }
        }
    }
}
