//! The in-memory note list of one open panel.
//!
//! `NoteSession` owns the live notes and the id counter. It is synchronous;
//! the panel task in [`crate::panel`] drives it from inbound messages and
//! decides when to persist.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::errors::Result;
use crate::note::{Note, NoteField};
use crate::store::{NoteStore, MAX_NOTE_ID};

/// How a save was triggered. Only the status text differs; both go through
/// `NoteStore::write`.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    /// user asked for it (save button or save command)
    Explicit,
    /// autosave after the debounce window
    Silent,
}

impl SaveKind {
    /// status shown while the write is in flight
    pub fn pending_text(&self) -> &'static str {
        match *self {
            SaveKind::Explicit => "Saving...",
            SaveKind::Silent => "Auto-saving...",
        }
    }

    /// status shown once the write succeeded
    pub fn done_text(&self) -> &'static str {
        match *self {
            SaveKind::Explicit => "Saved!",
            SaveKind::Silent => "Auto-saved",
        }
    }
}

#[derive(Debug)]
pub struct NoteSession {
    store: NoteStore,
    notes: Vec<Note>,
    next_id: u64,
}

impl NoteSession {
    /// an empty session bound to `store`
    pub fn new(store: NoteStore) -> NoteSession {
        NoteSession {
            store: store,
            notes: vec![],
            next_id: 0,
        }
    }

    /// Create a session and load whatever the store holds.
    pub fn open(store: NoteStore) -> Result<NoteSession> {
        let mut session = NoteSession::new(store);
        session.request_load()?;
        Ok(session)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: u64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Prepend a fresh note and return its id.
    ///
    /// Ids come from the counter until it passes `MAX_NOTE_ID`; after that
    /// the lowest id not in use is taken.
    pub fn add_note(&mut self) -> u64 {
        let id = if self.next_id <= MAX_NOTE_ID {
            let id = self.next_id;
            self.next_id += 1;
            id
        } else {
            self.lowest_free_id()
        };
        self.notes.insert(0, Note::new(id));
        debug!(id, "Note added");
        id
    }

    fn lowest_free_id(&self) -> u64 {
        let mut id = 0;
        while self.notes.iter().any(|n| n.id == id) {
            id += 1;
        }
        id
    }

    /// Remove the note with `id`. Returns false when there was none.
    pub fn delete_note(&mut self, id: u64) -> bool {
        let removed = self.notes
                          .iter()
                          .position(|n| n.id == id)
                          .map(|e| self.notes.remove(e))
                          .is_some();
        debug!(id, removed, "Note delete");
        removed
    }

    /// Set one field of the note with `id`. Returns false when there was none.
    pub fn edit_note(&mut self, id: u64, field: NoteField, value: &str) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.set(field, value);
                debug!(id, %field, "Note edited");
                true
            }
            None => {
                debug!(id, %field, "Edit for unknown note ignored");
                false
            }
        }
    }

    /// Persist the current notes.
    pub fn request_save(&self) -> Result<()> {
        self.store.write(&self.notes)
    }

    /// Drop every note and persist the empty list. Confirmation is the
    /// caller's job. The id counter is left alone.
    pub fn clear_all(&mut self) -> Result<()> {
        self.clear();
        self.request_save()
    }

    /// Drop every note without persisting.
    pub fn clear(&mut self) {
        let dropped = self.notes.len();
        self.notes.clear();
        info!(dropped, "All notes cleared");
    }

    /// Replace the notes with the stored list, if there is one.
    ///
    /// Returns whether anything was loaded. When the store has no file the
    /// session is left untouched; on error it is left untouched as well.
    pub fn request_load(&mut self) -> Result<bool> {
        let loaded = self.store.read()?;
        Ok(self.apply_loaded(loaded))
    }

    /// Install the result of a `NoteStore::read` done elsewhere. `None`
    /// leaves the session as it is. Returns whether notes were replaced.
    pub fn apply_loaded(&mut self, loaded: Option<Vec<Note>>) -> bool {
        match loaded {
            Some(notes) => {
                if let Some(max_id) = notes.iter().map(|n| n.id).max() {
                    self.next_id = self.next_id.max(max_id.saturating_add(1));
                }
                self.notes = notes;
                info!(notes = self.notes.len(), next_id = self.next_id, "Notes loaded");
                true
            }
            None => false,
        }
    }
}
