//! Messages exchanged between the panel's UI surface and its session.
//!
//! Both enums are tagged with a `command` field so they travel as the same
//! JSON objects a webview would post, e.g. `{"command": "load"}`.

use serde::{Serialize, Deserialize};

use crate::note::{Note, NoteField};
use crate::session::SaveKind;

/// UI surface -> session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum UiMessage {
    AddNote,
    DeleteNote { id: u64 },
    EditNote { id: u64, field: NoteField, value: String },
    Save,
    Load,
    /// clear all notes; only acted on once the user confirmed
    Clear { confirmed: bool },
    /// plain notification, passed to the host as-is
    Alert { text: String },
}

impl UiMessage {
    /// whether handling this message changes the note list and so arms
    /// the autosave
    pub fn is_mutation(&self) -> bool {
        matches!(self,
                 UiMessage::AddNote | UiMessage::DeleteNote { .. } | UiMessage::EditNote { .. })
    }
}

/// Session -> UI surface.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    /// a save is being written
    SaveRequest { kind: SaveKind },
    Saved { kind: SaveKind },
    SaveFailed { kind: SaveKind, reason: String },
    /// all notes were cleared
    ClearRequest,
    /// replace everything the UI shows with `notes`
    LoadData { notes: Vec<Note> },
    /// the session assigned `note.id` to a note the UI asked for
    NoteAdded { note: Note },
}

impl PanelMessage {
    /// transient status line text for this message, if it has one
    pub fn status_text(&self) -> Option<String> {
        match *self {
            PanelMessage::SaveRequest { kind } => Some(kind.pending_text().to_string()),
            PanelMessage::Saved { kind } => Some(kind.done_text().to_string()),
            PanelMessage::SaveFailed { ref reason, .. } => Some(format!("Save failed: {}", reason)),
            PanelMessage::ClearRequest => Some("All notes cleared".to_string()),
            PanelMessage::LoadData { .. } => Some("Notes loaded".to_string()),
            PanelMessage::NoteAdded { .. } => Some("Note added".to_string()),
        }
    }
}
