//! An open notes panel.
//!
//! Opening a panel spawns one task that owns the panel's [`NoteSession`].
//! UI messages and host commands reach it over a single ordered channel,
//! and everything the UI needs to render comes back as [`PanelMessage`]s.
//! The task handles one message at a time; the autosave deadline is the
//! only thing it waits on besides its inbox. File reads and writes run on
//! the blocking pool.

use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, Deserialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::autosave::{expiry, Autosave, DEFAULT_WINDOW};
use crate::errors::{Error, Result};
use crate::host::Host;
use crate::message::{PanelMessage, UiMessage};
use crate::note::Note;
use crate::session::{NoteSession, SaveKind};
use crate::store::NoteStore;

pub static SAVED_MESSAGE: &'static str = "Notes saved successfully!";
pub static CLEAR_HINT: &'static str = "Use the Clear All button in the toolbar to clear all notes";

/// Where the panel is shown relative to the editor.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// its own editor column
    #[default]
    Standalone,
    /// next to the active editor
    Beside,
}

#[derive(Debug, Clone)]
pub struct PanelSettings {
    pub autosave_window: Duration,
}

impl Default for PanelSettings {
    fn default() -> Self {
        PanelSettings { autosave_window: DEFAULT_WINDOW }
    }
}

#[derive(Debug)]
enum PanelCommand {
    Ui(UiMessage),
    Save,
    Clear,
    Close,
}

/// Handle to a running panel task.
pub struct PanelHandle {
    commands: UnboundedSender<PanelCommand>,
    placement: Placement,
    task: JoinHandle<NoteSession>,
}

impl PanelHandle {
    /// Spawn a panel on the current tokio runtime.
    ///
    /// The task loads the store before it reads its inbox, and the first
    /// message on the returned receiver is always a `LoadData` with the
    /// initial notes.
    pub fn open(store: NoteStore,
                settings: &PanelSettings,
                placement: Placement,
                host: Arc<dyn Host>)
                -> (PanelHandle, UnboundedReceiver<PanelMessage>) {
        let (commands, inbox) = unbounded_channel();
        let (outbox, surface) = unbounded_channel();

        info!(root = ?store.root(),
              placement = ?placement,
              autosave_ms = settings.autosave_window.as_millis() as u64,
              "Opening panel");

        let task = PanelTask {
            session: NoteSession::new(store),
            host: host,
            outbox: outbox,
            autosave: Autosave::new(settings.autosave_window),
        };
        let handle = PanelHandle {
            commands: commands,
            placement: placement,
            task: tokio::spawn(task.run(inbox)),
        };
        (handle, surface)
    }

    /// Deliver a message from the UI surface. Returns false once the panel
    /// has shut down.
    pub fn post(&self, message: UiMessage) -> bool {
        self.send(PanelCommand::Ui(message))
    }

    /// host `save` command
    pub fn save(&self) -> bool {
        self.send(PanelCommand::Save)
    }

    /// host `clear` command; the caller has already obtained confirmation
    pub fn clear(&self) -> bool {
        self.send(PanelCommand::Clear)
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn reveal(&mut self, placement: Placement) {
        debug!(from = ?self.placement, to = ?placement, "Revealing panel");
        self.placement = placement;
    }

    pub fn is_open(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Close the panel, flushing a pending autosave, and hand back the
    /// final session.
    pub async fn close(self) -> Result<NoteSession> {
        let _ = self.commands.send(PanelCommand::Close);
        Ok(self.task.await?)
    }

    fn send(&self, command: PanelCommand) -> bool {
        self.commands.send(command).is_ok()
    }
}

struct PanelTask {
    session: NoteSession,
    host: Arc<dyn Host>,
    outbox: UnboundedSender<PanelMessage>,
    autosave: Autosave,
}

impl PanelTask {
    async fn run(mut self, mut inbox: UnboundedReceiver<PanelCommand>) -> NoteSession {
        self.initial_load().await;

        loop {
            let deadline = self.autosave.deadline();
            tokio::select! {
                // queued messages go first so a due autosave sees them
                biased;
                command = inbox.recv() => match command {
                    Some(PanelCommand::Ui(message)) => self.dispatch(message).await,
                    Some(PanelCommand::Save) => self.save(SaveKind::Explicit).await,
                    Some(PanelCommand::Clear) => self.clear().await,
                    Some(PanelCommand::Close) | None => break,
                },
                () = expiry(deadline) => self.save(SaveKind::Silent).await,
            }
        }

        if self.autosave.is_armed() {
            self.save(SaveKind::Silent).await;
        }
        info!(notes = self.session.notes().len(), "Panel closed");
        self.session
    }

    async fn initial_load(&mut self) {
        if self.session.store().root().is_none() {
            debug!("No workspace root, skipping initial load");
        } else {
            match self.read_notes().await {
                Ok(loaded) => {
                    self.session.apply_loaded(loaded);
                }
                Err(e) => self.report_load_failure(&e),
            }
        }
        let notes = self.session.notes().to_vec();
        self.push(PanelMessage::LoadData { notes: notes });
    }

    async fn dispatch(&mut self, message: UiMessage) {
        let mutation = message.is_mutation();
        match message {
            UiMessage::AddNote => {
                let id = self.session.add_note();
                if let Some(note) = self.session.note(id).cloned() {
                    self.push(PanelMessage::NoteAdded { note: note });
                }
            }
            UiMessage::DeleteNote { id } => {
                self.session.delete_note(id);
            }
            UiMessage::EditNote { id, field, value } => {
                self.session.edit_note(id, field, &value);
            }
            UiMessage::Save => self.save(SaveKind::Explicit).await,
            UiMessage::Load => self.load().await,
            UiMessage::Clear { confirmed: true } => self.clear().await,
            UiMessage::Clear { confirmed: false } => self.host.show_info(CLEAR_HINT),
            UiMessage::Alert { text } => self.host.show_info(&text),
        }
        if mutation {
            self.autosave.arm();
        }
    }

    async fn save(&mut self, kind: SaveKind) {
        self.autosave.cancel();
        self.push(PanelMessage::SaveRequest { kind: kind });
        match self.write_notes().await {
            Ok(()) => {
                info!(?kind, notes = self.session.notes().len(), "Notes saved");
                if kind == SaveKind::Explicit {
                    self.host.show_info(SAVED_MESSAGE);
                }
                self.push(PanelMessage::Saved { kind: kind });
            }
            Err(e) => self.report_save_failure(kind, &e),
        }
    }

    async fn clear(&mut self) {
        self.autosave.cancel();
        self.session.clear();
        self.push(PanelMessage::ClearRequest);
        match self.write_notes().await {
            Ok(()) => self.push(PanelMessage::Saved { kind: SaveKind::Silent }),
            Err(e) => self.report_save_failure(SaveKind::Silent, &e),
        }
    }

    async fn load(&mut self) {
        match self.read_notes().await {
            Ok(loaded) => {
                if self.session.apply_loaded(loaded) {
                    self.autosave.cancel();
                    let notes = self.session.notes().to_vec();
                    self.push(PanelMessage::LoadData { notes: notes });
                } else {
                    debug!("Nothing to load");
                }
            }
            Err(e) => self.report_load_failure(&e),
        }
    }

    /// write a snapshot of the session's notes
    async fn write_notes(&self) -> Result<()> {
        let store = self.session.store().clone();
        let notes = self.session.notes().to_vec();
        task::spawn_blocking(move || store.write(&notes)).await?
    }

    async fn read_notes(&self) -> Result<Option<Vec<Note>>> {
        let store = self.session.store().clone();
        task::spawn_blocking(move || store.read()).await?
    }

    fn report_save_failure(&self, kind: SaveKind, e: &Error) {
        warn!(?kind, error = %e, "Failed to save notes");
        let text = if e.is_no_workspace() {
            e.to_string()
        } else {
            format!("Failed to save notes: {}", e)
        };
        self.host.show_error(&text);
        self.push(PanelMessage::SaveFailed { kind: kind, reason: e.to_string() });
    }

    fn report_load_failure(&self, e: &Error) {
        if e.is_no_workspace() {
            debug!("No workspace root, load skipped");
            return;
        }
        warn!(error = %e, "Failed to load notes");
        self.host.show_error(&format!("Failed to load notes: {}", e));
    }

    fn push(&self, message: PanelMessage) {
        if self.outbox.send(message).is_err() {
            debug!("UI surface is gone, dropping panel message");
        }
    }
}
