//! The set of open panels, owned by the host integration.
//!
//! At most one panel is open at a time. Host commands are routed through
//! the registry instead of a global.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::errors::Result;
use crate::host::Host;
use crate::message::PanelMessage;
use crate::panel::{PanelHandle, PanelSettings, Placement};
use crate::session::NoteSession;
use crate::store::NoteStore;

pub static NOT_OPEN_MESSAGE: &'static str = "Note App is not open. Please open it first.";
pub static CLEAR_PROMPT: &'static str = "Are you sure you want to clear all notes?";

pub struct PanelRegistry {
    host: Arc<dyn Host>,
    current: Option<PanelHandle>,
}

impl PanelRegistry {
    pub fn new(host: Arc<dyn Host>) -> PanelRegistry {
        PanelRegistry {
            host: host,
            current: None,
        }
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Open a panel, or reveal the one already open at `placement`.
    ///
    /// Returns the UI receiver only when a new panel was created.
    pub fn open(&mut self,
                store: NoteStore,
                settings: &PanelSettings,
                placement: Placement)
                -> Option<UnboundedReceiver<PanelMessage>> {
        if let Some(panel) = self.current.as_mut().filter(|p| p.is_open()) {
            panel.reveal(placement);
            return None;
        }
        let (panel, surface) = PanelHandle::open(store, settings, placement, self.host.clone());
        self.current = Some(panel);
        Some(surface)
    }

    /// the open panel, if any
    pub fn current(&self) -> Option<&PanelHandle> {
        self.current.as_ref().filter(|p| p.is_open())
    }

    /// host `save` command
    pub fn save(&self) -> bool {
        match self.current() {
            Some(panel) => panel.save(),
            None => self.not_open(),
        }
    }

    /// host `clear` command, after asking the user
    pub fn clear(&self) -> bool {
        match self.current() {
            Some(panel) => {
                if self.host.confirm(CLEAR_PROMPT) {
                    panel.clear()
                } else {
                    debug!("Clear declined");
                    false
                }
            }
            None => self.not_open(),
        }
    }

    /// Close the open panel and return its final session.
    pub async fn close(&mut self) -> Result<Option<NoteSession>> {
        match self.current.take() {
            Some(panel) => Ok(Some(panel.close().await?)),
            None => Ok(None),
        }
    }

    fn not_open(&self) -> bool {
        self.host.show_info(NOT_OPEN_MESSAGE);
        false
    }
}
