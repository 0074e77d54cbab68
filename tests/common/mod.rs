use std::sync::Mutex;
use std::time::Duration;

use notepanel::host::Host;
use notepanel::message::PanelMessage;
use notepanel::panel::PanelSettings;
use notepanel::session::SaveKind;
use notepanel::store::NoteStore;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

/// Host that records notifications and answers confirmations with `answer`.
#[derive(Default)]
pub struct RecordingHost {
    pub answer: bool,
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingHost {
    pub fn answering(answer: bool) -> RecordingHost {
        RecordingHost { answer: answer, ..Default::default() }
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().expect("infos lock").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("errors lock").clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

impl Host for RecordingHost {
    fn show_info(&self, message: &str) {
        self.infos.lock().expect("infos lock").push(message.to_string());
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().expect("errors lock").push(message.to_string());
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().expect("prompts lock").push(prompt.to_string());
        self.answer
    }
}

#[allow(dead_code)]
pub fn temp_store() -> (TempDir, NoteStore) {
    let dir = TempDir::new().expect("failed to create tempdir");
    let store = NoteStore::with_root(dir.path());
    (dir, store)
}

#[allow(dead_code)]
pub fn settings_ms(ms: u64) -> PanelSettings {
    PanelSettings { autosave_window: Duration::from_millis(ms) }
}

/// Everything still queued on a panel's UI receiver.
#[allow(dead_code)]
pub fn drain(surface: &mut UnboundedReceiver<PanelMessage>) -> Vec<PanelMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = surface.try_recv() {
        messages.push(message);
    }
    messages
}

#[allow(dead_code)]
pub fn count_saved(messages: &[PanelMessage], kind: SaveKind) -> usize {
    messages
        .iter()
        .filter(|m| **m == PanelMessage::Saved { kind: kind })
        .count()
}
