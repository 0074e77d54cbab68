//! Interactive panel on a terminal.
//!
//! Each input line is one UI action. Panel messages are printed as status
//! lines while the user types, so autosaves show up as they happen. Lines
//! starting with `{` are taken as raw JSON `UiMessage`s.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::errors::{Error, Result};
use crate::message::{PanelMessage, UiMessage};
use crate::note::{Note, NoteField};
use crate::panel::{PanelSettings, Placement};
use crate::registry::{PanelRegistry, CLEAR_PROMPT};
use crate::store::NoteStore;
use crate::utils::{sorted_print, ListFlags};

pub static HELP: &'static str = "\
commands:
  add                               add a note
  edit <id> <title|content> <text>  change a note
  del <id>                          delete a note
  save                              save now
  load                              reload from disk
  clear                             clear all notes
  list                              show notes
  alert <text>                      show a notification
  open [standalone|beside]          move the panel
  help                              this text
  quit                              close the panel";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Ui(UiMessage),
    Save,
    Clear,
    List,
    Open(Placement),
    Help,
    Quit,
}

/// Parse one input line. Blank lines give `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line.starts_with('{') {
        let message: UiMessage = serde_json::from_str(line)?;
        return Ok(Some(ShellCommand::Ui(message)));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let command = match word {
        "add" => ShellCommand::Ui(UiMessage::AddNote),
        "del" | "delete" => ShellCommand::Ui(UiMessage::DeleteNote { id: parse_id(rest)? }),
        "edit" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let id = parse_id(parts.next().unwrap_or(""))?;
            let field: NoteField = parts.next().unwrap_or("").parse()?;
            let value = parts.next().unwrap_or("").to_string();
            ShellCommand::Ui(UiMessage::EditNote { id: id, field: field, value: value })
        }
        "save" => ShellCommand::Save,
        "load" => ShellCommand::Ui(UiMessage::Load),
        "clear" => ShellCommand::Clear,
        "list" | "ls" => ShellCommand::List,
        "alert" => ShellCommand::Ui(UiMessage::Alert { text: rest.to_string() }),
        "open" => match rest {
            "" | "standalone" => ShellCommand::Open(Placement::Standalone),
            "beside" => ShellCommand::Open(Placement::Beside),
            other => return Err(Error::from(format!("unknown placement '{}'", other))),
        },
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(Error::from(format!("unknown command '{}', try 'help'", other))),
    };
    Ok(Some(command))
}

fn parse_id(s: &str) -> Result<u64> {
    s.parse::<u64>().map_err(|_| Error::from(format!("'{}' is not a note id", s)))
}

/// What the UI surface currently shows, kept in step with the session
/// from the messages flowing both ways.
#[derive(Debug, Default)]
pub struct NoteView {
    notes: Vec<Note>,
}

impl NoteView {
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn apply_outbound(&mut self, message: &PanelMessage) {
        match *message {
            PanelMessage::LoadData { ref notes } => self.notes = notes.clone(),
            PanelMessage::NoteAdded { ref note } => self.notes.insert(0, note.clone()),
            PanelMessage::ClearRequest => self.notes.clear(),
            _ => {}
        }
    }

    pub fn apply_inbound(&mut self, message: &UiMessage) {
        match *message {
            UiMessage::DeleteNote { id } => self.notes.retain(|n| n.id != id),
            UiMessage::EditNote { id, field, ref value } => {
                if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
                    note.set(field, value);
                }
            }
            _ => {}
        }
    }
}

/// Show the panel at `placement`. When the previous panel had stopped a
/// new one is opened and `surface` is switched to it; returns true then.
pub fn reopen(registry: &mut PanelRegistry,
              store: NoteStore,
              settings: &PanelSettings,
              placement: Placement,
              surface: &mut UnboundedReceiver<PanelMessage>)
              -> bool {
    match registry.open(store, settings, placement) {
        Some(fresh) => {
            *surface = fresh;
            true
        }
        None => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes")
}

/// Run an interactive panel until `quit` or end of input.
pub async fn run_shell(registry: &mut PanelRegistry,
                       store: NoteStore,
                       settings: &PanelSettings,
                       placement: Placement)
                       -> Result<()> {
    let mut surface = registry.open(store.clone(), settings, placement)
                              .ok_or_else(|| Error::from("a panel is already open"))?;
    let mut view = NoteView::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("notes panel for {} (type 'help')",
             store.root().map(|p| p.display().to_string()).unwrap_or_else(|| "<no workspace>".to_string()));

    loop {
        tokio::select! {
            message = surface.recv() => match message {
                Some(message) => {
                    view.apply_outbound(&message);
                    if let Some(text) = message.status_text() {
                        println!("[{}]", text);
                    }
                }
                None => break,
            },
            line = lines.next_line() => {
                let line = match line? {
                    Some(l) => l,
                    None => break,
                };
                let command = match parse_line(&line) {
                    Ok(Some(c)) => c,
                    Ok(None) => continue,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };
                match command {
                    ShellCommand::Ui(message) => {
                        view.apply_inbound(&message);
                        if let Some(panel) = registry.current() {
                            panel.post(message);
                        }
                    }
                    ShellCommand::Save => {
                        registry.save();
                    }
                    ShellCommand::Clear => {
                        println!("{} [y/n]", CLEAR_PROMPT);
                        let confirmed = match lines.next_line().await? {
                            Some(answer) => is_yes(&answer),
                            None => false,
                        };
                        if confirmed {
                            if let Some(panel) = registry.current() {
                                panel.post(UiMessage::Clear { confirmed: true });
                            }
                        }
                    }
                    ShellCommand::List => {
                        if view.notes().is_empty() {
                            println!("no notes yet");
                        } else {
                            sorted_print(&mut view.notes().to_vec(), 0, ListFlags::default())?;
                        }
                    }
                    ShellCommand::Open(placement) => {
                        if reopen(registry, store.clone(), settings, placement, &mut surface) {
                            view = NoteView::default();
                        }
                        println!("panel shown {:?}", placement);
                    }
                    ShellCommand::Help => println!("{}", HELP),
                    ShellCommand::Quit => break,
                }
            }
        }
    }

    registry.close().await?;
    while let Ok(message) = surface.try_recv() {
        if let Some(text) = message.status_text() {
            println!("[{}]", text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SaveKind;

    #[test]
    fn test_parse_edit_keeps_spaces_in_value() {
        let command = parse_line("edit 0 content Milk, eggs").unwrap().unwrap();
        assert_eq!(command,
                   ShellCommand::Ui(UiMessage::EditNote {
                       id: 0,
                       field: NoteField::Content,
                       value: "Milk, eggs".to_string(),
                   }));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_line("add").unwrap(), Some(ShellCommand::Ui(UiMessage::AddNote)));
        assert_eq!(parse_line("  del 4 ").unwrap(),
                   Some(ShellCommand::Ui(UiMessage::DeleteNote { id: 4 })));
        assert_eq!(parse_line("open beside").unwrap(), Some(ShellCommand::Open(Placement::Beside)));
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn test_parse_json_message() {
        let command = parse_line(r#"{"command": "clear", "confirmed": false}"#).unwrap().unwrap();
        assert_eq!(command, ShellCommand::Ui(UiMessage::Clear { confirmed: false }));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("del x").is_err());
        assert!(parse_line("edit 1 status done").is_err());
        assert!(parse_line("frobnicate").is_err());
    }

    #[test]
    fn test_view_follows_both_directions() {
        let mut view = NoteView::default();
        let note = Note::new(0);
        view.apply_outbound(&PanelMessage::LoadData { notes: vec![] });
        view.apply_outbound(&PanelMessage::NoteAdded { note: note.clone() });
        view.apply_inbound(&UiMessage::EditNote {
            id: 0,
            field: NoteField::Title,
            value: "Groceries".to_string(),
        });
        assert_eq!(view.notes()[0].title, "Groceries");

        view.apply_outbound(&PanelMessage::Saved { kind: SaveKind::Silent });
        assert_eq!(view.notes().len(), 1);

        view.apply_inbound(&UiMessage::DeleteNote { id: 0 });
        assert!(view.notes().is_empty());
    }
}
