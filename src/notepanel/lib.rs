pub mod args;
pub mod autosave;
pub mod config;
pub mod errors;
pub mod host;
pub mod lineformat;
pub mod logging;
pub mod message;
pub mod note;
pub mod panel;
pub mod registry;
pub mod session;
pub mod shell;
pub mod store;
pub mod utils;

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;

use args::{Cli, Commands};
use config::Config;
use errors::{Error, Result};
use host::{Host, TerminalHost};
use message::{PanelMessage, UiMessage};
use note::{Note, NoteField};
use panel::{PanelSettings, Placement};
use registry::PanelRegistry;
use session::NoteSession;
use store::NoteStore;
use utils::{print_note, sorted_print, ListFlags};

pub use errors::StoreError;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.workspace.clone(), cli.autosave_ms);
    logging::init_logging(&config)?;

    let store = NoteStore::new(config.workspace.clone());
    let settings = config.panel_settings();
    let host: Arc<dyn Host> = Arc::new(TerminalHost::new(cli.yes));
    let mut registry = PanelRegistry::new(host);

    match cli.command {
        None => {
            list_notes(&store, 0, ListFlags::default())?;
        }
        Some(Commands::List { limit, datesort, reverse, json, condensed }) => {
            let flags = ListFlags {
                condensed: condensed,
                datesort: datesort,
                json: json,
                reverse: reverse,
            };
            list_notes(&store, limit.unwrap_or(0), flags)?;
        }
        Some(Commands::Show { id, condensed, json }) => {
            let notes = store.read()?.unwrap_or_default();
            match notes.iter().find(|n| n.id == id) {
                Some(note) if json => println!("{}", serde_json::to_string_pretty(note)?),
                Some(note) => print_note(note, condensed)?,
                None => return specific_fail!(format!("note {} doesn't exist", id)),
            }
        }
        Some(Commands::Add { title, content }) => {
            let mut surface = open_panel(&mut registry, store, &settings)?;
            initial_notes(&mut surface).await?;
            post(&registry, UiMessage::AddNote);
            let id = loop {
                match surface.recv().await {
                    Some(PanelMessage::NoteAdded { note }) => break note.id,
                    Some(_) => continue,
                    None => return specific_fail_str!("panel closed before the note was added"),
                }
            };
            if let Some(t) = title {
                post(&registry, UiMessage::EditNote { id: id, field: NoteField::Title, value: t });
            }
            if let Some(c) = content {
                post(&registry, UiMessage::EditNote { id: id, field: NoteField::Content, value: c });
            }
            finish(&mut registry, surface).await?;
            println!("note {} added", id);
        }
        Some(Commands::Edit { id, title, content }) => {
            let mut surface = open_panel(&mut registry, store, &settings)?;
            let notes = initial_notes(&mut surface).await?;
            if !notes.iter().any(|n| n.id == id) {
                registry.close().await?;
                return specific_fail!(format!("note {} doesn't exist", id));
            }
            if let Some(t) = title {
                post(&registry, UiMessage::EditNote { id: id, field: NoteField::Title, value: t });
            }
            if let Some(c) = content {
                post(&registry, UiMessage::EditNote { id: id, field: NoteField::Content, value: c });
            }
            finish(&mut registry, surface).await?;
            println!("edited note {}", id);
        }
        Some(Commands::Del { id }) => {
            let mut surface = open_panel(&mut registry, store, &settings)?;
            let notes = initial_notes(&mut surface).await?;
            for nid in id.iter() {
                if notes.iter().any(|n| &n.id == nid) {
                    post(&registry, UiMessage::DeleteNote { id: *nid });
                    println!("deleted note {}", nid);
                } else {
                    println!("note {} doesn't exist", nid);
                }
            }
            finish(&mut registry, surface).await?;
        }
        Some(Commands::Save) => {
            let mut surface = open_panel(&mut registry, store, &settings)?;
            initial_notes(&mut surface).await?;
            registry.save();
            finish(&mut registry, surface).await?;
        }
        Some(Commands::Clear) => {
            let mut surface = open_panel(&mut registry, store, &settings)?;
            initial_notes(&mut surface).await?;
            registry.clear();
            finish(&mut registry, surface).await?;
        }
        Some(Commands::Shell { beside }) => {
            let placement = if beside { Placement::Beside } else { Placement::Standalone };
            shell::run_shell(&mut registry, store, &settings, placement).await?;
        }
    }

    Ok(())
}

fn list_notes(store: &NoteStore, limit: usize, flags: ListFlags) -> Result<()> {
    let mut notes = store.read()?.unwrap_or_default();
    if !notes.is_empty() {
        sorted_print(&mut notes, limit, flags)?;
    } else if flags.json {
        println!("[]");
    } else {
        println!("no notes yet");
    }
    Ok(())
}

fn open_panel(registry: &mut PanelRegistry,
              store: NoteStore,
              settings: &PanelSettings)
              -> Result<UnboundedReceiver<PanelMessage>> {
    registry.open(store, settings, Placement::Standalone)
            .ok_or_else(|| Error::from("a panel is already open"))
}

fn post(registry: &PanelRegistry, message: UiMessage) {
    if let Some(panel) = registry.current() {
        panel.post(message);
    }
}

/// the notes of the first render
async fn initial_notes(surface: &mut UnboundedReceiver<PanelMessage>) -> Result<Vec<Note>> {
    match surface.recv().await {
        Some(PanelMessage::LoadData { notes }) => Ok(notes),
        _ => specific_fail_str!("panel did not render its notes"),
    }
}

/// Close the panel, flushing any pending autosave, and fail if a save
/// did not make it to disk.
async fn finish(registry: &mut PanelRegistry,
                mut surface: UnboundedReceiver<PanelMessage>)
                -> Result<NoteSession> {
    let session = registry.close()
                          .await?
                          .ok_or_else(|| Error::from("no panel was open"))?;
    while let Ok(message) = surface.try_recv() {
        if let PanelMessage::SaveFailed { reason, .. } = message {
            return specific_fail!(format!("notes were not saved: {}", reason));
        }
    }
    Ok(session)
}
