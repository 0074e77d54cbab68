//! Persistence of a workspace's notes as a single JSON file.
//!
//! The store never holds on to a note list. It converts between `[Note]`
//! and text and moves that text to and from `<root>/.cursor-notes.json`.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{Error, Result};
use crate::note::Note;

/// name of the notes file inside the workspace root
pub static NOTES_FILE_NAME: &'static str = ".cursor-notes.json";

/// Largest id the browser panel can write (2^53 - 1). Larger ids in the
/// file are rejected.
pub const MAX_NOTE_ID: u64 = 9_007_199_254_740_991;

/// Reads and writes the notes file of one workspace root.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    root: Option<PathBuf>,
}

impl NoteStore {
    pub fn new(root: Option<PathBuf>) -> NoteStore {
        NoteStore { root: root }
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> NoteStore {
        NoteStore { root: Some(root.into()) }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// full path of the notes file, or `NoWorkspace`
    pub fn notes_path(&self) -> Result<PathBuf> {
        match self.root {
            Some(ref root) => Ok(root.join(NOTES_FILE_NAME)),
            None => Err(Error::no_workspace()),
        }
    }

    /// Overwrite the notes file with `notes`.
    ///
    /// The text goes to a temporary file in the root first and is then
    /// renamed over the target, so a failed write leaves the previous file
    /// in place.
    pub fn write(&self, notes: &[Note]) -> Result<()> {
        let notes_path = self.notes_path()?;
        let root = notes_path.parent().unwrap_or_else(|| Path::new("."));
        let contents = encode(notes)?;

        let mut file = NamedTempFile::new_in(root)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&notes_path).map_err(|e| Error::from(e.error))?;

        info!(path = %notes_path.display(), notes = notes.len(), "Notes written");
        Ok(())
    }

    /// Read the notes file. A workspace without one has no notes yet,
    /// which is `Ok(None)` rather than an error.
    pub fn read(&self) -> Result<Option<Vec<Note>>> {
        let notes_path = self.notes_path()?;

        if notes_path.is_file() {
            let contents_buf = fs::read(&notes_path)?;
            let contents = String::from_utf8(contents_buf)?;
            let notes = decode(&contents).map_err(|e| Error {
                kind: e.kind,
                desc: format!("invalid notes file {}", notes_path.display()),
                detail: Some(e.desc + &e.detail.map(|d| format!(": {}", d)).unwrap_or_default()),
            })?;
            info!(path = %notes_path.display(), notes = notes.len(), "Notes read");
            Ok(Some(notes))
        } else if notes_path.exists() {
            Err(Error::from(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file.", notes_path.display()),
            )))
        } else {
            debug!(path = %notes_path.display(), "No notes file yet");
            Ok(None)
        }
    }
}

/// Serialize notes to the canonical on-disk text: a pretty-printed JSON
/// array in display order.
pub fn encode(notes: &[Note]) -> Result<String> {
    Ok(serde_json::to_string_pretty(notes)?)
}

/// Parse on-disk text back into notes. Ids must be unique and no larger
/// than `MAX_NOTE_ID`.
pub fn decode(contents: &str) -> Result<Vec<Note>> {
    let notes: Vec<Note> = serde_json::from_str(contents)?;
    let mut seen = HashSet::with_capacity(notes.len());
    for n in notes.iter() {
        if n.id > MAX_NOTE_ID {
            return Err(Error::parse_failure(format!("note id {} is out of range", n.id)));
        }
        if !seen.insert(n.id) {
            return Err(Error::parse_failure(format!("duplicate note id {}", n.id)));
        }
    }
    Ok(notes)
}
