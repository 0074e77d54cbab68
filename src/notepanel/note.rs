use std::fmt;
use std::io::{self, Write};
use std::iter::repeat;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::errors::{Error, Result};
use crate::lineformat::LineFormat;
use crate::utils::{format_field, relative_age};

/// title given to freshly added notes
pub static DEFAULT_TITLE: &'static str = "New Note";

/// A single note as shown on a card in the panel.
///
/// `last_modified` is persisted under the `date` key as an ISO-8601 string.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Note {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "date")]
    pub last_modified: DateTime<Utc>,
}

impl Note {
    pub fn new(id: u64) -> Note {
        Note {
            id: id,
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
            last_modified: Utc::now(),
        }
    }

    /// replace one editable field and refresh `last_modified`
    pub fn set(&mut self, field: NoteField, value: &str) {
        match field {
            NoteField::Title => self.title = value.replace('\n', ""),
            NoteField::Content => self.content = value.to_string(),
        }
        self.touch();
    }

    // the clock may step backwards; the timestamp must not
    fn touch(&mut self) {
        self.last_modified = Utc::now().max(self.last_modified);
    }

    /// print a note as a line
    pub fn print(&self, line_format: &LineFormat, show_content: bool) -> Result<()> {
        self.write(&mut io::stdout(), line_format, show_content)
    }

    pub fn write<T: Write>(&self,
                           output: &mut T,
                           line_format: &LineFormat,
                           show_content: bool)
                           -> Result<()> {
        let column_seperator: String = repeat(' ')
                                           .take(line_format.colsep)
                                           .collect();
        write!(output,
               "{}",
               format_field(&self.id.to_string(), line_format.id_width, false))?;
        write!(output, "{}", column_seperator)?;
        if !self.content.is_empty() && !show_content {
            write!(output,
                   "{}",
                   format_field(&self.title,
                                line_format.title_width.saturating_sub(4),
                                true))?;
            write!(output, "{}", format_field(" (+)", 4, false))?;
        } else {
            write!(output,
                   "{}",
                   format_field(&self.title, line_format.title_width, true))?;
        }
        write!(output, "{}", column_seperator)?;
        writeln!(output,
                 "{}",
                 format_field(&relative_age(&self.last_modified, &Utc::now()),
                              line_format.touched_width,
                              false))?;
        if show_content {
            for l in self.content.lines() {
                writeln!(output, "\t{}", l)?;
            }
        }
        Ok(())
    }
}

/// The user-editable fields of a note.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum NoteField {
    Title,
    Content,
}

impl fmt::Display for NoteField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "{}",
               match *self {
                   NoteField::Title => "title",
                   NoteField::Content => "content",
               })
    }
}

impl FromStr for NoteField {
    type Err = Error;

    fn from_str(s: &str) -> Result<NoteField> {
        match s {
            "title" | "Title" => Ok(NoteField::Title),
            "content" | "Content" | "body" => Ok(NoteField::Content),
            _ => Err(Error::from(format!("unknown note field '{}' (title or content)", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_note_defaults() {
        let note = Note::new(7);
        assert_eq!(note.id, 7);
        assert_eq!(note.title, "New Note");
        assert!(note.content.is_empty());
    }

    #[test]
    fn test_set_strips_newlines_from_title() {
        let mut note = Note::new(0);
        note.set(NoteField::Title, "Gro\nceries");
        assert_eq!(note.title, "Groceries");
        note.set(NoteField::Content, "Milk\neggs");
        assert_eq!(note.content, "Milk\neggs");
    }

    #[test]
    fn test_set_never_moves_timestamp_backwards() {
        let mut note = Note::new(0);
        let future = Utc::now() + Duration::hours(1);
        note.last_modified = future;
        note.set(NoteField::Content, "x");
        assert_eq!(note.last_modified, future);
    }

    #[test]
    fn test_serializes_last_modified_as_date() {
        let note = Note::new(3);
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], 3);
        assert!(value.get("date").is_some());
        assert!(value.get("last_modified").is_none());
    }

    #[test]
    fn test_deserializes_browser_style_timestamp() {
        let raw = r#"{"id": 2, "title": "a", "content": "b", "date": "2024-05-01T10:20:30.123Z"}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.id, 2);
        assert_eq!(note.last_modified.to_rfc3339(), "2024-05-01T10:20:30.123+00:00");
    }

    #[test]
    fn test_note_field_parsing() {
        assert_eq!("title".parse::<NoteField>().unwrap(), NoteField::Title);
        assert_eq!("content".parse::<NoteField>().unwrap(), NoteField::Content);
        assert!("status".parse::<NoteField>().is_err());
        assert_eq!(NoteField::Content.to_string(), "content");
    }

    #[test]
    fn test_write_marks_notes_with_content() {
        let mut note = Note::new(1);
        note.set(NoteField::Content, "hidden");
        let format = LineFormat::new(&[note.clone()], false, false).unwrap();
        let mut out = Vec::new();
        note.write(&mut out, &format, false).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.contains("(+)"));
        assert!(line.contains("Just now"));
        assert!(!line.contains("hidden"));
    }
}
