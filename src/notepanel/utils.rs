use std::io::{stdin, stdout, Write};
use std::iter::repeat;
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use crossterm::{
    style::{Attribute, SetAttribute},
    execute,
    tty::IsTty,
};

use crate::errors::Result;
use crate::lineformat::LineFormat;
use crate::note::Note;

/// date formatting string for notes older than a week
pub static DATEFMT_SHORT: &'static str = "%F";

/// Display options for `list`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFlags {
    pub condensed: bool,
    pub datesort: bool,
    pub json: bool,
    pub reverse: bool,
}

pub fn istty() -> bool {
    stdout().is_tty()
}

pub fn termsize() -> usize {
    if let Ok((cols, _rows)) = crossterm::terminal::size() {
        cols as usize
    } else {
        0
    }
}

pub fn get_yn_input(message: &str) -> Result<bool> {
    print!("{}", message);
    stdout().flush()?;

    let stdin = stdin();
    let yes = ["y", "Y", "yes", "YES", "Yes"];
    let no = ["n", "N", "no", "NO", "No"];

    loop {
        print!("[y/n]# ");
        stdout().flush()?;
        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            // stdin closed, treat as a refusal
            return Ok(false);
        }
        let input = input.trim();
        if yes.contains(&input) {
            return Ok(true);
        } else if no.contains(&input) {
            return Ok(false);
        };
        println!("invalid input.");
    }
}

pub fn pretty_line(bold: &str, plain: &str, tty: bool) -> Result<()> {
    let mut stdout = stdout();
    if tty {
        execute!(stdout, SetAttribute(Attribute::Bold))?;
    }
    print!("{}", bold);
    if tty {
         execute!(stdout, SetAttribute(Attribute::Reset))?;
    }
    print!("{}", plain);
    Ok(())
}

pub fn format_field(value: &str, width: usize, truncate: bool) -> String {
    if value.chars().count() > width && width > 3 && truncate {
        format!("{: <1$.1$}...", value, width - 3)
    } else {
        format!("{: <1$.1$}", value, width)
    }
}

/// Age of a timestamp the way note cards show it: "Just now", "5m ago",
/// "3h ago", "2d ago", then the local date.
pub fn relative_age(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = (*now - *then).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        then.with_timezone(&Local).format(DATEFMT_SHORT).to_string()
    }
}

fn print_header(line_format: &LineFormat) -> Result<()> {
    let mut stdout = stdout();
    let column_seperator: String = repeat(' ')
                                       .take(line_format.colsep)
                                       .collect();
    let header_seperator: String = repeat('-')
                                       .take(line_format.line_width())
                                       .collect();
    let tty = istty();

    if tty {
        execute!(stdout, SetAttribute(Attribute::Bold))?;
    }
    print!("{1}{0}{2}{0}{3}\n{4}\n",
           column_seperator,
           format_field("id", line_format.id_width, false),
           format_field("title", line_format.title_width, false),
           format_field("last touched", line_format.touched_width, false),
           header_seperator);
    if tty {
        execute!(stdout, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

/// Order and trim notes for display. Display order is the stored order
/// (newest first) unless `datesort` asks for oldest-modified first.
pub fn sort_for_display(notes: &mut Vec<Note>, limit: usize, flags: ListFlags) {
    if flags.datesort {
        notes.sort_by(|a, b| a.last_modified.cmp(&b.last_modified));
    }
    if flags.reverse {
        notes.reverse();
    }
    if limit != 0 && limit < notes.len() {
        notes.truncate(limit);
    }
}

pub fn sorted_print(notes: &mut Vec<Note>, limit: usize, flags: ListFlags) -> Result<()> {
    sort_for_display(notes, limit, flags);

    if flags.json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
    } else {
        let line_format = LineFormat::new(notes, flags.condensed, false)?;
        if !flags.condensed {
            print_header(&line_format)?;
        }
        for n in notes.iter() {
            n.print(&line_format, false)?;
        }
    };

    Ok(())
}

/// print a full note
pub fn print_note(note: &Note, condensed: bool) -> Result<()> {
    let tty = istty();
    let touched = relative_age(&note.last_modified, &Utc::now());

    if condensed {
        pretty_line("id: ", &format!("{}\n", note.id), tty)?;
        pretty_line("title: ", &format!("{}\n", note.title), tty)?;
        pretty_line("last touched: ", &format!("{}\n", touched), tty)?;
        if !note.content.is_empty() {
            pretty_line("content: ", &format!("{}\n", note.content), tty)?;
        }
    } else {
        pretty_line("id\n--\n", &format!("{}\n\n", note.id), tty)?;
        pretty_line("title\n-----\n", &format!("{}\n\n", note.title), tty)?;
        pretty_line("last touched\n------------\n", &format!("{}\n\n", touched), tty)?;
        if !note.content.is_empty() {
            pretty_line("content\n-------\n", &format!("{}\n\n", note.content), tty)?;
        }
    }
    Ok(())
}

/// Default location of the configuration file, if the platform has a
/// config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("notepanel").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn note_at(id: u64, minutes_ago: i64) -> Note {
        let mut note = Note::new(id);
        note.last_modified = Utc::now() - Duration::minutes(minutes_ago);
        note
    }

    #[test]
    fn test_format_field_truncates_with_ellipsis() {
        assert_eq!(format_field("abcdefgh", 6, true), "abc...");
        assert_eq!(format_field("ab", 4, false), "ab  ");
        assert_eq!(format_field("abcdef", 4, false), "abcd");
    }

    #[test]
    fn test_relative_age_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_age(&(now - Duration::seconds(30)), &now), "Just now");
        assert_eq!(relative_age(&(now - Duration::minutes(5)), &now), "5m ago");
        assert_eq!(relative_age(&(now - Duration::hours(3)), &now), "3h ago");
        assert_eq!(relative_age(&(now - Duration::days(2)), &now), "2d ago");
        let old = now - Duration::days(30);
        assert_eq!(relative_age(&old, &now),
                   old.with_timezone(&Local).format("%F").to_string());
    }

    #[test]
    fn test_sort_for_display_keeps_stored_order_by_default() {
        let mut notes = vec![note_at(2, 50), note_at(1, 10), note_at(0, 30)];
        sort_for_display(&mut notes, 0, ListFlags::default());
        let ids: Vec<u64> = notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 1, 0]);
    }

    #[test]
    fn test_sort_for_display_datesort_reverse_and_limit() {
        let mut notes = vec![note_at(2, 50), note_at(1, 10), note_at(0, 30)];
        let flags = ListFlags { datesort: true, reverse: true, ..Default::default() };
        sort_for_display(&mut notes, 2, flags);
        let ids: Vec<u64> = notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }
}
