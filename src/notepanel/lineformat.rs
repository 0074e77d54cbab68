use std::cmp::max;

use chrono::Utc;

use crate::errors::Result;
use crate::note::Note;
use crate::utils::{relative_age, termsize};
use crate::specific_fail_str;

/// Column widths for printing notes as a table.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFormat {
    pub colsep: usize,
    pub id_width: usize,
    pub title_width: usize,
    pub touched_width: usize,
}

impl LineFormat {
    pub fn new(notes: &[Note], condensed: bool, show_content: bool) -> Result<LineFormat> {
        let now = Utc::now();
        let mut line_format = LineFormat {
            colsep: if condensed { 1 } else { 2 },
            id_width: if condensed { 1 } else { "id".len() },
            title_width: if condensed { 1 } else { "title".len() },
            touched_width: if condensed { 1 } else { "last touched".len() },
        };

        for n in notes {
            line_format.id_width = max(line_format.id_width, n.id.to_string().len());
            let marker = if !n.content.is_empty() && !show_content { 4 } else { 0 };
            line_format.title_width = max(line_format.title_width,
                                          n.title.chars().count() + marker);
            line_format.touched_width = max(line_format.touched_width,
                                            relative_age(&n.last_modified, &now).len());
        }

        let console_width = termsize();
        if console_width > 0 && line_format.line_width() > console_width {
            let fixed = line_format.line_width() - line_format.title_width;
            if fixed + 8 > console_width {
                return specific_fail_str!("unable to format output: the terminal is too narrow");
            }
            line_format.title_width = console_width - fixed;
        }

        Ok(line_format)
    }

    pub fn line_width(&self) -> usize {
        self.id_width + self.title_width + self.touched_width + 2 * self.colsep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_cover_headers_when_empty() {
        let format = LineFormat::new(&[], false, false).unwrap();
        assert_eq!(format.id_width, 2);
        assert_eq!(format.title_width, 5);
        assert_eq!(format.touched_width, 12);
        assert_eq!(format.line_width(), 2 + 5 + 12 + 4);
    }

    #[test]
    fn test_title_width_reserves_content_marker() {
        let mut note = Note::new(123);
        note.title = "abcdefgh".to_string();
        note.content = "x".to_string();
        let format = LineFormat::new(&[note], true, false).unwrap();
        assert_eq!(format.id_width, 3);
        assert_eq!(format.title_width, 12);
    }
}
