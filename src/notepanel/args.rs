use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "notepanel")]
#[command(version)]
#[command(about = "workspace notes with debounced autosave", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Workspace folder holding the notes file
    #[arg(short, long, env = "NOTEPANEL_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Configuration file
    #[arg(long, env = "NOTEPANEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Autosave window in milliseconds
    #[arg(long)]
    pub autosave_ms: Option<u64>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List notes (default if no command)
    List {
        /// Limit results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Sort by last modification, oldest first
        #[arg(short, long)]
        datesort: bool,

        /// Reverse order
        #[arg(short, long)]
        reverse: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Condensed output
        #[arg(short, long)]
        condensed: bool,
    },

    /// Show one note
    Show {
        /// ID of the note
        id: u64,

        /// Condensed output
        #[arg(short, long)]
        condensed: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new note
    Add {
        /// Title of the note
        title: Option<String>,

        /// Content of the note
        content: Option<String>,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: u64,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New content
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Delete notes
    Del {
        /// ID(s) of the notes to delete
        #[arg(required = true)]
        id: Vec<u64>,
    },

    /// Save the notes file
    Save,

    /// Clear all notes
    Clear,

    /// Open an interactive panel on stdin/stdout
    Shell {
        /// Show the panel beside the editor
        #[arg(short, long)]
        beside: bool,
    },
}
