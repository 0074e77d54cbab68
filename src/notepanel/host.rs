//! The application hosting the panel.

use crate::utils::{get_yn_input, istty, pretty_line};

/// Notification and confirmation surface provided by the host application.
///
/// Notifications are non-modal; `confirm` blocks for a yes/no answer and is
/// only used before destructive commands.
pub trait Host: Send + Sync {
    fn show_info(&self, message: &str);
    fn show_error(&self, message: &str);
    fn confirm(&self, prompt: &str) -> bool;
}

/// `Host` for a terminal session.
#[derive(Debug, Clone, Default)]
pub struct TerminalHost {
    /// answer yes to every confirmation
    pub yes: bool,
}

impl TerminalHost {
    pub fn new(yes: bool) -> TerminalHost {
        TerminalHost { yes: yes }
    }
}

impl Host for TerminalHost {
    fn show_info(&self, message: &str) {
        if pretty_line("info: ", &format!("{}\n", message), istty()).is_err() {
            println!("info: {}", message);
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        match get_yn_input(&format!("{}\n", prompt)) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Confirmation prompt failed");
                false
            }
        }
    }
}
