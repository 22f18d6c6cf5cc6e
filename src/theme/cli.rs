//! ANSI escape codes and themed text wrappers for the transcript.

use super::Theme;

/// ANSI color codes for CLI output
pub mod ansi {
    /// Green (ANSI 32) - separators and titles
    pub const GREEN: &str = "\x1b[32m";
    /// Light green (ANSI 92) - assistant text
    pub const LIGHT_GREEN: &str = "\x1b[92m";
    /// Red (ANSI 31) - warnings
    pub const RED: &str = "\x1b[31m";
    /// Dark gray (ANSI 90) - secondary text
    pub const DARK_GRAY: &str = "\x1b[90m";
    /// Bold
    pub const BOLD: &str = "\x1b[1m";
    /// Reset color
    pub const RESET: &str = "\x1b[0m";
}

impl Theme {
    fn paint(&self, color: &str, text: &str) -> String {
        if self.is_enabled() {
            format!("{}{}{}", color, text, ansi::RESET)
        } else {
            text.to_string()
        }
    }

    /// Format text with the accent color.
    pub fn accent_text(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    /// Format text with the secondary color.
    pub fn secondary_text(&self, text: &str) -> String {
        self.paint(self.text_secondary, text)
    }

    /// Format text with the error color.
    pub fn error_text(&self, text: &str) -> String {
        self.paint(self.error, text)
    }

    /// Format text with the success color.
    pub fn success_text(&self, text: &str) -> String {
        self.paint(self.success, text)
    }

    /// Bold accent, for headings.
    pub fn heading_text(&self, text: &str) -> String {
        if self.is_enabled() {
            format!("{}{}{}{}", ansi::BOLD, self.accent, text, ansi::RESET)
        } else {
            text.to_string()
        }
    }
}
