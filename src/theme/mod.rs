//! Transcript colors.
//!
//! Colors are plain ANSI escapes. A disabled theme renders every helper as
//! the identity, so the renderer never branches on color support itself.

use crate::config::ColorMode;

pub mod cli;

pub use cli::ansi;

/// Colors used by the text transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Separators and section titles
    pub accent: &'static str,
    /// Secondary text such as rules and previews
    pub text_secondary: &'static str,
    /// Warnings and failures
    pub error: &'static str,
    /// Extracted assistant text
    pub success: &'static str,
    enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::colored()
    }
}

impl Theme {
    /// Standard ANSI colors: green accent, gray secondary text.
    pub fn colored() -> Self {
        Self {
            accent: ansi::GREEN,
            text_secondary: ansi::DARK_GRAY,
            error: ansi::RED,
            success: ansi::LIGHT_GREEN,
            enabled: true,
        }
    }

    /// No escapes at all.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::colored()
        }
    }

    /// Pick a theme for stdout.
    ///
    /// `Auto` colors only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn resolve(mode: ColorMode) -> Self {
        let enabled = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
            }
        };
        if enabled {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
