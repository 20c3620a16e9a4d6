//! Color themes
//!
//! A [`Theme`] is built once from the configured [`ThemeKind`] and handed
//! to every draw call.

use cloudsim_pilot_core::ThemeKind;
use ratatui::style::{Color, Modifier, Style};

/// Palette used by all components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeKind,
    /// Primary text
    pub text: Color,
    /// Secondary text (timestamps, hints)
    pub muted: Color,
    /// Titles, badges, active tab
    pub accent: Color,
    /// Selected row background
    pub highlight_bg: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            text: Color::Black,
            muted: Color::DarkGray,
            accent: Color::Blue,
            highlight_bg: Color::Gray,
            border: Color::DarkGray,
            success: Color::Green,
            warning: Color::Rgb(0xb5, 0x89, 0x00),
            error: Color::Red,
        }
    }

    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            text: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            highlight_bg: Color::DarkGray,
            border: Color::Gray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::LightRed,
        }
    }

    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Light => Self::light(),
            ThemeKind::Dark => Self::dark(),
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn key(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
