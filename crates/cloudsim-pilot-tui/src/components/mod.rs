//! Component system for cloudsim-pilot TUI
//!
//! Based on the ratatui Component template pattern.

pub mod bucket;
pub mod queue;

pub use bucket::BucketComponent;
pub use queue::QueueComponent;

use crate::action::Action;
use crate::theme::Theme;
use cloudsim_pilot_core::pluralize;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Trait for UI components
///
/// Components are modular, reusable UI elements that can handle events,
/// update their state, and render themselves.
pub trait Component {
    /// Handle key events and optionally produce actions
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Update the component state based on an action
    fn update(&mut self, action: Action) -> Result<Option<Action>>;

    /// Render the component to the frame
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) -> Result<()>;
}

/// Render a one-line error banner
///
/// `failures` is the number of consecutive failed reads; a streak longer
/// than one is appended to the message.
pub(crate) fn draw_error_banner(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    failures: u32,
    theme: &Theme,
) {
    let mut spans = vec![
        Span::styled(" ✗ ", Style::default().fg(theme.error)),
        Span::styled(message.to_string(), Style::default().fg(theme.error)),
    ];
    if failures > 1 {
        spans.push(Span::styled(
            format!(
                "  ({} in a row)",
                pluralize(failures as usize, "failed read", "failed reads")
            ),
            theme.hint(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render a key hint footer from `(key, label)` pairs
pub(crate) fn footer_line<'a>(hints: &[(&'a str, &'a str)], theme: &Theme) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!("[{}]", key), theme.key()));
        spans.push(Span::raw(format!(" {}  ", label)));
    }
    spans
}
