//! UI extensions for cloudsim-pilot-core types
//!
//! Provides ratatui-specific extensions for core types, bridging the gap
//! between the UI-agnostic core library and the TUI presentation layer.

use crate::theme::Theme;
use cloudsim_pilot_core::SyncStatus;
use ratatui::style::{Color, Style};
use ratatui::text::Span;

/// Extension trait for SyncStatus to provide themed colors
pub trait SyncStatusExt {
    /// Unicode symbol for this status
    fn symbol(&self) -> &'static str;

    /// Get the color for this status
    fn color(&self, theme: &Theme) -> Color;

    /// Symbol and label as a styled span
    fn span(&self, theme: &Theme) -> Span<'static>;
}

impl SyncStatusExt for SyncStatus {
    fn symbol(&self) -> &'static str {
        match self {
            SyncStatus::Loading | SyncStatus::Refreshing => "◌",
            SyncStatus::Error => "✗",
            SyncStatus::Ready => "●",
            SyncStatus::Idle => "○",
        }
    }

    fn color(&self, theme: &Theme) -> Color {
        match self {
            SyncStatus::Loading | SyncStatus::Refreshing => theme.warning,
            SyncStatus::Error => theme.error,
            SyncStatus::Ready => theme.success,
            SyncStatus::Idle => theme.muted,
        }
    }

    fn span(&self, theme: &Theme) -> Span<'static> {
        Span::styled(
            format!("{} {}", self.symbol(), self.label()),
            Style::default().fg(self.color(theme)),
        )
    }
}

/// "auto:ON" / "auto:OFF" footer indicator
pub fn auto_refresh_span(running: bool, theme: &Theme) -> Span<'static> {
    if running {
        Span::styled("ON ", Style::default().fg(theme.success))
    } else {
        Span::styled("OFF", Style::default().fg(theme.muted))
    }
}
