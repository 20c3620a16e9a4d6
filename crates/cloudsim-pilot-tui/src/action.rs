//! Actions for the cloudsim-pilot TUI
//!
//! Actions represent events that can modify application state.

use crate::app::ViewKind;

/// Actions that can be dispatched in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Quit,
    NextView,
    ShowView(ViewKind),

    // Synchronization
    /// Issue an immediate read for the active view
    Refresh,
    /// Send the composer's body to the queue
    SubmitMessage,
    /// Delete the message leased under this receipt handle
    DeleteMessage(String),

    // UI state
    Tick,
    Resize(u16, u16),
}
