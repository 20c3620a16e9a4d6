//! cloudsim-pilot-tui: Terminal UI for cloudsim-pilot
//!
//! Renders the bucket and queue dashboards with ratatui and routes key
//! presses to the synchronization core.

pub mod action;
pub mod app;
pub mod components;
pub mod theme;
pub mod tui;
pub mod ui_ext;

pub use app::{App, ViewKind};
pub use theme::Theme;
