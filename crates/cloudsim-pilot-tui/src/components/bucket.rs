//! Bucket component
//!
//! Lists the objects in the simulated bucket, refreshed by its own poller.

use crate::action::Action;
use crate::components::{Component, draw_error_banner, footer_line};
use crate::theme::Theme;
use crate::ui_ext::{SyncStatusExt, auto_refresh_span};
use cloudsim_pilot_core::{
    BucketPoller, ListCursor, PollingController, avatar_url, format_file_size, format_timestamp,
    strip_extension,
};
use cloudsim_rs::{BucketListing, FileEntry, ObjectStoreClient};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use std::time::Duration;

/// Bucket listing view
pub struct BucketComponent {
    poller: BucketPoller,
    interval: Duration,
    cursor: ListCursor,
    table_state: TableState,
}

impl BucketComponent {
    pub fn new(client: ObjectStoreClient, interval: Duration) -> Self {
        Self {
            poller: PollingController::new(client, BucketListing::default()),
            interval,
            cursor: ListCursor::new(),
            table_state: TableState::default(),
        }
    }

    /// Start periodic polling
    pub fn start(&mut self) {
        self.poller.start(self.interval);
    }

    pub fn stop(&mut self) {
        self.poller.stop();
    }

    /// Issue an immediate read
    pub fn refresh(&mut self) {
        self.poller.refresh_now();
    }

    pub fn toggle_auto_refresh(&mut self) {
        if self.poller.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn poller(&self) -> &BucketPoller {
        &self.poller
    }

    pub fn poller_mut(&mut self) -> &mut BucketPoller {
        &mut self.poller
    }

    /// Apply finished reads and keep the selection on the same key
    fn pump(&mut self) {
        if self.poller.pump() > 0 {
            self.sync_selection();
        }
    }

    fn sync_selection(&mut self) {
        let files = &self.poller.snapshot().data().files;
        self.cursor.sync(files, |f| f.key.as_str());
        if files.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(self.cursor.index()));
        }
    }

    fn select_next(&mut self) {
        let len = self.poller.snapshot().data().len();
        self.cursor.select_next(len);
        self.sync_selection();
    }

    fn select_prev(&mut self) {
        let len = self.poller.snapshot().data().len();
        self.cursor.select_prev(len);
        self.sync_selection();
    }

    fn select_first(&mut self) {
        self.cursor.select_first();
        self.sync_selection();
    }

    fn select_last(&mut self) {
        let len = self.poller.snapshot().data().len();
        self.cursor.select_last(len);
        self.sync_selection();
    }

    /// Key currently selected
    pub fn selected_key(&self) -> Option<&str> {
        self.cursor
            .selected(&self.poller.snapshot().data().files)
            .map(|f| f.key.as_str())
    }

    fn draw_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let snapshot = self.poller.snapshot();
        let listing = snapshot.data();
        let bucket = if listing.bucket_name.is_empty() {
            "-"
        } else {
            listing.bucket_name.as_str()
        };

        let mut spans = vec![
            Span::styled("Bucket: ", theme.hint()),
            Span::styled(bucket.to_string(), theme.title()),
            Span::raw("    "),
            Span::styled(
                format!("Files ({})", listing.len()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            snapshot.status().span(theme),
        ];
        if let Some(elapsed) = snapshot.elapsed_since_refresh() {
            spans.push(Span::styled(
                format!("  updated {}s ago", elapsed.as_secs()),
                theme.hint(),
            ));
        }

        let para = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
        frame.render_widget(para, area);
    }

    fn file_row<'a>(file: &'a FileEntry, theme: &Theme) -> Row<'a> {
        let name = match avatar_url(&file.key) {
            Some(_) => Line::from(vec![
                Span::styled(
                    format!("@{} ", strip_extension(&file.key)),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(file.key.as_str(), Style::default().fg(theme.text)),
            ]),
            None => Line::from(vec![
                Span::styled("▫ ", theme.hint()),
                Span::styled(file.key.as_str(), Style::default().fg(theme.text)),
            ]),
        };

        Row::new(vec![
            Cell::from(name),
            Cell::from(format_file_size(file.size)),
            Cell::from(format_timestamp(&file.last_modified)).style(theme.hint()),
        ])
    }

    fn draw_file_table(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let snapshot = self.poller.snapshot();
        let files = &snapshot.data().files;

        if files.is_empty() {
            let waiting = !snapshot.has_loaded() && !snapshot.has_error();
            let text = if snapshot.is_loading() || waiting {
                "Loading files..."
            } else {
                "No files found in bucket"
            };
            frame.render_widget(Paragraph::new(text).style(theme.hint()), area);
            return;
        }

        let rows: Vec<Row> = files.iter().map(|f| Self::file_row(f, theme)).collect();

        let header = Row::new(vec![
            Cell::from("NAME"),
            Cell::from("SIZE"),
            Cell::from("LAST MODIFIED"),
        ])
        .style(Style::default().add_modifier(Modifier::DIM))
        .bottom_margin(1);

        let widths = [
            Constraint::Min(20),    // NAME
            Constraint::Length(12), // SIZE
            Constraint::Length(20), // LAST MODIFIED
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme.selected())
            .highlight_symbol("> ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = footer_line(&[("j/k/g/G", "select"), ("r", "refresh")], theme);
        spans.push(Span::styled("[a]", theme.key()));
        spans.push(Span::raw(" auto:"));
        spans.push(auto_refresh_span(self.poller.is_running(), theme));
        spans.push(Span::raw("  "));
        spans.extend(footer_line(&[("Tab", "queue"), ("q", "quit")], theme));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for BucketComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::Quit)),
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev();
                Ok(None)
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.select_first();
                Ok(None)
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.select_last();
                Ok(None)
            }
            KeyCode::Char('r') => Ok(Some(Action::Refresh)),
            KeyCode::Char('a') => {
                self.toggle_auto_refresh();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.pump(),
            Action::Refresh => self.refresh(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) -> Result<()> {
        let error = self.poller.snapshot().last_error().map(str::to_string);
        let failures = self.poller.snapshot().consecutive_failures();
        let banner_height = if error.is_some() { 1 } else { 0 };

        let chunks = Layout::vertical([
            Constraint::Length(2),             // Status bar
            Constraint::Length(banner_height), // Error banner
            Constraint::Fill(1),               // File table
            Constraint::Length(1),             // Footer
        ])
        .split(area);

        self.draw_status_bar(frame, chunks[0], theme);
        if let Some(message) = &error {
            draw_error_banner(frame, chunks[1], message, failures, theme);
        }
        self.draw_file_table(frame, chunks[2], theme);
        self.draw_footer(frame, chunks[3], theme);

        Ok(())
    }
}
