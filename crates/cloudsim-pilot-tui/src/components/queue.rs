//! Queue component
//!
//! Shows the visible messages and approximate counts of the simulated
//! queue, with a composer dialog for sending and a delete key.

use crate::action::Action;
use crate::components::{Component, draw_error_banner, footer_line};
use crate::theme::Theme;
use crate::ui_ext::{SyncStatusExt, auto_refresh_span};
use cloudsim_pilot_core::{
    Composer, ListCursor, MutationGateway, MutationOutcome, PollingController, QueuePoller,
    short_token, truncate_string,
};
use cloudsim_rs::{Message, QueueClient, QueueSnapshot};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::Duration;

/// Queue messages view
pub struct QueueComponent {
    poller: QueuePoller,
    gateway: MutationGateway<QueueClient>,
    composer: Composer,
    interval: Duration,
    cursor: ListCursor,
    list_state: ListState,
}

impl QueueComponent {
    pub fn new(client: QueueClient, interval: Duration) -> Self {
        Self {
            gateway: MutationGateway::new(client.clone()),
            poller: PollingController::new(client, QueueSnapshot::default()),
            composer: Composer::new(),
            interval,
            cursor: ListCursor::new(),
            list_state: ListState::default(),
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

    pub fn poller(&self) -> &QueuePoller {
        &self.poller
    }

    pub fn poller_mut(&mut self) -> &mut QueuePoller {
        &mut self.poller
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Whether keystrokes belong to the composer dialog
    pub fn is_capturing_input(&self) -> bool {
        self.composer.is_open()
    }

    /// Send the composer's body
    pub async fn submit(&mut self) -> MutationOutcome {
        self.gateway.send(&mut self.composer, &mut self.poller).await
    }

    /// Flag the composer as sending so the next frame shows it
    pub fn begin_send(&mut self) -> bool {
        self.composer.begin_send()
    }

    /// Delete the message leased under `receipt_handle`
    pub async fn delete(&mut self, receipt_handle: &str) -> MutationOutcome {
        if let Some(message) = self.poller.snapshot().data().find_by_receipt(receipt_handle) {
            tracing::debug!("Deleting message {}", message.message_id);
        }
        self.gateway.delete(receipt_handle, &mut self.poller).await
    }

    fn pump(&mut self) {
        if self.poller.pump() > 0 {
            self.sync_selection();
        }
    }

    fn sync_selection(&mut self) {
        let messages = &self.poller.snapshot().data().messages;
        self.cursor.sync(messages, |m| m.message_id.as_str());
        if messages.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.cursor.index()));
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

    pub fn selected_message(&self) -> Option<&Message> {
        self.cursor.selected(&self.poller.snapshot().data().messages)
    }

    fn handle_composer_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.composer.close();
                None
            }
            KeyCode::Enter
                if key.modifiers.contains(KeyModifiers::ALT)
                    || key.modifiers.contains(KeyModifiers::SHIFT) =>
            {
                self.composer.newline();
                None
            }
            KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.composer.newline();
                None
            }
            KeyCode::Enter => {
                if self.composer.can_submit() {
                    Some(Action::SubmitMessage)
                } else {
                    None
                }
            }
            KeyCode::Backspace => {
                self.composer.backspace();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.composer.push(c);
                None
            }
            _ => None,
        }
    }

    fn draw_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let snapshot = self.poller.snapshot();
        let queue = snapshot.data();
        let name = if queue.queue_name.is_empty() {
            "-"
        } else {
            queue.queue_name.as_str()
        };

        let chip = |label: &str, value: String, color| {
            vec![
                Span::styled(format!(" {}: ", label), theme.hint()),
                Span::styled(
                    value,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("   "),
            ]
        };

        let mut spans = Vec::new();
        spans.extend(chip("Visible", queue.visible_count.to_string(), theme.success));
        spans.extend(chip("In Flight", queue.in_flight_count.to_string(), theme.warning));
        spans.extend(chip("Queue", name.to_string(), theme.accent));
        spans.push(snapshot.status().span(theme));

        let para = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
        frame.render_widget(para, area);
    }

    fn message_item<'a>(message: &'a Message, width: usize, theme: &Theme) -> ListItem<'a> {
        let body = message.body.lines().next().unwrap_or("");
        let lines = vec![
            Line::from(Span::styled(
                message.message_id.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                truncate_string(body, width.saturating_sub(4)),
                Style::default().fg(theme.text),
            )),
            Line::from(vec![
                Span::styled(
                    format!("MD5: {}", short_token(&message.md5_of_body)),
                    theme.hint(),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("Handle: {}", short_token(&message.receipt_handle)),
                    theme.hint(),
                ),
            ]),
            Line::from(""),
        ];
        ListItem::new(lines)
    }

    fn draw_message_list(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let snapshot = self.poller.snapshot();
        let messages = &snapshot.data().messages;

        let block = Block::default()
            .title(Span::styled(
                format!(" Messages ({}) ", messages.len()),
                theme.title(),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border));

        if messages.is_empty() {
            let waiting = !snapshot.has_loaded() && !snapshot.has_error();
            let text = if snapshot.is_loading() || waiting {
                "Loading messages..."
            } else {
                "No messages in queue"
            };
            frame.render_widget(Paragraph::new(text).style(theme.hint()).block(block), area);
            return;
        }

        let width = area.width as usize;
        let items: Vec<ListItem> = messages
            .iter()
            .map(|m| Self::message_item(m, width, theme))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.selected())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn draw_composer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let overlay_width = 60.min(area.width.saturating_sub(4));
        let overlay_height = 12.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
        let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

        frame.render_widget(Clear, overlay_area);

        let block = Block::default()
            .title(Span::styled(" Send Message ", theme.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent));
        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(inner);

        let mut text: Vec<Line> = self.composer.body().split('\n').map(Line::from).collect();
        if let Some(last) = text.last_mut() {
            last.push_span(Span::styled("▏", Style::default().fg(theme.accent)));
        }
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), chunks[0]);

        let footer = if self.composer.is_sending() {
            Line::from(Span::styled("Sending...", Style::default().fg(theme.warning)))
        } else {
            Line::from(footer_line(
                &[("Enter", "send"), ("Alt+Enter", "newline"), ("Esc", "cancel")],
                theme,
            ))
        };
        frame.render_widget(Paragraph::new(footer), chunks[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = footer_line(
            &[("j/k/g/G", "select"), ("n", "new"), ("d", "delete"), ("r", "refresh")],
            theme,
        );
        spans.push(Span::styled("[a]", theme.key()));
        spans.push(Span::raw(" auto:"));
        spans.push(auto_refresh_span(self.poller.is_running(), theme));
        spans.push(Span::raw("  "));
        spans.extend(footer_line(&[("Tab", "bucket"), ("q", "quit")], theme));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for QueueComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.composer.is_open() {
            return Ok(self.handle_composer_key(key));
        }

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
            KeyCode::Char('n') => {
                self.composer.open();
                Ok(None)
            }
            KeyCode::Char('d') => Ok(self
                .selected_message()
                .map(|m| Action::DeleteMessage(m.receipt_handle.clone()))),
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
            Constraint::Fill(1),               // Message list
            Constraint::Length(1),             // Footer
        ])
        .split(area);

        self.draw_status_bar(frame, chunks[0], theme);
        if let Some(message) = &error {
            draw_error_banner(frame, chunks[1], message, failures, theme);
        }
        self.draw_message_list(frame, chunks[2], theme);
        self.draw_footer(frame, chunks[3], theme);

        if self.composer.is_open() {
            self.draw_composer(frame, area, theme);
        }

        Ok(())
    }
}
