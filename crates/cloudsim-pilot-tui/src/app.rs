//! Application state and main loop

use crate::action::Action;
use crate::components::{BucketComponent, Component, QueueComponent};
use crate::theme::Theme;
use crate::tui::{self, Tui};
use cloudsim_pilot_core::{MutationOutcome, PilotConfig};
use cloudsim_rs::{ClientOptions, ObjectStoreClient, QueueClient};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::Tabs,
};
use std::str::FromStr;
use std::time::Duration;

/// Which dashboard is on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewKind {
    #[default]
    Bucket,
    Queue,
}

impl ViewKind {
    pub fn next(self) -> Self {
        match self {
            ViewKind::Bucket => ViewKind::Queue,
            ViewKind::Queue => ViewKind::Bucket,
        }
    }

    fn index(self) -> usize {
        match self {
            ViewKind::Bucket => 0,
            ViewKind::Queue => 1,
        }
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bucket" => Ok(ViewKind::Bucket),
            "queue" => Ok(ViewKind::Queue),
            other => Err(format!("unknown view '{}' (expected bucket or queue)", other)),
        }
    }
}

/// Main application state
pub struct App {
    /// Whether the application should quit
    should_quit: bool,
    /// Current view
    view: ViewKind,
    bucket: BucketComponent,
    queue: QueueComponent,
    theme: Theme,
    /// Tick rate for draining poll results (ms)
    tick_rate: Duration,
}

impl App {
    /// Build the app and its clients from configuration
    pub fn new(config: &PilotConfig, view: ViewKind) -> Result<Self> {
        let options = ClientOptions::default().with_request_timeout(config.request_timeout());
        let bucket_client = ObjectStoreClient::new(config.bucket_endpoint(), &options)?;
        let queue_client = QueueClient::new(config.queue_endpoint(), &options)?;

        tracing::info!(
            "Bucket service at {}, queue service at {}",
            bucket_client.base_url(),
            queue_client.base_url()
        );

        Ok(Self {
            should_quit: false,
            view,
            bucket: BucketComponent::new(bucket_client, config.bucket_interval()),
            queue: QueueComponent::new(queue_client, config.queue_interval()),
            theme: Theme::from_kind(config.theme),
            tick_rate: Duration::from_millis(250),
        })
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Install panic hook
        tui::install_panic_hook();

        // Initialize terminal
        let mut terminal = tui::init()?;

        // Main loop
        let result = self.main_loop(&mut terminal).await;

        // Restore terminal
        tui::restore()?;

        result
    }

    /// Main event loop
    async fn main_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        // Both dashboards poll for as long as the app runs
        self.bucket.start();
        self.queue.start();

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            // Handle events with timeout
            if event::poll(self.tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = self.handle_key_event(key)? {
                            if action == Action::SubmitMessage && self.queue.begin_send() {
                                // Show the sending state while the request is awaited
                                terminal.draw(|frame| self.draw(frame))?;
                            }
                            self.handle_action(action).await?;
                        }
                    }
                    Event::Resize(w, h) => {
                        self.handle_action(Action::Resize(w, h)).await?;
                    }
                    _ => {}
                }
            } else {
                self.handle_action(Action::Tick).await?;
            }

            if self.should_quit {
                break;
            }
        }

        self.bucket.stop();
        self.queue.stop();
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).split(frame.area());
        self.draw_tabs(frame, chunks[0]);

        let result = match self.view {
            ViewKind::Bucket => self.bucket.draw(frame, chunks[1], &self.theme),
            ViewKind::Queue => self.queue.draw(frame, chunks[1], &self.theme),
        };
        if let Err(e) = result {
            tracing::error!("Failed to draw {:?} view: {}", self.view, e);
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(vec![Line::from(" [1] Bucket "), Line::from(" [2] Queue ")])
            .select(self.view.index())
            .style(self.theme.hint())
            .highlight_style(self.theme.title())
            .divider("|");
        frame.render_widget(tabs, area);
    }

    /// Route a key press: app-wide keys first, then the active view
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let capturing = self.view == ViewKind::Queue && self.queue.is_capturing_input();
        if !capturing {
            match key.code {
                KeyCode::Tab => return Ok(Some(Action::NextView)),
                KeyCode::Char('1') => return Ok(Some(Action::ShowView(ViewKind::Bucket))),
                KeyCode::Char('2') => return Ok(Some(Action::ShowView(ViewKind::Queue))),
                _ => {}
            }
        }

        match self.view {
            ViewKind::Bucket => self.bucket.handle_key_event(key),
            ViewKind::Queue => self.queue.handle_key_event(key),
        }
    }

    /// Handle an action
    async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::NextView => {
                self.view = self.view.next();
            }
            Action::ShowView(view) => {
                self.view = view;
            }
            Action::Tick => {
                // Both pipelines keep syncing while hidden
                self.bucket.update(Action::Tick)?;
                self.queue.update(Action::Tick)?;
            }
            Action::Refresh => match self.view {
                ViewKind::Bucket => {
                    self.bucket.update(Action::Refresh)?;
                }
                ViewKind::Queue => {
                    self.queue.update(Action::Refresh)?;
                }
            },
            Action::SubmitMessage => {
                if let MutationOutcome::Failed(e) = self.queue.submit().await {
                    tracing::warn!("Send failed: {}", e);
                }
            }
            Action::DeleteMessage(receipt_handle) => {
                if let MutationOutcome::Failed(e) = self.queue.delete(&receipt_handle).await {
                    tracing::warn!("Delete failed: {}", e);
                }
            }
            Action::Resize(_, _) => {
                // Next draw picks up the new size
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::new(&PilotConfig::default(), ViewKind::Bucket).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_view_kind_parse() {
        assert_eq!("queue".parse::<ViewKind>(), Ok(ViewKind::Queue));
        assert_eq!("Bucket".parse::<ViewKind>(), Ok(ViewKind::Bucket));
        assert!("logs".parse::<ViewKind>().is_err());
        assert_eq!(ViewKind::Bucket.next(), ViewKind::Queue);
    }

    #[test]
    fn test_invalid_endpoint_is_an_error() {
        let mut config = PilotConfig::default();
        config.queue.endpoint = Some("   ".to_string());
        assert!(App::new(&config, ViewKind::Bucket).is_err());
    }

    #[tokio::test]
    async fn test_view_switching_keys() {
        let mut app = app();

        let action = app.handle_key_event(key(KeyCode::Tab)).unwrap().unwrap();
        app.handle_action(action).await.unwrap();
        assert_eq!(app.view(), ViewKind::Queue);

        let action = app.handle_key_event(key(KeyCode::Char('1'))).unwrap().unwrap();
        app.handle_action(action).await.unwrap();
        assert_eq!(app.view(), ViewKind::Bucket);

        let action = app.handle_key_event(key(KeyCode::Char('2'))).unwrap().unwrap();
        app.handle_action(action).await.unwrap();
        assert_eq!(app.view(), ViewKind::Queue);
    }

    #[tokio::test]
    async fn test_digits_go_to_open_composer() {
        let mut app = app();
        app.handle_action(Action::ShowView(ViewKind::Queue))
            .await
            .unwrap();

        assert_eq!(app.handle_key_event(key(KeyCode::Char('n'))).unwrap(), None);
        assert_eq!(app.handle_key_event(key(KeyCode::Char('1'))).unwrap(), None);
        assert_eq!(app.handle_key_event(key(KeyCode::Tab)).unwrap(), None);
        assert_eq!(app.view(), ViewKind::Queue);
        assert_eq!(app.queue.composer().body(), "1");
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = app();
        let action = app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert_eq!(action, Some(Action::Quit));
        app.handle_action(Action::Quit).await.unwrap();
        assert!(app.should_quit());
    }
}
