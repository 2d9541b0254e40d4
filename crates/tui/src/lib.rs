// StepView - Step-through Execution Viewer
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Terminal User Interface for StepView
//!
//! This crate provides a terminal-based interface for stepping through lessons
//! and the bubble sort demo, plus a headless replay of a lesson.

mod app;
mod config;
mod layout;
mod panels;
mod player;
mod ui;

pub use app::App;
pub use config::{
    CodePanelConfig, ColorScheme, Config, PanelConfig, ScopePanelConfig, Theme, ThemeConfig,
};
pub use layout::{LayoutAreas, LayoutManager, LayoutType};
pub use panels::{EventResponse, PanelType};
pub use player::Player;
pub use ui::Icons;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::{select, time::interval};
use tracing::{debug, error, info};

/// Configuration for the TUI
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Terminal refresh interval
    pub refresh_interval: Duration,
    /// Enable mouse support
    pub enable_mouse: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { refresh_interval: Duration::from_millis(50), enable_mouse: false }
    }
}

/// Main TUI runner that manages the terminal interface and event loop
pub struct Tui {
    /// The main application state and panel management
    app: App,
    /// Terminal backend for rendering and input handling
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Configuration settings for the TUI behavior
    config: TuiConfig,
}

impl Tui {
    /// Take over the terminal to show `app`
    pub fn new(app: App, config: TuiConfig) -> Result<Self> {
        info!("Initializing TUI with config: {:?}", config);

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.enable_mouse {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { app, terminal, config })
    }

    /// Run the main TUI event loop
    ///
    /// Must be awaited inside a [`tokio::task::LocalSet`], which runs the
    /// autoplay tasks.
    pub async fn run(mut self) -> Result<()> {
        info!("Starting TUI event loop");

        let mut event_stream = EventStream::new();
        let mut ticker = interval(self.config.refresh_interval);

        let result = loop {
            // Render current state
            if let Err(e) = self.terminal.draw(|frame| self.app.render(frame)) {
                break Err(e.into());
            }

            select! {
                // Handle terminal events (keyboard, mouse, resize)
                event_result = event_stream.next() => {
                    match event_result {
                        Some(Ok(Event::Key(key_event))) => {
                            if self.handle_key_event(key_event)? {
                                break Ok(());
                            }
                        }
                        Some(Ok(Event::Resize(width, height))) => {
                            debug!("Terminal resized: {}x{}", width, height);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => break Err(e.into()),
                        None => break Ok(()),
                    }
                }

                // Periodic refresh tick
                _ = ticker.tick() => self.app.update(),
            }

            // Check if app wants to exit
            if self.app.should_exit() {
                info!("App requested exit");
                break Ok(());
            }
        };

        info!("TUI event loop ended");
        result
    }

    // Handle a single key event, returning true if the app should exit
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        match self.app.handle_key_event(key_event)? {
            EventResponse::Exit => {
                info!("Exit requested");
                return Ok(true);
            }
            EventResponse::Handled => {}
            EventResponse::NotHandled => {
                debug!("Unhandled key event: {:?}", key_event);
            }
            EventResponse::ChangeFocus(panel_type) => {
                debug!("Focus change requested to {:?}", panel_type);
                self.app.change_focus(panel_type);
            }
        }

        Ok(false)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        if self.config.enable_mouse {
            let _ =
                execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
        } else {
            let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Public API for the TUI module
pub mod api {
    use super::*;
    use std::{io::Write, path::Path};
    use stepview_common::display_value;
    use stepview_viewer::Lesson;
    use tokio::task::LocalSet;

    async fn run_app(app: App, speed: Option<f64>, tui_config: TuiConfig) -> Result<()> {
        if let Some(speed) = speed {
            app.player().set_speed(speed)?;
        }
        LocalSet::new()
            .run_until(async move {
                let result = Tui::new(app, tui_config)?.run().await;
                if let Err(e) = &result {
                    error!("TUI error: {e:#}");
                }
                result
            })
            .await
    }

    /// Step through the lesson at `path`
    pub async fn start_lesson(
        path: impl AsRef<Path>,
        config: &Config,
        speed: Option<f64>,
        tui_config: TuiConfig,
    ) -> Result<()> {
        let lesson = Lesson::load(path)?;
        let app = App::lesson(&lesson, config)?;
        run_app(app, speed, tui_config).await
    }

    /// Play a bubble sort of `input`
    pub async fn start_sort(
        input: &[i64],
        config: &Config,
        speed: Option<f64>,
        tui_config: TuiConfig,
    ) -> Result<()> {
        let app = App::sort(input, config)?;
        run_app(app, speed, tui_config).await
    }

    /// Step the lesson at `path` to its end and write every stop to `out`
    pub fn replay_lesson(path: impl AsRef<Path>, config: &Config, out: &mut impl Write) -> Result<()> {
        let lesson = Lesson::load(path)?;
        let stops = lesson.replay(&config.viewer)?;

        writeln!(out, "{}", lesson.title)?;
        for stop in &stops {
            let scope = stop
                .scope
                .iter()
                .map(|(name, value)| format!("{name} = {}", display_value(value)))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "{:>4} | {:<32} | {}", stop.line, stop.text, scope)?;
        }
        writeln!(out, "{} stops", stops.len())?;
        Ok(())
    }
}
