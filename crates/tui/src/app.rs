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

//! Main application state
//!
//! The app owns the panels of one screen, routes key events to the focused
//! panel first and to the controls bar second, and lays the panels out.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use stepview_viewer::{BubbleSortViewer, DebuggerControls, Lesson, ViewerConfig};
use tracing::{debug, info};

use crate::{
    config::Config,
    layout::LayoutManager,
    panels::{CodePanel, ControlsPanel, EventResponse, Panel, PanelType, ScopePanel, SortPanel},
    player::Player,
    ColorScheme,
};

const HELP: &str = "space play/pause  →/l step  ←/h back  r reset  +/- speed  tab focus  q quit";

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Heading of the screen
    title: String,
    /// Optional text under the heading
    description: Option<String>,
    /// Layout manager for responsive design
    layout_manager: LayoutManager,
    /// Current focused panel
    current_panel: PanelType,
    /// Panels in focus order
    focus_order: Vec<PanelType>,
    /// All panels
    panels: HashMap<PanelType, Box<dyn Panel>>,
    /// Player shared with the controls bar
    player: Player,
    colors: ColorScheme,
    /// Whether the application should exit
    should_exit: bool,
}

impl App {
    /// Screen stepping through `lesson`
    pub fn lesson(lesson: &Lesson, config: &Config) -> Result<Self> {
        let colors = config.colors();
        let debugger = lesson.build_debugger(&config.viewer)?.into_shared();

        let code = CodePanel::new(
            debugger.clone(),
            lesson.title.clone(),
            colors.clone(),
            config.panels.code.clone(),
        );
        let scope = ScopePanel::new(debugger.clone(), colors.clone(), config.panels.scope.clone());
        let player = Player::Debugger(DebuggerControls::new(debugger, &config.viewer)?);

        info!("Opened lesson '{}'", lesson.title);
        Ok(Self::build(
            lesson.title.clone(),
            lesson.description.clone(),
            vec![Box::new(code) as Box<dyn Panel>, Box::new(scope)],
            player,
            colors,
        ))
    }

    /// Screen playing a bubble sort of `input`
    pub fn sort(input: &[i64], config: &Config) -> Result<Self> {
        let colors = config.colors();
        let viewer_config =
            ViewerConfig { base_delay_ms: config.viewer.base_delay_ms, ..ViewerConfig::bubble_sort() };
        let viewer = BubbleSortViewer::new(input, &viewer_config)?;
        let sort = SortPanel::new(viewer.clone(), colors.clone());

        Ok(Self::build(
            "Bubble sort".to_string(),
            Some(format!("Sorting {input:?}")),
            vec![Box::new(sort) as Box<dyn Panel>],
            Player::Sort(viewer),
            colors,
        ))
    }

    fn build(
        title: String,
        description: Option<String>,
        main_panels: Vec<Box<dyn Panel>>,
        player: Player,
        colors: ColorScheme,
    ) -> Self {
        let mut panels: HashMap<PanelType, Box<dyn Panel>> = HashMap::new();
        let mut focus_order = Vec::new();
        for panel in main_panels {
            focus_order.push(panel.panel_type());
            panels.insert(panel.panel_type(), panel);
        }
        panels.insert(
            PanelType::Controls,
            Box::new(ControlsPanel::new(player.clone(), colors.clone())),
        );
        focus_order.push(PanelType::Controls);

        let mut app = Self {
            title,
            description,
            layout_manager: LayoutManager::new(),
            current_panel: focus_order[0],
            focus_order,
            panels,
            player,
            colors,
            should_exit: false,
        };
        app.update_panel_focus();
        app
    }

    /// Player behind the controls bar
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Render the application
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let with_side = self.panels.contains_key(&PanelType::Scope);
        let areas = self.layout_manager.split(frame.area(), with_side);

        let mut header = vec![Line::styled(
            self.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(description) = &self.description {
            header.push(Line::styled(
                description.clone(),
                Style::default().fg(self.colors.help_text()),
            ));
        }
        frame.render_widget(Paragraph::new(header), areas.header);

        let main = if with_side { PanelType::Code } else { PanelType::Sort };
        self.render_panel(main, frame, areas.main);
        if let Some(side) = areas.side {
            self.render_panel(PanelType::Scope, frame, side);
        }
        self.render_panel(PanelType::Controls, frame, areas.controls);

        frame.render_widget(
            Paragraph::new(HELP).style(Style::default().fg(self.colors.help_text())),
            areas.help,
        );
    }

    fn render_panel(&mut self, panel_type: PanelType, frame: &mut Frame<'_>, area: Rect) {
        if let Some(panel) = self.panels.get_mut(&panel_type) {
            panel.render(frame, area);
        }
    }

    /// Update application state
    pub fn update(&mut self) {
        for panel in self.panels.values_mut() {
            panel.update();
        }
    }

    /// Update panel focus states
    fn update_panel_focus(&mut self) {
        for (panel_type, panel) in &mut self.panels {
            if *panel_type == self.current_panel {
                panel.on_focus();
            } else {
                panel.on_blur();
            }
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<EventResponse> {
        // Only handle key press events
        if key.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }

        debug!("Key pressed: {:?}", key);

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_exit = true;
                return Ok(EventResponse::Exit);
            }
            KeyCode::Tab => {
                self.cycle_panels(false);
                return Ok(EventResponse::Handled);
            }
            KeyCode::BackTab => {
                self.cycle_panels(true);
                return Ok(EventResponse::Handled);
            }
            _ => {}
        }

        if let Some(panel) = self.panels.get_mut(&self.current_panel) {
            let response = panel.handle_key_event(key)?;
            if response != EventResponse::NotHandled {
                return Ok(response);
            }
        }

        // Player keys work from every panel
        match self.panels.get_mut(&PanelType::Controls) {
            Some(controls) if self.current_panel != PanelType::Controls => {
                controls.handle_key_event(key)
            }
            _ => Ok(EventResponse::NotHandled),
        }
    }

    /// Move the focus to `panel_type` if this screen has it
    pub fn change_focus(&mut self, panel_type: PanelType) {
        if self.panels.contains_key(&panel_type) {
            self.current_panel = panel_type;
            self.update_panel_focus();
        }
    }

    /// Cycle through panels (Tab key)
    fn cycle_panels(&mut self, reversed: bool) {
        let count = self.focus_order.len();
        let index = self.focus_order.iter().position(|p| *p == self.current_panel).unwrap_or(0);
        let next = if reversed { (index + count - 1) % count } else { (index + 1) % count };
        self.current_panel = self.focus_order[next];
        self.update_panel_focus();
        debug!("Switched to panel: {:?}", self.current_panel);
    }

    /// Get the focused panel
    pub fn current_panel(&self) -> PanelType {
        self.current_panel
    }

    /// Whether the user asked to quit
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn lesson() -> Lesson {
        Lesson::from_toml_str(
            r#"
title = "Double"

[[fragment]]
main = true
text = """
x = 2
y = x * 2
"""

[[steps]]
line = 1

[[steps]]
line = 2
scope = { x = 2 }
"#,
            ".",
        )
        .unwrap()
    }

    #[test]
    fn test_focus_cycles_through_panels() {
        let mut app = App::lesson(&lesson(), &Config::default()).unwrap();
        assert_eq!(app.current_panel(), PanelType::Code);

        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.current_panel(), PanelType::Scope);
        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.current_panel(), PanelType::Controls);
        app.handle_key_event(key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.current_panel(), PanelType::Scope);
    }

    #[test]
    fn test_player_keys_work_from_the_code_panel() {
        let mut app = App::lesson(&lesson(), &Config::default()).unwrap();

        assert_eq!(app.handle_key_event(key(KeyCode::Right)).unwrap(), EventResponse::Handled);
        assert_eq!(app.player().position(), "line 1");
        app.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        assert_eq!(app.player().position(), "line 2");

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text: String =
            terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Double"));
        assert!(text.contains("x = 2"));

        assert_eq!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap(), EventResponse::Exit);
        assert!(app.should_exit());
    }

    #[test]
    fn test_sort_screen() {
        let mut app = App::sort(&[3, 1, 2], &Config::default()).unwrap();
        assert_eq!(app.current_panel(), PanelType::Sort);
        app.handle_key_event(key(KeyCode::Right)).unwrap();
        assert_eq!(app.player().position(), "step 2/8");
    }
}
