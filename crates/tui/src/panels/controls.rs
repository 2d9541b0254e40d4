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

//! Controls bar: the four player buttons and the speed selector

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use stepview_viewer::Control;
use tracing::{debug, error};

use super::{panel_block, EventResponse, Panel, PanelType};
use crate::{player::Player, ui::Icons, ColorScheme};

const BUTTONS: [(Control, &str); 4] = [
    (Control::Reset, "r"),
    (Control::StepBack, "←"),
    (Control::PlayPause, "space"),
    (Control::Step, "→"),
];

/// Map a key to a player button
pub fn control_for_key(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Char(' ') => Some(Control::PlayPause),
        KeyCode::Right | KeyCode::Char('l') => Some(Control::Step),
        KeyCode::Left | KeyCode::Char('h') => Some(Control::StepBack),
        KeyCode::Char('r') => Some(Control::Reset),
        _ => None,
    }
}

/// Controls panel implementation
#[derive(Debug)]
pub struct ControlsPanel {
    player: Player,
    colors: ColorScheme,
    /// Last error reported by the player
    status: Option<String>,
    focused: bool,
}

impl ControlsPanel {
    /// Create a controls bar for `player`
    pub fn new(player: Player, colors: ColorScheme) -> Self {
        Self { player, colors, status: None, focused: false }
    }

    /// Player behind the buttons
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Last error shown in the bar
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn press(&mut self, control: Control) {
        debug!("Pressing {control}");
        if let Err(err) = self.player.activate(control) {
            error!("{control} failed: {err:#}");
            self.status = Some(format!("{err:#}"));
        } else {
            self.status = None;
        }
    }

    fn buttons_line(&self) -> Line<'static> {
        let panel = self.player.panel();
        let mut spans = Vec::new();
        for (control, key) in BUTTONS {
            let button = panel.button(control);
            let style = if button.enabled {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.disabled())
            };
            spans.push(Span::styled(format!(" {} ", Icons::glyph(button.icon)), style));
            spans.push(Span::styled(
                format!("[{key}]  "),
                Style::default().fg(self.colors.help_text()),
            ));
        }
        spans.push(Span::raw(format!("speed {}", panel.speed.label())));
        spans.push(Span::styled(" [+/-]  ", Style::default().fg(self.colors.help_text())));
        spans.push(Span::raw(self.player.position()));
        Line::from(spans)
    }
}

impl Panel for ControlsPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let mut lines = vec![self.buttons_line()];
        if let Some(status) = &self.status {
            lines.push(Line::styled(status.clone(), Style::default().fg(self.colors.error())));
        }
        let block = panel_block(self.title(), self.focused, &self.colors);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn handle_key_event(&mut self, event: KeyEvent) -> Result<EventResponse> {
        if event.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }
        if let Some(control) = control_for_key(event.code) {
            self.press(control);
            return Ok(EventResponse::Handled);
        }
        match event.code {
            KeyCode::Char('+') | KeyCode::Char('=') => self.player.faster(),
            KeyCode::Char('-') | KeyCode::Char('_') => self.player.slower(),
            _ => return Ok(EventResponse::NotHandled),
        }
        Ok(EventResponse::Handled)
    }

    fn update(&mut self) {
        if let Some(err) = self.player.take_failure() {
            self.status = Some(format!("Autoplay stopped: {err:#}"));
        }
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Controls
    }

    fn title(&self) -> String {
        "Controls".to_string()
    }
}
