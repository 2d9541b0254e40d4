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

//! Panel framework and implementations
//!
//! This module contains the panel trait and all panel implementations.

use crossterm::event::KeyEvent;
use eyre::Result;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders},
    Frame,
};
use std::fmt::Debug;

use crate::ColorScheme;

/// Panel types for identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Highlighted source of the lesson
    Code,
    /// Variables at the current stop
    Scope,
    /// Player buttons and speed selector
    Controls,
    /// Bubble sort array
    Sort,
}

/// Response from panel event handling
#[derive(Debug, PartialEq, Eq)]
pub enum EventResponse {
    /// Event was handled, no further action needed
    Handled,
    /// Event was not handled, pass to next handler
    NotHandled,
    /// Request focus change to another panel
    ChangeFocus(PanelType),
    /// Request application exit
    Exit,
}

/// Trait for UI panels
pub trait Panel: Debug {
    /// Render the panel content
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect);

    /// Handle keyboard events
    fn handle_key_event(&mut self, event: KeyEvent) -> Result<EventResponse> {
        let _ = event;
        Ok(EventResponse::NotHandled)
    }

    /// Called on every refresh tick
    fn update(&mut self) {}

    /// Called when this panel gains focus
    fn on_focus(&mut self) {}

    /// Called when this panel loses focus
    fn on_blur(&mut self) {}

    /// Get the panel type
    fn panel_type(&self) -> PanelType;

    /// Get panel title for display
    fn title(&self) -> String {
        format!("{:?}", self.panel_type())
    }
}

/// Bordered block whose border color follows the focus
pub fn panel_block(title: String, focused: bool, colors: &ColorScheme) -> Block<'static> {
    let border = if focused { colors.focused_border() } else { colors.unfocused_border() };
    Block::default().title(title).borders(Borders::ALL).border_style(Style::default().fg(border))
}

pub mod code;
pub mod controls;
pub mod scope;
pub mod sort;

pub use code::CodePanel;
pub use controls::ControlsPanel;
pub use scope::ScopePanel;
pub use sort::SortPanel;
