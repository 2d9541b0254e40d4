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

//! Adaptive layout management
//!
//! This module splits the screen according to the terminal width.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout types for different terminal sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutType {
    /// Main panel and side panel next to each other (≥100 columns)
    SideBySide,
    /// Main panel above the side panel (<100 columns)
    Stacked,
}

/// Screen regions of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutAreas {
    /// Lesson title and description
    pub header: Rect,
    /// Code or array panel
    pub main: Rect,
    /// Scope panel, absent on screens without one
    pub side: Option<Rect>,
    /// Controls bar
    pub controls: Rect,
    /// Key help line
    pub help: Rect,
}

/// Layout manager for responsive design
#[derive(Debug)]
pub struct LayoutManager {
    current_layout: LayoutType,
    terminal_width: u16,
    terminal_height: u16,
}

impl LayoutManager {
    /// Width from which the side panel moves next to the main one
    pub const SIDE_BY_SIDE_WIDTH: u16 = 100;

    /// Create a new layout manager with default values
    pub fn new() -> Self {
        Self { current_layout: LayoutType::Stacked, terminal_width: 80, terminal_height: 24 }
    }

    /// Update terminal dimensions and recalculate layout
    pub fn update_size(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
        self.current_layout = if width >= Self::SIDE_BY_SIDE_WIDTH {
            LayoutType::SideBySide
        } else {
            LayoutType::Stacked
        };
    }

    /// Get current layout type
    pub fn layout_type(&self) -> LayoutType {
        self.current_layout
    }

    /// Split `area`, reserving a side region when `with_side` is set
    pub fn split(&mut self, area: Rect, with_side: bool) -> LayoutAreas {
        self.update_size(area.width, area.height);

        let [header, body, controls, help] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(4),
                Constraint::Length(1),
            ])
            .areas(area);

        if !with_side {
            return LayoutAreas { header, main: body, side: None, controls, help };
        }

        let (direction, constraints) = match self.current_layout {
            LayoutType::SideBySide => {
                (Direction::Horizontal, [Constraint::Percentage(60), Constraint::Percentage(40)])
            }
            LayoutType::Stacked => {
                (Direction::Vertical, [Constraint::Percentage(60), Constraint::Percentage(40)])
            }
        };
        let [main, side] = Layout::default().direction(direction).constraints(constraints).areas(body);
        LayoutAreas { header, main, side: Some(side), controls, help }
    }
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new()
    }
}
