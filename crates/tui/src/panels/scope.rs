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

//! Scope panel showing the variables at the current stop
//!
//! The panel subscribes to the debugger: every step replaces the displayed
//! scope, and going back to the start or restarting clears it. Names used on
//! the current line are emphasized, followed by the expressions of that line.

use std::{cell::RefCell, rc::Rc};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use serde_json::Value;
use stepview_common::{display_value, Scope};
use stepview_viewer::SharedDebugger;

use super::{panel_block, Panel, PanelType};
use crate::{config::ScopePanelConfig, ui::Icons, ColorScheme};

type LastStop = Rc<RefCell<Option<(usize, Scope)>>>;

/// Scope panel implementation
#[derive(Debug)]
pub struct ScopePanel {
    debugger: SharedDebugger,
    last_stop: LastStop,
    colors: ColorScheme,
    config: ScopePanelConfig,
    focused: bool,
}

impl ScopePanel {
    /// Create the panel and subscribe it to `debugger`
    pub fn new(debugger: SharedDebugger, colors: ColorScheme, config: ScopePanelConfig) -> Self {
        let last_stop = LastStop::default();
        {
            let mut debugger = debugger.borrow_mut();

            let on_step = last_stop.clone();
            debugger.on_step(move |line, scope| {
                *on_step.borrow_mut() = Some((line, scope.clone()));
                Ok(())
            });
            let on_start = last_stop.clone();
            debugger.on_reached_start(move || {
                on_start.borrow_mut().take();
                Ok(())
            });
            let on_restart = last_stop.clone();
            debugger.on_restart(move || {
                on_restart.borrow_mut().take();
                Ok(())
            });
        }

        Self { debugger, last_stop, colors, config, focused: false }
    }

    /// Lines shown for the current stop
    fn content(&self) -> Vec<Line<'static>> {
        let last_stop = self.last_stop.borrow();
        let Some((_, scope)) = last_stop.as_ref() else {
            return vec![Line::styled(
                "Press → to start stepping",
                Style::default().fg(self.colors.help_text()),
            )];
        };

        let debugger = self.debugger.borrow();
        let used = debugger.current_line_identifiers();

        let mut lines: Vec<Line<'static>> = scope
            .iter()
            .map(|(name, value)| {
                let name_style = if used.contains(&name.as_str()) {
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    Style::default()
                };
                let mut spans = vec![
                    Span::styled(name.clone(), name_style),
                    Span::raw(" = "),
                    Span::raw(display_value(value)),
                ];
                if self.config.show_types {
                    spans.push(Span::styled(
                        format!("  ({})", type_name(value)),
                        Style::default().fg(self.colors.line_number()),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        if lines.is_empty() {
            lines.push(Line::styled(
                "No variables yet",
                Style::default().fg(self.colors.help_text()),
            ));
        }

        let expressions = debugger.current_line_expressions();
        if !expressions.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Expressions",
                Style::default().add_modifier(Modifier::BOLD),
            ));
            lines.extend(
                expressions
                    .into_iter()
                    .map(|expression| Line::raw(format!("{} {expression}", Icons::BULLET))),
            );
        }

        lines
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "undefined",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Panel for ScopePanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let block = panel_block(self.title(), self.focused, &self.colors);
        let paragraph = Paragraph::new(self.content()).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Scope
    }

    fn title(&self) -> String {
        match self.last_stop.borrow().as_ref() {
            Some((line, _)) => format!("Scope @ line {line}"),
            None => "Scope".to_string(),
        }
    }
}
