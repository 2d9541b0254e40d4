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

//! Code panel for displaying the lesson source
//!
//! This panel shows the displayed fragment with syntax highlighting and the
//! current line. A line that was just selected flashes briefly, even when the
//! same line is selected twice in a row.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};
use stepview_viewer::SharedDebugger;
use tracing::debug;

use super::{panel_block, EventResponse, Panel, PanelType};
use crate::{
    config::CodePanelConfig,
    ui::{syntax, Icons},
    ColorScheme,
};

/// Code panel implementation
#[derive(Debug)]
pub struct CodePanel {
    debugger: SharedDebugger,
    title: String,
    colors: ColorScheme,
    config: CodePanelConfig,
    /// First displayed line (0-based)
    scroll_offset: usize,
    /// Lines that fit in the panel
    context_height: usize,
    /// Whether this panel is focused
    focused: bool,
    /// Selection epoch seen on the last render
    seen_epoch: u64,
    /// End of the current flash
    flash_until: Option<Instant>,
}

impl CodePanel {
    /// Create a code panel over `debugger`
    pub fn new(
        debugger: SharedDebugger,
        title: impl Into<String>,
        colors: ColorScheme,
        config: CodePanelConfig,
    ) -> Self {
        Self {
            debugger,
            title: title.into(),
            colors,
            config,
            scroll_offset: 0,
            context_height: 0,
            focused: false,
            seen_epoch: 0,
            flash_until: None,
        }
    }

    /// Keep `line` (1-based) inside the viewport
    fn follow(&mut self, line: usize) {
        let index = line.saturating_sub(1);
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.context_height > 0 && index >= self.scroll_offset + self.context_height {
            self.scroll_offset = index + 1 - self.context_height;
        }
    }

    fn track_selection(&mut self) -> Option<usize> {
        let (current, epoch) = {
            let debugger = self.debugger.borrow();
            (debugger.current_line_number(), debugger.selection_epoch())
        };

        if epoch != self.seen_epoch {
            self.seen_epoch = epoch;
            if let Some(line) = current {
                debug!("Line {line} selected");
                self.follow(line);
                if self.config.flash_ms > 0 {
                    self.flash_until =
                        Some(Instant::now() + Duration::from_millis(self.config.flash_ms));
                }
            }
        }
        current
    }

    fn is_flashing(&self) -> bool {
        self.flash_until.is_some_and(|until| Instant::now() < until)
    }
}

impl Panel for CodePanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        self.context_height = area.height.saturating_sub(2) as usize;
        let current = self.track_selection();
        let block = panel_block(self.title(), self.focused, &self.colors);

        let debugger = self.debugger.borrow();
        let source = debugger.source();
        if source.is_empty() {
            frame.render_widget(Paragraph::new("No code available").block(block), area);
            return;
        }

        let number_width = source.len().to_string().len();
        let current_bg =
            if self.is_flashing() { self.colors.flash_bg() } else { self.colors.highlight_bg() };

        let items: Vec<ListItem<'_>> = source
            .lines()
            .iter()
            .skip(self.scroll_offset)
            .take(self.context_height)
            .map(|line| {
                let is_current = current == Some(line.number);
                let mut spans = Vec::new();
                if self.config.show_line_numbers {
                    spans.push(Span::styled(
                        format!("{:>number_width$} ", line.number),
                        Style::default().fg(self.colors.line_number()),
                    ));
                }
                spans.push(Span::raw(if is_current {
                    format!("{} ", Icons::CURRENT_LINE)
                } else {
                    "  ".to_string()
                }));

                let code = syntax::line_spans(line, &self.colors);
                if is_current {
                    spans.extend(syntax::recolor(code, self.colors.highlight_fg()));
                    ListItem::new(Line::from(spans)).style(Style::default().bg(current_bg))
                } else {
                    spans.extend(code);
                    ListItem::new(Line::from(spans))
                }
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn handle_key_event(&mut self, event: KeyEvent) -> Result<EventResponse> {
        if !self.focused || event.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }

        let line_count = self.debugger.borrow().source().len();
        let max_offset = line_count.saturating_sub(self.context_height.max(1));
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                Ok(EventResponse::Handled)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = (self.scroll_offset + 1).min(max_offset);
                Ok(EventResponse::Handled)
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(self.context_height);
                Ok(EventResponse::Handled)
            }
            KeyCode::PageDown => {
                self.scroll_offset = (self.scroll_offset + self.context_height).min(max_offset);
                Ok(EventResponse::Handled)
            }
            _ => Ok(EventResponse::NotHandled),
        }
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Code
    }

    fn title(&self) -> String {
        let debugger = self.debugger.borrow();
        match debugger.current_line_number() {
            Some(line) => format!("{} (line {line}/{})", self.title, debugger.source().len()),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PanelConfig, ThemeConfig};
    use ratatui::{backend::TestBackend, Terminal};
    use stepview_common::TraceStep;
    use stepview_engine::RecordedTrace;
    use stepview_viewer::{Debugger, SourceFragment, ViewerConfig};

    fn panel() -> CodePanel {
        let steps = (1..=6).map(TraceStep::at).collect();
        let source = (1..=6).map(|i| format!("x = {i}")).collect::<Vec<_>>().join("\n");
        let debugger = Debugger::with_engine(
            &[SourceFragment::main(source)],
            &ViewerConfig::default(),
            RecordedTrace::new(steps),
        )
        .unwrap()
        .into_shared();
        CodePanel::new(
            debugger,
            "Lesson",
            ThemeConfig::default().themes["default"].colors.clone(),
            PanelConfig::default().code,
        )
    }

    #[test]
    fn test_viewport_follows_current_line() {
        let mut panel = panel();
        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();

        for _ in 0..5 {
            panel.debugger.borrow_mut().step().unwrap();
        }
        terminal.draw(|frame| panel.render(frame, frame.area())).unwrap();

        // Three rows inside the borders, line 5 at the bottom
        assert_eq!(panel.scroll_offset, 2);
        assert!(panel.is_flashing());
        assert_eq!(panel.title(), "Lesson (line 5/6)");
    }

    #[test]
    fn test_reselecting_a_line_flashes_again() {
        let mut panel = panel();
        panel.config.flash_ms = 60_000;
        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();

        panel.debugger.borrow_mut().set_line(Some(2)).unwrap();
        terminal.draw(|frame| panel.render(frame, frame.area())).unwrap();
        let first = panel.seen_epoch;

        panel.flash_until = None;
        panel.debugger.borrow_mut().set_line(Some(2)).unwrap();
        terminal.draw(|frame| panel.render(frame, frame.area())).unwrap();
        assert_eq!(panel.seen_epoch, first + 1);
        assert!(panel.is_flashing());
    }
}
