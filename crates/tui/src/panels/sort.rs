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

//! Bubble sort panel: the array at the current step

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use stepview_viewer::{color_for, BubbleSortViewer, SwapStep};

use super::{panel_block, Panel, PanelType};
use crate::{config::Config, ui::Icons, ColorScheme};

/// Sort panel implementation
#[derive(Debug)]
pub struct SortPanel {
    viewer: BubbleSortViewer,
    colors: ColorScheme,
    focused: bool,
}

impl SortPanel {
    /// Create a panel showing `viewer`'s current step
    pub fn new(viewer: BubbleSortViewer, colors: ColorScheme) -> Self {
        Self { viewer, colors, focused: false }
    }

    fn item_style(&self, value: i64) -> Style {
        let color = color_for(value).map(Config::parse_color).unwrap_or(Color::Reset);
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    fn content(&self, step: &SwapStep) -> Vec<Line<'static>> {
        let items: Vec<Span<'static>> = step
            .array
            .iter()
            .map(|value| Span::styled(format!("[{value:>3}] "), self.item_style(*value)))
            .collect();

        let markers: Vec<Span<'static>> = (0..step.array.len())
            .map(|index| {
                let marker = if step.is_swapped(index) {
                    Icons::SWAPPING
                } else if step.is_compared(index) {
                    Icons::COMPARING
                } else {
                    " "
                };
                Span::styled(format!("  {marker}   "), Style::default().fg(self.colors.highlight_fg()))
            })
            .collect();

        let caption = match (step.compare, step.swap) {
            (Some((i, j)), _) => format!("Comparing items {i} and {j}"),
            (_, Some((i, j))) => format!("Swapped items {i} and {j}"),
            _ if self.viewer.current() == 0 => "Unsorted".to_string(),
            _ => "Sorted".to_string(),
        };

        vec![
            Line::from(items),
            Line::from(markers),
            Line::raw(""),
            Line::styled(caption, Style::default().fg(self.colors.help_text())),
        ]
    }
}

impl Panel for SortPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let step = self.viewer.current_step();
        let block = panel_block(self.title(), self.focused, &self.colors);
        let paragraph =
            Paragraph::new(self.content(&step)).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Sort
    }

    fn title(&self) -> String {
        format!("Bubble sort (Step {}/{})", self.viewer.current() + 1, self.viewer.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use ratatui::{backend::TestBackend, Terminal};
    use stepview_viewer::ViewerConfig;

    #[test]
    fn test_renders_compare_markers() {
        let viewer = BubbleSortViewer::new(&[2, 1], &ViewerConfig::bubble_sort()).unwrap();
        let mut panel =
            SortPanel::new(viewer.clone(), ThemeConfig::default().themes["default"].colors.clone());
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();

        viewer.step();
        terminal.draw(|frame| panel.render(frame, frame.area())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(text.contains("Step 2/5"));
        assert!(text.contains("[  2]"));
        assert!(text.contains(Icons::COMPARING));
        assert!(text.contains("Comparing items 0 and 1"));
    }
}
