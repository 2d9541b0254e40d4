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

//! Theme colors for highlighted source tokens

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};
use stepview_viewer::{RenderedLine, TokenType};

use crate::{config::Config, ColorScheme};

/// Style of a token of `token_type` under `colors`
pub fn token_style(token_type: TokenType, colors: &ColorScheme) -> Style {
    match token_type {
        TokenType::Keyword => {
            Style::default().fg(Config::parse_color(&colors.keyword)).add_modifier(Modifier::BOLD)
        }
        TokenType::Builtin => Style::default().fg(Config::parse_color(&colors.builtin)),
        TokenType::String => Style::default().fg(Config::parse_color(&colors.string)),
        TokenType::Number => Style::default().fg(Config::parse_color(&colors.number)),
        TokenType::Comment => Style::default()
            .fg(Config::parse_color(&colors.comment))
            .add_modifier(Modifier::ITALIC),
        TokenType::Identifier | TokenType::Operator | TokenType::Punctuation => Style::default(),
    }
}

/// Split a rendered line into styled spans, keeping the text between tokens
pub fn line_spans(line: &RenderedLine, colors: &ColorScheme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for token in &line.tokens {
        if token.start > cursor {
            spans.push(Span::raw(line.text[cursor..token.start].to_string()));
        }
        spans.push(Span::styled(
            line.token_text(token).to_string(),
            token_style(token.token_type, colors),
        ));
        cursor = token.end;
    }
    if cursor < line.text.len() {
        spans.push(Span::raw(line.text[cursor..].to_string()));
    }

    spans
}

/// Force a foreground color on every span (used for the current line)
pub fn recolor(spans: Vec<Span<'static>>, fg: Color) -> Vec<Span<'static>> {
    spans.into_iter().map(|span| span.patch_style(Style::default().fg(fg))).collect()
}
