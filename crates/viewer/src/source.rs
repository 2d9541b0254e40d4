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

//! Source fragments and the visible-line filter
//!
//! A lesson is made of several source fragments that are concatenated and
//! handed to the engine as one program. Only the fragment flagged as `main` is
//! shown to the learner, so the engine's line numbers (raw lines) have to be
//! filtered and shifted before they are displayed (public lines).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ViewerError;

/// One piece of program text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFragment {
    /// Program text, as written (indentation is removed for display)
    pub text: String,
    /// Whether this is the fragment shown to the learner
    #[serde(default)]
    pub main: bool,
}

impl SourceFragment {
    /// A hidden fragment (setup code, helpers)
    pub fn hidden(text: impl Into<String>) -> Self {
        Self { text: text.into(), main: false }
    }

    /// The displayed fragment
    pub fn main(text: impl Into<String>) -> Self {
        Self { text: text.into(), main: true }
    }
}

/// Maps raw engine lines to public (displayed) lines
///
/// An empty visible set means that no filtering happens: every raw line is
/// visible and the offset is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFilter {
    line_offset: usize,
    visible_lines: BTreeSet<usize>,
}

impl LineFilter {
    /// A filter that lets every line through unchanged
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Lines `line_offset + 1 ..= line_offset + line_count` are visible
    pub fn new(line_offset: usize, line_count: usize) -> Self {
        let visible_lines = (line_offset + 1..=line_offset + line_count).collect();
        Self { line_offset, visible_lines }
    }

    /// Number of raw lines before the displayed fragment
    pub fn line_offset(&self) -> usize {
        self.line_offset
    }

    /// Raw lines the viewer stops on (empty: all of them)
    pub fn visible_lines(&self) -> &BTreeSet<usize> {
        &self.visible_lines
    }

    /// Whether the viewer stops on `raw_line`
    pub fn is_visible(&self, raw_line: usize) -> bool {
        self.visible_lines.is_empty() || self.visible_lines.contains(&raw_line)
    }

    /// Translate a raw line, or `None` if it is not visible
    pub fn to_public(&self, raw_line: usize) -> Option<usize> {
        if self.is_visible(raw_line) {
            raw_line.checked_sub(self.line_offset)
        } else {
            None
        }
    }
}

/// Result of concatenating the fragments of a lesson
#[derive(Debug, Clone)]
pub struct AssembledSource {
    /// Every fragment, each followed by a line break
    pub source: String,
    /// Dedented, trimmed text of the displayed fragment
    pub display: String,
    /// Raw to public line mapping
    pub filter: LineFilter,
}

impl AssembledSource {
    /// Concatenate `fragments`, locate the displayed one and build the line filter
    ///
    /// Fails when there are no fragments or when more than one is flagged as main.
    pub fn assemble(fragments: &[SourceFragment]) -> Result<Self, ViewerError> {
        if fragments.is_empty() {
            return Err(ViewerError::NoFragments);
        }

        let mut source = String::new();
        let mut main: Option<(usize, String, LineFilter)> = None;

        for (index, fragment) in fragments.iter().enumerate() {
            if fragment.main {
                if let Some((first, ..)) = main {
                    return Err(ViewerError::MultipleMainFragments { first, second: index });
                }
                let line_offset = source.matches('\n').count();
                let display = dedent(&fragment.text).trim().to_string();
                let filter = LineFilter::new(line_offset, display.split('\n').count());
                main = Some((index, display, filter));
            }
            source.push_str(&fragment.text);
            source.push('\n');
        }

        let (display, filter) = match main {
            Some((_, display, filter)) => (display, filter),
            None => (dedent(&source).trim().to_string(), LineFilter::unfiltered()),
        };

        debug!(
            "Assembled {} fragments, line offset {}, {} visible lines",
            fragments.len(),
            filter.line_offset(),
            filter.visible_lines().len()
        );

        Ok(Self { source, display, filter })
    }

    /// Program text handed to the engine
    ///
    /// Only trailing whitespace is dropped, so raw line numbers keep matching
    /// the concatenated fragments.
    pub fn engine_source(&self) -> &str {
        self.source.trim_end()
    }
}

/// Remove the indentation shared by every non-blank line
pub fn dedent(text: &str) -> String {
    let indent_of = |line: &str| line.len() - line.trim_start_matches([' ', '\t']).len();

    let indent =
        text.lines().filter(|line| !line.trim().is_empty()).map(indent_of).min().unwrap_or(0);

    text.split('\n')
        .map(|line| &line[indent_of(line).min(indent)..])
        .collect::<Vec<_>>()
        .join("\n")
}
