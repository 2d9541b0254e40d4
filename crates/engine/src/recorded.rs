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

//! Replay engine over a pre-recorded execution trace
//!
//! A trace is a list of [`TraceStep`]s. The engine keeps a cursor that sits
//! either before the first step, on a step, or past the last step, so that
//! walking forward to the end and then back again visits exactly the same
//! positions in reverse order.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use stepview_common::{Scope, TraceStep};
use tracing::{debug, trace};

use crate::{ReversibleEngine, TraceError};

/// Where the replay cursor currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Initial state, before the first recorded step
    Start,
    /// On the recorded step with this index
    At(usize),
    /// Past the last recorded step
    End,
}

/// On-disk layout of a recorded trace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceFile {
    /// Recorded positions in execution order
    pub steps: Vec<TraceStep>,
}

/// Engine that replays a recorded trace forward and backward
#[derive(Debug, Clone)]
pub struct RecordedTrace {
    steps: Vec<TraceStep>,
    cursor: Cursor,
}

impl RecordedTrace {
    /// Create an engine over `steps` without validating line numbers
    pub fn new(steps: Vec<TraceStep>) -> Self {
        Self { steps, cursor: Cursor::Start }
    }

    /// Create an engine and check every step against the source it was recorded from
    pub fn for_source(steps: Vec<TraceStep>, source: &str) -> Result<Self, TraceError> {
        let line_count = source.lines().count();
        for (index, step) in steps.iter().enumerate() {
            if step.line == 0 {
                return Err(TraceError::ZeroLine { index });
            }
            if step.line > line_count {
                return Err(TraceError::LineOutOfRange { index, line: step.line, line_count });
            }
        }

        debug!("Loaded recorded trace with {} steps over {} source lines", steps.len(), line_count);
        Ok(Self::new(steps))
    }

    /// Parse a trace from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let file: TraceFile = serde_json::from_str(json)?;
        Ok(Self::new(file.steps))
    }

    /// Read a JSON trace file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| TraceError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&content)
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the trace has no steps at all
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Current cursor position
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// All recorded steps
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    fn current(&self) -> Option<&TraceStep> {
        match self.cursor {
            Cursor::At(index) => self.steps.get(index),
            Cursor::Start | Cursor::End => None,
        }
    }
}

impl ReversibleEngine for RecordedTrace {
    fn step(&mut self) -> bool {
        let next = match self.cursor {
            Cursor::Start => 0,
            Cursor::At(index) => index + 1,
            Cursor::End => return false,
        };

        if next < self.steps.len() {
            self.cursor = Cursor::At(next);
            trace!("Replay cursor moved forward to {next}");
            true
        } else {
            self.cursor = Cursor::End;
            false
        }
    }

    fn step_back(&mut self) -> bool {
        let prev = match self.cursor {
            Cursor::Start | Cursor::At(0) => None,
            Cursor::At(index) => Some(index - 1),
            Cursor::End => self.steps.len().checked_sub(1),
        };

        match prev {
            Some(index) => {
                self.cursor = Cursor::At(index);
                trace!("Replay cursor moved back to {index}");
                true
            }
            None => {
                self.cursor = Cursor::Start;
                false
            }
        }
    }

    fn restart(&mut self) {
        self.cursor = Cursor::Start;
    }

    fn line(&self) -> Option<usize> {
        self.current().map(|step| step.line)
    }

    fn scope(&self) -> Option<&Scope> {
        self.current().map(|step| &step.scope)
    }
}
