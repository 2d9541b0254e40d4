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

//! Uniform access to the two players behind the controls bar

use eyre::{Report, Result};
use stepview_viewer::{BubbleSortViewer, Control, ControlPanel, DebuggerControls};

/// Player driven by the controls bar
#[derive(Debug, Clone)]
pub enum Player {
    /// Lesson debugger with its autoplay loop
    Debugger(DebuggerControls),
    /// Bubble sort step table
    Sort(BubbleSortViewer),
}

impl Player {
    /// Buttons and speed selector as currently shown
    pub fn panel(&self) -> ControlPanel {
        match self {
            Self::Debugger(controls) => controls.panel(),
            Self::Sort(viewer) => viewer.panel(),
        }
    }

    /// Press a button
    pub fn activate(&self, control: Control) -> Result<()> {
        match self {
            Self::Debugger(controls) => controls.activate(control),
            Self::Sort(viewer) => {
                viewer.activate(control);
                Ok(())
            }
        }
    }

    /// Select the next faster speed
    pub fn faster(&self) {
        match self {
            Self::Debugger(controls) => controls.faster(),
            Self::Sort(viewer) => viewer.faster(),
        }
    }

    /// Select the next slower speed
    pub fn slower(&self) {
        match self {
            Self::Debugger(controls) => controls.slower(),
            Self::Sort(viewer) => viewer.slower(),
        }
    }

    /// Select an explicit speed multiplier
    pub fn set_speed(&self, multiplier: f64) -> Result<()> {
        match self {
            Self::Debugger(controls) => controls.set_speed(multiplier)?,
            Self::Sort(viewer) => viewer.set_speed(multiplier)?,
        }
        Ok(())
    }

    /// Error that stopped autoplay, if any
    pub fn take_failure(&self) -> Option<Report> {
        match self {
            Self::Debugger(controls) => controls.take_failure(),
            Self::Sort(_) => None,
        }
    }

    /// Short description of the current position
    pub fn position(&self) -> String {
        match self {
            Self::Debugger(controls) => match controls.debugger().borrow().current_line_number() {
                Some(line) => format!("line {line}"),
                None => "not started".to_string(),
            },
            Self::Sort(viewer) => format!("step {}/{}", viewer.current() + 1, viewer.len()),
        }
    }
}
