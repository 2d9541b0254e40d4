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

//! Lesson files
//!
//! A lesson is a TOML document holding the source fragments of a program and
//! its recorded execution, either inline or in a JSON trace file next to the
//! lesson:
//!
//! ```toml
//! title = "Counting"
//! trace = "counting.trace.json"
//!
//! [[fragment]]
//! text = "total = 0"
//!
//! [[fragment]]
//! main = true
//! text = """
//! for i in range(3):
//!     total = total + i
//! """
//! ```

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use eyre::{bail, Result, WrapErr};
use serde::{Deserialize, Serialize};
use stepview_common::{Scope, TraceStep};
use stepview_engine::RecordedTrace;
use tracing::info;

use crate::{Debugger, SourceFragment, ViewerConfig};

/// Program and recorded execution shown by a viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Heading shown above the code
    pub title: String,
    /// Optional text shown below the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON trace file, relative to the lesson file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<PathBuf>,
    /// Inline trace, used when no trace file is named
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<TraceStep>,
    /// Program text, in concatenation order
    #[serde(rename = "fragment", default)]
    pub fragments: Vec<SourceFragment>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One stop of a headless replay
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Public line number
    pub line: usize,
    /// Displayed text of that line
    pub text: String,
    /// Variables at that point
    pub scope: Scope,
}

impl Lesson {
    /// Read a lesson file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read lesson file {}", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let lesson = Self::from_toml_str(&content, base_dir)
            .wrap_err_with(|| format!("Invalid lesson file {}", path.display()))?;
        info!("Loaded lesson '{}' from {}", lesson.title, path.display());
        Ok(lesson)
    }

    /// Parse a lesson; trace paths are resolved against `base_dir`
    pub fn from_toml_str(content: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut lesson: Self = toml::from_str(content).wrap_err("Failed to parse lesson as TOML")?;
        lesson.base_dir = base_dir.into();
        if lesson.trace.is_some() && !lesson.steps.is_empty() {
            bail!("lesson names a trace file and also has inline steps");
        }
        Ok(lesson)
    }

    /// Recorded execution of the lesson
    pub fn trace_steps(&self) -> Result<Vec<TraceStep>> {
        match &self.trace {
            Some(trace) => {
                let path = self.base_dir.join(trace);
                Ok(RecordedTrace::from_path(&path)?.steps().to_vec())
            }
            None if self.steps.is_empty() => bail!("lesson has no recorded execution"),
            None => Ok(self.steps.clone()),
        }
    }

    /// Debugger replaying the lesson's trace over its fragments
    pub fn build_debugger(&self, config: &ViewerConfig) -> Result<Debugger> {
        let steps = self.trace_steps()?;
        Debugger::new(&self.fragments, config, move |source| {
            Ok(Box::new(RecordedTrace::for_source(steps, source)?))
        })
    }

    /// Step through the whole lesson and collect every stop
    pub fn replay(&self, config: &ViewerConfig) -> Result<Vec<Stop>> {
        let mut debugger = self.build_debugger(config)?;
        let stops = Rc::new(RefCell::new(Vec::new()));

        let (recorded, texts) = (stops.clone(), debugger.source().clone());
        debugger.on_step(move |line, scope| {
            let text = texts.line(line).map(|l| l.text.clone()).unwrap_or_default();
            recorded.borrow_mut().push(Stop { line, text, scope: scope.clone() });
            Ok(())
        });

        while debugger.step()? {}
        Ok(stops.take())
    }
}
