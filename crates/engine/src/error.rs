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

//! Trace loading errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a recorded trace
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read
    #[error("failed to read trace file {path:?}: {source}")]
    Io {
        /// Path of the trace file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The trace is not valid JSON or does not match the trace layout
    #[error("malformed trace: {0}")]
    Json(#[from] serde_json::Error),

    /// Line numbers are 1-based
    #[error("trace step {index} reports line 0")]
    ZeroLine {
        /// Index of the offending step
        index: usize,
    },

    /// A step points past the end of the source it was recorded from
    #[error("trace step {index} reports line {line}, but the source has {line_count} lines")]
    LineOutOfRange {
        /// Index of the offending step
        index: usize,
        /// Reported line
        line: usize,
        /// Number of lines in the source
        line_count: usize,
    },
}
