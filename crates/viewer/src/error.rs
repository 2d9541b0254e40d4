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

//! Viewer error taxonomy
//!
//! Configuration errors are raised while a viewer is being built and stop it
//! from starting. Lookup errors are raised where a missing line is used.
//! Reaching either end of the trace is not an error.

use thiserror::Error;

/// Errors raised by the stepping controller and its collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    /// A viewer needs at least one source fragment
    #[error("debugger requires at least one source fragment")]
    NoFragments,

    /// Only one fragment may be displayed
    #[error("multiple main source fragments found (fragments {first} and {second})")]
    MultipleMainFragments {
        /// Index of the first fragment flagged as main
        first: usize,
        /// Index of the second fragment flagged as main
        second: usize,
    },

    /// A line was selected that the rendered source does not contain
    #[error("line {0} not found")]
    LineNotFound(usize),

    /// The engine reported a successful step without a position
    #[error("engine reported a step without a line or scope")]
    MissingPosition,

    /// Speed multipliers must be finite and positive
    #[error("invalid play speed multiplier {0}")]
    InvalidSpeed(f64),
}
