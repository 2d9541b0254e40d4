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

//! Reversible execution engines
//!
//! The stepping controller never interprets programs itself. It drives an
//! engine that can move one execution step forward or backward and report
//! where it stopped. This crate defines that capability ([`ReversibleEngine`])
//! and ships [`RecordedTrace`], an engine that replays a pre-recorded trace.

pub mod error;
pub use error::*;

pub mod recorded;
pub use recorded::*;

pub mod reversible;
pub use reversible::*;
