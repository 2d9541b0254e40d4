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

//! Stepping and playback orchestration
//!
//! This crate sits between a [`ReversibleEngine`](stepview_engine::ReversibleEngine)
//! and the widgets of a viewer:
//!
//! - [`source`] concatenates the lesson fragments and decides which engine
//!   lines are displayed;
//! - [`debugger`] steps the engine over displayed lines only and broadcasts
//!   lifecycle events;
//! - [`controls`] turns button presses into debugger calls and runs autoplay;
//! - [`bubble_sort`] plays a precomputed table of array states.

pub mod bubble_sort;
pub use bubble_sort::*;

pub mod config;
pub use config::*;

pub mod controls;
pub use controls::*;

pub mod debugger;
pub use debugger::*;

pub mod error;
pub use error::*;

pub mod events;
pub use events::*;

pub mod highlight;
pub use highlight::*;

pub mod lesson;
pub use lesson::*;

pub mod playback;
pub use playback::*;

pub mod source;
pub use source::*;
