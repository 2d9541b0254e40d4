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

//! The engine capability consumed by the stepping controller

use auto_impl::auto_impl;
use stepview_common::Scope;

/// An execution engine that can move through a program in both directions.
///
/// # Contract
///
/// - `step` returns `false` once the trace is exhausted going forward, and
///   keeps returning `false` until the engine is moved back or restarted.
/// - `step_back` returns `false` once the engine is back at its initial
///   state (before the first step).
/// - `line` and `scope` describe the position reached by the last `step` or
///   `step_back` call that returned `true`; after a call that returned `false`
///   they may be `None`.
///
/// Both directions must eventually report exhaustion. The stepping controller
/// skips positions it is not interested in by stepping repeatedly, and relies
/// on this to terminate.
#[auto_impl(&mut, Box)]
pub trait ReversibleEngine {
    /// Advance one raw execution step
    fn step(&mut self) -> bool;

    /// Go back one raw execution step
    fn step_back(&mut self) -> bool;

    /// Return to the initial state without recreating the engine
    fn restart(&mut self);

    /// 1-based line number of the current position, across the whole source
    fn line(&self) -> Option<usize>;

    /// Variable bindings at the current position
    fn scope(&self) -> Option<&Scope>;
}
