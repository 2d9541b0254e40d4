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

//! Lifecycle event registries
//!
//! Every event kind has its own ordered list of callbacks. Callbacks run
//! synchronously in registration order; registering the same closure twice
//! makes it run twice. What happens when a callback fails is decided by the
//! [`DispatchPolicy`].

use std::fmt;

use eyre::Result;
use stepview_common::Scope;
use tracing::warn;

use crate::DispatchPolicy;

/// Callback receiving the public line and the scope of a step
pub type StepCallback = Box<dyn FnMut(usize, &Scope) -> Result<()>>;

/// Callback for events without payload
pub type NotifyCallback = Box<dyn FnMut() -> Result<()>>;

/// Events broadcast by the stepping controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Stopped on a visible line (either direction)
    Step,
    /// Engine reset to its initial state
    Restart,
    /// Stepped back past the first visible line
    ReachedStart,
    /// Stepped forward past the last visible line
    ReachedEnd,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step => write!(f, "step"),
            Self::Restart => write!(f, "restart"),
            Self::ReachedStart => write!(f, "reached-start"),
            Self::ReachedEnd => write!(f, "reached-end"),
        }
    }
}

/// Subscriber registries, one per lifecycle event
pub struct Listeners {
    policy: DispatchPolicy,
    step: Vec<StepCallback>,
    restart: Vec<NotifyCallback>,
    reached_start: Vec<NotifyCallback>,
    reached_end: Vec<NotifyCallback>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("policy", &self.policy)
            .field("step", &self.step.len())
            .field("restart", &self.restart.len())
            .field("reached_start", &self.reached_start.len())
            .field("reached_end", &self.reached_end.len())
            .finish()
    }
}

impl Listeners {
    /// Empty registries using `policy` for failing callbacks
    pub fn new(policy: DispatchPolicy) -> Self {
        Self {
            policy,
            step: Vec::new(),
            restart: Vec::new(),
            reached_start: Vec::new(),
            reached_end: Vec::new(),
        }
    }

    /// Register a step callback
    pub fn on_step(&mut self, callback: impl FnMut(usize, &Scope) -> Result<()> + 'static) {
        self.step.push(Box::new(callback));
    }

    /// Register a payload-free callback for `event`
    ///
    /// Step callbacks need the line and scope; use [`Listeners::on_step`] for those.
    pub fn on(&mut self, event: LifecycleEvent, callback: impl FnMut() -> Result<()> + 'static) {
        let registry = match event {
            LifecycleEvent::Restart => &mut self.restart,
            LifecycleEvent::ReachedStart => &mut self.reached_start,
            LifecycleEvent::ReachedEnd => &mut self.reached_end,
            LifecycleEvent::Step => {
                warn!("Ignoring payload-free subscription to step events");
                return;
            }
        };
        registry.push(Box::new(callback));
    }

    /// Number of callbacks registered for `event`
    pub fn count(&self, event: LifecycleEvent) -> usize {
        match event {
            LifecycleEvent::Step => self.step.len(),
            LifecycleEvent::Restart => self.restart.len(),
            LifecycleEvent::ReachedStart => self.reached_start.len(),
            LifecycleEvent::ReachedEnd => self.reached_end.len(),
        }
    }

    /// Notify step subscribers
    pub fn fire_step(&mut self, line: usize, scope: &Scope) -> Result<()> {
        dispatch(self.policy, LifecycleEvent::Step, &mut self.step, |callback| {
            callback(line, scope)
        })
    }

    /// Notify the subscribers of a payload-free event
    pub fn fire(&mut self, event: LifecycleEvent) -> Result<()> {
        let registry = match event {
            LifecycleEvent::Restart => &mut self.restart,
            LifecycleEvent::ReachedStart => &mut self.reached_start,
            LifecycleEvent::ReachedEnd => &mut self.reached_end,
            LifecycleEvent::Step => return Ok(()),
        };
        dispatch(self.policy, event, registry, |callback| callback())
    }
}

fn dispatch<C>(
    policy: DispatchPolicy,
    event: LifecycleEvent,
    callbacks: &mut [C],
    mut call: impl FnMut(&mut C) -> Result<()>,
) -> Result<()> {
    for (index, callback) in callbacks.iter_mut().enumerate() {
        if let Err(err) = call(callback) {
            match policy {
                DispatchPolicy::Propagate => {
                    return Err(err.wrap_err(format!("{event} subscriber #{index} failed")));
                }
                DispatchPolicy::Isolate => {
                    warn!("{event} subscriber #{index} failed: {err:#}");
                }
            }
        }
    }
    Ok(())
}
