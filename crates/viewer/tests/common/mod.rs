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

//! Fixtures shared by the viewer integration tests

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use serde_json::json;
use stepview_common::{Scope, TraceStep};
use stepview_engine::{RecordedTrace, ReversibleEngine};
use stepview_viewer::{Debugger, SharedDebugger, SourceFragment, ViewerConfig};

/// Program with hidden setup and teardown around the displayed loop
pub fn fragments() -> Vec<SourceFragment> {
    vec![
        SourceFragment::hidden("items = [4, 7]\ntotal = 0"),
        SourceFragment::main("for item in items:\n    total = total + item\nprint(total)"),
        SourceFragment::hidden("assert total == 11"),
    ]
}

/// Execution of [`fragments`]; raw lines 1, 2 and 6 are hidden
pub fn trace() -> Vec<TraceStep> {
    vec![
        TraceStep::at(1),
        TraceStep::at(2).with("items", json!([4, 7])),
        TraceStep::at(3).with("items", json!([4, 7])).with("total", 0),
        TraceStep::at(4).with("item", 4).with("total", 0),
        TraceStep::at(3).with("item", 4).with("total", 4),
        TraceStep::at(4).with("item", 7).with("total", 4),
        TraceStep::at(3).with("item", 7).with("total", 11),
        TraceStep::at(5).with("total", 11),
        TraceStep::at(6).with("total", 11),
    ]
}

/// Public lines the debugger stops on for [`trace`]
pub const STOPS: [usize; 6] = [1, 2, 1, 2, 1, 3];

/// Replay engine that counts how often it is reset
pub struct CountingEngine {
    inner: RecordedTrace,
    restarts: Rc<RefCell<usize>>,
}

impl CountingEngine {
    pub fn new(steps: Vec<TraceStep>) -> (Self, Rc<RefCell<usize>>) {
        let restarts = Rc::new(RefCell::new(0));
        (Self { inner: RecordedTrace::new(steps), restarts: restarts.clone() }, restarts)
    }
}

impl ReversibleEngine for CountingEngine {
    fn step(&mut self) -> bool {
        self.inner.step()
    }

    fn step_back(&mut self) -> bool {
        self.inner.step_back()
    }

    fn restart(&mut self) {
        *self.restarts.borrow_mut() += 1;
        self.inner.restart();
    }

    fn line(&self) -> Option<usize> {
        self.inner.line()
    }

    fn scope(&self) -> Option<&Scope> {
        self.inner.scope()
    }
}

/// Debugger over [`fragments`] and [`trace`]
pub fn debugger(config: &ViewerConfig) -> Debugger {
    Debugger::with_engine(&fragments(), config, RecordedTrace::new(trace())).unwrap()
}

/// Lifecycle events in the order they fired
pub type EventLog = Rc<RefCell<Vec<String>>>;

/// Record every lifecycle event of `debugger` as `step:<line>`, `restart`,
/// `start` or `end`
pub fn record_events(debugger: &SharedDebugger) -> EventLog {
    let log = EventLog::default();
    let mut debugger = debugger.borrow_mut();

    let step_log = log.clone();
    debugger.on_step(move |line, _| {
        step_log.borrow_mut().push(format!("step:{line}"));
        Ok(())
    });
    let notify = |name: &'static str| {
        let log = log.clone();
        move || {
            log.borrow_mut().push(name.to_string());
            Ok::<_, eyre::Report>(())
        }
    };
    debugger.on_restart(notify("restart"));
    debugger.on_reached_start(notify("start"));
    debugger.on_reached_end(notify("end"));

    log
}

/// Drain the recorded events
pub fn drain(log: &EventLog) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}
