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

//! Stepping controller
//!
//! The [`Debugger`] owns the reversible engine and the visible-line filter. It
//! advances the engine in either direction, silently skipping positions on
//! lines that are not displayed, and broadcasts a lifecycle event for every
//! stop. Raw engine line numbers never leave this module: subscribers and
//! accessors only ever see public line numbers.
//!
//! Callbacks run while the debugger is mutably borrowed, so a callback must not
//! try to borrow the [`SharedDebugger`] it is registered on.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use eyre::{Result, WrapErr};
use stepview_common::Scope;
use stepview_engine::ReversibleEngine;
use tracing::{debug, info};

use crate::{
    highlight, AssembledSource, LifecycleEvent, LineFilter, Listeners, RenderedLine,
    RenderedSource, SourceFragment, SyntaxToken, ViewerConfig, ViewerError,
};

/// Debugger shared between the controls, the autoplay task and the renderer
pub type SharedDebugger = Rc<RefCell<Debugger>>;

/// Steps a reversible engine through the displayed part of a program
pub struct Debugger {
    engine: Box<dyn ReversibleEngine>,
    filter: LineFilter,
    rendered: RenderedSource,
    selected: Option<usize>,
    selection_epoch: u64,
    listeners: Listeners,
}

impl std::fmt::Debug for Debugger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debugger")
            .field("filter", &self.filter)
            .field("lines", &self.rendered.len())
            .field("selected", &self.selected)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Debugger {
    /// Assemble `fragments` and create the engine from the concatenated source
    ///
    /// `build_engine` is called exactly once. Fragment configuration errors are
    /// reported before it runs.
    pub fn new<F>(fragments: &[SourceFragment], config: &ViewerConfig, build_engine: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<Box<dyn ReversibleEngine>>,
    {
        let assembled = AssembledSource::assemble(fragments)?;
        let engine = build_engine(assembled.engine_source())
            .wrap_err("Failed to create the execution engine")?;
        let rendered = highlight(&assembled.display);

        info!(
            "Debugger ready: {} displayed lines, line offset {}",
            rendered.len(),
            assembled.filter.line_offset()
        );

        Ok(Self {
            engine,
            filter: assembled.filter,
            rendered,
            selected: None,
            selection_epoch: 0,
            listeners: Listeners::new(config.dispatch_policy),
        })
    }

    /// Wrap an engine that was already created for the fragments
    pub fn with_engine(
        fragments: &[SourceFragment],
        config: &ViewerConfig,
        engine: impl ReversibleEngine + 'static,
    ) -> Result<Self> {
        Self::new(fragments, config, |_| Ok(Box::new(engine)))
    }

    /// Move into shared ownership
    pub fn into_shared(self) -> SharedDebugger {
        Rc::new(RefCell::new(self))
    }

    /// Advance to the next visible line
    ///
    /// Returns `false` after firing reached-end when the engine runs out of
    /// positions before hitting a visible line.
    pub fn step(&mut self) -> Result<bool> {
        loop {
            if !self.engine.step() {
                debug!("Engine exhausted going forward");
                self.listeners.fire(LifecycleEvent::ReachedEnd)?;
                return Ok(false);
            }
            if let Some(line) = self.visible_line()? {
                self.stop_on(line)?;
                return Ok(true);
            }
        }
    }

    /// Go back to the previous visible line
    ///
    /// Returns `false` after clearing the selection and firing reached-start
    /// when the engine is back at its initial state.
    pub fn step_back(&mut self) -> Result<bool> {
        loop {
            if !self.engine.step_back() {
                debug!("Engine exhausted going backward");
                self.set_line(None)?;
                self.listeners.fire(LifecycleEvent::ReachedStart)?;
                return Ok(false);
            }
            if let Some(line) = self.visible_line()? {
                self.stop_on(line)?;
                return Ok(true);
            }
        }
    }

    /// Reset the engine to its initial state and clear the selection
    pub fn restart(&mut self) -> Result<()> {
        self.engine.restart();
        self.set_line(None)?;
        info!("Debugger restarted");
        self.listeners.fire(LifecycleEvent::Restart)
    }

    fn visible_line(&self) -> Result<Option<usize>> {
        let raw = self.engine.line().ok_or(ViewerError::MissingPosition)?;
        let public = self.filter.to_public(raw);
        if public.is_none() {
            debug!("Skipping hidden line {raw}");
        }
        Ok(public)
    }

    fn stop_on(&mut self, line: usize) -> Result<()> {
        self.set_line(Some(line))?;
        debug!("Stopped on line {line}");
        let scope = self.engine.scope().ok_or(ViewerError::MissingPosition)?;
        self.listeners.fire_step(line, scope)
    }

    /// Register a callback for every stop, in either direction
    pub fn on_step(&mut self, callback: impl FnMut(usize, &Scope) -> Result<()> + 'static) {
        self.listeners.on_step(callback);
    }

    /// Register a callback for restarts
    pub fn on_restart(&mut self, callback: impl FnMut() -> Result<()> + 'static) {
        self.listeners.on(LifecycleEvent::Restart, callback);
    }

    /// Register a callback for running past the last visible line
    pub fn on_reached_end(&mut self, callback: impl FnMut() -> Result<()> + 'static) {
        self.listeners.on(LifecycleEvent::ReachedEnd, callback);
    }

    /// Register a callback for stepping back past the first visible line
    pub fn on_reached_start(&mut self, callback: impl FnMut() -> Result<()> + 'static) {
        self.listeners.on(LifecycleEvent::ReachedStart, callback);
    }

    /// Number of callbacks registered for `event`
    pub fn listener_count(&self, event: LifecycleEvent) -> usize {
        self.listeners.count(event)
    }

    /// Select a public line, or clear the selection with `None`
    ///
    /// Every successful selection bumps the selection epoch, even when the same
    /// line is selected twice in a row.
    pub fn set_line(&mut self, line: Option<usize>) -> Result<(), ViewerError> {
        self.selected = None;
        if let Some(line) = line {
            if self.rendered.line(line).is_none() {
                return Err(ViewerError::LineNotFound(line));
            }
            self.selected = Some(line);
            self.selection_epoch += 1;
        }
        Ok(())
    }

    /// Currently highlighted line
    pub fn current_line(&self) -> Option<&RenderedLine> {
        self.selected.and_then(|line| self.rendered.line(line))
    }

    /// Public number of the highlighted line
    pub fn current_line_number(&self) -> Option<usize> {
        self.selected
    }

    /// Identifiers on the highlighted line
    pub fn current_line_identifiers(&self) -> Vec<&str> {
        self.current_line().map(RenderedLine::identifiers).unwrap_or_default()
    }

    /// Expressions on the highlighted line
    pub fn current_line_expressions(&self) -> Vec<&str> {
        self.current_line().map(RenderedLine::expressions).unwrap_or_default()
    }

    /// Rendered line with public number `line`
    pub fn get_line(&self, line: usize) -> Result<&RenderedLine, ViewerError> {
        self.rendered.line(line).ok_or(ViewerError::LineNotFound(line))
    }

    /// Identifier token named `name` on the highlighted line
    pub fn get_identifier(&self, name: &str) -> Option<&SyntaxToken> {
        self.current_line().and_then(|line| line.identifier(name))
    }

    /// Incremented on every line selection
    pub fn selection_epoch(&self) -> u64 {
        self.selection_epoch
    }

    /// Number of raw lines before the displayed fragment
    pub fn line_offset(&self) -> usize {
        self.filter.line_offset()
    }

    /// Raw lines the debugger stops on (empty: all of them)
    pub fn visible_lines(&self) -> &BTreeSet<usize> {
        self.filter.visible_lines()
    }

    /// Highlighted displayed fragment
    pub fn source(&self) -> &RenderedSource {
        &self.rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepview_common::TraceStep;
    use stepview_engine::RecordedTrace;

    /// Engine that claims to move but never reports a position
    struct Blind;

    impl ReversibleEngine for Blind {
        fn step(&mut self) -> bool {
            true
        }
        fn step_back(&mut self) -> bool {
            true
        }
        fn restart(&mut self) {}
        fn line(&self) -> Option<usize> {
            None
        }
        fn scope(&self) -> Option<&Scope> {
            None
        }
    }

    fn debugger(steps: Vec<TraceStep>) -> Debugger {
        let fragments = [
            SourceFragment::hidden("setup()"),
            SourceFragment::main("    total = 0\n    total = total + 1"),
        ];
        Debugger::with_engine(&fragments, &ViewerConfig::default(), RecordedTrace::new(steps))
            .unwrap()
    }

    #[test]
    fn test_hidden_lines_are_skipped() {
        let mut debugger = debugger(vec![
            TraceStep::at(1),
            TraceStep::at(2).with("total", 0),
            TraceStep::at(1),
            TraceStep::at(3).with("total", 1),
        ]);
        assert_eq!(debugger.line_offset(), 1);

        assert!(debugger.step().unwrap());
        assert_eq!(debugger.current_line_number(), Some(1));
        assert!(debugger.step().unwrap());
        assert_eq!(debugger.current_line_number(), Some(2));
        assert!(!debugger.step().unwrap());
    }

    #[test]
    fn test_set_line() {
        let mut debugger = debugger(vec![]);
        debugger.set_line(Some(2)).unwrap();
        assert_eq!(debugger.current_line().unwrap().text, "total = total + 1");
        assert_eq!(debugger.current_line_identifiers(), vec!["total"]);
        assert!(debugger.get_identifier("total").is_some());

        let epoch = debugger.selection_epoch();
        debugger.set_line(Some(2)).unwrap();
        assert_eq!(debugger.selection_epoch(), epoch + 1);

        assert_eq!(debugger.set_line(Some(7)), Err(ViewerError::LineNotFound(7)));
        assert_eq!(debugger.current_line_number(), None);

        debugger.set_line(None).unwrap();
        assert!(debugger.current_line_identifiers().is_empty());
    }

    #[test]
    fn test_step_back_from_start_clears_selection() {
        let mut debugger = debugger(vec![TraceStep::at(2)]);
        assert!(debugger.step().unwrap());
        assert!(!debugger.step_back().unwrap());
        assert_eq!(debugger.current_line(), None);
    }

    #[test]
    fn test_missing_position_is_an_error() {
        let mut debugger =
            Debugger::with_engine(&[SourceFragment::main("x")], &ViewerConfig::default(), Blind)
                .unwrap();
        let err = debugger.step().unwrap_err();
        assert_eq!(err.downcast_ref::<ViewerError>(), Some(&ViewerError::MissingPosition));
    }

    #[test]
    fn test_engine_factory_receives_concatenated_source() {
        let fragments = [SourceFragment::hidden("a = 1"), SourceFragment::main("b = a")];
        let mut seen = String::new();
        Debugger::new(&fragments, &ViewerConfig::default(), |source| {
            seen = source.to_string();
            Ok(Box::new(RecordedTrace::new(vec![])))
        })
        .unwrap();
        assert_eq!(seen, "a = 1\nb = a");
    }

    #[test]
    fn test_factory_not_called_on_bad_fragments() {
        let err = Debugger::new(&[], &ViewerConfig::default(), |_| -> Result<Box<dyn ReversibleEngine>> {
            panic!("engine must not be built")
        })
        .unwrap_err();
        assert_eq!(err.downcast_ref::<ViewerError>(), Some(&ViewerError::NoFragments));
    }
}
