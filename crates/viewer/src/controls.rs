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

//! Playback controller
//!
//! [`DebuggerControls`] drives a [`Debugger`](crate::Debugger) from the four
//! player buttons and runs the autoplay loop. The loop is a local task that
//! calls `step()` once per tick; the delay before the next tick is read after
//! each step, so a speed change only affects the tick that follows it.
//!
//! Must be used from inside a [`tokio::task::LocalSet`].

use std::{cell::RefCell, rc::Rc, time::Duration};

use eyre::{Report, Result};
use tracing::{debug, error, info};

use crate::{
    Control, ControlPanel, Icon, ScheduledTick, SharedDebugger, SpeedSelect, ViewerConfig,
    ViewerError,
};

#[derive(Debug, Default)]
struct PlaybackSession {
    play_speed: Duration,
    timer: Option<ScheduledTick>,
    failure: Option<Report>,
    /// Set while the autoplay task is inside `Debugger::step`
    ticking: bool,
}

impl PlaybackSession {
    /// Stop the autoplay task
    ///
    /// From inside the task's own step the handle is only released, since the
    /// task ends on its own right after. From anywhere else the task is aborted.
    fn stop_timer(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        if self.ticking {
            timer.disarm();
        } else {
            drop(timer);
        }
    }
}

/// Buttons, speed selector and autoplay loop of a debugger
#[derive(Debug, Clone)]
pub struct DebuggerControls {
    debugger: SharedDebugger,
    panel: Rc<RefCell<ControlPanel>>,
    session: Rc<RefCell<PlaybackSession>>,
}

impl DebuggerControls {
    /// Attach controls to `debugger` and subscribe to its lifecycle events
    pub fn new(debugger: SharedDebugger, config: &ViewerConfig) -> Result<Self> {
        let speed = SpeedSelect::new(config)?;
        let session = Rc::new(RefCell::new(PlaybackSession {
            play_speed: speed.delay(),
            ..Default::default()
        }));
        let panel = Rc::new(RefCell::new(ControlPanel::new(speed)));

        {
            let mut debugger = debugger.borrow_mut();

            let (end_panel, end_session) = (panel.clone(), session.clone());
            debugger.on_reached_end(move || {
                end_session.borrow_mut().stop_timer();
                let mut panel = end_panel.borrow_mut();
                panel.set_enabled(Control::Reset, true);
                panel.set_enabled(Control::Step, false);
                panel.set_enabled(Control::StepBack, true);
                panel.set_enabled(Control::PlayPause, false);
                panel.play.icon = Icon::Play;
                Ok(())
            });

            let (start_panel, start_session) = (panel.clone(), session.clone());
            debugger.on_reached_start(move || {
                start_session.borrow_mut().stop_timer();
                at_start(&mut start_panel.borrow_mut());
                Ok(())
            });

            let restart_panel = panel.clone();
            debugger.on_restart(move || {
                at_start(&mut restart_panel.borrow_mut());
                Ok(())
            });
        }

        Ok(Self { debugger, panel, session })
    }

    /// Start autoplay; does nothing while already playing
    pub fn play(&self) {
        if self.is_playing() {
            return;
        }

        {
            let mut panel = self.panel.borrow_mut();
            panel.set_enabled(Control::Reset, false);
            panel.set_enabled(Control::Step, false);
            panel.set_enabled(Control::StepBack, false);
            panel.play.icon = Icon::Pause;
        }

        info!("Autoplay started");
        let tick = ScheduledTick::spawn_local(autoplay(
            self.debugger.clone(),
            self.panel.clone(),
            self.session.clone(),
        ));
        self.session.borrow_mut().timer = Some(tick);
    }

    /// Stop autoplay; does nothing while idle
    pub fn pause(&self) {
        let Some(timer) = self.session.borrow_mut().timer.take() else {
            return;
        };
        drop(timer);
        idle(&mut self.panel.borrow_mut());
        info!("Autoplay paused");
    }

    /// Pause when playing, play otherwise
    pub fn toggle_play(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Cancel autoplay and restart the debugger
    pub fn reset(&self) -> Result<()> {
        drop(self.session.borrow_mut().timer.take());
        self.panel.borrow_mut().play.icon = Icon::Play;
        self.debugger.borrow_mut().restart()
    }

    /// Pause, then step forward once
    pub fn step(&self) -> Result<bool> {
        self.pause();
        {
            let mut panel = self.panel.borrow_mut();
            panel.set_enabled(Control::Reset, true);
            panel.set_enabled(Control::StepBack, true);
            panel.set_enabled(Control::PlayPause, true);
        }
        self.debugger.borrow_mut().step()
    }

    /// Pause, then step back once
    pub fn step_back(&self) -> Result<bool> {
        self.pause();
        {
            let mut panel = self.panel.borrow_mut();
            panel.set_enabled(Control::Reset, true);
            panel.set_enabled(Control::Step, true);
            panel.set_enabled(Control::PlayPause, true);
        }
        self.debugger.borrow_mut().step_back()
    }

    /// Press a button; disabled buttons are ignored
    pub fn activate(&self, control: Control) -> Result<()> {
        if !self.panel.borrow().is_enabled(control) {
            debug!("Ignoring disabled {control} button");
            return Ok(());
        }
        match control {
            Control::Reset => self.reset()?,
            Control::StepBack => {
                self.step_back()?;
            }
            Control::PlayPause => self.toggle_play(),
            Control::Step => {
                self.step()?;
            }
        }
        Ok(())
    }

    /// Use `multiplier` for the next scheduled tick
    pub fn set_speed(&self, multiplier: f64) -> Result<(), ViewerError> {
        self.panel.borrow_mut().speed.select(multiplier)?;
        self.apply_speed();
        Ok(())
    }

    /// Select the next faster option
    pub fn faster(&self) {
        if self.panel.borrow_mut().speed.faster() {
            self.apply_speed();
        }
    }

    /// Select the next slower option
    pub fn slower(&self) {
        if self.panel.borrow_mut().speed.slower() {
            self.apply_speed();
        }
    }

    fn apply_speed(&self) {
        let delay = self.panel.borrow().speed.delay();
        debug!("Play speed set to {delay:?}");
        self.session.borrow_mut().play_speed = delay;
    }

    /// Delay between two autoplay ticks
    pub fn play_speed(&self) -> Duration {
        self.session.borrow().play_speed
    }

    /// Whether an autoplay task is pending
    pub fn is_playing(&self) -> bool {
        self.session.borrow().timer.is_some()
    }

    /// Snapshot of the buttons and speed selector
    pub fn panel(&self) -> ControlPanel {
        self.panel.borrow().clone()
    }

    /// Error that stopped the last autoplay run, if any
    pub fn take_failure(&self) -> Option<Report> {
        self.session.borrow_mut().failure.take()
    }

    /// Debugger driven by these controls
    pub fn debugger(&self) -> &SharedDebugger {
        &self.debugger
    }
}

fn at_start(panel: &mut ControlPanel) {
    panel.set_enabled(Control::Reset, false);
    panel.set_enabled(Control::Step, true);
    panel.set_enabled(Control::StepBack, false);
    panel.set_enabled(Control::PlayPause, true);
}

fn idle(panel: &mut ControlPanel) {
    panel.set_enabled(Control::Reset, true);
    panel.set_enabled(Control::Step, true);
    panel.set_enabled(Control::StepBack, true);
    panel.play.icon = Icon::Play;
}

async fn autoplay(
    debugger: SharedDebugger,
    panel: Rc<RefCell<ControlPanel>>,
    session: Rc<RefCell<PlaybackSession>>,
) {
    let mut delay = Duration::ZERO;
    loop {
        tokio::time::sleep(delay).await;
        session.borrow_mut().ticking = true;
        let stepped = debugger.borrow_mut().step();
        session.borrow_mut().ticking = false;
        match stepped {
            Ok(true) => delay = session.borrow().play_speed,
            Ok(false) => {
                debug!("Autoplay reached the end");
                break;
            }
            Err(err) => {
                error!("Autoplay stopped: {err:#}");
                idle(&mut panel.borrow_mut());
                session.borrow_mut().failure = Some(err);
                break;
            }
        }
    }
    let mut session = session.borrow_mut();
    if let Some(timer) = session.timer.take() {
        timer.disarm();
    }
}
