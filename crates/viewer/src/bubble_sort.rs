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

//! Bubble sort step table and its player
//!
//! Unlike the [`Debugger`](crate::Debugger), the bubble sort player does not
//! run an engine: every state of the array is computed up front and the player
//! only moves an index over that table.

use std::{cell::RefCell, rc::Rc, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Control, ControlPanel, Icon, ScheduledTick, SpeedSelect, ViewerConfig, ViewerError};

/// Array sorted by the demo when no input is given
pub const DEFAULT_ARRAY: [i64; 5] = [3, 2, 5, 4, 1];

/// Palette names for the values 1 to 5
pub const COLORS: [&str; 5] = ["orange", "green", "dark-blue", "red", "pink"];

/// Palette color of an array item, for values 1 to 5
pub fn color_for(value: i64) -> Option<&'static str> {
    if (1..=5).contains(&value) {
        usize::try_from(value - 1).ok().map(|index| COLORS[index % COLORS.len()])
    } else {
        None
    }
}

/// One state of the array during the sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapStep {
    /// Array contents at this point
    pub array: Vec<i64>,
    /// Pair of indices being compared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare: Option<(usize, usize)>,
    /// Pair of indices that were just swapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap: Option<(usize, usize)>,
}

impl SwapStep {
    fn snapshot(array: &[i64]) -> Self {
        Self { array: array.to_vec(), compare: None, swap: None }
    }

    /// Whether the item at `index` is being compared
    pub fn is_compared(&self, index: usize) -> bool {
        self.compare.is_some_and(|(i, j)| i == index || j == index)
    }

    /// Whether the item at `index` was just swapped
    pub fn is_swapped(&self, index: usize) -> bool {
        self.swap.is_some_and(|(i, j)| i == index || j == index)
    }
}

/// Every state of a bubble sort of `input`
///
/// The table starts and ends with a plain snapshot. In between, every pass
/// records each comparison and each swap, and passes repeat until one makes no
/// swap.
pub fn generate_bubble_sort_steps(input: &[i64]) -> Vec<SwapStep> {
    let mut array = input.to_vec();
    let mut steps = vec![SwapStep::snapshot(&array)];

    loop {
        let mut swapped = false;
        for j in 0..array.len().saturating_sub(1) {
            steps.push(SwapStep { compare: Some((j, j + 1)), ..SwapStep::snapshot(&array) });
            if array[j] > array[j + 1] {
                array.swap(j, j + 1);
                steps.push(SwapStep { swap: Some((j, j + 1)), ..SwapStep::snapshot(&array) });
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }

    steps.push(SwapStep::snapshot(&array));
    steps
}

#[derive(Debug)]
struct SortSession {
    steps: Vec<SwapStep>,
    current: usize,
    speed: SpeedSelect,
    play_speed: Duration,
    timer: Option<ScheduledTick>,
}

impl SortSession {
    fn last(&self) -> usize {
        self.steps.len() - 1
    }

    fn at_end(&self) -> bool {
        self.current == self.last()
    }

    fn advance(&mut self) -> bool {
        if self.current < self.last() {
            self.current += 1;
            true
        } else {
            false
        }
    }
}

/// Player over a precomputed bubble sort step table
///
/// Must be used from inside a [`tokio::task::LocalSet`].
#[derive(Debug, Clone)]
pub struct BubbleSortViewer {
    session: Rc<RefCell<SortSession>>,
}

impl BubbleSortViewer {
    /// Player for a sort of `input`
    pub fn new(input: &[i64], config: &ViewerConfig) -> Result<Self, ViewerError> {
        let speed = SpeedSelect::new(config)?;
        let steps = generate_bubble_sort_steps(input);
        info!("Bubble sort of {} items has {} steps", input.len(), steps.len());
        let session = SortSession {
            steps,
            current: 0,
            play_speed: speed.delay(),
            speed,
            timer: None,
        };
        Ok(Self { session: Rc::new(RefCell::new(session)) })
    }

    /// Full step table
    pub fn steps(&self) -> Vec<SwapStep> {
        self.session.borrow().steps.clone()
    }

    /// Number of steps in the table
    pub fn len(&self) -> usize {
        self.session.borrow().steps.len()
    }

    /// The table always holds at least the first and last snapshots
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the displayed step
    pub fn current(&self) -> usize {
        self.session.borrow().current
    }

    /// Displayed step
    pub fn current_step(&self) -> SwapStep {
        let session = self.session.borrow();
        session.steps[session.current].clone()
    }

    /// Whether an autoplay task is pending
    pub fn is_playing(&self) -> bool {
        self.session.borrow().timer.is_some()
    }

    /// Delay between two autoplay ticks
    pub fn play_speed(&self) -> Duration {
        self.session.borrow().play_speed
    }

    /// Start autoplay; does nothing while playing or at the last step
    pub fn play(&self) {
        {
            let session = self.session.borrow();
            if session.timer.is_some() || session.at_end() {
                return;
            }
        }
        info!("Bubble sort autoplay started");
        let tick = ScheduledTick::spawn_local(autoplay(self.session.clone()));
        self.session.borrow_mut().timer = Some(tick);
    }

    /// Stop autoplay
    pub fn pause(&self) {
        drop(self.session.borrow_mut().timer.take());
    }

    /// Pause when playing, play otherwise
    pub fn toggle_play(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Pause and go back to the unsorted array
    pub fn reset(&self) {
        self.pause();
        self.session.borrow_mut().current = 0;
    }

    /// Pause, then show the next step; returns whether the index moved
    pub fn step(&self) -> bool {
        self.pause();
        self.session.borrow_mut().advance()
    }

    /// Pause, then show the previous step; returns whether the index moved
    pub fn step_back(&self) -> bool {
        self.pause();
        let mut session = self.session.borrow_mut();
        if session.current > 0 {
            session.current -= 1;
            true
        } else {
            false
        }
    }

    /// Press a button; disabled buttons are ignored
    pub fn activate(&self, control: Control) {
        if !self.panel().is_enabled(control) {
            debug!("Ignoring disabled {control} button");
            return;
        }
        match control {
            Control::Reset => self.reset(),
            Control::StepBack => {
                self.step_back();
            }
            Control::PlayPause => self.toggle_play(),
            Control::Step => {
                self.step();
            }
        }
    }

    /// Use `multiplier` for the next scheduled tick
    pub fn set_speed(&self, multiplier: f64) -> Result<(), ViewerError> {
        let mut session = self.session.borrow_mut();
        session.speed.select(multiplier)?;
        session.play_speed = session.speed.delay();
        Ok(())
    }

    /// Select the next faster option
    pub fn faster(&self) {
        let mut session = self.session.borrow_mut();
        if session.speed.faster() {
            session.play_speed = session.speed.delay();
        }
    }

    /// Select the next slower option
    pub fn slower(&self) {
        let mut session = self.session.borrow_mut();
        if session.speed.slower() {
            session.play_speed = session.speed.delay();
        }
    }

    /// Buttons derived from the position and the play state
    pub fn panel(&self) -> ControlPanel {
        let session = self.session.borrow();
        let at_start = session.current == 0;
        let at_end = session.at_end();
        let playing = session.timer.is_some();

        let mut panel = ControlPanel::new(session.speed.clone());
        panel.set_enabled(Control::Reset, !at_start);
        panel.set_enabled(Control::StepBack, !(at_start || playing));
        panel.set_enabled(Control::Step, !(at_end || playing));
        panel.set_enabled(Control::PlayPause, !at_end);
        if playing {
            panel.play.icon = Icon::Pause;
        }
        panel
    }
}

async fn autoplay(session: Rc<RefCell<SortSession>>) {
    let mut delay = Duration::ZERO;
    loop {
        tokio::time::sleep(delay).await;
        let mut state = session.borrow_mut();
        state.advance();
        debug!("Bubble sort step {}", state.current);
        if state.at_end() {
            if let Some(timer) = state.timer.take() {
                timer.disarm();
            }
            break;
        }
        delay = state.play_speed;
    }
}
