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

//! Building blocks shared by the players: the autoplay timer, the control
//! buttons and the speed selector.

use std::{fmt, future::Future, time::Duration};

use tokio::task::JoinHandle;

use crate::{tick_delay, ViewerConfig, ViewerError};

/// Handle to the pending autoplay task
///
/// Dropping the handle aborts the task, so a player that owns at most one
/// `ScheduledTick` can never have two loops running.
#[derive(Debug)]
pub struct ScheduledTick {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTick {
    /// Spawn `task` on the current [`tokio::task::LocalSet`]
    pub fn spawn_local(task: impl Future<Output = ()> + 'static) -> Self {
        Self { handle: Some(tokio::task::spawn_local(task)) }
    }

    /// Release the handle without aborting the task
    ///
    /// Used from inside the task itself when it finishes on its own.
    pub fn disarm(mut self) {
        self.handle.take();
    }
}

impl Drop for ScheduledTick {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Glyph shown on a control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Back to the first position
    Restart,
    /// Start autoplay
    Play,
    /// Stop autoplay
    Pause,
    /// One step forward
    SkipForward,
    /// One step back
    SkipBack,
}

/// The four buttons of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Restart from the beginning
    Reset,
    /// One step back
    StepBack,
    /// Toggle autoplay
    PlayPause,
    /// One step forward
    Step,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::StepBack => write!(f, "step back"),
            Self::PlayPause => write!(f, "play/pause"),
            Self::Step => write!(f, "step"),
        }
    }
}

/// State of one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    /// Glyph currently shown
    pub icon: Icon,
    /// Disabled buttons ignore activation
    pub enabled: bool,
}

impl Button {
    fn new(icon: Icon, enabled: bool) -> Self {
        Self { icon, enabled }
    }
}

/// Choice of autoplay speed multipliers
///
/// Every offered multiplier has a representable tick delay; multipliers
/// without one are refused when the selector is built or when they are
/// selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSelect {
    options: Vec<f64>,
    delays: Vec<Duration>,
    selected: usize,
    base_delay: Duration,
}

impl SpeedSelect {
    /// Options from `config`, with the default speed (or the nearest option) selected
    pub fn new(config: &ViewerConfig) -> Result<Self, ViewerError> {
        config.validate()?;
        let base_delay = config.base_delay();
        let mut options = config.speed_options.clone();
        if options.is_empty() {
            options.push(config.default_speed);
        }
        let delays =
            options.iter().map(|&option| tick_delay(base_delay, option)).collect::<Result<_, _>>()?;
        let selected = options
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - config.default_speed).abs().total_cmp(&(*b - config.default_speed).abs())
            })
            .map(|(index, _)| index)
            .unwrap_or_default();
        Ok(Self { options, delays, selected, base_delay })
    }

    /// Available multipliers
    pub fn options(&self) -> &[f64] {
        &self.options
    }

    /// Selected multiplier
    pub fn multiplier(&self) -> f64 {
        self.options[self.selected]
    }

    /// Index of the selected multiplier
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select `multiplier`, adding it to the options when it is not offered
    pub fn select(&mut self, multiplier: f64) -> Result<(), ViewerError> {
        let delay = tick_delay(self.base_delay, multiplier)?;
        self.selected = match self.options.iter().position(|&option| option == multiplier) {
            Some(index) => index,
            None => {
                let index = self.options.partition_point(|&option| option < multiplier);
                self.options.insert(index, multiplier);
                self.delays.insert(index, delay);
                index
            }
        };
        Ok(())
    }

    /// Move to the next faster option, returning whether it changed
    pub fn faster(&mut self) -> bool {
        if self.selected + 1 < self.options.len() {
            self.selected += 1;
            true
        } else {
            false
        }
    }

    /// Move to the next slower option, returning whether it changed
    pub fn slower(&mut self) -> bool {
        if self.selected > 0 {
            self.selected -= 1;
            true
        } else {
            false
        }
    }

    /// Delay between ticks for the selected multiplier
    pub fn delay(&self) -> Duration {
        self.delays[self.selected]
    }

    /// Short label such as `.5x` or `2x`
    pub fn label(&self) -> String {
        format_speed(self.multiplier())
    }
}

/// Render a multiplier the way the speed selector shows it
pub fn format_speed(multiplier: f64) -> String {
    let text = format!("{multiplier}");
    match text.strip_prefix("0.") {
        Some(fraction) => format!(".{fraction}x"),
        None => format!("{text}x"),
    }
}

/// Buttons and speed selector of a player
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    /// Restart button
    pub reset: Button,
    /// Step back button
    pub step_back: Button,
    /// Play/pause toggle
    pub play: Button,
    /// Step forward button
    pub step: Button,
    /// Speed multipliers
    pub speed: SpeedSelect,
}

impl ControlPanel {
    /// Panel in its initial state: at the start, not playing
    pub fn new(speed: SpeedSelect) -> Self {
        Self {
            reset: Button::new(Icon::Restart, false),
            step_back: Button::new(Icon::SkipBack, false),
            play: Button::new(Icon::Play, true),
            step: Button::new(Icon::SkipForward, true),
            speed,
        }
    }

    /// State of `control`
    pub fn button(&self, control: Control) -> &Button {
        match control {
            Control::Reset => &self.reset,
            Control::StepBack => &self.step_back,
            Control::PlayPause => &self.play,
            Control::Step => &self.step,
        }
    }

    /// Whether activating `control` has any effect
    pub fn is_enabled(&self, control: Control) -> bool {
        self.button(control).enabled
    }

    /// Enable or disable `control`
    pub fn set_enabled(&mut self, control: Control, enabled: bool) {
        let button = match control {
            Control::Reset => &mut self.reset,
            Control::StepBack => &mut self.step_back,
            Control::PlayPause => &mut self.play,
            Control::Step => &mut self.step,
        };
        button.enabled = enabled;
    }

    /// Whether the toggle currently shows the pause glyph
    pub fn shows_pause(&self) -> bool {
        self.play.icon == Icon::Pause
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_select_defaults() {
        let speed = SpeedSelect::new(&ViewerConfig::default()).unwrap();
        assert_eq!(speed.multiplier(), 1.0);
        assert_eq!(speed.delay(), Duration::from_secs(1));
        assert_eq!(speed.label(), "1x");
    }

    #[test]
    fn test_speed_select_bounds() {
        let mut speed = SpeedSelect::new(&ViewerConfig::bubble_sort()).unwrap();
        while speed.faster() {}
        assert_eq!(speed.multiplier(), 4.0);
        assert!(!speed.faster());
        while speed.slower() {}
        assert_eq!(speed.label(), ".25x");
        assert_eq!(speed.delay(), Duration::from_secs(4));
    }

    #[test]
    fn test_select_unlisted_speed() {
        let mut speed = SpeedSelect::new(&ViewerConfig::default()).unwrap();
        speed.select(3.0).unwrap();
        assert_eq!(speed.multiplier(), 3.0);
        assert_eq!(speed.options(), &[0.2, 0.5, 1.0, 2.0, 3.0, 4.0, 8.0]);
        assert_eq!(speed.select(-1.0), Err(ViewerError::InvalidSpeed(-1.0)));
        assert_eq!(speed.multiplier(), 3.0);

        // Too slow to express as a delay: refused and nothing changes
        assert_eq!(speed.select(1e-20), Err(ViewerError::InvalidSpeed(1e-20)));
        assert_eq!(speed.multiplier(), 3.0);
        assert_eq!(speed.delay(), Duration::from_secs_f64(1.0 / 3.0));
        assert_eq!(speed.options().len(), 7);
    }

    #[test]
    fn test_unrepresentable_default_speed() {
        let config =
            ViewerConfig { default_speed: 1e-20, speed_options: vec![], ..ViewerConfig::default() };
        assert_eq!(SpeedSelect::new(&config), Err(ViewerError::InvalidSpeed(1e-20)));
    }

    #[test]
    fn test_initial_panel() {
        let panel = ControlPanel::new(SpeedSelect::new(&ViewerConfig::default()).unwrap());
        assert!(!panel.is_enabled(Control::Reset));
        assert!(!panel.is_enabled(Control::StepBack));
        assert!(panel.is_enabled(Control::PlayPause));
        assert!(panel.is_enabled(Control::Step));
        assert!(!panel.shows_pause());
    }
}
