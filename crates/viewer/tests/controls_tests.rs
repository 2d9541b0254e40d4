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

//! Playback controller state machine and autoplay timing

mod common;

use std::{cell::RefCell, rc::Rc, time::Duration};

use common::{drain, record_events, STOPS};
use stepview_common::logging::ensure_test_logging;
use stepview_viewer::{Control, DebuggerControls, Icon, SharedDebugger, ViewerConfig};
use tokio::{
    task::LocalSet,
    time::{sleep, Instant},
};

fn controls() -> (DebuggerControls, common::EventLog) {
    ensure_test_logging(None);
    let config = ViewerConfig::default();
    let debugger: SharedDebugger = common::debugger(&config).into_shared();
    let log = record_events(&debugger);
    let controls = DebuggerControls::new(debugger, &config).unwrap();
    (controls, log)
}

fn assert_at_end(controls: &DebuggerControls) {
    let panel = controls.panel();
    assert!(panel.is_enabled(Control::Reset));
    assert!(panel.is_enabled(Control::StepBack));
    assert!(!panel.is_enabled(Control::Step));
    assert!(!panel.is_enabled(Control::PlayPause));
    assert_eq!(panel.play.icon, Icon::Play);
    assert!(!controls.is_playing());
}

fn assert_at_start(controls: &DebuggerControls) {
    let panel = controls.panel();
    assert!(!panel.is_enabled(Control::Reset));
    assert!(!panel.is_enabled(Control::StepBack));
    assert!(panel.is_enabled(Control::Step));
    assert!(panel.is_enabled(Control::PlayPause));
    assert!(!controls.is_playing());
}

#[tokio::test(start_paused = true)]
async fn test_autoplay_runs_to_the_end() {
    LocalSet::new()
        .run_until(async {
            let (controls, log) = controls();
            let start = Instant::now();

            controls.play();
            assert!(controls.is_playing());
            assert!(controls.panel().shows_pause());
            assert!(!controls.panel().is_enabled(Control::Step));

            sleep(Duration::from_secs(30)).await;

            let mut expected: Vec<String> = STOPS.iter().map(|line| format!("step:{line}")).collect();
            expected.push("end".to_string());
            assert_eq!(drain(&log), expected);
            assert_at_end(&controls);
            assert!(controls.take_failure().is_none());
            // Six stops, five delays in between
            assert!(start.elapsed() >= Duration::from_secs(5));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_play_and_pause_are_idempotent() {
    LocalSet::new()
        .run_until(async {
            let (controls, log) = controls();

            let before = controls.panel();
            controls.pause();
            assert_eq!(controls.panel(), before);

            controls.play();
            controls.play();
            sleep(Duration::from_millis(10)).await;
            assert_eq!(drain(&log), ["step:1"]);

            controls.pause();
            assert!(!controls.is_playing());
            assert_eq!(controls.panel().play.icon, Icon::Play);
            assert!(controls.panel().is_enabled(Control::Step));
            assert!(controls.panel().is_enabled(Control::StepBack));
            assert!(controls.panel().is_enabled(Control::Reset));

            // The cancelled timer never fires
            sleep(Duration::from_secs(10)).await;
            assert!(drain(&log).is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_speed_change_affects_next_tick_only() {
    LocalSet::new()
        .run_until(async {
            let (controls, _) = controls();
            let ticks = Rc::new(RefCell::new(Vec::new()));
            let recorded = ticks.clone();
            controls.debugger().borrow_mut().on_step(move |_, _| {
                recorded.borrow_mut().push(Instant::now());
                Ok(())
            });

            controls.play();
            sleep(Duration::from_millis(500)).await;
            controls.set_speed(2.0).unwrap();
            assert_eq!(controls.play_speed(), Duration::from_millis(500));
            sleep(Duration::from_millis(1100)).await;
            controls.pause();

            let ticks = ticks.borrow();
            assert_eq!(ticks.len(), 3);
            let close = |gap: Duration, expected: u64| {
                gap.as_millis().abs_diff(u128::from(expected)) <= 5
            };
            assert!(close(ticks[1] - ticks[0], 1000), "{:?}", ticks[1] - ticks[0]);
            assert!(close(ticks[2] - ticks[1], 500), "{:?}", ticks[2] - ticks[1]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_manual_stepping_updates_buttons() {
    LocalSet::new()
        .run_until(async {
            let (controls, log) = controls();
            assert_at_start(&controls);

            assert!(controls.step().unwrap());
            let panel = controls.panel();
            assert!(panel.is_enabled(Control::Reset));
            assert!(panel.is_enabled(Control::StepBack));

            while controls.step().unwrap() {}
            assert_at_end(&controls);

            assert!(controls.step_back().unwrap());
            assert!(controls.panel().is_enabled(Control::Step));
            assert!(controls.panel().is_enabled(Control::PlayPause));

            while controls.step_back().unwrap() {}
            assert_at_start(&controls);
            assert_eq!(drain(&log).last().map(String::as_str), Some("start"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_autoplay() {
    LocalSet::new()
        .run_until(async {
            let (controls, log) = controls();

            controls.play();
            sleep(Duration::from_millis(1500)).await;
            assert_eq!(drain(&log), ["step:1", "step:2"]);

            controls.reset().unwrap();
            assert_eq!(drain(&log), ["restart"]);
            assert_at_start(&controls);
            assert_eq!(controls.panel().play.icon, Icon::Play);
            assert_eq!(controls.debugger().borrow().current_line_number(), None);

            sleep(Duration::from_secs(10)).await;
            assert!(drain(&log).is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_disabled_buttons_are_ignored() {
    LocalSet::new()
        .run_until(async {
            let (controls, log) = controls();

            controls.activate(Control::StepBack).unwrap();
            controls.activate(Control::Reset).unwrap();
            assert!(drain(&log).is_empty());

            controls.activate(Control::Step).unwrap();
            assert_eq!(drain(&log), ["step:1"]);

            controls.activate(Control::PlayPause).unwrap();
            assert!(controls.is_playing());
            // Stepping is disabled while playing
            controls.activate(Control::Step).unwrap();
            assert!(controls.is_playing());

            controls.activate(Control::PlayPause).unwrap();
            assert!(!controls.is_playing());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_failing_subscriber_stops_autoplay() {
    LocalSet::new()
        .run_until(async {
            let (controls, _) = controls();
            let calls = Rc::new(RefCell::new(0));
            let counter = calls.clone();
            controls.debugger().borrow_mut().on_step(move |line, _| {
                *counter.borrow_mut() += 1;
                if line == 2 {
                    eyre::bail!("cannot render line {line}");
                }
                Ok(())
            });

            controls.play();
            sleep(Duration::from_secs(10)).await;

            assert!(!controls.is_playing());
            assert_eq!(*calls.borrow(), 2);
            let failure = controls.take_failure().unwrap();
            assert!(format!("{failure:#}").contains("cannot render line 2"));
            assert!(controls.panel().is_enabled(Control::Step));
            assert_eq!(controls.panel().play.icon, Icon::Play);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_speed_selector_steps_through_options() {
    LocalSet::new()
        .run_until(async {
            let (controls, _) = controls();
            assert_eq!(controls.play_speed(), Duration::from_secs(1));

            controls.faster();
            assert_eq!(controls.play_speed(), Duration::from_millis(500));
            controls.slower();
            controls.slower();
            assert_eq!(controls.play_speed(), Duration::from_secs(2));
            assert_eq!(controls.panel().speed.label(), ".5x");

            assert!(controls.set_speed(0.0).is_err());
            assert_eq!(controls.play_speed(), Duration::from_secs(2));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_reached_end_from_another_holder_stops_autoplay() {
    LocalSet::new()
        .run_until(async {
            let (controls, log) = controls();

            controls.play();
            sleep(Duration::from_millis(10)).await;
            assert_eq!(drain(&log), ["step:1"]);

            // Drive the shared debugger to the end without going through the controls
            let debugger = controls.debugger().clone();
            while debugger.borrow_mut().step().unwrap() {}
            assert_eq!(drain(&log).last().map(String::as_str), Some("end"));
            assert_at_end(&controls);

            for _ in 0..3 {
                assert!(debugger.borrow_mut().step_back().unwrap());
            }
            drain(&log);

            // Only the new loop ticks: immediately, then once per second
            controls.play();
            sleep(Duration::from_millis(1500)).await;
            assert_eq!(drain(&log), ["step:1", "step:3"]);

            sleep(Duration::from_secs(1)).await;
            assert_eq!(drain(&log), ["end"]);
            assert_at_end(&controls);
        })
        .await;
}
