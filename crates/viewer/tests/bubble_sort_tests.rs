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

//! Bubble sort player

use std::time::Duration;

use stepview_common::logging::ensure_test_logging;
use stepview_viewer::{
    generate_bubble_sort_steps, BubbleSortViewer, Control, Icon, ViewerConfig, DEFAULT_ARRAY,
};
use tokio::{task::LocalSet, time::sleep};

#[test]
fn test_step_table_shape() {
    let steps = generate_bubble_sort_steps(&DEFAULT_ARRAY);
    let comparisons = steps.iter().filter(|step| step.compare.is_some()).count();
    let swaps = steps.iter().filter(|step| step.swap.is_some()).count();

    assert_eq!(steps.len(), 1 + comparisons + swaps + 1);
    assert_eq!(steps.last().map(|step| step.array.clone()), Some(vec![1, 2, 3, 4, 5]));
    assert!(steps.iter().all(|step| step.compare.is_none() || step.swap.is_none()));

    // Every swap directly follows the comparison of the same pair
    for (index, step) in steps.iter().enumerate() {
        if let Some(pair) = step.swap {
            assert_eq!(steps[index - 1].compare, Some(pair));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_autoplay_stops_on_last_step() {
    ensure_test_logging(None);
    LocalSet::new()
        .run_until(async {
            let viewer = BubbleSortViewer::new(&DEFAULT_ARRAY, &ViewerConfig::bubble_sort()).unwrap();
            viewer.set_speed(4.0).unwrap();
            assert_eq!(viewer.play_speed(), Duration::from_millis(250));

            viewer.play();
            let panel = viewer.panel();
            assert!(panel.shows_pause());
            assert!(!panel.is_enabled(Control::Step));
            assert!(!panel.is_enabled(Control::StepBack));

            sleep(Duration::from_millis(100)).await;
            assert_eq!(viewer.current(), 1);

            sleep(Duration::from_secs(60)).await;
            assert_eq!(viewer.current(), viewer.len() - 1);
            assert!(!viewer.is_playing());

            let panel = viewer.panel();
            assert_eq!(panel.play.icon, Icon::Play);
            assert!(!panel.is_enabled(Control::PlayPause));
            assert!(!panel.is_enabled(Control::Step));
            assert!(panel.is_enabled(Control::StepBack));
            assert!(panel.is_enabled(Control::Reset));

            // Playing at the end does nothing
            viewer.play();
            assert!(!viewer.is_playing());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_manual_step_pauses_autoplay() {
    LocalSet::new()
        .run_until(async {
            let viewer = BubbleSortViewer::new(&DEFAULT_ARRAY, &ViewerConfig::bubble_sort()).unwrap();

            viewer.play();
            sleep(Duration::from_millis(1500)).await;
            assert_eq!(viewer.current(), 2);

            assert!(viewer.step_back());
            assert!(!viewer.is_playing());
            assert_eq!(viewer.current(), 1);

            sleep(Duration::from_secs(5)).await;
            assert_eq!(viewer.current(), 1);

            viewer.activate(Control::Reset);
            assert_eq!(viewer.current(), 0);
            assert_eq!(viewer.current_step().array, DEFAULT_ARRAY.to_vec());
        })
        .await;
}
