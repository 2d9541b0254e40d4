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

use assert_cmd::Command;
use predicates::prelude::*;
use stepview_tui::Config;
use tempfile::TempDir;
use tracing::info;

const COUNTING: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/counting.toml");
const SWAP: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/swap.toml");

fn stepview(config_dir: &TempDir) -> Command {
    let config_path = config_dir.path().join("stepview.toml");
    Config::default().save_to_path(&config_path).unwrap();

    let mut cmd = Command::cargo_bin("stepview").unwrap();
    cmd.arg("--config").arg(config_path);
    cmd
}

#[test]
fn test_help_command() {
    stepview_common::logging::ensure_test_logging(None);
    info!("Testing CLI help command");

    let mut cmd = Command::cargo_bin("stepview").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step through recorded program executions"));
}

#[test]
fn test_missing_subcommand() {
    stepview_common::logging::ensure_test_logging(None);
    let mut cmd = Command::cargo_bin("stepview").unwrap();
    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_replay_counting_lesson() {
    stepview_common::logging::ensure_test_logging(None);
    info!("Replaying {COUNTING}");
    let dir = TempDir::new().unwrap();

    stepview(&dir)
        .arg("replay")
        .arg(COUNTING)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Counting with a loop"))
        .stdout(predicate::str::contains("for i in range(1, 4):"))
        .stdout(predicate::str::contains("total = 6"))
        .stdout(predicate::str::contains("assert").not())
        .stdout(predicate::str::contains("8 stops"));
}

#[test]
fn test_replay_inline_lesson() {
    stepview_common::logging::ensure_test_logging(None);
    let dir = TempDir::new().unwrap();

    stepview(&dir)
        .arg("replay")
        .arg(SWAP)
        .assert()
        .success()
        .stdout(predicate::str::contains("   3 | b = t"))
        .stdout(predicate::str::contains("3 stops"));
}

#[test]
fn test_replay_missing_lesson() {
    stepview_common::logging::ensure_test_logging(None);
    let dir = TempDir::new().unwrap();

    stepview(&dir)
        .arg("replay")
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read lesson file"));
}

#[test]
fn test_replay_with_log_file() {
    stepview_common::logging::ensure_test_logging(None);
    let dir = TempDir::new().unwrap();

    stepview(&dir)
        .arg("replay")
        .arg("--log-file")
        .arg(SWAP)
        .assert()
        .success()
        .stderr(predicate::str::contains("StepView logs:").and(predicate::str::contains("stepview.log")))
        .stdout(predicate::str::contains("3 stops"));
}
