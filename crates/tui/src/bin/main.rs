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

//! StepView - step through recorded program executions in the terminal

use clap::{Parser, Subcommand};
use eyre::Result;
use std::{io, path::PathBuf, time::Duration};
use stepview_common::logging;
use stepview_tui::{api, Config, TuiConfig};
use stepview_viewer::DEFAULT_ARRAY;
use tracing::Level;

/// StepView Terminal User Interface
#[derive(Debug, Parser)]
#[command(name = "stepview")]
#[command(about = "Step through recorded program executions", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file path (uses ~/.stepview.toml if not specified)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable mouse support
    #[arg(long, global = true)]
    mouse: bool,

    /// Terminal refresh interval in milliseconds
    #[arg(long, global = true, default_value = "50")]
    refresh_interval: u64,

    /// Initial autoplay speed multiplier
    #[arg(long, global = true)]
    speed: Option<f64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Step through a lesson interactively
    View {
        /// Lesson file (TOML)
        lesson: PathBuf,
    },
    /// Step through a lesson to its end and print every stop
    Replay {
        /// Lesson file (TOML)
        lesson: PathBuf,

        /// Also write logs to a file in the temp directory
        #[arg(long)]
        log_file: bool,
    },
    /// Watch a bubble sort
    Sort {
        /// Values to sort, separated by commas
        #[arg(value_delimiter = ',', allow_negative_numbers = true)]
        values: Vec<i64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Command::Replay { log_file, .. } = args.command {
        if let Some(log_file_path) = logging::init_logging("stepview", Level::WARN, log_file)? {
            eprintln!("StepView logs: {}", log_file_path.display());
        }
    } else {
        // Logs go to file so they do not garble the screen
        let log_file_path = logging::init_file_only_logging("stepview")?;
        eprintln!("StepView logs: {}", log_file_path.display());
    }

    let config = match &args.config {
        Some(config_path) => Config::load_from_path(config_path)?,
        None => Config::load().unwrap_or_default(),
    };

    let tui_config = TuiConfig {
        refresh_interval: Duration::from_millis(args.refresh_interval),
        enable_mouse: args.mouse,
    };

    match args.command {
        Command::View { lesson } => {
            tracing::info!("Opening lesson {}", lesson.display());
            api::start_lesson(lesson, &config, args.speed, tui_config).await
        }
        Command::Replay { lesson, .. } => api::replay_lesson(lesson, &config, &mut io::stdout().lock()),
        Command::Sort { values } => {
            let values = if values.is_empty() { DEFAULT_ARRAY.to_vec() } else { values };
            api::start_sort(&values, &config, args.speed, tui_config).await
        }
    }
}
