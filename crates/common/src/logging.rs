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

//! Logging configuration for StepView components
//!
//! Provides centralized logging setup with:
//! - Compact console output on stderr, so stdout stays clean for reports
//! - File logging to a temporary directory (daily rotation)
//! - Environment variable support (RUST_LOG)

use eyre::Result;
use std::{env, fs, path::PathBuf, sync::Once};
use tracing::Level;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize console logging, optionally mirrored to a log file
///
/// The console layer writes compact lines to stderr at `level` unless
/// `RUST_LOG` says otherwise. With `enable_file_logging`, events at INFO and
/// above are also written to a daily-rotated file in the temp directory.
///
/// Returns the log file path when file logging is enabled.
///
/// # Examples
/// ```rust
/// use stepview_common::logging;
/// use tracing::Level;
///
/// fn main() -> eyre::Result<()> {
///     logging::init_logging("stepview", Level::WARN, false)?;
///     tracing::warn!("Only warnings reach the console");
///     Ok(())
/// }
/// ```
pub fn init_logging(
    component_name: &str,
    level: Level,
    enable_file_logging: bool,
) -> Result<Option<PathBuf>> {
    let (file_layer, log_path) = if enable_file_logging {
        let (layer, path) = file_layer(component_name, Level::INFO)?;
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(default_env_filter(level)?);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))?;

    log_environment_info(component_name);

    Ok(log_path)
}

/// Initialize file-only logging
///
/// Used by the terminal front end: anything written to stdout/stderr would
/// corrupt the alternate screen, so logs only go to a file.
///
/// Returns the path of the log file that will receive today's output.
pub fn init_file_only_logging(component_name: &str) -> Result<PathBuf> {
    let (file_layer, log_path) = file_layer(component_name, Level::INFO)?;

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))?;

    log_environment_info(component_name);

    Ok(log_path)
}

/// Daily-rotated file layer for `component_name`, plus the log file path
fn file_layer(component_name: &str, level: Level) -> Result<(BoxedLayer, PathBuf)> {
    let log_dir = create_log_directory(component_name)?;
    let file_name = format!("{component_name}.log");

    let (writer, guard) = non_blocking(rolling::daily(&log_dir, &file_name));
    // The writer must outlive every span, so the guard lives for the whole process
    std::mem::forget(guard);

    let layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(LocalTime::rfc_3339())
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(default_env_filter(level)?);

    Ok((layer.boxed(), log_dir.join(file_name)))
}

/// Create log directory in system temp folder
fn create_log_directory(component_name: &str) -> Result<PathBuf> {
    let log_dir = env::temp_dir().join("stepview-logs").join(component_name);
    fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}

/// RUST_LOG if set, otherwise the given level
fn default_env_filter(level: Level) -> Result<EnvFilter> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level.as_str()))?;
    Ok(filter)
}

/// Log useful environment and system information
fn log_environment_info(component_name: &str) {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let args: Vec<String> = env::args().collect();

    tracing::info!(
        component = component_name,
        rust_log = %rust_log,
        args = ?args,
        "Environment information"
    );

    if let Ok(current_dir) = env::current_dir() {
        tracing::debug!(working_directory = %current_dir.display(), "Working directory");
    }
}

/// Initialize simple logging (console only, compact formatting)
///
/// Useful for tests and the headless replay command.
pub fn init_simple_logging(level: Level) -> Result<()> {
    let env_filter = default_env_filter(level)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize simple logging: {e}"))?;

    Ok(())
}

static TEST_LOGGING_INIT: Once = Once::new();

/// Safe logging initialization for tests - can be called multiple times
///
/// Console-only output at INFO (or `default_level`) unless RUST_LOG says
/// otherwise. Only the first call in a test process installs a subscriber.
///
/// # Usage
/// ```rust
/// use stepview_common::logging;
///
/// logging::ensure_test_logging(None);
/// tracing::info!("logging is ready");
/// ```
pub fn ensure_test_logging(default_level: Option<Level>) {
    TEST_LOGGING_INIT.call_once(|| {
        // A subscriber may already be installed by the harness, which is fine
        let _ = init_simple_logging(default_level.unwrap_or(Level::INFO));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, error, info, warn};

    #[test]
    fn test_logging_functions_work() {
        ensure_test_logging(None);

        info!("Test info message");
        warn!("Test warning message");
        debug!("Test debug message");
        error!("Test error message");
    }

    #[test]
    fn test_log_directory_creation() {
        let log_dir = create_log_directory("test-component").unwrap();
        assert!(log_dir.exists());
        assert!(log_dir.to_string_lossy().contains("stepview-logs"));
        assert!(log_dir.to_string_lossy().contains("test-component"));
    }

    #[test]
    fn test_repeated_initialization_does_not_panic() {
        ensure_test_logging(None);

        // A subscriber is already installed, so both attempts report an error
        assert!(init_logging("test-repeat-1", Level::INFO, false).is_err());
        assert!(init_simple_logging(Level::DEBUG).is_err());

        info!("Logging still works after repeated init attempts");
    }
}
