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

//! Viewer and playback settings

use std::time::Duration;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ViewerError;

/// Default delay between two autoplay ticks at 1x speed
pub const DEFAULT_STEP_DELAY_MS: u64 = 1000;

/// What happens when a lifecycle subscriber fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Stop at the first failing subscriber and return its error to the caller
    #[default]
    Propagate,
    /// Log the failure and keep notifying the remaining subscribers
    Isolate,
}

/// Settings shared by the stepping and playback controllers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Delay between autoplay ticks at 1x, in milliseconds
    pub base_delay_ms: u64,
    /// Multipliers offered by the speed selector, slowest first
    pub speed_options: Vec<f64>,
    /// Multiplier selected when a viewer starts
    pub default_speed: f64,
    /// Error handling for lifecycle subscribers
    pub dispatch_policy: DispatchPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: DEFAULT_STEP_DELAY_MS,
            speed_options: vec![0.2, 0.5, 1.0, 2.0, 4.0, 8.0],
            default_speed: 1.0,
            dispatch_policy: DispatchPolicy::Propagate,
        }
    }
}

impl ViewerConfig {
    /// Settings used by the bubble sort player
    pub fn bubble_sort() -> Self {
        Self { speed_options: vec![0.25, 0.5, 1.0, 2.0, 4.0], ..Self::default() }
    }

    /// Parse settings from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).wrap_err("Failed to parse viewer config as TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Delay between autoplay ticks at 1x
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Check that every multiplier gives a usable delay between ticks
    pub fn validate(&self) -> Result<(), ViewerError> {
        for &speed in self.speed_options.iter().chain(std::iter::once(&self.default_speed)) {
            tick_delay(self.base_delay(), speed)?;
        }
        Ok(())
    }
}

/// Delay between ticks when playing at `speed` times the base pace
///
/// Fails for non-positive or non-finite multipliers, and for multipliers so
/// small that the delay does not fit in a [`Duration`].
pub fn tick_delay(base_delay: Duration, speed: f64) -> Result<Duration, ViewerError> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(ViewerError::InvalidSpeed(speed));
    }
    Duration::try_from_secs_f64(base_delay.as_secs_f64() / speed)
        .map_err(|_| ViewerError::InvalidSpeed(speed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.base_delay(), Duration::from_secs(1));
        assert_eq!(config.speed_options, vec![0.2, 0.5, 1.0, 2.0, 4.0, 8.0]);
        assert_eq!(config.dispatch_policy, DispatchPolicy::Propagate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tiny_speed_is_rejected() {
        let config = ViewerConfig { default_speed: 1e-20, ..ViewerConfig::default() };
        assert_eq!(config.validate(), Err(ViewerError::InvalidSpeed(1e-20)));
        assert!(ViewerConfig::from_toml_str("default_speed = 1e-20").is_err());

        assert_eq!(tick_delay(Duration::from_secs(1), 4.0), Ok(Duration::from_millis(250)));
        assert_eq!(tick_delay(Duration::from_secs(1), -1.0), Err(ViewerError::InvalidSpeed(-1.0)));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            base_delay_ms = 250
            dispatch_policy = "isolate"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_delay_ms, 250);
        assert_eq!(config.dispatch_policy, DispatchPolicy::Isolate);
        assert_eq!(config.default_speed, 1.0);
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let err = ViewerConfig::from_toml_str("speed_options = [1.0, 0.0]").unwrap_err();
        assert_eq!(err.downcast_ref::<ViewerError>(), Some(&ViewerError::InvalidSpeed(0.0)));
    }
}
