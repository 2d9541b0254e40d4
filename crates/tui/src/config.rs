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

//! Configuration system for the StepView TUI
//!
//! Manages user preferences: playback settings, color schemes and panel
//! options. Stored as TOML in `~/.stepview.toml`.

use eyre::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use stepview_viewer::ViewerConfig;
use tracing::{debug, info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playback and dispatch settings
    pub viewer: ViewerConfig,
    /// Current theme configuration
    pub theme: ThemeConfig,
    /// Panel-specific settings
    pub panels: PanelConfig,
}

/// Theme configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Current active theme name
    pub active: String,
    /// Available themes
    pub themes: HashMap<String, Theme>,
}

/// Individual theme definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Theme display name
    pub name: String,
    /// Theme description
    pub description: String,
    /// Color scheme for different UI elements
    pub colors: ColorScheme,
}

/// Color scheme definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    /// Focused panel border color
    pub focused_border: String,
    /// Unfocused panel border color
    pub unfocused_border: String,
    /// Current line background
    pub highlight_bg: String,
    /// Current line foreground
    pub highlight_fg: String,
    /// Background of a line that was just selected
    pub flash_bg: String,
    /// Line number gutter
    pub line_number: String,
    /// Keywords
    pub keyword: String,
    /// Builtin functions
    pub builtin: String,
    /// String literals
    pub string: String,
    /// Numeric literals
    pub number: String,
    /// Comments
    pub comment: String,
    /// Help text color
    pub help_text: String,
    /// Disabled controls
    pub disabled: String,
    /// Error/negative color
    pub error: String,
}

/// Panel-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Code panel settings
    pub code: CodePanelConfig,
    /// Scope panel settings
    pub scope: ScopePanelConfig,
}

/// Code panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodePanelConfig {
    /// Show line numbers
    pub show_line_numbers: bool,
    /// How long a newly selected line flashes, in milliseconds (0 disables)
    pub flash_ms: u64,
}

/// Scope panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopePanelConfig {
    /// Show the JSON type next to each value
    pub show_types: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let mut themes = HashMap::new();

        themes.insert(
            "default".to_string(),
            Theme {
                name: "Default".to_string(),
                description: "Default StepView theme with blue accents".to_string(),
                colors: ColorScheme {
                    focused_border: "cyan".to_string(),
                    unfocused_border: "gray".to_string(),
                    highlight_bg: "blue".to_string(),
                    highlight_fg: "white".to_string(),
                    flash_bg: "light_blue".to_string(),
                    line_number: "dark_gray".to_string(),
                    keyword: "magenta".to_string(),
                    builtin: "cyan".to_string(),
                    string: "green".to_string(),
                    number: "yellow".to_string(),
                    comment: "dark_gray".to_string(),
                    help_text: "yellow".to_string(),
                    disabled: "dark_gray".to_string(),
                    error: "red".to_string(),
                },
            },
        );

        themes.insert(
            "light".to_string(),
            Theme {
                name: "Light".to_string(),
                description: "Light theme with dark text on light backgrounds".to_string(),
                colors: ColorScheme {
                    focused_border: "blue".to_string(),
                    unfocused_border: "gray".to_string(),
                    highlight_bg: "light_yellow".to_string(),
                    highlight_fg: "black".to_string(),
                    flash_bg: "yellow".to_string(),
                    line_number: "gray".to_string(),
                    keyword: "blue".to_string(),
                    builtin: "magenta".to_string(),
                    string: "green".to_string(),
                    number: "red".to_string(),
                    comment: "gray".to_string(),
                    help_text: "dark_gray".to_string(),
                    disabled: "gray".to_string(),
                    error: "red".to_string(),
                },
            },
        );

        themes.insert(
            "monokai".to_string(),
            Theme {
                name: "Monokai".to_string(),
                description: "Popular dark theme with vibrant colors".to_string(),
                colors: ColorScheme {
                    focused_border: "magenta".to_string(),
                    unfocused_border: "dark_gray".to_string(),
                    highlight_bg: "dark_gray".to_string(),
                    highlight_fg: "light_green".to_string(),
                    flash_bg: "magenta".to_string(),
                    line_number: "dark_gray".to_string(),
                    keyword: "light_red".to_string(),
                    builtin: "light_cyan".to_string(),
                    string: "light_yellow".to_string(),
                    number: "light_magenta".to_string(),
                    comment: "gray".to_string(),
                    help_text: "cyan".to_string(),
                    disabled: "dark_gray".to_string(),
                    error: "red".to_string(),
                },
            },
        );

        Self { active: "default".to_string(), themes }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            code: CodePanelConfig { show_line_numbers: true, flash_ms: 300 },
            scope: ScopePanelConfig { show_types: false },
        }
    }
}

impl Config {
    /// Get the config file path (~/.stepview.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".stepview.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found, creating default at {config_path:?}");
            let default_config = Self::default();
            default_config.save_to_path(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from_path(config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from_path(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {config_path:?}"))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;
        config.viewer.validate()?;

        debug!("Loaded configuration from {config_path:?}");
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(Self::config_path()?)
    }

    /// Save configuration to `config_path`
    pub fn save_to_path(&self, config_path: impl AsRef<Path>) -> Result<()> {
        let config_path = config_path.as_ref();
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {config_path:?}"))?;

        debug!("Saved configuration to {config_path:?}");
        Ok(())
    }

    /// Get the currently active theme
    pub fn get_active_theme(&self) -> Option<&Theme> {
        self.theme.themes.get(&self.theme.active)
    }

    /// Colors of the active theme, falling back to the built-in default
    pub fn colors(&self) -> ColorScheme {
        match self.get_active_theme() {
            Some(theme) => theme.colors.clone(),
            None => {
                warn!("Theme '{}' not found, using the default colors", self.theme.active);
                ThemeConfig::default().themes["default"].colors.clone()
            }
        }
    }

    /// Switch to a different theme
    pub fn set_theme(&mut self, theme_name: &str) -> Result<()> {
        if !self.theme.themes.contains_key(theme_name) {
            return Err(eyre::eyre!("Theme '{theme_name}' not found"));
        }

        self.theme.active = theme_name.to_string();
        info!("Switched to theme: {theme_name}");
        Ok(())
    }

    /// Convert color string to ratatui Color
    ///
    /// Accepts the ratatui color names (with `_` or `-` separators) and the
    /// names of the bubble sort palette.
    pub fn parse_color(color_str: &str) -> Color {
        match color_str.to_lowercase().replace('-', "_").as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "light_gray" => Color::Gray,
            "dark_gray" => Color::DarkGray,
            "light_red" => Color::LightRed,
            "light_green" => Color::LightGreen,
            "light_yellow" => Color::LightYellow,
            "light_blue" => Color::LightBlue,
            "light_magenta" => Color::LightMagenta,
            "light_cyan" => Color::LightCyan,
            "white" => Color::White,
            "orange" => Color::Rgb(255, 140, 0),
            "pink" => Color::Rgb(255, 105, 180),
            "dark_blue" => Color::Rgb(30, 60, 160),
            _ => {
                warn!("Unknown color '{color_str}', using default gray");
                Color::Gray
            }
        }
    }
}

impl ColorScheme {
    /// Get focused border color
    pub fn focused_border(&self) -> Color {
        Config::parse_color(&self.focused_border)
    }

    /// Get unfocused border color
    pub fn unfocused_border(&self) -> Color {
        Config::parse_color(&self.unfocused_border)
    }

    /// Get current line background color
    pub fn highlight_bg(&self) -> Color {
        Config::parse_color(&self.highlight_bg)
    }

    /// Get current line foreground color
    pub fn highlight_fg(&self) -> Color {
        Config::parse_color(&self.highlight_fg)
    }

    /// Get flash background color
    pub fn flash_bg(&self) -> Color {
        Config::parse_color(&self.flash_bg)
    }

    /// Get line number color
    pub fn line_number(&self) -> Color {
        Config::parse_color(&self.line_number)
    }

    /// Get help text color
    pub fn help_text(&self) -> Color {
        Config::parse_color(&self.help_text)
    }

    /// Get disabled control color
    pub fn disabled(&self) -> Color {
        Config::parse_color(&self.disabled)
    }

    /// Get error color
    pub fn error(&self) -> Color {
        Config::parse_color(&self.error)
    }
}
