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

//! Unicode icons and symbols for the player controls

use stepview_viewer::Icon;

/// Collection of Unicode icons used throughout the TUI
#[derive(Debug, Clone)]
pub struct Icons;

impl Icons {
    // Player controls
    /// Restart from the first step
    pub const RESTART: &'static str = "⟲";
    /// Start autoplay
    pub const PLAY: &'static str = "▶";
    /// Stop autoplay
    pub const PAUSE: &'static str = "⏸";
    /// Step forward
    pub const SKIP_FORWARD: &'static str = "⏭";
    /// Step back
    pub const SKIP_BACK: &'static str = "⏮";

    // Code view
    /// Indicator for the current line in code view
    pub const CURRENT_LINE: &'static str = "►";
    /// Marker for array items being compared
    pub const COMPARING: &'static str = "↕";
    /// Marker for array items that were just swapped
    pub const SWAPPING: &'static str = "⇄";

    // Special characters
    /// Bullet point character for lists and emphasis
    pub const BULLET: &'static str = "•";

    /// Glyph shown for a player icon
    pub fn glyph(icon: Icon) -> &'static str {
        match icon {
            Icon::Restart => Self::RESTART,
            Icon::Play => Self::PLAY,
            Icon::Pause => Self::PAUSE,
            Icon::SkipForward => Self::SKIP_FORWARD,
            Icon::SkipBack => Self::SKIP_BACK,
        }
    }
}
