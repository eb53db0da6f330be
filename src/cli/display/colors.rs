//! Color theme for CLI output

use crate::infrastructure::constants::NODE_STATE_STARTED;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for a node's lifecycle state and liveness
    pub fn get_node_color(&self, status: &str, alive: bool) -> TableColor {
        if status.is_empty() {
            self.muted
        } else if status == NODE_STATE_STARTED && alive {
            self.success
        } else if status == NODE_STATE_STARTED {
            // Claims to be running but does not answer its HTTP port
            self.error
        } else if alive {
            self.info
        } else {
            self.warning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_colors() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_node_color("started", true), TableColor::Green);
        assert_eq!(theme.get_node_color("started", false), TableColor::Red);
        assert_eq!(theme.get_node_color("starting", true), TableColor::Cyan);
        assert_eq!(theme.get_node_color("starting", false), TableColor::Yellow);
        assert_eq!(theme.get_node_color("", false), TableColor::DarkGrey);
    }
}
