//! Status icons for CLI output

use crate::infrastructure::constants::NODE_STATE_STARTED;

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Success icon (node alive and started)
    pub const SUCCESS: &'static str = "✓";

    /// Warning icon (node known but not serving)
    pub const WARNING: &'static str = "⚠";

    /// Error icon (node dead)
    pub const ERROR: &'static str = "✗";

    /// Pending icon (waiting)
    pub const PENDING: &'static str = "⏳";

    /// Unknown icon
    pub const UNKNOWN: &'static str = "?";

    /// Get status icon for a node's lifecycle state and liveness
    pub fn get_node_icon(status: &str, alive: bool) -> &'static str {
        if status.is_empty() {
            Self::UNKNOWN
        } else if status == NODE_STATE_STARTED && alive {
            Self::SUCCESS
        } else if status == NODE_STATE_STARTED {
            // Claims to be running but does not answer its HTTP port
            Self::ERROR
        } else if alive {
            Self::PENDING
        } else {
            Self::WARNING
        }
    }
}
