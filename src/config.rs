//! Routing configuration.

use std::time::Duration;

/// Options for a [`PointerRoutingContext`](crate::state::PointerRoutingContext)
/// and the terminal decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseConfig {
    /// Initial state of the mouse-enabled toggle.
    pub enabled: bool,
    /// Raise the outermost overlapped container under a button press.
    pub raise_overlapped_on_press: bool,
    /// Max gap between two clicks for a double click.
    pub double_click_interval: Duration,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            raise_overlapped_on_press: true,
            double_click_interval: Duration::from_millis(500),
        }
    }
}

impl MouseConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_raise_overlapped_on_press(mut self, raise: bool) -> Self {
        self.raise_overlapped_on_press = raise;
        self
    }

    pub fn with_double_click_interval(mut self, interval: Duration) -> Self {
        self.double_click_interval = interval;
        self
    }
}
