//! `[watch]` section configuration.
//!
//! ```toml
//! [watch]
//! debounce_ms = 300    # Quiet period before recompiling
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::watch::DEFAULT_DEBOUNCE;

/// Watcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub debounce_ms: u64,
}

impl WatchConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}
