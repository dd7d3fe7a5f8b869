use crate::config::default_close_delay_ms;

use serde::{Deserialize, Serialize};

/// Popup behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// How long the success confirmation stays up before the popup closes
    /// and resets, in milliseconds.
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}
