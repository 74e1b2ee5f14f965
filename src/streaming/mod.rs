//! Streaming module - JSON-lines history export

mod export;

pub use export::*;

use serde::{Deserialize, Serialize};

/// Export configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Append alerts and actions to `history.jsonl` under the data directory
    pub export_enabled: bool,

    /// Also append every reading to `readings.jsonl`
    pub export_readings: bool,
}
