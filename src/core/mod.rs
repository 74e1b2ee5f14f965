//! Core module - alert scheduling and the sampling engine

mod engine;
mod scheduler;
mod event_bus;

pub use engine::Monitor;
pub use scheduler::{AlertDecision, AlertScheduler, BaselinePolicy, MissingFieldPolicy};
pub use event_bus::{Event, EventBus, EventPayload, EventType};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monitor-wide counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorState {
    pub running: bool,
    pub ticks: u64,
    pub alerts: u64,
    pub emergencies: u64,
    pub sensor_errors: u64,
    pub led_switches: u64,
    pub fan_switches: u64,
    pub last_alert: Option<DateTime<Utc>>,
}
