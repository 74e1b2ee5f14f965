// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Actions module - actuators, automatic LED and fan control, and the action log

mod fan;
mod led;
mod log;

pub use fan::{decide_fan_state, fan_trigger, FanController, FanReason, FanThresholds};
pub use led::{decide_led_state, LedController, LedState, LedThresholds};
pub use log::{ActionKind, ActionLog, ActionLogEntry};

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Output devices the monitor can switch
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn set_led(&mut self, state: LedState) -> Result<()>;

    async fn set_fan(&mut self, on: bool) -> Result<()>;

    async fn apply(&mut self, command: ActuatorCommand) -> Result<()> {
        match command {
            ActuatorCommand::Led(state) => self.set_led(state).await,
            ActuatorCommand::Fan(on) => self.set_fan(on).await,
        }
    }
}

/// Logical actuator command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorCommand {
    Led(LedState),
    Fan(bool),
}

impl ActuatorCommand {
    /// Single-line command string understood by the sensor board firmware
    pub fn wire(&self) -> &'static str {
        match self {
            ActuatorCommand::Led(LedState::On) => "L1",
            ActuatorCommand::Led(LedState::Off) => "L0",
            ActuatorCommand::Fan(true) => "F1",
            ActuatorCommand::Fan(false) => "F0",
        }
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorCommand::Led(state) => write!(f, "LED {}", state),
            ActuatorCommand::Fan(true) => f.write_str("fan ON"),
            ActuatorCommand::Fan(false) => f.write_str("fan OFF"),
        }
    }
}
