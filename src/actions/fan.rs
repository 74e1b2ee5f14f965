// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Automatic fan control for warm or stuffy air
//!
//! ```text
//!        temperature > temperature_on  or  co2 > co2_on
//!   Off ─────────────────────────────────────────────────► On
//!    ▲                                                      │
//!    └──── temperature < temperature_off and co2 < co2_off ─┘
//! ```
//!
//! A missing field never votes to switch. After any switch, automatic or
//! manual, the fan holds for `min_dwell_secs`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sensors::{Field, Reading};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanThresholds {
    /// Above this °F the fan turns on
    pub temperature_on: f64,
    /// Below this °F the fan may turn off
    pub temperature_off: f64,
    /// Above this ppm the fan turns on
    pub co2_on: u32,
    /// Below this ppm the fan may turn off
    pub co2_off: u32,
    /// Minimum time between switches
    pub min_dwell_secs: u64,
}

impl Default for FanThresholds {
    fn default() -> Self {
        Self {
            temperature_on: 80.0,
            temperature_off: 76.0,
            co2_on: 1000,
            co2_off: 800,
            min_dwell_secs: 300,
        }
    }
}

impl FanThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.temperature_on.is_finite() || !self.temperature_off.is_finite() {
            return Err(ConfigError::NonFiniteBound { field: Field::Temperature });
        }
        if self.temperature_off >= self.temperature_on {
            return Err(ConfigError::InvalidFanBand {
                field: Field::Temperature,
                off: self.temperature_off,
                on: self.temperature_on,
            });
        }
        if self.co2_off >= self.co2_on {
            return Err(ConfigError::InvalidFanBand {
                field: Field::Co2,
                off: self.co2_off as f64,
                on: self.co2_on as f64,
            });
        }
        Ok(())
    }

    pub fn min_dwell(&self) -> Duration {
        Duration::from_secs(self.min_dwell_secs)
    }
}

/// Why the fan should be running, if it should
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanReason {
    Warm,
    PoorAir,
}

/// Reason to run the fan for `reading`, ignoring the current state
pub fn fan_trigger(reading: &Reading, thresholds: &FanThresholds) -> Option<FanReason> {
    if reading.temperature.is_some_and(|t| t > thresholds.temperature_on) {
        Some(FanReason::Warm)
    } else if reading.co2.is_some_and(|c| c > thresholds.co2_on) {
        Some(FanReason::PoorAir)
    } else {
        None
    }
}

/// Next fan state for `reading` given whether it is running now
pub fn decide_fan_state(reading: &Reading, running: bool, thresholds: &FanThresholds) -> bool {
    if !running {
        return fan_trigger(reading, thresholds).is_some();
    }
    let cool = reading.temperature.is_some_and(|t| t < thresholds.temperature_off);
    let fresh = reading.co2.is_some_and(|c| c < thresholds.co2_off);
    !(cool && fresh)
}

/// Tracks the fan state and its last switch across ticks
#[derive(Debug, Clone)]
pub struct FanController {
    thresholds: FanThresholds,
    running: bool,
    last_switch: Option<DateTime<Utc>>,
}

impl FanController {
    pub fn new(thresholds: FanThresholds) -> Self {
        Self {
            thresholds,
            running: false,
            last_switch: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record a switch made outside the controller
    pub fn force(&mut self, running: bool, at: DateTime<Utc>) {
        self.running = running;
        self.last_switch = Some(at);
    }

    /// Forget a switch that failed to reach the device
    pub fn revert(&mut self, running: bool, last_switch: Option<DateTime<Utc>>) {
        self.running = running;
        self.last_switch = last_switch;
    }

    pub fn last_switch(&self) -> Option<DateTime<Utc>> {
        self.last_switch
    }

    fn dwelling(&self, now: DateTime<Utc>) -> bool {
        self.last_switch.is_some_and(|last| match (now - last).to_std() {
            Ok(elapsed) => elapsed < self.thresholds.min_dwell(),
            Err(_) => true,
        })
    }

    /// Feed a reading; returns the new state when it changed
    pub fn update(&mut self, reading: &Reading) -> Option<bool> {
        if self.dwelling(reading.timestamp) {
            return None;
        }
        let next = decide_fan_state(reading, self.running, &self.thresholds);
        if next == self.running {
            return None;
        }
        self.force(next, reading.timestamp);
        Some(next)
    }
}
