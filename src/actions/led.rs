// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Automatic LED control with a hysteresis band
//!
//! ```text
//!          light < dark
//!   Off ────────────────► On
//!    ▲                     │
//!    └──── light > bright ─┘
//! ```
//!
//! Inside `[dark, bright]` the previous state holds, so a light level hovering
//! near one threshold cannot make the LED flap.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LedState {
    On,
    #[default]
    Off,
}

impl LedState {
    pub fn toggled(self) -> Self {
        match self {
            LedState::On => LedState::Off,
            LedState::Off => LedState::On,
        }
    }
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedState::On => f.write_str("ON"),
            LedState::Off => f.write_str("OFF"),
        }
    }
}

/// Light levels that switch the LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedThresholds {
    /// Below this the LED turns on
    pub dark: u32,
    /// Above this the LED turns off
    pub bright: u32,
}

impl Default for LedThresholds {
    fn default() -> Self {
        Self { dark: 200, bright: 600 }
    }
}

impl LedThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dark >= self.bright {
            return Err(ConfigError::InvalidLedBand { dark: self.dark, bright: self.bright });
        }
        Ok(())
    }
}

/// Next LED state for `light` given the state it is currently in
pub fn decide_led_state(light: u32, prior: LedState, thresholds: &LedThresholds) -> LedState {
    match prior {
        LedState::Off if light < thresholds.dark => LedState::On,
        LedState::On if light > thresholds.bright => LedState::Off,
        _ => prior,
    }
}

/// Tracks the LED state across ticks
#[derive(Debug, Clone)]
pub struct LedController {
    thresholds: LedThresholds,
    state: LedState,
}

impl LedController {
    pub fn new(thresholds: LedThresholds, initial: LedState) -> Self {
        Self { thresholds, state: initial }
    }

    pub fn state(&self) -> LedState {
        self.state
    }

    /// Record a manual override so automatic control continues from it
    pub fn force(&mut self, state: LedState) {
        self.state = state;
    }

    /// Feed a light reading; returns the new state when it changed
    pub fn update(&mut self, light: u32) -> Option<LedState> {
        let next = decide_led_state(light, self.state, &self.thresholds);
        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }
}
