// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! User text commands and keyword matching

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::actions::{ActuatorCommand, LedState};
use crate::error::CommandError;

/// Something the user asked the monitor to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    LedOn,
    LedOff,
    FanOn,
    FanOff,
    Status,
    EmergencyCheck,
    RecentActions,
    Help,
}

impl Command {
    /// Match order. Specific phrases come before broad ones so that
    /// "turn the light on" is not read as a status question about light.
    pub const ALL: [Command; 8] = [
        Command::EmergencyCheck,
        Command::FanOn,
        Command::FanOff,
        Command::LedOn,
        Command::LedOff,
        Command::RecentActions,
        Command::Help,
        Command::Status,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Command::LedOn => &["led on", "light on", "lights on", "turn on the led", "turn on led", "turn the light on"],
            Command::LedOff => &["led off", "light off", "lights off", "turn off the led", "turn off led", "turn the light off"],
            Command::FanOn => &["fan on", "turn on the fan", "turn on fan", "start the fan", "turn the fan on"],
            Command::FanOff => &["fan off", "turn off the fan", "turn off fan", "stop the fan", "turn the fan off"],
            Command::Status => &["status", "temperature", "co2", "light level", "how is", "environment", "reading"],
            Command::EmergencyCheck => &["emergency", "safety check"],
            Command::RecentActions => &["recent", "actions", "history", "log"],
            Command::Help => &["help", "commands", "what can you do"],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::LedOn => "Turn the LED on",
            Command::LedOff => "Turn the LED off",
            Command::FanOn => "Turn the fan on",
            Command::FanOff => "Turn the fan off",
            Command::Status => "Report the current readings",
            Command::EmergencyCheck => "Check readings against the emergency bounds",
            Command::RecentActions => "List recent automatic and manual actions",
            Command::Help => "List available commands",
        }
    }

    /// First command whose keyword appears in `text`
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return Err(CommandError::Empty);
        }
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.keywords().iter().any(|k| text.contains(k)))
            .ok_or(CommandError::Unknown(text))
    }

    /// Actuator switch this command maps to, if any
    pub fn actuator(&self) -> Option<ActuatorCommand> {
        match self {
            Command::LedOn => Some(ActuatorCommand::Led(LedState::On)),
            Command::LedOff => Some(ActuatorCommand::Led(LedState::Off)),
            Command::FanOn => Some(ActuatorCommand::Fan(true)),
            Command::FanOff => Some(ActuatorCommand::Fan(false)),
            Command::Status | Command::EmergencyCheck | Command::RecentActions | Command::Help => None,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Command list shown for `help`
pub fn help_text() -> String {
    let mut result = String::from("Available commands:\n");
    for cmd in Command::ALL {
        result.push_str(&format!("- {}: {}\n", cmd.keywords()[0], cmd.description()));
    }
    result
}
