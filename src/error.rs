// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Typed errors for configuration, commands and speech

use thiserror::Error;

use crate::sensors::Field;

/// Configuration rejected by [`Config::validate`](crate::Config::validate)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("change threshold for {field} must be positive and finite, got {value}")]
    InvalidThreshold { field: Field, value: f64 },

    #[error("emergency bounds for {field} are inverted: low {low} is not below high {high}")]
    InvertedBounds { field: Field, low: f64, high: f64 },

    #[error("emergency bound for {field} is not finite")]
    NonFiniteBound { field: Field },

    #[error("LED dark threshold {dark} must be below bright threshold {bright}")]
    InvalidLedBand { dark: u32, bright: u32 },

    #[error("fan {field} off level {off} must be below on level {on}")]
    InvalidFanBand { field: Field, off: f64, on: f64 },

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("action log capacity must be at least 1")]
    ZeroCapacity,
}

/// User text that could not be turned into a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unrecognised command: '{0}'")]
    Unknown(String),
}

/// Failures from the speech backend
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("refusing to speak empty text")]
    EmptyText,

    #[error("speech command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
