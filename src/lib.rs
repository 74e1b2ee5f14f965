// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! IRIS - Environmental Monitor Alert Core
//!
//! Samples temperature, CO2 and light from a sensor board and decides, once per
//! tick, whether to say anything:
//! - emergency alerts when a reading leaves its safe bounds
//! - change alerts when a field moved far enough from the last announced reading
//! - periodic summaries when nothing else was said for a while
//!
//! It also drives an LED with hysteresis, keeps a bounded action log and takes
//! short text commands.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Monitor                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐  │
//! │  │ Sensors │ → │ Detection │ → │ Scheduler │ → │ Messages │  │
//! │  └─────────┘   └───────────┘   └───────────┘   └──────────┘  │
//! │       ↓              LED controller ↓ action log     ↓       │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                       Event Bus                        │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │       ↓                      ↓                      ↓        │
//! │  ┌─────────┐           ┌───────────┐           ┌─────────┐   │
//! │  │ Console │           │  Export   │           │  Voice  │   │
//! │  └─────────┘           └───────────┘           └─────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod actions;
pub mod commands;
pub mod config;
pub mod core;
pub mod detection;
pub mod error;
pub mod sensors;
pub mod streaming;
pub mod ui;
pub mod voice;

// Re-exports for convenience
pub use actions::{ActionLog, ActionLogEntry, LedController, LedState, LedThresholds};
pub use commands::Command;
pub use config::Config;
pub use core::{AlertDecision, AlertScheduler, BaselinePolicy, EventBus, Monitor};
pub use detection::{classify_emergency, detect_change, ChangeThresholds, EmergencyBounds};
pub use sensors::{EnvironmentSimulator, Field, FieldSet, Reading, Scenario};
pub use voice::{Priority, VoiceHandle, VoiceWorker};

/// IRIS version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// IRIS name
pub const NAME: &str = "IRIS";
