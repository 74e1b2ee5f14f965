// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::actions::{FanThresholds, LedThresholds};
use crate::core::{BaselinePolicy, MissingFieldPolicy};
use crate::detection::{ChangeThresholds, EmergencyBounds};
use crate::error::ConfigError;
use crate::streaming::StreamingConfig;
use crate::voice::VoiceConfig;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Data directory
    pub data_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Sampling loop and alert cadence
    pub monitor: MonitorConfig,

    /// Minimum deltas that count as a significant change
    pub thresholds: ChangeThresholds,

    /// Critical bounds that raise an emergency
    pub emergency: EmergencyBounds,

    /// Automatic LED hysteresis band
    pub led: LedThresholds,

    /// Automatic fan switching
    pub fan: FanThresholds,

    /// Action log retention
    pub action_log: ActionLogConfig,

    /// Voice output
    pub voice: VoiceConfig,

    /// Simulated sensor board
    pub simulator: SimulatorConfig,

    /// History export
    pub streaming: StreamingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "IRIS".to_string(),
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
            monitor: MonitorConfig::default(),
            thresholds: ChangeThresholds::default(),
            emergency: EmergencyBounds::default(),
            led: LedThresholds::default(),
            fan: FanThresholds::default(),
            action_log: ActionLogConfig::default(),
            voice: VoiceConfig::default(),
            simulator: SimulatorConfig::default(),
            streaming: StreamingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Check every section for values the monitor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.monitor.validate()?;
        self.thresholds.validate()?;
        self.emergency.validate()?;
        self.led.validate()?;
        self.fan.validate()?;
        if self.action_log.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("iris-monitor"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Sampling loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Time between sensor samples in milliseconds
    pub sample_interval_ms: u64,

    /// Cadence of periodic summaries in seconds
    pub periodic_interval_secs: u64,

    /// Whether a periodic summary also moves the change baseline
    pub baseline_policy: BaselinePolicy,

    /// How announced readings with dropped-out fields update the baseline
    pub missing_fields: MissingFieldPolicy,

    /// Drive the LED from the light level
    pub auto_led: bool,

    /// Drive the fan from temperature and CO2
    pub auto_fan: bool,

    /// Print the status panel every tick
    pub status_display: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 1000,
            periodic_interval_secs: 120,
            baseline_policy: BaselinePolicy::Preserve,
            missing_fields: MissingFieldPolicy::Retain,
            auto_led: true,
            auto_fan: true,
            status_display: true,
        }
    }
}

impl MonitorConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn periodic_interval(&self) -> Duration {
        Duration::from_secs(self.periodic_interval_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("monitor.sample_interval_ms"));
        }
        if self.periodic_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("monitor.periodic_interval_secs"));
        }
        Ok(())
    }
}

/// Action log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionLogConfig {
    /// Maximum entries kept before the oldest are evicted
    pub capacity: usize,

    /// Entries shown under the status panel
    pub display_count: usize,
}

impl Default for ActionLogConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            display_count: 5,
        }
    }
}

/// Simulated sensor board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,

    /// Resting temperature in °F
    pub base_temperature: f64,

    /// Resting CO2 in ppm
    pub base_co2: u32,

    /// Resting raw light level
    pub base_light: u32,

    /// Uniform noise half-widths
    pub temperature_noise: f64,
    pub co2_noise: f64,
    pub light_noise: f64,

    /// Chance that any single field drops out of a reading
    pub dropout_probability: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            base_temperature: 72.0,
            base_co2: 450,
            base_light: 600,
            temperature_noise: 1.0,
            co2_noise: 20.0,
            light_noise: 50.0,
            dropout_probability: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.monitor.baseline_policy = BaselinePolicy::ResetOnSummary;
        config.monitor.missing_fields = MissingFieldPolicy::Replace;
        config.fan.min_dwell_secs = 60;
        config.simulator.seed = Some(42);

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[monitor]\nperiodic_interval_secs = 300\n").unwrap();
        assert_eq!(parsed.monitor.periodic_interval_secs, 300);
        assert_eq!(parsed.monitor.sample_interval_ms, 1000);
        assert_eq!(parsed.thresholds, ChangeThresholds::default());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = Config::default();
        config.monitor.periodic_interval_secs = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroInterval("monitor.periodic_interval_secs"))
        );
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let mut config = Config::default();
        config.action_log.capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_rejects_inverted_fan_band() {
        let mut config = Config::default();
        config.fan.temperature_off = 85.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFanBand { .. })));
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = std::env::temp_dir().join(format!("iris-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_file(&path);

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        let loaded = Config::load_or_create(&path).unwrap();
        assert_eq!(created, loaded);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
