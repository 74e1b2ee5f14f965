// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Environment simulator for demo/testing

use std::str::FromStr;

use async_trait::async_trait;
use anyhow::{bail, Result};
use chrono::Utc;
use rand::prelude::*;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Reading, SensorSource, SensorStatus};
use crate::actions::{Actuator, LedState};
use crate::config::SimulatorConfig;

/// Canned conditions the simulator can be pushed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Normal,
    HighTemperature,
    HighCo2,
    LowLight,
    Emergency,
}

impl FromStr for Scenario {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "normal" => Ok(Scenario::Normal),
            "high_temp" | "high_temperature" => Ok(Scenario::HighTemperature),
            "high_co2" => Ok(Scenario::HighCo2),
            "low_light" => Ok(Scenario::LowLight),
            "emergency" => Ok(Scenario::Emergency),
            other => bail!("unknown scenario '{}'", other),
        }
    }
}

/// Base conditions the noise is applied around
#[derive(Debug, Clone, Copy, PartialEq)]
struct Conditions {
    temperature: f64,
    co2: f64,
    light: f64,
}

/// Simulates a desk-side sensor board with an LED and a fan attached
pub struct EnvironmentSimulator {
    id: String,
    status: SensorStatus,
    rng: StdRng,
    config: SimulatorConfig,
    base: Conditions,
    led: LedState,
    fan: bool,
    sequence: u64,
}

impl EnvironmentSimulator {
    pub fn new(id: &str, config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let base = Conditions {
            temperature: config.base_temperature,
            co2: config.base_co2 as f64,
            light: config.base_light as f64,
        };

        Self {
            id: id.to_string(),
            status: SensorStatus::Disconnected,
            rng,
            config,
            base,
            led: LedState::Off,
            fan: false,
            sequence: 0,
        }
    }

    /// Push the simulated room into a scenario
    pub fn apply_scenario(&mut self, scenario: Scenario) {
        let mut base = Conditions {
            temperature: self.config.base_temperature,
            co2: self.config.base_co2 as f64,
            light: self.config.base_light as f64,
        };
        match scenario {
            Scenario::Normal => {}
            Scenario::HighTemperature => base.temperature = 82.0,
            Scenario::HighCo2 => base.co2 = 1200.0,
            Scenario::LowLight => base.light = 150.0,
            Scenario::Emergency => {
                base.temperature = 97.0;
                base.co2 = 2200.0;
            }
        }
        self.base = base;
        info!("Simulator {} switched to {:?}", self.id, scenario);
    }

    fn jitter(&mut self, spread: f64) -> f64 {
        if spread <= 0.0 {
            return 0.0;
        }
        self.rng.sample(Uniform::new_inclusive(-spread, spread))
    }

    fn dropped(&mut self) -> bool {
        self.config.dropout_probability > 0.0 && self.rng.gen::<f64>() < self.config.dropout_probability
    }

    fn generate(&mut self) -> Reading {
        let mut temperature = self.base.temperature + self.jitter(self.config.temperature_noise);
        let mut co2 = self.base.co2 + self.jitter(self.config.co2_noise);
        let mut light = self.base.light + self.jitter(self.config.light_noise);

        // Actuators feed back into the room
        if self.fan {
            temperature -= 3.0;
            co2 -= 100.0;
        }
        if self.led == LedState::On {
            light += 200.0;
        }

        let temperature = (temperature * 10.0).round() / 10.0;
        let co2 = co2.max(0.0).round() as u32;
        let light = light.clamp(0.0, 1023.0).round() as u32;

        Reading {
            temperature: if self.dropped() { None } else { Some(temperature) },
            co2: if self.dropped() { None } else { Some(co2) },
            light: if self.dropped() { None } else { Some(light) },
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl SensorSource for EnvironmentSimulator {
    fn id(&self) -> &str { &self.id }
    fn status(&self) -> SensorStatus { self.status }

    async fn connect(&mut self) -> Result<()> {
        self.status = SensorStatus::Active;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.status = SensorStatus::Disconnected;
        Ok(())
    }

    async fn read(&mut self) -> Result<Reading> {
        if self.status != SensorStatus::Active {
            bail!("simulator {} is not connected", self.id);
        }
        self.sequence += 1;
        let reading = self.generate();
        debug!("Simulated reading #{}: {:?}", self.sequence, reading);
        Ok(reading)
    }
}

#[async_trait]
impl Actuator for EnvironmentSimulator {
    async fn set_led(&mut self, state: LedState) -> Result<()> {
        self.led = state;
        Ok(())
    }

    async fn set_fan(&mut self, on: bool) -> Result<()> {
        self.fan = on;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> SimulatorConfig {
        SimulatorConfig {
            seed: Some(7),
            temperature_noise: 0.0,
            co2_noise: 0.0,
            light_noise: 0.0,
            ..SimulatorConfig::default()
        }
    }

    #[tokio::test]
    async fn test_read_requires_connect() {
        let mut sim = EnvironmentSimulator::new("sim", quiet_config());
        assert!(sim.read().await.is_err());
        sim.connect().await.unwrap();
        assert!(sim.read().await.is_ok());
    }

    #[tokio::test]
    async fn test_base_conditions_without_noise() {
        let mut sim = EnvironmentSimulator::new("sim", quiet_config());
        sim.connect().await.unwrap();
        let reading = sim.read().await.unwrap();
        assert_eq!(reading.temperature, Some(72.0));
        assert_eq!(reading.co2, Some(450));
        assert_eq!(reading.light, Some(600));
    }

    #[tokio::test]
    async fn test_led_raises_light() {
        let mut sim = EnvironmentSimulator::new("sim", quiet_config());
        sim.connect().await.unwrap();
        sim.apply_scenario(Scenario::LowLight);
        assert_eq!(sim.read().await.unwrap().light, Some(150));
        sim.set_led(LedState::On).await.unwrap();
        assert_eq!(sim.read().await.unwrap().light, Some(350));
    }

    #[tokio::test]
    async fn test_emergency_scenario() {
        let mut sim = EnvironmentSimulator::new("sim", quiet_config());
        sim.connect().await.unwrap();
        sim.apply_scenario(Scenario::Emergency);
        let reading = sim.read().await.unwrap();
        assert_eq!(reading.temperature, Some(97.0));
        assert_eq!(reading.co2, Some(2200));
    }

    #[tokio::test]
    async fn test_full_dropout() {
        let config = SimulatorConfig { dropout_probability: 1.0, ..quiet_config() };
        let mut sim = EnvironmentSimulator::new("sim", config);
        sim.connect().await.unwrap();
        assert!(sim.read().await.unwrap().is_empty());
    }

    #[test]
    fn test_scenario_parse() {
        assert_eq!("high-temp".parse::<Scenario>().unwrap(), Scenario::HighTemperature);
        assert_eq!("LOW_LIGHT".parse::<Scenario>().unwrap(), Scenario::LowLight);
        assert!("volcano".parse::<Scenario>().is_err());
    }
}
