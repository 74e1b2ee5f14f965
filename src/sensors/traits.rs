// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Sensor traits and common types

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use anyhow::Result;

use super::Brightness;

/// Environmental fields tracked by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Air temperature in °F
    Temperature,
    /// CO2 concentration in ppm
    Co2,
    /// Raw light level, 0-1023
    Light,
}

impl Field {
    /// Every tracked field, in display order
    pub const ALL: [Field; 3] = [Field::Temperature, Field::Co2, Field::Light];

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Field::Temperature => "temperature",
            Field::Co2 => "CO2",
            Field::Light => "light",
        }
    }

    /// Unit suffix used when rendering values
    pub fn unit(&self) -> &'static str {
        match self {
            Field::Temperature => "°F",
            Field::Co2 => " ppm",
            Field::Light => "",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered set of fields, as reported by the detectors
pub type FieldSet = BTreeSet<Field>;

/// One timestamped sample of all monitored fields.
///
/// A `None` field means the sensor dropped out for this tick. Readings are
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: Option<f64>,
    pub co2: Option<u32>,
    pub light: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(temperature: f64, co2: u32, light: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            temperature: Some(temperature),
            co2: Some(co2),
            light: Some(light),
            timestamp,
        }
    }

    /// Reading with every field missing
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            temperature: None,
            co2: None,
            light: None,
            timestamp,
        }
    }

    /// Numeric value of a field, or `None` when missing or NaN
    pub fn value(&self, field: Field) -> Option<f64> {
        let value = match field {
            Field::Temperature => self.temperature,
            Field::Co2 => self.co2.map(f64::from),
            Field::Light => self.light.map(f64::from),
        };
        value.filter(|v| v.is_finite())
    }

    /// Brightness band of the light level, if present
    pub fn brightness(&self) -> Option<Brightness> {
        self.light.map(Brightness::from_raw)
    }

    /// Light level as a percentage of the ADC range
    pub fn light_percent(&self) -> Option<u32> {
        self.light.map(|l| l.min(1023) * 100 / 1023)
    }

    /// True when no field carries data
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.value(*f).is_none())
    }

    /// Copy of `self` where missing fields take their value from `prior`
    pub fn merged_over(&self, prior: &Reading) -> Reading {
        let mut merged = self.clone();
        merged.fill_missing_from(prior);
        merged
    }

    /// Fill missing fields from `other`; returns the fields that were filled
    pub fn fill_missing_from(&mut self, other: &Reading) -> FieldSet {
        let mut filled = FieldSet::new();
        if self.value(Field::Temperature).is_none() && other.value(Field::Temperature).is_some() {
            self.temperature = other.temperature;
            filled.insert(Field::Temperature);
        }
        if self.co2.is_none() && other.co2.is_some() {
            self.co2 = other.co2;
            filled.insert(Field::Co2);
        }
        if self.light.is_none() && other.light.is_some() {
            self.light = other.light;
            filled.insert(Field::Light);
        }
        filled
    }
}

/// Sensor source operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorStatus {
    Disconnected,
    Active,
}

/// Anything that can produce environmental readings
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Source identifier used in logs
    fn id(&self) -> &str;

    /// Current status
    fn status(&self) -> SensorStatus;

    /// Open the underlying device
    async fn connect(&mut self) -> Result<()>;

    /// Release the underlying device
    async fn disconnect(&mut self) -> Result<()>;

    /// Take one reading
    async fn read(&mut self) -> Result<Reading>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_temperature_is_missing() {
        let mut reading = Reading::new(72.0, 450, 600, Utc::now());
        reading.temperature = Some(f64::NAN);
        assert_eq!(reading.value(Field::Temperature), None);
        assert_eq!(reading.value(Field::Co2), Some(450.0));
    }

    #[test]
    fn test_light_percent() {
        let reading = Reading::new(72.0, 450, 1023, Utc::now());
        assert_eq!(reading.light_percent(), Some(100));
        let reading = Reading::new(72.0, 450, 512, Utc::now());
        assert_eq!(reading.light_percent(), Some(50));
    }

    #[test]
    fn test_empty_reading() {
        assert!(Reading::empty(Utc::now()).is_empty());
        assert!(!Reading::new(72.0, 450, 600, Utc::now()).is_empty());
    }

    #[test]
    fn test_merge_keeps_prior_for_missing_fields() {
        let prior = Reading::new(72.0, 450, 600, Utc::now());
        let partial = Reading { temperature: None, co2: Some(700), light: None, timestamp: Utc::now() };

        let merged = partial.merged_over(&prior);
        assert_eq!(merged.temperature, Some(72.0));
        assert_eq!(merged.co2, Some(700));
        assert_eq!(merged.light, Some(600));
        assert_eq!(merged.timestamp, partial.timestamp);
    }

    #[test]
    fn test_fill_reports_filled_fields() {
        let mut gappy = Reading::empty(Utc::now());
        gappy.co2 = Some(450);
        let filled = gappy.fill_missing_from(&Reading::new(72.0, 999, 600, Utc::now()));
        assert_eq!(filled, FieldSet::from([Field::Temperature, Field::Light]));
        assert_eq!(gappy.co2, Some(450));
    }
}
