// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Significant-change detection against the last announced reading

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sensors::{Field, FieldSet, Reading};

/// Minimum absolute delta per field that counts as significant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeThresholds {
    /// °F
    pub temperature: f64,
    /// ppm
    pub co2: f64,
    /// Raw light units
    pub light: f64,
}

impl Default for ChangeThresholds {
    fn default() -> Self {
        Self {
            temperature: 5.0,
            co2: 200.0,
            light: 100.0,
        }
    }
}

impl ChangeThresholds {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Temperature => self.temperature,
            Field::Co2 => self.co2,
            Field::Light => self.light,
        }
    }

    /// A zero threshold would flag every tick, so thresholds must be positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in Field::ALL {
            let value = self.get(field);
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }
        Ok(())
    }
}

/// Fields whose absolute delta from `baseline` meets or exceeds the threshold.
///
/// Fields missing from either reading are skipped.
pub fn detect_change(current: &Reading, baseline: &Reading, thresholds: &ChangeThresholds) -> FieldSet {
    Field::ALL
        .into_iter()
        .filter(|&field| match (current.value(field), baseline.value(field)) {
            (Some(now), Some(then)) => (now - then).abs() >= thresholds.get(field),
            _ => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(temperature: f64, co2: u32, light: u32) -> Reading {
        Reading::new(temperature, co2, light, Utc::now())
    }

    #[test]
    fn test_no_change() {
        let t = ChangeThresholds::default();
        assert!(detect_change(&reading(72.0, 450, 600), &reading(72.0, 450, 600), &t).is_empty());
    }

    #[test]
    fn test_boundary_counts_as_changed() {
        let t = ChangeThresholds::default();
        let baseline = reading(72.0, 450, 600);

        let changed = detect_change(&reading(77.0, 650, 700), &baseline, &t);
        assert_eq!(changed, FieldSet::from([Field::Temperature, Field::Co2, Field::Light]));

        let changed = detect_change(&reading(76.0, 649, 699), &baseline, &t);
        assert!(changed.is_empty());
    }

    #[test]
    fn test_decrease_is_also_change() {
        let t = ChangeThresholds::default();
        let changed = detect_change(&reading(72.0, 450, 499), &reading(72.0, 450, 600), &t);
        assert_eq!(changed, FieldSet::from([Field::Light]));
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let t = ChangeThresholds::default();
        let mut current = reading(90.0, 1000, 600);
        current.temperature = None;
        current.co2 = None;
        assert!(detect_change(&current, &reading(72.0, 450, 600), &t).is_empty());

        let mut nan = reading(72.0, 450, 600);
        nan.temperature = Some(f64::NAN);
        assert!(detect_change(&nan, &reading(10.0, 450, 600), &t).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let t = ChangeThresholds::default();
        let current = reading(80.0, 700, 300);
        let baseline = reading(72.0, 450, 600);
        assert_eq!(
            detect_change(&current, &baseline, &t),
            detect_change(&current, &baseline, &t)
        );
    }

    #[test]
    fn test_validate() {
        assert!(ChangeThresholds::default().validate().is_ok());
        let zero = ChangeThresholds { co2: 0.0, ..ChangeThresholds::default() };
        assert_eq!(
            zero.validate(),
            Err(ConfigError::InvalidThreshold { field: Field::Co2, value: 0.0 })
        );
        let negative = ChangeThresholds { light: -1.0, ..ChangeThresholds::default() };
        assert!(negative.validate().is_err());
    }
}
