// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Emergency classification against fixed critical bounds

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sensors::{Field, FieldSet, Reading};

/// Critical range for one field. A value strictly outside is critical.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl Bounds {
    pub fn new(low: Option<f64>, high: Option<f64>) -> Self {
        Self { low, high }
    }

    pub fn is_critical(&self, value: f64) -> bool {
        self.low.is_some_and(|low| value < low) || self.high.is_some_and(|high| value > high)
    }
}

/// Per-field emergency bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergencyBounds {
    pub temperature: Bounds,
    pub co2: Bounds,
    pub light: Bounds,
}

impl Default for EmergencyBounds {
    fn default() -> Self {
        Self {
            temperature: Bounds::new(Some(50.0), Some(95.0)),
            co2: Bounds::new(None, Some(2000.0)),
            light: Bounds::new(Some(50.0), None),
        }
    }
}

impl EmergencyBounds {
    pub fn get(&self, field: Field) -> Bounds {
        match field {
            Field::Temperature => self.temperature,
            Field::Co2 => self.co2,
            Field::Light => self.light,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in Field::ALL {
            let bounds = self.get(field);
            let finite = |b: Option<f64>| b.map_or(true, f64::is_finite);
            if !finite(bounds.low) || !finite(bounds.high) {
                return Err(ConfigError::NonFiniteBound { field });
            }
            if let (Some(low), Some(high)) = (bounds.low, bounds.high) {
                if low >= high {
                    return Err(ConfigError::InvertedBounds { field, low, high });
                }
            }
        }
        Ok(())
    }
}

/// Fields of `current` that sit outside their critical bounds.
///
/// Missing fields are never critical.
pub fn classify_emergency(current: &Reading, bounds: &EmergencyBounds) -> FieldSet {
    Field::ALL
        .into_iter()
        .filter(|&field| {
            current
                .value(field)
                .is_some_and(|value| bounds.get(field).is_critical(value))
        })
        .collect()
}
