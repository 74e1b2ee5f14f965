// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Spoken/printed text for alert decisions

use crate::actions::LedState;
use crate::core::AlertDecision;
use crate::detection::EmergencyBounds;
use crate::sensors::{Field, FieldSet, Reading};

fn format_value(field: Field, value: f64) -> String {
    match field {
        Field::Temperature => format!("{:.1}°F", value),
        Field::Co2 | Field::Light => format!("{:.0}", value),
    }
}

fn capitalized(field: Field) -> &'static str {
    match field {
        Field::Temperature => "Temperature",
        Field::Co2 => "CO2",
        Field::Light => "Light",
    }
}

/// Text to announce for `decision`, or `None` when nothing should be said.
///
/// `previous` is the baseline as it stood before the tick that produced the
/// decision.
pub fn render_decision(
    decision: &AlertDecision,
    current: &Reading,
    previous: Option<&Reading>,
    bounds: &EmergencyBounds,
) -> Option<String> {
    match decision {
        AlertDecision::None => None,
        AlertDecision::Emergency(fields) => Some(emergency_message(current, fields, bounds)),
        AlertDecision::Change(fields) => Some(change_message(current, previous, fields)),
        AlertDecision::Periodic => Some(periodic_summary(current)),
    }
}

pub fn emergency_message(current: &Reading, fields: &FieldSet, bounds: &EmergencyBounds) -> String {
    let parts: Vec<String> = fields
        .iter()
        .filter_map(|&field| {
            let value = current.value(field)?;
            let too_high = bounds.get(field).high.is_some_and(|high| value > high);
            Some(match (field, too_high) {
                (Field::Temperature, true) => {
                    format!("CRITICAL: Temperature {} - dangerously high!", format_value(field, value))
                }
                (Field::Temperature, false) => {
                    format!("CRITICAL: Temperature {} - dangerously low!", format_value(field, value))
                }
                (Field::Co2, true) => {
                    "CRITICAL: CO2 levels extremely high - immediate ventilation required!".to_string()
                }
                (Field::Co2, false) => {
                    format!(
                        "WARNING: CO2 reading {} is implausibly low - check the sensor.",
                        format_value(field, value)
                    )
                }
                (Field::Light, false) => {
                    "WARNING: Lighting extremely dim - safety concern!".to_string()
                }
                (Field::Light, true) => {
                    "WARNING: Lighting extremely bright - check the light source.".to_string()
                }
            })
        })
        .collect();

    format!("EMERGENCY: {}", parts.join(" "))
}

pub fn change_message(current: &Reading, previous: Option<&Reading>, fields: &FieldSet) -> String {
    let parts: Vec<String> = fields
        .iter()
        .filter_map(|&field| {
            let now = current.value(field)?;
            let then = previous?.value(field)?;
            Some(format!(
                "{} {} to {}",
                capitalized(field),
                format_value(field, then),
                format_value(field, now)
            ))
        })
        .collect();

    if parts.is_empty() {
        "Environmental changes detected.".to_string()
    } else {
        format!("Changes detected: {}.", parts.join("; "))
    }
}

pub fn periodic_summary(current: &Reading) -> String {
    let mut parts = Vec::new();

    match current.value(Field::Temperature) {
        Some(t) if t < 60.0 => parts.push("temperature cool"),
        Some(t) if t > 80.0 => parts.push("temperature warm"),
        Some(_) => parts.push("temperature comfortable"),
        None => parts.push("temperature unavailable"),
    }

    match current.co2 {
        Some(c) if c > 1000 => parts.push("air quality poor"),
        Some(c) if c > 800 => parts.push("air quality moderate"),
        Some(_) => parts.push("air quality good"),
        None => parts.push("air quality unavailable"),
    }

    match current.light {
        Some(l) if l < 100 => parts.push("lighting dim"),
        Some(l) if l > 800 => parts.push("lighting bright"),
        Some(_) => parts.push("lighting adequate"),
        None => parts.push("lighting unavailable"),
    }

    let mut summary = format!("Status: {}.", parts.join(", "));
    if let Some(warning) = current.brightness().and_then(|band| band.warning()) {
        summary.push(' ');
        summary.push_str(&warning);
    }
    summary
}

/// Full spoken status report
pub fn status_message(current: &Reading, led: LedState) -> String {
    let temperature = current
        .value(Field::Temperature)
        .map(|t| format_value(Field::Temperature, t))
        .unwrap_or_else(|| "N/A".to_string());
    let co2 = current.co2.map(|c| c.to_string()).unwrap_or_else(|| "N/A".to_string());
    let light = match (current.light, current.brightness(), current.light_percent()) {
        (Some(raw), Some(band), Some(pct)) => format!("{} ({}, {}% brightness)", raw, band, pct),
        _ => "N/A".to_string(),
    };

    format!(
        "I'm reading temperature {}, CO2 {}, light {}, LED {}.",
        temperature, co2, light, led
    )
}

/// On-demand emergency check, independent of the scheduler
pub fn emergency_check(critical: &FieldSet, current: &Reading, bounds: &EmergencyBounds) -> String {
    if critical.is_empty() {
        "Emergency check complete. All systems normal.".to_string()
    } else {
        emergency_message(current, critical, bounds).replacen("EMERGENCY:", "EMERGENCY CHECK:", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(temperature: f64, co2: u32, light: u32) -> Reading {
        Reading::new(temperature, co2, light, Utc::now())
    }

    #[test]
    fn test_none_is_silent() {
        let r = reading(72.0, 450, 600);
        assert_eq!(render_decision(&AlertDecision::None, &r, None, &EmergencyBounds::default()), None);
    }

    #[test]
    fn test_change_message() {
        let previous = reading(72.0, 450, 600);
        let current = reading(77.0, 700, 600);
        let fields = FieldSet::from([Field::Temperature, Field::Co2]);
        assert_eq!(
            change_message(&current, Some(&previous), &fields),
            "Changes detected: Temperature 72.0°F to 77.0°F; CO2 450 to 700."
        );
        assert_eq!(change_message(&current, None, &fields), "Environmental changes detected.");
    }

    #[test]
    fn test_emergency_message_direction() {
        let bounds = EmergencyBounds::default();
        let hot = emergency_message(&reading(96.0, 450, 600), &FieldSet::from([Field::Temperature]), &bounds);
        assert!(hot.contains("dangerously high"));
        let cold = emergency_message(&reading(40.0, 450, 600), &FieldSet::from([Field::Temperature]), &bounds);
        assert!(cold.contains("dangerously low"));
        let dark = emergency_message(&reading(72.0, 450, 10), &FieldSet::from([Field::Light]), &bounds);
        assert!(dark.contains("extremely dim"));
    }

    #[test]
    fn test_low_co2_is_formatted_as_ppm() {
        let bounds = EmergencyBounds::default();
        let mut r = reading(72.0, 450, 600);
        r.co2 = Some(0);
        assert_eq!(
            emergency_message(&r, &FieldSet::from([Field::Co2]), &bounds),
            "EMERGENCY: WARNING: CO2 reading 0 is implausibly low - check the sensor."
        );
    }

    #[test]
    fn test_periodic_summary() {
        assert_eq!(
            periodic_summary(&reading(72.0, 450, 600)),
            "Status: temperature comfortable, air quality good, lighting adequate."
        );
        assert_eq!(
            periodic_summary(&reading(85.0, 1200, 50)),
            "Status: temperature warm, air quality poor, lighting dim. Lighting very dark - need more light."
        );
        assert_eq!(
            periodic_summary(&reading(72.0, 450, 150)),
            "Status: temperature comfortable, air quality good, lighting adequate. Lighting dark - need more light."
        );
    }

    #[test]
    fn test_status_message() {
        let text = status_message(&reading(72.0, 450, 1023), LedState::On);
        assert_eq!(
            text,
            "I'm reading temperature 72.0°F, CO2 450, light 1023 (Very Bright, 100% brightness), LED ON."
        );
    }

    #[test]
    fn test_emergency_check() {
        let bounds = EmergencyBounds::default();
        let r = reading(72.0, 450, 600);
        assert_eq!(emergency_check(&FieldSet::new(), &r, &bounds), "Emergency check complete. All systems normal.");
        let r = reading(72.0, 2500, 600);
        assert!(emergency_check(&FieldSet::from([Field::Co2]), &r, &bounds).starts_with("EMERGENCY CHECK:"));
    }
}
