// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Alert scheduler - decides at most one alert per sample tick
//!
//! Priority per tick: emergency, then significant change against the last
//! announced reading, then the periodic summary timer.
//!
//! Not synchronised: own it from a single sampling task or wrap it in a lock.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::detection::{classify_emergency, detect_change, ChangeThresholds, EmergencyBounds};
use crate::sensors::{FieldSet, Reading};

/// What the presentation layer should announce this tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertDecision {
    None,
    Change(FieldSet),
    Emergency(FieldSet),
    Periodic,
}

impl AlertDecision {
    pub fn is_emergency(&self) -> bool {
        matches!(self, AlertDecision::Emergency(_))
    }
}

/// Whether a periodic summary counts as an announcement for change detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// Summaries leave the baseline alone, so slow drift still accumulates
    /// toward a change alert
    #[default]
    Preserve,
    /// Summaries replace the baseline with the summarised reading
    ResetOnSummary,
}

/// How an announced reading with dropped-out fields updates the baseline.
///
/// Either way a field the baseline lacks is filled in silently from the next
/// reading that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Missing fields keep their previous baseline value
    #[default]
    Retain,
    /// The announced reading replaces the baseline as is; its missing fields
    /// are re-baselined from their next value instead of compared against it
    Replace,
}

pub struct AlertScheduler {
    thresholds: ChangeThresholds,
    bounds: EmergencyBounds,
    periodic_interval: Duration,
    policy: BaselinePolicy,
    missing_fields: MissingFieldPolicy,

    baseline: Option<Reading>,
    last_periodic: DateTime<Utc>,
}

impl AlertScheduler {
    /// `started_at` seeds the periodic timer
    pub fn new(
        thresholds: ChangeThresholds,
        bounds: EmergencyBounds,
        periodic_interval: Duration,
        policy: BaselinePolicy,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            thresholds,
            bounds,
            periodic_interval,
            policy,
            missing_fields: MissingFieldPolicy::default(),
            baseline: None,
            last_periodic: started_at,
        }
    }

    pub fn with_missing_field_policy(mut self, missing_fields: MissingFieldPolicy) -> Self {
        self.missing_fields = missing_fields;
        self
    }

    pub fn with_baseline(mut self, baseline: Reading) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Last announced reading
    pub fn baseline(&self) -> Option<&Reading> {
        self.baseline.as_ref()
    }

    pub fn last_periodic(&self) -> DateTime<Utc> {
        self.last_periodic
    }

    /// Evaluate one reading, using its timestamp as the current time
    pub fn tick(&mut self, current: &Reading) -> AlertDecision {
        let critical = classify_emergency(current, &self.bounds);
        if !critical.is_empty() {
            debug!("Emergency on {:?}", critical);
            self.adopt(current);
            return AlertDecision::Emergency(critical);
        }

        let Some(baseline) = &mut self.baseline else {
            // First reading becomes the reference without an announcement
            trace!("Adopting first reading as baseline");
            self.baseline = Some(current.clone());
            return self.periodic_or_none(current);
        };

        let filled = baseline.fill_missing_from(current);
        if !filled.is_empty() {
            trace!("Baseline filled in for {:?}", filled);
        }

        let changed = detect_change(current, baseline, &self.thresholds);
        if !changed.is_empty() {
            debug!("Significant change on {:?}", changed);
            self.adopt(current);
            return AlertDecision::Change(changed);
        }

        self.periodic_or_none(current)
    }

    /// Make an announced reading the new baseline
    fn adopt(&mut self, current: &Reading) {
        let next = match (&self.baseline, self.missing_fields) {
            (Some(prior), MissingFieldPolicy::Retain) => current.merged_over(prior),
            _ => current.clone(),
        };
        self.baseline = Some(next);
    }

    fn periodic_or_none(&mut self, current: &Reading) -> AlertDecision {
        if !self.periodic_due(current.timestamp) {
            return AlertDecision::None;
        }

        self.last_periodic = current.timestamp;
        if self.policy == BaselinePolicy::ResetOnSummary {
            self.adopt(current);
        }
        AlertDecision::Periodic
    }

    /// Negative elapsed time (clock stepped backwards) is never due
    fn periodic_due(&self, now: DateTime<Utc>) -> bool {
        match (now - self.last_periodic).to_std() {
            Ok(elapsed) => elapsed >= self.periodic_interval,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::sensors::Field;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 27, 9, 0, 0).unwrap()
    }

    fn at(secs: i64, temperature: f64, co2: u32, light: u32) -> Reading {
        Reading::new(temperature, co2, light, t0() + chrono::Duration::seconds(secs))
    }

    fn scheduler(policy: BaselinePolicy) -> AlertScheduler {
        AlertScheduler::new(
            ChangeThresholds::default(),
            EmergencyBounds::default(),
            Duration::from_secs(120),
            policy,
            t0(),
        )
    }

    #[test]
    fn test_first_reading_is_silent_baseline() {
        let mut s = scheduler(BaselinePolicy::Preserve);
        assert_eq!(s.tick(&at(1, 72.0, 450, 600)), AlertDecision::None);
        assert_eq!(s.baseline().and_then(|b| b.temperature), Some(72.0));
    }

    #[test]
    fn test_change_then_emergency() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));

        assert_eq!(
            s.tick(&at(1, 77.0, 450, 600)),
            AlertDecision::Change(FieldSet::from([Field::Temperature]))
        );
        assert_eq!(s.baseline().and_then(|b| b.temperature), Some(77.0));

        assert_eq!(
            s.tick(&at(2, 96.0, 450, 600)),
            AlertDecision::Emergency(FieldSet::from([Field::Temperature]))
        );
        assert_eq!(s.baseline().and_then(|b| b.temperature), Some(96.0));
    }

    #[test]
    fn test_emergency_beats_change() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        // Both critical and far beyond the change threshold
        let decision = s.tick(&at(1, 30.0, 450, 600));
        assert_eq!(decision, AlertDecision::Emergency(FieldSet::from([Field::Temperature])));
    }

    #[test]
    fn test_emergency_beats_due_periodic_and_keeps_timer() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        let decision = s.tick(&at(500, 72.0, 2500, 600));
        assert!(decision.is_emergency());
        assert_eq!(s.last_periodic(), t0());
        // Recovery is a change against the emergency reading
        assert_eq!(
            s.tick(&at(501, 72.0, 450, 600)),
            AlertDecision::Change(FieldSet::from([Field::Co2]))
        );
        // Timer is still due on the next quiet tick
        assert_eq!(s.tick(&at(502, 72.0, 450, 600)), AlertDecision::Periodic);
    }

    #[test]
    fn test_periodic_once_in_121_constant_ticks() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        let periodic_ticks: Vec<i64> = (1..=121)
            .filter(|&tick| s.tick(&at(tick, 72.0, 450, 600)) == AlertDecision::Periodic)
            .collect();
        assert_eq!(periodic_ticks, vec![120]);
    }

    #[test]
    fn test_periodic_repeats_every_interval() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        let count = (1..=360)
            .filter(|&tick| s.tick(&at(tick, 72.0, 450, 600)) == AlertDecision::Periodic)
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_change_does_not_reset_periodic_timer() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        assert!(matches!(s.tick(&at(60, 80.0, 450, 600)), AlertDecision::Change(_)));
        assert_eq!(s.tick(&at(120, 80.0, 450, 600)), AlertDecision::Periodic);
    }

    #[test]
    fn test_preserve_policy_accumulates_drift() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        assert_eq!(s.tick(&at(120, 75.0, 450, 600)), AlertDecision::Periodic);
        assert_eq!(s.baseline().and_then(|b| b.temperature), Some(72.0));
        assert_eq!(
            s.tick(&at(121, 77.0, 450, 600)),
            AlertDecision::Change(FieldSet::from([Field::Temperature]))
        );
    }

    #[test]
    fn test_reset_policy_moves_baseline() {
        let mut s = scheduler(BaselinePolicy::ResetOnSummary).with_baseline(at(0, 72.0, 450, 600));
        assert_eq!(s.tick(&at(120, 75.0, 450, 600)), AlertDecision::Periodic);
        assert_eq!(s.baseline().and_then(|b| b.temperature), Some(75.0));
        assert_eq!(s.tick(&at(121, 77.0, 450, 600)), AlertDecision::None);
    }

    #[test]
    fn test_backwards_clock_is_not_due() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        assert_eq!(s.tick(&at(-600, 72.0, 450, 600)), AlertDecision::None);
        assert_eq!(s.last_periodic(), t0());
    }

    #[test]
    fn test_missing_fields_degrade_to_none() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        let mut dropout = Reading::empty(t0() + chrono::Duration::seconds(5));
        assert_eq!(s.tick(&dropout), AlertDecision::None);
        dropout.co2 = Some(700);
        assert_eq!(s.tick(&dropout), AlertDecision::Change(FieldSet::from([Field::Co2])));
    }

    #[test]
    fn test_dropout_first_reading_does_not_blind_detector() {
        let mut s = scheduler(BaselinePolicy::Preserve);
        assert_eq!(s.tick(&Reading::empty(t0() + chrono::Duration::seconds(1))), AlertDecision::None);

        // Slow ramp 72 -> 90 °F and 450 -> 1800 ppm
        let changes = (2..=100)
            .filter(|&tick| {
                let step = (tick - 2) as f64 / 98.0;
                let reading = at(tick, 72.0 + 18.0 * step, 450 + (1350.0 * step) as u32, 600);
                matches!(s.tick(&reading), AlertDecision::Change(_))
            })
            .count();
        assert!(changes >= 3, "only {} change alerts", changes);
        assert!(s.baseline().is_some_and(|b| b.is_complete()));
    }

    #[test]
    fn test_retain_policy_keeps_dropped_field_watched() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        let partial = Reading { temperature: None, co2: Some(700), ..at(1, 0.0, 0, 600) };
        assert_eq!(s.tick(&partial), AlertDecision::Change(FieldSet::from([Field::Co2])));
        assert_eq!(s.baseline().and_then(|b| b.temperature), Some(72.0));

        assert_eq!(
            s.tick(&at(2, 90.0, 700, 600)),
            AlertDecision::Change(FieldSet::from([Field::Temperature]))
        );
    }

    #[test]
    fn test_replace_policy_rebaselines_dropped_field() {
        let mut s = scheduler(BaselinePolicy::Preserve)
            .with_missing_field_policy(MissingFieldPolicy::Replace)
            .with_baseline(at(0, 72.0, 450, 600));
        let partial = Reading { temperature: None, co2: Some(700), ..at(1, 0.0, 0, 600) };
        assert_eq!(s.tick(&partial), AlertDecision::Change(FieldSet::from([Field::Co2])));
        assert_eq!(s.baseline().and_then(|b| b.temperature), None);

        // 90 °F becomes the new temperature reference instead of an alert
        assert_eq!(s.tick(&at(2, 90.0, 700, 600)), AlertDecision::None);
        assert_eq!(s.baseline().and_then(|b| b.temperature), Some(90.0));
        assert_eq!(
            s.tick(&at(3, 96.0, 700, 600)),
            AlertDecision::Emergency(FieldSet::from([Field::Temperature]))
        );
    }

    #[test]
    fn test_emergency_with_dropout_keeps_other_fields() {
        let mut s = scheduler(BaselinePolicy::Preserve).with_baseline(at(0, 72.0, 450, 600));
        let partial = Reading { light: None, ..at(1, 72.0, 2500, 0) };
        assert!(s.tick(&partial).is_emergency());
        assert_eq!(s.baseline().and_then(|b| b.light), Some(600));
    }
}
