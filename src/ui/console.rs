// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Text status panel for terminal output

use std::fmt::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::actions::{ActionLogEntry, LedState};
use crate::core::AlertDecision;
use crate::sensors::{Field, Reading};

/// Everything the panel shows for one tick
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub reading: Reading,
    pub baseline: Option<Reading>,
    pub decision: AlertDecision,
    pub led: LedState,
    pub fan: bool,
    pub uptime: Duration,
    pub recent_actions: Vec<ActionLogEntry>,
}

/// Arrow showing movement of `field` relative to the baseline
pub fn change_indicator(field: Field, current: &Reading, baseline: Option<&Reading>) -> &'static str {
    let (Some(now), Some(then)) = (current.value(field), baseline.and_then(|b| b.value(field))) else {
        return "";
    };
    if now > then {
        "↑"
    } else if now < then {
        "↓"
    } else {
        "→"
    }
}

fn status_label(decision: &AlertDecision) -> &'static str {
    match decision {
        AlertDecision::Emergency(_) => "🔴 EMERGENCY",
        AlertDecision::Change(_) => "🟡 Changes Detected",
        AlertDecision::Periodic | AlertDecision::None => "🟢 Normal",
    }
}

fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn field_text(reading: &Reading, field: Field) -> String {
    match field {
        Field::Temperature => reading
            .value(field)
            .map(|t| format!("{:.1}°F", t))
            .unwrap_or_else(|| "N/A".to_string()),
        Field::Co2 => reading.co2.map(|c| c.to_string()).unwrap_or_else(|| "N/A".to_string()),
        Field::Light => match (reading.light, reading.brightness()) {
            (Some(raw), Some(band)) => format!("{} ({})", raw, band),
            _ => "N/A".to_string(),
        },
    }
}

/// Render the multi-line status panel
pub fn render_status(snapshot: &StatusSnapshot, now: DateTime<Utc>) -> String {
    let reading = &snapshot.reading;
    let baseline = snapshot.baseline.as_ref();
    let mut out = String::new();

    let _ = writeln!(out, "🔄 IRIS Environmental Monitoring");
    let _ = writeln!(out, "================================");
    let _ = writeln!(
        out,
        "⏰ Last Update: {} | ⏱️  Uptime: {}",
        now.format("%H:%M:%S"),
        format_uptime(snapshot.uptime)
    );
    let _ = writeln!(
        out,
        "🌡️  Temperature: {} {} | 🌬️  CO2: {} {}",
        field_text(reading, Field::Temperature),
        change_indicator(Field::Temperature, reading, baseline),
        field_text(reading, Field::Co2),
        change_indicator(Field::Co2, reading, baseline),
    );
    let _ = writeln!(
        out,
        "💡 Light: {} {} | 🔆 LED: {} | 🌀 Fan: {}",
        field_text(reading, Field::Light),
        change_indicator(Field::Light, reading, baseline),
        snapshot.led,
        if snapshot.fan { "ON" } else { "OFF" },
    );
    let _ = writeln!(
        out,
        "📊 Status: {} | 🎯 Actions: {} recent",
        status_label(&snapshot.decision),
        snapshot.recent_actions.len()
    );

    let _ = writeln!(out, "\n📋 Recent Actions:");
    if snapshot.recent_actions.is_empty() {
        let _ = writeln!(out, "No recent actions");
    } else {
        for entry in &snapshot.recent_actions {
            let _ = writeln!(out, "{}", entry);
        }
    }

    out
}
