// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Bounded, insertion-ordered log of system-initiated actions

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of action recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    AutoLed,
    AutoFan,
    ChangeAlert,
    EmergencyAlert,
    PeriodicSummary,
    UserCommand,
    SensorError,
    System,
    Note,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::AutoLed => "Auto LED Control",
            ActionKind::AutoFan => "Auto Fan Control",
            ActionKind::ChangeAlert => "Change Alert",
            ActionKind::EmergencyAlert => "EMERGENCY",
            ActionKind::PeriodicSummary => "Periodic Summary",
            ActionKind::UserCommand => "Command",
            ActionKind::SensorError => "Error",
            ActionKind::System => "System",
            ActionKind::Note => "Note",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: ActionKind,
    pub description: String,
}

impl fmt::Display for ActionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.kind.label(),
            self.description
        )
    }
}

/// Once `capacity` entries are held, each append evicts the oldest.
#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    capacity: usize,
    total: u64,
}

impl ActionLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            total: 0,
        }
    }

    pub fn record(&mut self, description: impl Into<String>, when: DateTime<Utc>) {
        self.record_kind(ActionKind::Note, description, when);
    }

    /// Append an entry and return a copy of it
    pub fn record_kind(
        &mut self,
        kind: ActionKind,
        description: impl Into<String>,
        when: DateTime<Utc>,
    ) -> ActionLogEntry {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        let entry = ActionLogEntry {
            timestamp: when,
            kind,
            description: description.into(),
        };
        self.entries.push_back(entry.clone());
        self.total += 1;
        entry
    }

    /// Last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<ActionLogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ever recorded, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.total
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
