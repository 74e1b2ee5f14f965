// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Event bus for inter-component communication

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::AlertDecision;
use crate::actions::ActionLogEntry;
use crate::sensors::Reading;
use crate::ui::StatusSnapshot;

/// Event types in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Status,
    Alert,
    Action,
    Reply,
}

/// Generic event wrapper
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: u64,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Serialize)]
pub enum EventPayload {
    /// Per-tick snapshot for the status panel
    Status(Box<StatusSnapshot>),
    /// A scheduler decision with the text to announce
    Alert { decision: AlertDecision, text: String },
    /// Entry appended to the action log
    Action(ActionLogEntry),
    /// Answer to a user command
    Reply(String),
}

impl EventPayload {
    fn event_type(&self) -> EventType {
        match self {
            EventPayload::Status(_) => EventType::Status,
            EventPayload::Alert { .. } => EventType::Alert,
            EventPayload::Action(_) => EventType::Action,
            EventPayload::Reply(_) => EventType::Reply,
        }
    }
}

/// Central event bus for pub/sub communication
pub struct EventBus {
    reading_tx: broadcast::Sender<Reading>,
    event_tx: broadcast::Sender<Event>,
    event_counter: AtomicU64,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (reading_tx, _) = broadcast::channel(capacity);
        let (event_tx, _) = broadcast::channel(capacity);

        Self {
            reading_tx,
            event_tx,
            event_counter: AtomicU64::new(0),
        }
    }

    pub fn publish_reading(&self, reading: Reading) {
        let _ = self.reading_tx.send(reading);
    }

    pub fn publish_status(&self, snapshot: StatusSnapshot) {
        self.publish(EventPayload::Status(Box::new(snapshot)));
    }

    pub fn publish_alert(&self, decision: AlertDecision, text: String) {
        self.publish(EventPayload::Alert { decision, text });
    }

    pub fn publish_action(&self, entry: ActionLogEntry) {
        self.publish(EventPayload::Action(entry));
    }

    pub fn publish_reply(&self, text: String) {
        self.publish(EventPayload::Reply(text));
    }

    fn publish(&self, payload: EventPayload) {
        let id = self.event_counter.fetch_add(1, Ordering::Relaxed);
        let event = Event {
            id,
            event_type: payload.event_type(),
            timestamp: Utc::now(),
            payload,
        };
        let _ = self.event_tx.send(event);
    }

    pub fn subscribe_readings(&self) -> broadcast::Receiver<Reading> {
        self.reading_tx.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Events published so far
    pub fn published(&self) -> u64 {
        self.event_counter.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_in_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe_events();

        bus.publish_reply("one".to_string());
        bus.publish_alert(AlertDecision::Periodic, "two".to_string());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.id, 0);
        assert_eq!(first.event_type, EventType::Reply);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.event_type, EventType::Alert);
        assert!(matches!(second.payload, EventPayload::Alert { decision: AlertDecision::Periodic, .. }));
        assert_eq!(bus.published(), 2);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        bus.publish_reading(Reading::empty(Utc::now()));
        bus.publish_reply("nobody listening".to_string());
        assert_eq!(bus.published(), 1);
    }
}
