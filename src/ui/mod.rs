// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! UI module - terminal status panel and alert text

mod console;
pub mod messages;

pub use console::{change_indicator, render_status, StatusSnapshot};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::core::{Event, EventPayload};

/// Print events from the bus until it closes
pub async fn run_console(mut events: broadcast::Receiver<Event>, show_status: bool) {
    loop {
        match events.recv().await {
            Ok(event) => match event.payload {
                EventPayload::Status(snapshot) => {
                    if show_status {
                        println!("\n{}", "=".repeat(60));
                        print!("{}", render_status(&snapshot, event.timestamp));
                        println!("{}", "=".repeat(60));
                    }
                }
                EventPayload::Alert { text, .. } => println!("IRIS: {}", text),
                EventPayload::Reply(text) => println!("IRIS: {}", text),
                EventPayload::Action(entry) => debug!("Action: {}", entry),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Console lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
