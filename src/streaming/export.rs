//! History export as JSON lines

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::StreamingConfig;
use crate::actions::ActionLogEntry;
use crate::core::{AlertDecision, Event, EventPayload};
use crate::sensors::Reading;

pub const HISTORY_FILE: &str = "history.jsonl";
pub const READINGS_FILE: &str = "readings.jsonl";

/// One line of `history.jsonl`
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryRecord<'a> {
    Alert {
        timestamp: DateTime<Utc>,
        decision: &'a AlertDecision,
        text: &'a str,
    },
    Action {
        #[serde(flatten)]
        entry: &'a ActionLogEntry,
    },
}

/// Appends alerts, actions and optionally readings to files under one directory
pub struct DataExporter {
    path: PathBuf,
    history_file: Mutex<Option<BufWriter<File>>>,
    readings_file: Mutex<Option<BufWriter<File>>>,
    history_count: Mutex<usize>,
    readings_count: Mutex<usize>,
}

impl DataExporter {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)?;

        Ok(Self {
            path,
            history_file: Mutex::new(None),
            readings_file: Mutex::new(None),
            history_count: Mutex::new(0),
            readings_count: Mutex::new(0),
        })
    }

    pub fn history_path(&self) -> PathBuf {
        self.path.join(HISTORY_FILE)
    }

    pub fn readings_path(&self) -> PathBuf {
        self.path.join(READINGS_FILE)
    }

    pub fn export_history(&self, record: &HistoryRecord<'_>) -> Result<()> {
        self.append(&self.history_file, &self.history_path(), record)?;
        *self.history_count.lock() += 1;
        Ok(())
    }

    pub fn export_reading(&self, reading: &Reading) -> Result<()> {
        self.append(&self.readings_file, &self.readings_path(), reading)?;
        *self.readings_count.lock() += 1;
        Ok(())
    }

    /// Write an event if it belongs in the history; other events are ignored
    pub fn export_event(&self, event: &Event) -> Result<()> {
        match &event.payload {
            EventPayload::Alert { decision, text } => self.export_history(&HistoryRecord::Alert {
                timestamp: event.timestamp,
                decision,
                text,
            }),
            EventPayload::Action(entry) => self.export_history(&HistoryRecord::Action { entry }),
            EventPayload::Status(_) | EventPayload::Reply(_) => Ok(()),
        }
    }

    fn append<T: Serialize + ?Sized>(
        &self,
        slot: &Mutex<Option<BufWriter<File>>>,
        path: &Path,
        value: &T,
    ) -> Result<()> {
        let mut file_lock = slot.lock();
        if file_lock.is_none() {
            *file_lock = Some(BufWriter::new(open_export_file(path)?));
        }

        if let Some(ref mut writer) = *file_lock {
            let json = serde_json::to_string(value)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// (history lines, reading lines) written so far
    pub fn get_stats(&self) -> (usize, usize) {
        (*self.history_count.lock(), *self.readings_count.lock())
    }

    pub fn close(&self) -> Result<()> {
        if let Some(mut writer) = self.history_file.lock().take() {
            writer.flush()?;
        }
        if let Some(mut writer) = self.readings_file.lock().take() {
            writer.flush()?;
        }
        Ok(())
    }
}

fn open_export_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("Failed to open export file {:?}: {}", path, e))
}

/// Export bus traffic until both channels close
pub async fn run_exporter(
    dir: PathBuf,
    config: StreamingConfig,
    mut events: broadcast::Receiver<Event>,
    mut readings: broadcast::Receiver<Reading>,
) -> Result<()> {
    let exporter = DataExporter::new(&dir)?;
    info!("Exporting history to {:?}", exporter.history_path());

    let mut readings_open = config.export_readings;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if let Err(e) = exporter.export_event(&event) {
                        warn!("History export failed: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Exporter lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            reading = readings.recv(), if readings_open => match reading {
                Ok(reading) => {
                    if let Err(e) = exporter.export_reading(&reading) {
                        warn!("Reading export failed: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => readings_open = false,
            },
        }
    }

    let (history, readings) = exporter.get_stats();
    info!("Export finished: {} history lines, {} readings", history, readings);
    exporter.close()
}
