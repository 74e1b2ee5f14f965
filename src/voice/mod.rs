// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Voice module - speech runs on its own task so sampling never blocks
//!
//! The worker holds at most one pending utterance:
//! - a normal utterance waits for the one in flight, replaces an older pending
//!   normal utterance and is dropped while an emergency is pending;
//! - an emergency takes the pending slot and interrupts an in-flight normal
//!   utterance. It never interrupts another emergency.

mod speaker;

pub use speaker::{CommandSpeaker, LogSpeaker, Speaker};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Voice output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Speak alerts at all
    pub enabled: bool,

    /// External TTS program; alerts are only logged when unset
    pub command: Option<String>,

    /// Extra arguments placed before the text
    pub args: Vec<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: Some("say".to_string()),
            args: Vec::new(),
        }
    }
}

impl VoiceConfig {
    pub fn speaker(&self) -> Box<dyn Speaker> {
        match &self.command {
            Some(program) => Box::new(CommandSpeaker::new(program.clone(), self.args.clone())),
            None => Box::new(LogSpeaker),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Normal,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub priority: Priority,
}

/// What happened to a submitted utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Took the empty pending slot
    Queued,
    /// Superseded an older pending utterance
    Replaced,
    /// An emergency is pending, so this normal utterance was discarded
    Dropped,
    /// Took the slot and interrupted the utterance in flight
    Preempting,
    /// Worker has shut down
    Closed,
}

struct InFlight {
    priority: Priority,
    cancel: Option<oneshot::Sender<()>>,
}

#[derive(Default)]
struct Slot {
    pending: Option<Utterance>,
    in_flight: Option<InFlight>,
    closed: bool,
}

impl Slot {
    fn offer(&mut self, utterance: Utterance) -> SubmitOutcome {
        if self.closed {
            return SubmitOutcome::Closed;
        }

        match utterance.priority {
            Priority::Emergency => {
                let replaced = self.pending.replace(utterance).is_some();
                match &mut self.in_flight {
                    Some(current) if current.priority == Priority::Normal => {
                        if let Some(cancel) = current.cancel.take() {
                            let _ = cancel.send(());
                        }
                        SubmitOutcome::Preempting
                    }
                    _ if replaced => SubmitOutcome::Replaced,
                    _ => SubmitOutcome::Queued,
                }
            }
            Priority::Normal => match &self.pending {
                Some(pending) if pending.priority == Priority::Emergency => SubmitOutcome::Dropped,
                Some(_) => {
                    self.pending = Some(utterance);
                    SubmitOutcome::Replaced
                }
                None => {
                    self.pending = Some(utterance);
                    SubmitOutcome::Queued
                }
            },
        }
    }

    fn start_next(&mut self) -> Option<(Utterance, oneshot::Receiver<()>)> {
        let utterance = self.pending.take()?;
        let (cancel, cancelled) = oneshot::channel();
        self.in_flight = Some(InFlight {
            priority: utterance.priority,
            cancel: Some(cancel),
        });
        Some((utterance, cancelled))
    }
}

#[derive(Default)]
struct Shared {
    slot: Mutex<Slot>,
    wake: Notify,
    spoken: AtomicU64,
    interrupted: AtomicU64,
    failed: AtomicU64,
}

/// Counters for finished utterances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoiceStats {
    pub spoken: u64,
    pub interrupted: u64,
    pub failed: u64,
}

/// Cloneable handle used to submit utterances to the worker
#[derive(Clone)]
pub struct VoiceHandle {
    shared: Arc<Shared>,
}

impl VoiceHandle {
    pub fn submit(&self, text: impl Into<String>, priority: Priority) -> SubmitOutcome {
        let outcome = self.shared.slot.lock().offer(Utterance {
            text: text.into(),
            priority,
        });
        debug!("Voice submit ({:?}): {:?}", priority, outcome);
        if outcome != SubmitOutcome::Closed && outcome != SubmitOutcome::Dropped {
            self.shared.wake.notify_one();
        }
        outcome
    }

    /// Stop accepting utterances; the worker exits once the slot is empty
    pub fn close(&self) {
        self.shared.slot.lock().closed = true;
        self.shared.wake.notify_one();
    }

    pub fn stats(&self) -> VoiceStats {
        VoiceStats {
            spoken: self.shared.spoken.load(Ordering::Relaxed),
            interrupted: self.shared.interrupted.load(Ordering::Relaxed),
            failed: self.shared.failed.load(Ordering::Relaxed),
        }
    }
}

/// Background speech task
pub struct VoiceWorker;

impl VoiceWorker {
    pub fn spawn(speaker: Box<dyn Speaker>) -> (VoiceHandle, JoinHandle<()>) {
        let shared = Arc::new(Shared::default());
        let handle = VoiceHandle { shared: shared.clone() };
        let task = tokio::spawn(run(shared, speaker));
        (handle, task)
    }
}

async fn run(shared: Arc<Shared>, speaker: Box<dyn Speaker>) {
    info!("Voice worker started");
    loop {
        let next = {
            let mut slot = shared.slot.lock();
            match slot.start_next() {
                Some(next) => Some(next),
                None if slot.closed => break,
                None => None,
            }
        };

        let Some((utterance, mut cancelled)) = next else {
            shared.wake.notified().await;
            continue;
        };

        tokio::select! {
            result = speaker.speak(&utterance.text) => match result {
                Ok(()) => {
                    shared.spoken.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    shared.failed.fetch_add(1, Ordering::Relaxed);
                    warn!("Speech failed: {}", e);
                }
            },
            Ok(()) = &mut cancelled => {
                shared.interrupted.fetch_add(1, Ordering::Relaxed);
                debug!("Interrupted: {}", utterance.text);
            }
        }

        shared.slot.lock().in_flight = None;
    }
    info!("Voice worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    use crate::error::SpeechError;

    fn utterance(text: &str, priority: Priority) -> Utterance {
        Utterance { text: text.to_string(), priority }
    }

    #[test]
    fn test_normal_waits_then_replaces() {
        let mut slot = Slot::default();
        assert_eq!(slot.offer(utterance("a", Priority::Normal)), SubmitOutcome::Queued);
        assert_eq!(slot.offer(utterance("b", Priority::Normal)), SubmitOutcome::Replaced);
        assert_eq!(slot.pending.as_ref().map(|u| u.text.as_str()), Some("b"));
    }

    #[test]
    fn test_normal_dropped_behind_emergency() {
        let mut slot = Slot::default();
        slot.offer(utterance("fire", Priority::Emergency));
        assert_eq!(slot.offer(utterance("summary", Priority::Normal)), SubmitOutcome::Dropped);
        assert_eq!(slot.pending.as_ref().map(|u| u.text.as_str()), Some("fire"));
    }

    #[test]
    fn test_emergency_preempts_normal_in_flight() {
        let mut slot = Slot::default();
        slot.offer(utterance("summary", Priority::Normal));
        let (_, mut cancelled) = slot.start_next().unwrap();
        assert_eq!(slot.offer(utterance("fire", Priority::Emergency)), SubmitOutcome::Preempting);
        assert_eq!(cancelled.try_recv(), Ok(()));
    }

    #[test]
    fn test_emergency_never_preempts_emergency() {
        let mut slot = Slot::default();
        slot.offer(utterance("fire", Priority::Emergency));
        let (_, mut cancelled) = slot.start_next().unwrap();
        assert_eq!(slot.offer(utterance("co2", Priority::Emergency)), SubmitOutcome::Queued);
        assert!(cancelled.try_recv().is_err());
    }

    #[test]
    fn test_closed_slot_rejects() {
        let mut slot = Slot { closed: true, ..Slot::default() };
        assert_eq!(slot.offer(utterance("a", Priority::Normal)), SubmitOutcome::Closed);
    }

    /// Speaks instantly, except "long" which never finishes on its own
    struct ScriptedSpeaker {
        events: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl Speaker for ScriptedSpeaker {
        async fn speak(&self, text: &str) -> Result<(), SpeechError> {
            let _ = self.events.send(format!("start:{}", text));
            if text == "long" {
                std::future::pending::<()>().await;
            }
            let _ = self.events.send(format!("done:{}", text));
            Ok(())
        }
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("speaker event")
            .expect("channel open")
    }

    #[tokio::test]
    async fn test_worker_emergency_interrupts_speech() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (voice, task) = VoiceWorker::spawn(Box::new(ScriptedSpeaker { events: tx }));

        voice.submit("long", Priority::Normal);
        assert_eq!(next(&mut rx).await, "start:long");

        assert_eq!(voice.submit("fire", Priority::Emergency), SubmitOutcome::Preempting);
        assert_eq!(next(&mut rx).await, "start:fire");
        assert_eq!(next(&mut rx).await, "done:fire");

        voice.close();
        tokio::time::timeout(Duration::from_secs(2), task).await.unwrap().unwrap();
        assert_eq!(voice.stats(), VoiceStats { spoken: 1, interrupted: 1, failed: 0 });
    }

    #[tokio::test]
    async fn test_worker_speaks_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (voice, task) = VoiceWorker::spawn(Box::new(ScriptedSpeaker { events: tx }));

        voice.submit("one", Priority::Normal);
        assert_eq!(next(&mut rx).await, "start:one");
        assert_eq!(next(&mut rx).await, "done:one");
        voice.submit("two", Priority::Normal);
        assert_eq!(next(&mut rx).await, "start:two");
        assert_eq!(next(&mut rx).await, "done:two");

        voice.close();
        tokio::time::timeout(Duration::from_secs(2), task).await.unwrap().unwrap();
        assert_eq!(voice.stats().spoken, 2);
        assert_eq!(voice.submit("late", Priority::Normal), SubmitOutcome::Closed);
    }
}
