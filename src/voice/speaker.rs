// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Speech backends

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::SpeechError;

/// Turns text into audible speech.
///
/// The future returned by `speak` may be dropped mid-utterance when an
/// emergency preempts it; implementations must stop speaking when dropped.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

/// Writes utterances to the log instead of a speaker
#[derive(Debug, Default, Clone)]
pub struct LogSpeaker;

#[async_trait]
impl Speaker for LogSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        info!("🔊 {}", text);
        Ok(())
    }
}

/// Runs an external text-to-speech program (`say`, `espeak`, ...) with the
/// text as its last argument
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        debug!("Speaking via {}: {}", self.program, text);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await?;

        if !status.success() {
            return Err(SpeechError::CommandFailed {
                command: self.program.clone(),
                reason: status.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_speaker_rejects_empty_text() {
        assert!(matches!(LogSpeaker.speak("   ").await, Err(SpeechError::EmptyText)));
        assert!(LogSpeaker.speak("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_command_speaker_rejects_empty_text() {
        let speaker = CommandSpeaker::new("say", vec![]);
        assert!(matches!(speaker.speak("").await, Err(SpeechError::EmptyText)));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let speaker = CommandSpeaker::new("iris-no-such-tts-program", vec![]);
        assert!(matches!(speaker.speak("hello").await, Err(SpeechError::Io(_))));
    }
}
