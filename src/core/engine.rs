// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Sampling engine - one tick reads, decides, presents and actuates

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::{AlertDecision, AlertScheduler, EventBus, MonitorState};
use crate::actions::{
    fan_trigger, ActionKind, ActionLog, Actuator, ActuatorCommand, FanController, FanReason, LedController,
    LedState,
};
use crate::commands::{help_text, Command};
use crate::config::Config;
use crate::detection::classify_emergency;
use crate::sensors::{Reading, SensorSource};
use crate::ui::{messages, StatusSnapshot};
use crate::voice::{Priority, VoiceHandle};

/// Drives a sensor board through the alerting pipeline
pub struct Monitor<B: SensorSource + Actuator> {
    config: Arc<Config>,
    board: B,
    scheduler: AlertScheduler,
    led: LedController,
    fan: FanController,
    actions: Arc<Mutex<ActionLog>>,
    event_bus: Arc<EventBus>,
    voice: Option<VoiceHandle>,
    state: MonitorState,
    last_reading: Option<Reading>,
    start_time: Instant,
}

impl<B: SensorSource + Actuator> Monitor<B> {
    pub fn new(config: Arc<Config>, board: B, event_bus: Arc<EventBus>) -> Self {
        let scheduler = AlertScheduler::new(
            config.thresholds.clone(),
            config.emergency.clone(),
            config.monitor.periodic_interval(),
            config.monitor.baseline_policy,
            Utc::now(),
        )
        .with_missing_field_policy(config.monitor.missing_fields);
        let led = LedController::new(config.led, LedState::Off);
        let fan = FanController::new(config.fan);
        let actions = Arc::new(Mutex::new(ActionLog::new(config.action_log.capacity)));

        Self {
            config,
            board,
            scheduler,
            led,
            fan,
            actions,
            event_bus,
            voice: None,
            state: MonitorState::default(),
            last_reading: None,
            start_time: Instant::now(),
        }
    }

    pub fn with_voice(mut self, voice: VoiceHandle) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Replace the scheduler, e.g. to control its start time
    pub fn with_scheduler(mut self, scheduler: AlertScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn actions(&self) -> Arc<Mutex<ActionLog>> {
        self.actions.clone()
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn led_state(&self) -> LedState {
        self.led.state()
    }

    pub fn fan_running(&self) -> bool {
        self.fan.is_running()
    }

    /// Sample until shutdown or `max_ticks` ticks
    pub async fn run(
        &mut self,
        mut commands: mpsc::Receiver<Command>,
        mut shutdown: broadcast::Receiver<()>,
        max_ticks: Option<u64>,
    ) -> Result<()> {
        info!("Starting monitor on {}...", self.board.id());
        self.board.connect().await?;
        self.state.running = true;
        self.log_action(ActionKind::System, "Monitoring started".to_string());

        let mut ticker = interval(self.config.monitor.sample_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.step().await;
                    if max_ticks.is_some_and(|max| self.state.ticks >= max) {
                        info!("Reached {} ticks", self.state.ticks);
                        break;
                    }
                }
                command = commands.recv(), if commands_open => match command {
                    Some(command) => {
                        let reply = self.handle_command(command).await;
                        self.event_bus.publish_reply(reply);
                    }
                    None => commands_open = false,
                },
                _ = shutdown.recv() => {
                    info!("Monitor shutting down...");
                    break;
                }
            }
        }

        self.state.running = false;
        self.log_action(ActionKind::System, "Monitoring stopped".to_string());
        if let Err(e) = self.board.disconnect().await {
            warn!("Error disconnecting {}: {}", self.board.id(), e);
        }
        Ok(())
    }

    /// One sampling tick
    pub async fn step(&mut self) -> AlertDecision {
        self.state.ticks += 1;

        let reading = match self.board.read().await {
            Ok(reading) => reading,
            Err(e) => {
                self.state.sensor_errors += 1;
                warn!("Sensor read failed: {}", e);
                self.log_action(ActionKind::SensorError, format!("Sensors not responding: {}", e));
                return AlertDecision::None;
            }
        };
        self.event_bus.publish_reading(reading.clone());

        let previous = self.scheduler.baseline().cloned();
        let decision = self.scheduler.tick(&reading);
        self.announce(&decision, &reading, previous.as_ref());

        if self.config.monitor.auto_led {
            self.auto_led(&reading).await;
        }
        if self.config.monitor.auto_fan {
            self.auto_fan(&reading).await;
        }

        let recent = self.actions.lock().recent(self.config.action_log.display_count);
        self.event_bus.publish_status(StatusSnapshot {
            reading: reading.clone(),
            baseline: previous,
            decision: decision.clone(),
            led: self.led.state(),
            fan: self.fan.is_running(),
            uptime: self.start_time.elapsed(),
            recent_actions: recent,
        });

        self.last_reading = Some(reading);
        decision
    }

    fn announce(&mut self, decision: &AlertDecision, reading: &Reading, previous: Option<&Reading>) {
        let Some(text) = messages::render_decision(decision, reading, previous, &self.config.emergency) else {
            return;
        };

        let (kind, priority) = match decision {
            AlertDecision::Emergency(_) => (ActionKind::EmergencyAlert, Priority::Emergency),
            AlertDecision::Change(_) => (ActionKind::ChangeAlert, Priority::Normal),
            AlertDecision::Periodic => (ActionKind::PeriodicSummary, Priority::Normal),
            AlertDecision::None => return,
        };

        self.state.alerts += 1;
        self.state.last_alert = Some(reading.timestamp);
        if decision.is_emergency() {
            self.state.emergencies += 1;
            error!("{}", text);
        } else {
            info!("{}", text);
        }

        if let Some(voice) = &self.voice {
            voice.submit(text.clone(), priority);
        }
        self.event_bus.publish_alert(decision.clone(), text.clone());
        self.log_action(kind, text);
    }

    async fn auto_led(&mut self, reading: &Reading) {
        let Some(light) = reading.light else {
            return;
        };
        let Some(next) = self.led.update(light) else {
            return;
        };

        match self.board.set_led(next).await {
            Ok(()) => {
                self.state.led_switches += 1;
                let description = match next {
                    LedState::On => "LED turned ON automatically for poor lighting",
                    LedState::Off => "LED turned OFF automatically - lighting is adequate",
                };
                debug!("{} (light {})", description, light);
                self.log_action(ActionKind::AutoLed, description.to_string());
            }
            Err(e) => {
                // Roll back so the next tick retries
                self.led.force(next.toggled());
                warn!("Failed to switch LED {}: {}", next, e);
            }
        }
    }

    async fn auto_fan(&mut self, reading: &Reading) {
        let before = (self.fan.is_running(), self.fan.last_switch());
        let Some(running) = self.fan.update(reading) else {
            return;
        };

        match self.board.set_fan(running).await {
            Ok(()) => {
                self.state.fan_switches += 1;
                let description = match (running, fan_trigger(reading, &self.config.fan)) {
                    (true, Some(FanReason::Warm)) => "Fan turned ON automatically - temperature is high",
                    (true, _) => "Fan turned ON automatically - air quality is poor",
                    (false, _) => "Fan turned OFF automatically - conditions are comfortable",
                };
                debug!("{}", description);
                self.log_action(ActionKind::AutoFan, description.to_string());
            }
            Err(e) => {
                self.fan.revert(before.0, before.1);
                warn!("Failed to switch fan {}: {}", if running { "ON" } else { "OFF" }, e);
            }
        }
    }

    /// Execute a user command and return the reply text
    pub async fn handle_command(&mut self, command: Command) -> String {
        debug!("Handling command {:?}", command);
        match command {
            Command::LedOn | Command::LedOff | Command::FanOn | Command::FanOff => {
                match command.actuator() {
                    Some(switch) => self.switch(switch).await,
                    None => help_text(),
                }
            }
            Command::Status => match &self.last_reading {
                Some(reading) => messages::status_message(reading, self.led.state()),
                None => "I can't access the sensors right now.".to_string(),
            },
            Command::EmergencyCheck => match &self.last_reading {
                Some(reading) => {
                    let critical = classify_emergency(reading, &self.config.emergency);
                    messages::emergency_check(&critical, reading, &self.config.emergency)
                }
                None => "I can't perform emergency check - sensors not responding!".to_string(),
            },
            Command::RecentActions => {
                let recent = self.actions.lock().recent(self.config.action_log.display_count);
                if recent.is_empty() {
                    "No recent actions".to_string()
                } else {
                    recent.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
                }
            }
            Command::Help => help_text(),
        }
    }

    async fn switch(&mut self, switch: ActuatorCommand) -> String {
        if let Err(e) = self.board.apply(switch).await {
            warn!("Command {} failed: {}", switch.wire(), e);
            return format!("I couldn't switch the {}: {}", switch, e);
        }

        match switch {
            ActuatorCommand::Led(state) => self.led.force(state),
            ActuatorCommand::Fan(on) => {
                let at = self.last_reading.as_ref().map_or_else(Utc::now, |r| r.timestamp);
                self.fan.force(on, at);
            }
        }
        self.log_action(ActionKind::UserCommand, format!("Switched {}", switch));
        format!("Switched {}.", switch)
    }

    fn log_action(&mut self, kind: ActionKind, description: String) {
        let entry = self.actions.lock().record_kind(kind, description, Utc::now());
        self.event_bus.publish_action(entry);
    }
}
