// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! IRIS - Environmental Monitor
//!
//! Runs the monitor against the built-in board simulator, prints the status
//! panel and alerts, and reads text commands from stdin.

use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use iris_monitor::commands::Command;
use iris_monitor::core::{EventBus, Monitor};
use iris_monitor::sensors::{EnvironmentSimulator, Scenario};
use iris_monitor::voice::VoiceWorker;
use iris_monitor::{streaming, ui, Config, VERSION};

/// IRIS - Environmental Monitor
#[derive(Parser, Debug)]
#[command(name = "iris-monitor")]
#[command(version = VERSION)]
#[command(about = "Environmental monitor with spoken alerts")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Sample interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Seconds of silence before a periodic summary
    #[arg(long)]
    periodic_secs: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Speak alerts
    #[arg(long)]
    voice: bool,

    /// Simulator scenario (normal, high_temp, high_co2, low_light, emergency)
    #[arg(long)]
    scenario: Option<String>,

    /// Do not read commands from stdin
    #[arg(long)]
    no_input: bool,

    /// Data output directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load or create configuration
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::from_str(&config.log_level).unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🌟 {} v{} - Environmental Monitor", config.app_name, VERSION);

    // Override with command line args
    if let Some(ms) = args.interval_ms {
        config.monitor.sample_interval_ms = ms;
    }
    if let Some(secs) = args.periodic_secs {
        config.monitor.periodic_interval_secs = secs;
    }
    if args.voice {
        config.voice.enabled = true;
    }
    if let Some(data_dir) = args.data_dir.clone() {
        config.data_dir = data_dir;
    }
    config.validate()?;

    let scenario = args.scenario.as_deref().map(Scenario::from_str).transpose()?;

    info!("Configuration loaded from {:?}", config_path);

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(run(config, scenario, args.ticks, !args.no_input));
    // The stdin thread may still be parked in a read
    rt.shutdown_background();
    result
}

async fn run(config: Config, scenario: Option<Scenario>, ticks: Option<u64>, read_input: bool) -> Result<()> {
    let config = Arc::new(config);
    let event_bus = Arc::new(EventBus::new(1000));
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let console = tokio::spawn(ui::run_console(
        event_bus.subscribe_events(),
        config.monitor.status_display,
    ));

    let exporter = if config.streaming.export_enabled {
        Some(tokio::spawn(streaming::run_exporter(
            config.data_dir.clone(),
            config.streaming.clone(),
            event_bus.subscribe_events(),
            event_bus.subscribe_readings(),
        )))
    } else {
        None
    };

    let voice = if config.voice.enabled {
        Some(VoiceWorker::spawn(config.voice.speaker()))
    } else {
        None
    };

    let mut board = EnvironmentSimulator::new("simulator", config.simulator.clone());
    if let Some(scenario) = scenario {
        board.apply_scenario(scenario);
    }

    let mut monitor = Monitor::new(config.clone(), board, event_bus.clone());
    if let Some((handle, _)) = &voice {
        monitor = monitor.with_voice(handle.clone());
    }

    let (command_tx, command_rx) = mpsc::channel(16);
    if read_input {
        spawn_command_reader(command_tx.clone())?;
    }
    drop(command_tx);

    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, cleaning up...");
            let _ = signal_tx.send(());
        }
    });

    info!("🚀 {} running", config.app_name);
    info!("   Type 'help' for commands, Ctrl+C to shutdown");

    let result = monitor.run(command_rx, shutdown_tx.subscribe(), ticks).await;

    // Tear down in dependency order; subscribers end once the bus is gone
    drop(monitor);
    drop(event_bus);

    if let Some((handle, task)) = voice {
        handle.close();
        let _ = task.await;
    }
    if let Some(exporter) = exporter {
        match exporter.await {
            Ok(Err(e)) => warn!("Exporter stopped with error: {}", e),
            Err(e) => warn!("Exporter task failed: {}", e),
            Ok(Ok(())) => {}
        }
    }
    let _ = console.await;

    info!("{} shutdown complete", config.app_name);
    result
}

/// Read stdin commands on a dedicated thread.
///
/// A blocking read cannot be cancelled, so the thread is detached and exits
/// on EOF or once the monitor drops its receiver.
fn spawn_command_reader(commands: mpsc::Sender<Command>) -> Result<()> {
    std::thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || forward_commands(std::io::stdin().lock(), &commands))?;
    Ok(())
}

/// Forward parsed lines until EOF or the receiver goes away
fn forward_commands(input: impl BufRead, commands: &mpsc::Sender<Command>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Ok(command) => {
                if commands.blocking_send(command).is_err() {
                    break;
                }
            }
            Err(e) => println!("IRIS: {}. Type 'help' for commands.", e),
        }
    }
}
