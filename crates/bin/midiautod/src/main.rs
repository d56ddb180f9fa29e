//! # midiautod — midiauto daemon
//!
//! Composition root that wires the engine to its adapters and runs until
//! interrupted.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Build the virtual screen and pointer (adapters)
//! - Start the automation engine, injecting adapters via port traits
//! - Feed the MIDI pipeline from the configured source (stdin or hardware)
//! - Log every engine event
//! - Handle graceful shutdown (Ctrl-C, end of stdin)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};

use midiauto_adapter_midi::pump_lines;
use midiauto_adapter_virtual::{RecordingClicker, VirtualScreen};
use midiauto_app::command_executor::CommandExecutor;
use midiauto_app::engine::AutomationEngine;
use midiauto_app::event_bus::InProcessEventBus;
use midiauto_app::pipeline::MidiPipeline;
use midiauto_domain::event::{EngineEvent, EngineEventKind};

use config::{Config, MidiSource};

type Pipeline = MidiPipeline<CommandExecutor<InProcessEventBus>, InProcessEventBus>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_logging(&config.logging.filter);
    let settings = config.engine_settings();

    // Screen & pointer
    let screen = VirtualScreen::new();
    for visible in &config.screen.visible {
        screen.show(&visible.template, visible.region());
    }
    let clicker = Arc::new(RecordingClicker::new());

    // Event bus
    let event_bus = InProcessEventBus::new(256);
    let event_log = tokio::spawn(log_events(event_bus.subscribe()));

    // Engine
    let engine = AutomationEngine::start(
        config.automations,
        settings,
        Arc::new(screen),
        clicker,
        event_bus.clone(),
    )?;
    engine.set_learn_mode(config.midi.learn);
    engine.activate_once_per_change_automations();

    // MIDI
    let executor = CommandExecutor::new(config.commands, event_bus.clone());
    let pipeline: Arc<Pipeline> = Arc::new(engine.pipeline(executor));

    match config.midi.source {
        MidiSource::Stdin => listen_stdin(&pipeline).await?,
        MidiSource::Midir => listen_device(config.midi.input_device.as_deref(), pipeline).await?,
    }

    for (id, exit) in engine.shutdown().await {
        tracing::debug!(automation = %id, ?exit, "worker exited");
    }
    event_log.abort();
    Ok(())
}

fn init_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

async fn listen_stdin(pipeline: &Pipeline) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("reading hex midi messages from stdin");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = pump_lines(stdin, pipeline) => {
            let delivered = result?;
            tracing::info!(delivered, "stdin closed, shutting down");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("interrupted, shutting down");
        }
    }
    Ok(())
}

#[cfg(feature = "midir")]
async fn listen_device(
    device: Option<&str>,
    pipeline: Arc<Pipeline>,
) -> Result<(), Box<dyn std::error::Error>> {
    use midiauto_adapter_midi::{MidiAdapterError, MidirInput, input_port_names};

    let input = match MidirInput::connect(device, pipeline) {
        Ok(input) => input,
        Err(err @ MidiAdapterError::DeviceNotFound(_)) => {
            match input_port_names() {
                Ok(ports) => tracing::error!(?ports, "no matching midi input port"),
                Err(list_err) => tracing::warn!(%list_err, "failed to list midi input ports"),
            }
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    tracing::info!(port = input.port_name(), "listening for midi input");
    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupted, shutting down");
    drop(input);
    Ok(())
}

#[cfg(not(feature = "midir"))]
async fn listen_device(
    _device: Option<&str>,
    _pipeline: Arc<Pipeline>,
) -> Result<(), Box<dyn std::error::Error>> {
    Err(config::ConfigError::Validation(
        "midi.source = \"midir\" requires the `midir` feature".to_string(),
    )
    .into())
}

async fn log_events(mut events: broadcast::Receiver<EngineEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => match &event.kind {
                EngineEventKind::MidiSignatureLearned { signature } => {
                    tracing::info!(%signature, "learned signature, bind it in midiauto.toml");
                }
                kind => tracing::info!(at = %event.timestamp, "{kind}"),
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
