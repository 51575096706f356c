//! Engine binary for the Skyswarm simulation.
//!
//! Wires the flocking engine to its collaborators: a rolling UI event log,
//! a dry-run publisher behind the event bus, and a shared frame snapshot
//! for rendering. Runs the frame loop until the tick limit or Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `skyswarm-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the engine from a seeded or entropy-seeded random source
//! 4. Start the event-log task
//! 5. Prepare the publisher; mark the schema ready only on success
//! 6. Start the publisher bridge
//! 7. Run the frame loop
//! 8. Drain the bridge and log task, then log the result

mod dry_run;
mod error;
mod frame_callback;

use std::path::Path;
use std::sync::Arc;

use skyswarm_core::config::SimulationConfig;
use skyswarm_core::runner;
use skyswarm_core::{
    EventLog, EventPublisher, NotableEventSubscription, OperatorState, ReceiptBus,
    ReceiptSubscription, SeededRandom, SimulationEngine, spawn_publisher,
};
use skyswarm_types::FrameSnapshot;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::dry_run::DryRunPublisher;
use crate::error::EngineError;
use crate::frame_callback::SnapshotCallback;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "skyswarm-config.yaml";

/// Ticks between frame summaries in the debug log (about one per second).
const FRAME_LOG_INTERVAL: u64 = 60;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a background task fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = Path::new(CONFIG_PATH);
    let config = load_config(config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("skyswarm-engine starting");
    if !config_path.exists() {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.world.max_ticks,
        "Configuration loaded"
    );

    // 3. Build the engine.
    let rng = SeededRandom::from_optional_seed(config.world.seed);
    let mut engine =
        SimulationEngine::with_index(config.flock.clone(), rng, config.world.neighbor_index)
            .map_err(EngineError::from)?
            .with_event_probability(config.events.probability);

    // 4. Event log.
    let event_log = Arc::new(RwLock::new(EventLog::new(config.events.log_capacity)));
    event_log
        .write()
        .await
        .record_system("Initializing drone swarm...");
    let receipt_bus = ReceiptBus::default();
    let log_task = tokio::spawn(run_event_log(
        Arc::clone(&event_log),
        engine.events().subscribe(),
        receipt_bus.subscribe(),
    ));

    // 5. Publisher readiness handshake.
    let publisher = Arc::new(DryRunPublisher::new());
    match publisher.prepare().await {
        Ok(()) => {
            engine.set_schema_ready(true);
            event_log.write().await.record_system("Schema registered");
        }
        Err(e) => {
            warn!(error = %e, "Publisher not ready, notable events disabled");
            event_log
                .write()
                .await
                .record_system("Publisher unavailable; events disabled");
        }
    }

    // 6. Publisher bridge.
    let bridge = spawn_publisher(
        Arc::clone(&publisher),
        engine.events().subscribe(),
        receipt_bus,
    );

    // 7. Frame loop.
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        config.world.max_ticks,
    ));
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping");
                operator.request_stop();
            }
        });
    }

    let latest_frame = Arc::new(RwLock::new(engine.snapshot()));
    let mut callback = SnapshotCallback::new(
        Arc::clone(&latest_frame),
        config.flock.max_speed,
        FRAME_LOG_INTERVAL,
    );

    info!(
        drones = engine.agents().len(),
        obstacles = engine.obstacles().len(),
        schema_ready = engine.schema_ready(),
        "Entering frame loop"
    );
    let result = runner::run_simulation(&mut engine, &operator, &mut callback).await;
    runner::log_simulation_end(&result);

    // 8. Shut down collaborators. Dropping the engine closes the event bus,
    //    which ends the bridge; the bridge then drops the receipt bus, which
    //    ends the log task.
    drop(engine);
    let stats = bridge.await.map_err(EngineError::from)?;
    log_task.await.map_err(EngineError::from)?;

    let final_frame: FrameSnapshot = latest_frame.read().await.clone();
    info!(
        final_tick = final_frame.tick,
        published = stats.published,
        failed = stats.failed,
        dry_run_total = publisher.published(),
        "Publisher drained"
    );
    for line in event_log.read().await.lines() {
        info!(line, "event log");
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "skyswarm-engine shutdown complete"
    );

    Ok(())
}

/// Load `path`, or defaults (with environment overrides) if it does not exist.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    let config = if path.exists() {
        SimulationConfig::from_file(path)?
    } else {
        SimulationConfig::parse("")?
    };
    Ok(config)
}

/// Append every notable event and publish receipt to the shared log until
/// both feeds close.
async fn run_event_log(
    log: Arc<RwLock<EventLog>>,
    mut events: NotableEventSubscription,
    mut receipts: ReceiptSubscription,
) {
    let mut events_open = true;
    let mut receipts_open = true;
    while events_open || receipts_open {
        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(event) => {
                    info!(line = %event.log_line(), "event");
                    log.write().await.record_event(&event);
                }
                None => events_open = false,
            },
            receipt = receipts.recv(), if receipts_open => match receipt {
                Some(receipt) => {
                    info!(
                        drone_id = %receipt.drone_id,
                        hash = %receipt.hash,
                        "receipt"
                    );
                    log.write().await.record_receipt(&receipt);
                }
                None => receipts_open = false,
            },
        }
    }
}
