//! Integration tests for the async frame loop and the publishing bridge.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use skyswarm_core::world::Agent;
use skyswarm_core::{
    EventLog, EventPublisher, FlockingParams, FrameCallback, NoOpCallback, OperatorState,
    PublishError, PublishStats, ReceiptBus, SeededRandom, SimulationEndReason, SimulationEngine,
    TickSummary, run_simulation, spawn_publisher,
};
use skyswarm_types::{NotableEvent, PublishReceipt};

/// Records every frame it is shown.
#[derive(Default)]
struct Recorder {
    ticks: Vec<u64>,
    agent_counts: Vec<usize>,
    events: Vec<NotableEvent>,
}

impl FrameCallback for Recorder {
    fn on_frame(&mut self, summary: &TickSummary, agents: &[Agent]) {
        self.ticks.push(summary.tick);
        self.agent_counts.push(agents.len());
        if let Some(event) = &summary.event {
            self.events.push(event.clone());
        }
    }
}

/// Accepts everything and derives a fake hash from the nonce.
struct Accepting;

impl EventPublisher for Accepting {
    async fn prepare(&self) -> Result<(), PublishError> {
        Ok(())
    }

    async fn publish(&self, event: &NotableEvent) -> Result<PublishReceipt, PublishError> {
        Ok(PublishReceipt {
            hash: format!("0x{:06x}", event.nonce),
            event_type: event.event_type,
            drone_id: event.drone_id.clone(),
        })
    }
}

fn engine(seed: u64) -> SimulationEngine {
    SimulationEngine::new(FlockingParams::default(), SeededRandom::from_seed(seed)).unwrap()
}

#[tokio::test]
async fn loop_stops_at_tick_limit() {
    let mut engine = engine(1);
    let operator = Arc::new(OperatorState::new(0, 25));
    let mut recorder = Recorder::default();

    let result = run_simulation(&mut engine, &operator, &mut recorder).await;

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 25);
    assert_eq!(recorder.ticks, (1..=25).collect::<Vec<u64>>());
    assert!(recorder.agent_counts.iter().all(|&n| n == 50));
    assert_eq!(
        operator.end_reason().await,
        Some(SimulationEndReason::MaxTicksReached)
    );
}

#[tokio::test]
async fn stop_before_first_tick_runs_nothing() {
    let mut engine = engine(2);
    let operator = Arc::new(OperatorState::new(0, 0));
    operator.request_stop();

    let result = run_simulation(&mut engine, &operator, &mut NoOpCallback).await;

    assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
    assert_eq!(result.total_ticks, 0);
    assert_eq!(engine.tick_count(), 0);
}

#[tokio::test]
async fn stop_request_ends_an_unbounded_run() {
    let mut engine = engine(3);
    let operator = Arc::new(OperatorState::new(1, 0));
    let stopper = {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(30)).await;
            operator.request_stop();
        })
    };

    let result = run_simulation(&mut engine, &operator, &mut NoOpCallback).await;
    stopper.await.unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
    assert!(result.total_ticks > 0);
    assert_eq!(result.total_ticks, engine.tick_count());
}

#[tokio::test]
async fn emitted_events_reach_publisher_and_log() {
    let mut engine = engine(4).with_event_probability(1.0);
    let publisher = Arc::new(Accepting);
    publisher.prepare().await.unwrap();
    engine.set_schema_ready(true);

    let receipt_bus = ReceiptBus::default();
    let mut receipts = receipt_bus.subscribe();
    let mut log_feed = engine.events().subscribe();
    let bridge = spawn_publisher(Arc::clone(&publisher), engine.events().subscribe(), receipt_bus);

    let operator = Arc::new(OperatorState::new(0, 10));
    let mut recorder = Recorder::default();
    let result = run_simulation(&mut engine, &operator, &mut recorder).await;
    assert_eq!(result.events_emitted, 10);
    assert_eq!(recorder.events.len(), 10);

    // Dropping the engine closes the event bus, which ends the bridge.
    drop(engine);
    let stats = bridge.await.unwrap();
    assert_eq!(
        stats,
        PublishStats {
            published: 10,
            failed: 0
        }
    );

    let mut log = EventLog::new(5);
    while let Some(event) = log_feed.try_recv() {
        log.record_event(&event);
    }
    assert_eq!(log.len(), 5);
    let last = recorder.events.last().unwrap();
    assert_eq!(log.latest(), Some(last.log_line().as_str()));

    let mut hashes = Vec::new();
    while let Some(receipt) = receipts.try_recv() {
        hashes.push(receipt.hash);
    }
    let expected: Vec<String> = recorder
        .events
        .iter()
        .map(|e| format!("0x{:06x}", e.nonce))
        .collect();
    assert_eq!(hashes, expected);
}

#[tokio::test]
async fn no_events_without_schema() {
    let mut engine = engine(5).with_event_probability(1.0);
    let mut feed = engine.events().subscribe();
    let operator = Arc::new(OperatorState::new(0, 50));

    let result = run_simulation(&mut engine, &operator, &mut NoOpCallback).await;

    assert_eq!(result.events_emitted, 0);
    assert!(feed.try_recv().is_none());
}
