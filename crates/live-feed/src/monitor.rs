//! Solar Monitor State and Feed Start-up

use crate::scheduler::Scheduler;
use alerting::{AlertClassifier, AlertConfig, AlertLog, IdGenerator, UuidGenerator};
use panel_telemetry::{
    Clock, RandomSource, ReadingGenerator, SensorReading, SystemClock, ThreadRandom,
};
use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// Live feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Interval between readings in milliseconds (default: 3000)
    pub interval_ms: u64,
    /// Readings kept in the rolling history (default: 60)
    pub history_capacity: usize,
    /// Readings synthesized when the feed starts (default: 20)
    pub backfill_count: usize,
    /// Time span the backfill is spread over in milliseconds (default: 60000)
    pub backfill_window_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            history_capacity: 60,
            backfill_count: 20,
            backfill_window_ms: 60_000,
        }
    }
}

impl FeedConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn backfill_window(&self) -> Duration {
        Duration::from_millis(self.backfill_window_ms)
    }
}

/// Owns the generator, the current reading, the rolling history and the
/// alert classifier. Every mutation goes through `seed` or `tick`.
pub struct SolarMonitor<R = ThreadRandom, C = SystemClock, I = UuidGenerator> {
    config: FeedConfig,
    generator: ReadingGenerator<R, C>,
    classifier: AlertClassifier<R, I, C>,
    history: RingBuffer<SensorReading>,
    current: SensorReading,
    ticks: u64,
}

/// Monitor shared between the ticking task and readers
pub type SharedMonitor<R = ThreadRandom, C = SystemClock, I = UuidGenerator> =
    Arc<Mutex<SolarMonitor<R, C, I>>>;

impl SolarMonitor {
    /// Monitor backed by entropy-seeded RNGs, v4 ids and the system clock
    pub fn new(config: FeedConfig, alerts: AlertConfig) -> Self {
        Self::with_parts(
            config,
            ReadingGenerator::new(),
            AlertClassifier::new(alerts),
        )
    }
}

impl<R: RandomSource, C: Clock, I: IdGenerator> SolarMonitor<R, C, I> {
    /// Build a monitor from its parts. An initial current reading is
    /// generated; the history starts empty until `seed`.
    pub fn with_parts(
        config: FeedConfig,
        mut generator: ReadingGenerator<R, C>,
        classifier: AlertClassifier<R, I, C>,
    ) -> Self {
        let current = generator.generate();
        let history = RingBuffer::new(config.history_capacity.max(1));
        Self {
            config,
            generator,
            classifier,
            history,
            current,
            ticks: 0,
        }
    }

    /// Replace the history with a backfill batch and classify the current
    /// reading. Returns the number of readings seeded.
    pub fn seed(&mut self) -> usize {
        let batch = self
            .generator
            .backfill(self.config.backfill_count, self.config.backfill_window());
        let seeded = batch.len().min(self.history.capacity());

        self.history.clear();
        self.history.extend(batch);
        self.classifier.on_reading(&self.current);

        info!("History seeded with {} readings", seeded);
        seeded
    }

    /// Generate the next reading, append it to the history, make it current
    /// and classify it
    pub fn tick(&mut self) -> &SensorReading {
        let reading = self.generator.generate();
        self.history.push(reading.clone());
        self.current = reading;
        self.ticks += 1;

        let raised = self.classifier.on_reading(&self.current).is_some();
        metrics::counter!("readings_generated_total").increment(1);
        debug!(
            "Tick {}: status={} alert={}",
            self.ticks,
            self.current.status().as_str(),
            raised
        );

        &self.current
    }

    pub fn current(&self) -> &SensorReading {
        &self.current
    }

    /// Rolling history, oldest first
    pub fn history(&self) -> &RingBuffer<SensorReading> {
        &self.history
    }

    /// Alert log, newest first
    pub fn alerts(&self) -> &AlertLog {
        self.classifier.log()
    }

    pub fn alerts_mut(&mut self) -> &mut AlertLog {
        self.classifier.log_mut()
    }

    /// Ticks processed since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }
}

/// Lock a shared monitor, recovering the state if a previous holder panicked
pub fn lock<T>(shared: &Mutex<T>) -> MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Seed the monitor's history and schedule a tick every configured interval.
/// Readings stop once the returned handle is cancelled or dropped.
pub fn start<S, R, C, I>(monitor: &SharedMonitor<R, C, I>, scheduler: &mut S) -> S::Handle
where
    S: Scheduler,
    R: RandomSource + Send + 'static,
    C: Clock + Send + 'static,
    I: IdGenerator + Send + 'static,
{
    let interval = {
        let mut guard = lock(monitor);
        guard.seed();
        guard.config().interval()
    };

    info!("Starting live feed every {:?}", interval);
    let shared = Arc::clone(monitor);
    scheduler.schedule(
        interval,
        Box::new(move || {
            lock(&shared).tick();
        }),
    )
}
