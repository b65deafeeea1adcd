//! Synthetic Reading Generator

use crate::ranges;
use crate::reading::SensorReading;
use crate::source::{Clock, RandomSource, SystemClock, ThreadRandom};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// Produces uniformly distributed readings within the configured ranges
pub struct ReadingGenerator<R = ThreadRandom, C = SystemClock> {
    random: R,
    clock: C,
}

impl ReadingGenerator {
    /// Generator backed by an entropy-seeded RNG and the system clock
    pub fn new() -> Self {
        Self::with_sources(ThreadRandom::default(), SystemClock)
    }
}

impl Default for ReadingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource, C: Clock> ReadingGenerator<R, C> {
    pub fn with_sources(random: R, clock: C) -> Self {
        Self { random, clock }
    }

    /// Generate one reading stamped with the current time
    pub fn generate(&mut self) -> SensorReading {
        let now = self.clock.now();
        self.generate_at(now)
    }

    fn generate_at(&mut self, timestamp: DateTime<Utc>) -> SensorReading {
        let temperature = ranges::TEMPERATURE.sample(self.random.next_f64());
        let irradiance = ranges::IRRADIANCE.sample(self.random.next_f64());
        let output_efficiency = ranges::OUTPUT_EFFICIENCY.sample(self.random.next_f64());
        let vibration = ranges::VIBRATION.sample(self.random.next_f64());

        SensorReading::new(temperature, irradiance, output_efficiency, vibration, timestamp)
    }

    /// Generate `count` readings with timestamps jittered uniformly over the
    /// `window` preceding now, sorted oldest first
    pub fn backfill(&mut self, count: usize, window: Duration) -> Vec<SensorReading> {
        let now = self.clock.now();
        let window_ms = window.as_millis() as f64;

        let mut batch: Vec<SensorReading> = (0..count)
            .map(|_| {
                let reading = self.generate_at(now);
                let offset_ms = (self.random.next_f64() * window_ms) as i64;
                reading.with_timestamp(now - chrono::Duration::milliseconds(offset_ms))
            })
            .collect();

        batch.sort_by_key(|r| r.timestamp());
        debug!("Backfilled {} readings over {:?}", batch.len(), window);
        batch
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{classify, Status};
    use crate::source::{ManualClock, SequenceRandom};
    use proptest::prelude::*;

    #[test]
    fn test_generate_maps_draws_in_order() {
        let clock = ManualClock::new(Utc::now());
        let mut generator =
            ReadingGenerator::with_sources(SequenceRandom::new(vec![0.5]), clock.clone());

        let reading = generator.generate();
        assert_eq!(reading.temperature(), 55.0);
        assert_eq!(reading.irradiance(), 650.0);
        assert_eq!(reading.output_efficiency(), 79.0);
        assert_eq!(reading.status(), Status::Warning);
        assert_eq!(reading.timestamp(), clock.now());
    }

    #[test]
    fn test_generate_lowest_draws_is_critical() {
        let mut generator =
            ReadingGenerator::with_sources(SequenceRandom::new(vec![0.0]), SystemClock);
        let reading = generator.generate();
        assert_eq!(reading.temperature(), 25.0);
        assert_eq!(reading.irradiance(), 200.0);
        assert_eq!(reading.output_efficiency(), 60.0);
        assert_eq!(reading.vibration(), 0.1);
        // Efficiency 60% is below the critical floor
        assert_eq!(reading.status(), Status::Critical);
    }

    #[test]
    fn test_backfill_sorted_within_window() {
        let now = Utc::now();
        let clock = ManualClock::new(now);
        let mut generator = ReadingGenerator::with_sources(ThreadRandom::seeded(3), clock);

        let batch = generator.backfill(20, Duration::from_millis(60_000));
        assert_eq!(batch.len(), 20);
        for pair in batch.windows(2) {
            assert!(pair[0].timestamp() <= pair[1].timestamp());
        }
        for reading in &batch {
            assert!(reading.timestamp() <= now);
            assert!(reading.timestamp() > now - chrono::Duration::milliseconds(60_000));
        }
    }

    #[test]
    fn test_backfill_empty() {
        let mut generator = ReadingGenerator::new();
        assert!(generator.backfill(0, Duration::from_secs(60)).is_empty());
    }

    proptest! {
        #[test]
        fn prop_generated_readings_in_range(seed in any::<u64>()) {
            let mut generator = ReadingGenerator::with_sources(ThreadRandom::seeded(seed), SystemClock);
            for _ in 0..32 {
                let r = generator.generate();
                prop_assert!(ranges::TEMPERATURE.contains(r.temperature()));
                prop_assert!(ranges::IRRADIANCE.contains(r.irradiance()));
                prop_assert_eq!(r.irradiance().fract(), 0.0);
                prop_assert!(ranges::OUTPUT_EFFICIENCY.contains(r.output_efficiency()));
                prop_assert!(ranges::VIBRATION.contains(r.vibration()));
            }
        }

        #[test]
        fn prop_status_reproducible_from_fields(seed in any::<u64>()) {
            let mut generator = ReadingGenerator::with_sources(ThreadRandom::seeded(seed), SystemClock);
            for _ in 0..32 {
                let r = generator.generate();
                prop_assert_eq!(
                    r.status(),
                    classify(r.temperature(), r.output_efficiency(), r.vibration())
                );
            }
        }
    }
}
