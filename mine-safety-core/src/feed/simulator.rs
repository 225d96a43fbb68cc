//! Randomized alert generator
//!
//! Stands in for real device ingestion. Every tick draws a uniform value and,
//! with the configured probability, publishes a raise request for a randomly
//! chosen worker and location.

use super::{FeedSender, RaiseRequest};
use crate::config::FeedConfig;
use crate::types::{Result, SafetyError, Timestamp, WorkerRef};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use std::time::Duration;

/// Summary of one `advance` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Whole ticks elapsed
    pub ticks: u64,
    /// Requests accepted by the feed
    pub published: usize,
    /// Requests lost because the feed was full
    pub dropped: usize,
}

/// Timer-driven random producer for the alert feed
#[derive(Debug, Clone)]
pub struct RandomAlertSource {
    rng: SmallRng,
    probability: f64,
    tick_interval: Duration,
    /// Time accumulated toward the next tick
    carry: Duration,
    workers: Vec<WorkerRef>,
    locations: Vec<String>,
    total_ticks: u64,
}

impl RandomAlertSource {
    /// Create a generator using the default crew and locations
    ///
    /// Fails on a zero tick interval or a probability outside [0, 1].
    pub fn new(config: &FeedConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Ok(Self {
            rng,
            probability: config.probability,
            tick_interval: config.tick_interval(),
            carry: Duration::ZERO,
            workers: default_workers(),
            locations: default_locations(),
            total_ticks: 0,
        })
    }

    /// Replace the pool of workers and locations alerts are drawn from
    pub fn with_roster(mut self, workers: Vec<WorkerRef>, locations: Vec<String>) -> Result<Self> {
        if workers.is_empty() || locations.is_empty() {
            return Err(SafetyError::InvalidConfig(
                "alert generator needs at least one worker and one location".to_string(),
            ));
        }
        self.workers = workers;
        self.locations = locations;
        Ok(self)
    }

    /// Run a single tick; returns a request when the draw succeeds
    pub fn tick(&mut self, now: Timestamp) -> Option<RaiseRequest> {
        self.total_ticks += 1;

        // gen::<f64>() is in [0, 1), so probability 0 never fires and 1 always does
        if self.rng.gen::<f64>() >= self.probability {
            return None;
        }

        let worker = self.workers.choose(&mut self.rng)?.clone();
        let location = self.locations.choose(&mut self.rng)?.clone();

        log::debug!(
            "Generator tick {} produced alert for {} at {}",
            self.total_ticks,
            worker,
            location
        );

        Some(RaiseRequest {
            worker,
            location,
            observed_at: now,
        })
    }

    /// Let `elapsed` time pass, running every whole tick it covers
    ///
    /// Partial intervals carry over to the next call. A full feed drops the
    /// request and keeps going; a closed feed is an error.
    pub fn advance(
        &mut self,
        elapsed: Duration,
        now: Timestamp,
        feed: &FeedSender,
    ) -> Result<AdvanceReport> {
        let mut report = AdvanceReport::default();
        self.carry += elapsed;

        while self.carry >= self.tick_interval {
            self.carry -= self.tick_interval;
            report.ticks += 1;

            if let Some(request) = self.tick(now) {
                match feed.publish(request) {
                    Ok(()) => report.published += 1,
                    Err(SafetyError::FeedFull(_)) => report.dropped += 1,
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(report)
    }

    /// Run exactly `ticks` ticks
    pub fn run_ticks(&mut self, ticks: u32, now: Timestamp, feed: &FeedSender) -> Result<AdvanceReport> {
        self.advance(self.tick_interval * ticks, now, feed)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

fn default_workers() -> Vec<WorkerRef> {
    vec![
        WorkerRef::new(1, "John Smith"),
        WorkerRef::new(2, "Maria Garcia"),
        WorkerRef::new(3, "David Chen"),
        WorkerRef::new(4, "Sarah Johnson"),
        WorkerRef::new(5, "Mike Wilson"),
    ]
}

fn default_locations() -> Vec<String> {
    ["Tunnel A-5", "Shaft B-2", "Tunnel C-1", "Tunnel B-7", "Shaft A-2"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
