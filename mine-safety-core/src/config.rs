//! Site configuration types
//!
//! This module defines the tunables the library needs: hit-test tolerance,
//! canvas size, alert retention and the simulated feed. Loading them from a
//! file is the application's job.

use crate::types::{Result, SafetyError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default hit-test radius in canvas units
pub const DEFAULT_HIT_TOLERANCE: f64 = 12.0;

/// Default canvas size (width, height)
pub const DEFAULT_CANVAS: (f64, f64) = (600.0, 400.0);

/// Number of alerts retained by the alert log
pub const DEFAULT_ALERT_CAPACITY: usize = 5;

/// Configuration for the mine site model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Maximum click distance that still selects a marker (inclusive)
    #[serde(default = "default_tolerance")]
    pub hit_tolerance: f64,

    /// Canvas width in logical units
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f64,

    /// Canvas height in logical units
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f64,

    /// How many alerts the log keeps before evicting the oldest
    #[serde(default = "default_alert_capacity")]
    pub alert_capacity: usize,

    /// Simulated feed settings
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Settings for the randomized alert generator and its queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Seconds between generator ticks (default: 5)
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,

    /// Probability that a tick produces an alert (default: 0.01)
    #[serde(default = "default_probability")]
    pub probability: f64,

    /// Optional RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    /// Bounded queue size between producer and alert log (default: 32)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_tolerance() -> f64 {
    DEFAULT_HIT_TOLERANCE
}

fn default_canvas_width() -> f64 {
    DEFAULT_CANVAS.0
}

fn default_canvas_height() -> f64 {
    DEFAULT_CANVAS.1
}

fn default_alert_capacity() -> usize {
    DEFAULT_ALERT_CAPACITY
}

fn default_tick_secs() -> u64 {
    5
}

fn default_probability() -> f64 {
    0.01
}

fn default_queue_capacity() -> usize {
    32
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            canvas_width: DEFAULT_CANVAS.0,
            canvas_height: DEFAULT_CANVAS.1,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            feed: FeedConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
            probability: default_probability(),
            seed: None,
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl FeedConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    /// Check tick length, probability and queue size
    pub fn validate(&self) -> Result<()> {
        if self.tick_secs == 0 {
            return Err(SafetyError::InvalidConfig(
                "feed.tick_secs must be at least 1".to_string(),
            ));
        }
        // Also rejects NaN
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(SafetyError::InvalidConfig(format!(
                "feed.probability must be within [0, 1], got {}",
                self.probability
            )));
        }
        if self.queue_capacity == 0 {
            return Err(SafetyError::InvalidConfig(
                "feed.queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl SiteConfig {
    /// Create a site configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the hit-test tolerance
    pub fn with_hit_tolerance(mut self, tolerance: f64) -> Self {
        self.hit_tolerance = tolerance;
        self
    }

    /// Builder method: set the canvas size
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Builder method: set alert retention
    pub fn with_alert_capacity(mut self, capacity: usize) -> Self {
        self.alert_capacity = capacity;
        self
    }

    /// Builder method: set the generator's per-tick probability
    pub fn with_feed_probability(mut self, probability: f64) -> Self {
        self.feed.probability = probability;
        self
    }

    /// Builder method: seed the generator
    pub fn with_feed_seed(mut self, seed: u64) -> Self {
        self.feed.seed = Some(seed);
        self
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if !self.hit_tolerance.is_finite() || self.hit_tolerance < 0.0 {
            return Err(SafetyError::InvalidConfig(format!(
                "hit_tolerance must be a non-negative number, got {}",
                self.hit_tolerance
            )));
        }
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(SafetyError::InvalidConfig(format!(
                "canvas must have positive size, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.alert_capacity == 0 {
            return Err(SafetyError::InvalidConfig(
                "alert_capacity must be at least 1".to_string(),
            ));
        }
        self.feed.validate()
    }
}
