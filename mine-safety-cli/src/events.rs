//! Alert feed driver
//!
//! Owns the producer side of the feed (the random generator) and pumps its
//! output into the site's alert log one tick at a time.

use anyhow::{Context, Result};
use chrono::Utc;
use mine_safety_core::feed::{self, FeedReceiver, FeedSender};
use mine_safety_core::{FeedConfig, MineSite, Notifier, RandomAlertSource};
use std::thread;

/// Totals for a run of ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub ticks: u64,
    pub raised: usize,
    pub dropped: usize,
}

/// Generator plus both ends of its feed
pub struct FeedPump {
    source: RandomAlertSource,
    sender: FeedSender,
    receiver: FeedReceiver,
}

impl FeedPump {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let source = RandomAlertSource::new(config).context("Invalid [feed] settings")?;
        let (sender, receiver) = feed::channel(config.queue_capacity);
        Ok(Self {
            source,
            sender,
            receiver,
        })
    }

    /// Run `ticks` generator ticks, ingesting after each one
    ///
    /// With `realtime` set, sleeps one tick interval before every tick.
    pub fn run(
        &mut self,
        site: &mut MineSite,
        ticks: u32,
        realtime: bool,
        notifier: &mut impl Notifier,
    ) -> Result<FeedSummary> {
        let mut summary = FeedSummary::default();

        for _ in 0..ticks {
            if realtime {
                thread::sleep(self.source.tick_interval());
            }

            let report = self
                .source
                .run_ticks(1, Utc::now(), &self.sender)
                .context("Alert feed stopped")?;
            summary.ticks += report.ticks;
            summary.dropped += report.dropped;
            summary.raised += site.ingest(&self.receiver, notifier);
        }

        log::debug!(
            "Feed run finished: {} ticks, {} raised, {} dropped",
            summary.ticks,
            summary.raised,
            summary.dropped
        );
        Ok(summary)
    }

    pub fn total_ticks(&self) -> u64 {
        self.source.total_ticks()
    }
}
