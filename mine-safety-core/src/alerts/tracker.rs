//! Capped, newest-first alert log
//!
//! Holds the most recent alerts (five by default) and applies lifecycle
//! transitions. Raising past capacity evicts the oldest alert.

use super::{Alert, AlertId, AlertSource, AlertState, AlertStatus, Transition};
use crate::config::DEFAULT_ALERT_CAPACITY;
use crate::feed::FeedReceiver;
use crate::notify::{Notification, Notifier};
use crate::types::{Timestamp, WorkerRef};
use chrono::Utc;
use std::collections::VecDeque;

/// Retained alerts, most recent first
#[derive(Debug, Clone)]
pub struct AlertLog {
    /// Front is the newest alert
    alerts: VecDeque<Alert>,
    capacity: usize,
    next_id: u64,
}

impl AlertLog {
    /// Create a log with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ALERT_CAPACITY)
    }

    /// Create a log that retains at most `capacity` alerts (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Raise a new alert now
    pub fn raise(
        &mut self,
        worker: WorkerRef,
        location: impl Into<String>,
        notifier: &mut impl Notifier,
    ) -> Alert {
        self.raise_at(worker, location, AlertSource::Worker, Utc::now(), notifier)
    }

    /// Raise a new `active` alert at a given time
    ///
    /// The alert goes to the front of the log; if that exceeds capacity the
    /// oldest alert is dropped.
    pub fn raise_at(
        &mut self,
        worker: WorkerRef,
        location: impl Into<String>,
        source: AlertSource,
        raised_at: Timestamp,
        notifier: &mut impl Notifier,
    ) -> Alert {
        let alert = Alert {
            id: AlertId(self.next_id),
            worker,
            location: location.into(),
            raised_at,
            source,
            state: AlertState::Active,
        };
        self.next_id += 1;

        self.alerts.push_front(alert.clone());
        while self.alerts.len() > self.capacity {
            if let Some(evicted) = self.alerts.pop_back() {
                log::info!("Alert log full, evicting alert {}", evicted.id);
            }
        }

        log::debug!(
            "Raised alert {} for {} at {}",
            alert.id,
            alert.worker,
            alert.location
        );
        notifier.notify(Notification::error(format!(
            "EMERGENCY ALERT from {} at {}! Supervisor notified.",
            alert.worker.name, alert.location
        )));

        alert
    }

    /// Mark an active alert as being responded to
    pub fn respond(&mut self, id: AlertId, notifier: &mut impl Notifier) -> Transition {
        self.respond_at(id, Utc::now(), notifier)
    }

    /// `active → responding`, stamping `responded_at`; ignored otherwise
    pub fn respond_at(
        &mut self,
        id: AlertId,
        at: Timestamp,
        notifier: &mut impl Notifier,
    ) -> Transition {
        let outcome = self.transition(id, |state| state.respond(at));
        if let (Transition::Applied { .. }, Some(alert)) = (outcome, self.get(id)) {
            notifier.notify(Notification::info(format!(
                "Response team dispatched to {} for alert {}",
                alert.location, id
            )));
        }
        outcome
    }

    /// Mark a responding alert as resolved
    pub fn resolve(&mut self, id: AlertId, notifier: &mut impl Notifier) -> Transition {
        self.resolve_at(id, Utc::now(), notifier)
    }

    /// `responding → resolved`; ignored otherwise
    pub fn resolve_at(
        &mut self,
        id: AlertId,
        at: Timestamp,
        notifier: &mut impl Notifier,
    ) -> Transition {
        let outcome = self.transition(id, |state| state.resolve(at));
        if outcome.is_applied() {
            notifier.notify(Notification::success(format!("Alert {} resolved", id)));
        }
        outcome
    }

    fn transition(
        &mut self,
        id: AlertId,
        step: impl FnOnce(AlertState) -> Option<AlertState>,
    ) -> Transition {
        let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) else {
            log::debug!("Ignoring transition for unknown alert {}", id);
            return Transition::NotFound;
        };

        match step(alert.state) {
            Some(next) => {
                log::debug!("Alert {}: {} -> {}", id, alert.status(), next.status());
                alert.state = next;
                Transition::Applied {
                    status: next.status(),
                }
            }
            None => {
                log::debug!("Ignoring transition for alert {} in state {}", id, alert.status());
                Transition::Unchanged {
                    status: alert.status(),
                }
            }
        }
    }

    /// Raise an alert for every request waiting on the feed
    ///
    /// Requests are applied in arrival order, so the last one ends up
    /// newest. Returns the number of alerts raised.
    pub fn ingest(&mut self, feed: &FeedReceiver, notifier: &mut impl Notifier) -> usize {
        let requests = feed.drain();
        let count = requests.len();

        for request in requests {
            self.raise_at(
                request.worker,
                request.location,
                AlertSource::Feed,
                request.observed_at,
                notifier,
            );
        }

        if count > 0 {
            log::info!("Ingested {} alert(s) from feed", count);
        }
        count
    }

    pub fn get(&self, id: AlertId) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Alerts from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn latest(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Count retained alerts by status
    pub fn counts(&self) -> AlertCounts {
        let mut counts = AlertCounts::default();
        for alert in &self.alerts {
            match alert.status() {
                AlertStatus::Active => counts.active += 1,
                AlertStatus::Responding => counts.responding += 1,
                AlertStatus::Resolved => counts.resolved += 1,
            }
        }
        counts
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of retained alerts in each state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertCounts {
    pub active: usize,
    pub responding: usize,
    pub resolved: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{channel, RaiseRequest};
    use crate::notify::NotificationLevel;
    use chrono::{Duration, TimeZone};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    fn w1() -> WorkerRef {
        WorkerRef::new(1, "W1")
    }

    #[test]
    fn test_raise_respond_resolve_scenario() {
        let mut log = AlertLog::new();
        let mut notes = Vec::new();

        let alert = log.raise_at(w1(), "Tunnel B-7", AlertSource::Worker, t0(), &mut notes);
        assert_eq!(log.len(), 1);
        assert_eq!(log.get(alert.id).unwrap().status(), AlertStatus::Active);
        assert!(log.get(alert.id).unwrap().responded_at().is_none());

        let responded = t0() + Duration::minutes(2);
        let outcome = log.respond_at(alert.id, responded, &mut notes);
        assert_eq!(outcome, Transition::Applied { status: AlertStatus::Responding });
        assert_eq!(log.get(alert.id).unwrap().responded_at(), Some(responded));

        let resolved = t0() + Duration::minutes(20);
        let outcome = log.resolve_at(alert.id, resolved, &mut notes);
        assert_eq!(outcome, Transition::Applied { status: AlertStatus::Resolved });

        let stored = log.get(alert.id).unwrap();
        assert_eq!(stored.status(), AlertStatus::Resolved);
        assert_eq!(stored.responded_at(), Some(responded));
        assert_eq!(stored.resolved_at(), Some(resolved));

        // raise, respond, resolve each notified once
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].level, NotificationLevel::Error);
    }

    #[test]
    fn test_log_is_capped_and_newest_first() {
        let mut log = AlertLog::new();
        let mut notes = Vec::new();

        for i in 0..8 {
            log.raise_at(
                WorkerRef::new(i, format!("W{}", i)),
                "Shaft A-2",
                AlertSource::Worker,
                t0() + Duration::seconds(i as i64),
                &mut notes,
            );
            assert!(log.len() <= 5);
        }

        let ids: Vec<u64> = log.iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![8, 7, 6, 5, 4]);
        assert!(log
            .iter()
            .zip(log.iter().skip(1))
            .all(|(newer, older)| newer.raised_at >= older.raised_at));
        assert!(log.get(AlertId(1)).is_none());
    }

    #[test]
    fn test_respond_twice_keeps_first_timestamp() {
        let mut log = AlertLog::new();
        let mut notes = Vec::new();
        let alert = log.raise_at(w1(), "Tunnel B-7", AlertSource::Worker, t0(), &mut notes);

        let first = t0() + Duration::minutes(1);
        log.respond_at(alert.id, first, &mut notes);
        let outcome = log.respond_at(alert.id, first + Duration::minutes(5), &mut notes);

        assert_eq!(outcome, Transition::Unchanged { status: AlertStatus::Responding });
        assert_eq!(log.get(alert.id).unwrap().responded_at(), Some(first));
        // Ignored calls do not notify
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_resolve_active_is_noop() {
        let mut log = AlertLog::new();
        let mut notes = Vec::new();
        let alert = log.raise_at(w1(), "Tunnel B-7", AlertSource::Worker, t0(), &mut notes);

        let outcome = log.resolve_at(alert.id, t0(), &mut notes);
        assert_eq!(outcome, Transition::Unchanged { status: AlertStatus::Active });
        assert_eq!(log.get(alert.id).unwrap().status(), AlertStatus::Active);
    }

    #[test]
    fn test_respond_resolved_is_noop() {
        let mut log = AlertLog::new();
        let mut notes = Vec::new();
        let alert = log.raise_at(w1(), "Tunnel B-7", AlertSource::Worker, t0(), &mut notes);
        log.respond_at(alert.id, t0(), &mut notes);
        log.resolve_at(alert.id, t0(), &mut notes);

        let outcome = log.respond_at(alert.id, t0(), &mut notes);
        assert_eq!(outcome, Transition::Unchanged { status: AlertStatus::Resolved });
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut log = AlertLog::new();
        let mut notes = Vec::new();
        assert_eq!(log.respond(AlertId(42), &mut notes), Transition::NotFound);
        assert_eq!(log.resolve(AlertId(42), &mut notes), Transition::NotFound);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_ingest_from_feed() {
        let (tx, rx) = channel(8);
        for (i, location) in ["Tunnel A-5", "Shaft B-2"].iter().enumerate() {
            tx.publish(RaiseRequest {
                worker: WorkerRef::new(i as u32, "feed"),
                location: location.to_string(),
                observed_at: t0(),
            })
            .unwrap();
        }

        let mut log = AlertLog::new();
        let mut notes = Vec::new();
        assert_eq!(log.ingest(&rx, &mut notes), 2);
        assert_eq!(log.ingest(&rx, &mut notes), 0);

        let latest = log.latest().unwrap();
        assert_eq!(latest.location, "Shaft B-2");
        assert_eq!(latest.source, AlertSource::Feed);
    }

    #[test]
    fn test_counts() {
        let mut log = AlertLog::new();
        let mut notes = Vec::new();
        let a = log.raise_at(w1(), "A", AlertSource::Worker, t0(), &mut notes);
        let b = log.raise_at(w1(), "B", AlertSource::Worker, t0(), &mut notes);
        log.raise_at(w1(), "C", AlertSource::Worker, t0(), &mut notes);
        log.respond_at(a.id, t0(), &mut notes);
        log.respond_at(b.id, t0(), &mut notes);
        log.resolve_at(b.id, t0(), &mut notes);

        let counts = log.counts();
        assert_eq!(counts, AlertCounts { active: 1, responding: 1, resolved: 1 });
    }
}
