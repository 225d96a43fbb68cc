//! The mine site model behind the three dashboards
//!
//! [`MineSite`] owns the marker map, the alert log and the per-role desks,
//! and keeps them consistent: raising an alert flags the worker on the
//! supervisor's roster, resolving their last open alert clears the flag.

use crate::alerts::{Alert, AlertId, AlertLog, AlertSource, AlertStatus, Transition};
use crate::config::SiteConfig;
use crate::feed::FeedReceiver;
use crate::markers::{DetailsPanel, MarkerMap, MarkerSet};
use crate::notify::Notifier;
use crate::types::{require_text, Position, Result, Timestamp, WorkerRef};
use chrono::{NaiveDate, TimeZone, Utc};

pub mod leave;
pub mod regulator;
pub mod supervisor;
pub mod worker;

pub use leave::{LeaveBook, LeaveRequest, LeaveStatus};
pub use regulator::RegulatorDesk;
pub use supervisor::SupervisorDesk;
pub use worker::WorkerDesk;

/// In-memory state for one mine site session
#[derive(Debug, Clone)]
pub struct MineSite {
    pub config: SiteConfig,
    pub map: MarkerMap,
    pub alerts: AlertLog,
    pub worker: WorkerDesk,
    pub supervisor: SupervisorDesk,
    pub regulator: RegulatorDesk,
    pub leave: LeaveBook,
}

impl MineSite {
    /// Site with the built-in marker layout and sample data
    pub fn seeded(config: SiteConfig) -> Result<Self> {
        Self::with_markers(config, MarkerSet::default_site())
    }

    /// Site with a custom marker set
    pub fn with_markers(config: SiteConfig, markers: MarkerSet) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            map: MarkerMap::new(markers, config.hit_tolerance),
            alerts: AlertLog::with_capacity(config.alert_capacity),
            worker: WorkerDesk::seeded(WorkerRef::new(1, "John Smith")),
            supervisor: SupervisorDesk::seeded(),
            regulator: RegulatorDesk::seeded(),
            leave: LeaveBook::new(),
            config,
        })
    }

    /// Hit-test a click on the mine map and refresh the details view
    pub fn click(&mut self, point: Position) -> &DetailsPanel {
        self.map.click(point)
    }

    /// Emergency SOS from the logged-in worker
    pub fn raise_sos(&mut self, location: &str, notifier: &mut impl Notifier) -> Result<Alert> {
        let worker = self.worker.worker.clone();
        self.raise_for(worker, location, notifier)
    }

    /// Raise an alert on behalf of any worker
    pub fn raise_for(
        &mut self,
        worker: WorkerRef,
        location: &str,
        notifier: &mut impl Notifier,
    ) -> Result<Alert> {
        let location = require_text("location", location)?;
        let alert = self.alerts.raise(worker, location, notifier);
        self.supervisor.flag_emergency(alert.worker.id, &alert.location);
        Ok(alert)
    }

    pub fn respond(&mut self, id: AlertId, notifier: &mut impl Notifier) -> Transition {
        self.alerts.respond(id, notifier)
    }

    /// Resolve an alert, clearing the worker's emergency flag once none of
    /// their retained alerts is still open
    pub fn resolve(&mut self, id: AlertId, notifier: &mut impl Notifier) -> Transition {
        let outcome = self.alerts.resolve(id, notifier);

        if outcome.is_applied() {
            if let Some(worker_id) = self.alerts.get(id).map(|a| a.worker.id) {
                let still_open = self
                    .alerts
                    .iter()
                    .any(|a| a.worker.id == worker_id && a.status() != AlertStatus::Resolved);
                if !still_open {
                    self.supervisor.clear_emergency(worker_id);
                }
            }
        }

        outcome
    }

    /// Pull pending feed requests into the alert log
    pub fn ingest(&mut self, feed: &FeedReceiver, notifier: &mut impl Notifier) -> usize {
        let count = self.alerts.ingest(feed, notifier);

        // The log is newest-first; flag oldest-first so the latest location wins
        let raised: Vec<(u32, String)> = self
            .alerts
            .iter()
            .take(count)
            .filter(|a| a.source == AlertSource::Feed)
            .map(|a| (a.worker.id, a.location.clone()))
            .collect();
        for (worker_id, location) in raised.into_iter().rev() {
            self.supervisor.flag_emergency(worker_id, &location);
        }

        count
    }

    /// File a leave request for the logged-in worker
    pub fn request_leave(
        &mut self,
        from: NaiveDate,
        to: NaiveDate,
        reason: &str,
    ) -> Result<&LeaveRequest> {
        let worker = self.worker.worker.clone();
        self.leave.request(worker, from, to, reason, Utc::now())
    }

    /// Supervisor approval of a pending leave request
    pub fn approve_leave(&mut self, id: u32) -> Result<LeaveStatus> {
        self.leave.approve(id)
    }

    pub fn reject_leave(&mut self, id: u32) -> Result<LeaveStatus> {
        self.leave.reject(id)
    }
}

/// Fixed timestamp for seed data
pub(crate) fn seed_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Fixed date for seed data
pub(crate) fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::supervisor::CrewStatus;

    #[test]
    fn test_sos_flags_and_resolve_clears() {
        let mut site = MineSite::seeded(SiteConfig::default()).unwrap();
        let mut notes = Vec::new();

        let alert = site.raise_sos("Tunnel C-1", &mut notes).unwrap();
        let john = &site.supervisor.crew[0];
        assert_eq!(john.status, CrewStatus::Emergency);
        assert_eq!(john.location, "Tunnel C-1");

        // Resolving an alert that is still active does nothing
        assert!(!site.resolve(alert.id, &mut notes).is_applied());
        assert_eq!(site.supervisor.crew[0].status, CrewStatus::Emergency);

        assert!(site.respond(alert.id, &mut notes).is_applied());
        assert!(site.resolve(alert.id, &mut notes).is_applied());
        assert_eq!(site.supervisor.crew[0].status, CrewStatus::Active);
    }

    #[test]
    fn test_flag_stays_while_another_alert_open() {
        let mut site = MineSite::seeded(SiteConfig::default()).unwrap();
        let mut notes = Vec::new();

        let first = site.raise_sos("Tunnel C-1", &mut notes).unwrap();
        site.raise_sos("Tunnel A-5", &mut notes).unwrap();
        site.respond(first.id, &mut notes);
        site.resolve(first.id, &mut notes);

        assert_eq!(site.supervisor.crew[0].status, CrewStatus::Emergency);
    }

    #[test]
    fn test_blank_sos_location_rejected() {
        let mut site = MineSite::seeded(SiteConfig::default()).unwrap();
        let mut notes = Vec::new();
        assert!(site.raise_sos("  ", &mut notes).is_err());
        assert!(site.alerts.is_empty());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SiteConfig::default().with_alert_capacity(0);
        assert!(MineSite::seeded(config).is_err());
    }

    #[test]
    fn test_click_uses_configured_tolerance() {
        let mut site = MineSite::seeded(SiteConfig::default().with_hit_tolerance(2.0)).unwrap();
        // Marker 1 sits at (120, 80); 5 units away misses with tolerance 2
        assert!(site.click(Position::new(125.0, 80.0)).selected().is_none());
        assert!(site.click(Position::new(121.0, 80.0)).selected().is_some());
    }

    #[test]
    fn test_leave_review() {
        let mut site = MineSite::seeded(SiteConfig::default()).unwrap();
        let from = seed_date(2024, 2, 1);
        let id = site.request_leave(from, seed_date(2024, 2, 2), "Medical").unwrap().id;

        assert_eq!(site.approve_leave(id).unwrap(), LeaveStatus::Approved);
        // Already decided
        assert_eq!(site.reject_leave(id).unwrap(), LeaveStatus::Approved);
        assert!(site.approve_leave(99).is_err());
    }

    #[test]
    fn test_ingest_keeps_latest_location_on_roster() {
        let mut site = MineSite::seeded(SiteConfig::default()).unwrap();
        let (tx, rx) = crate::feed::channel(8);
        let maria = WorkerRef::new(2, "Maria Garcia");
        for location in ["Tunnel A-5", "Shaft B-2"] {
            tx.publish(crate::feed::RaiseRequest {
                worker: maria.clone(),
                location: location.to_string(),
                observed_at: Utc::now(),
            })
            .unwrap();
        }

        let mut notes = Vec::new();
        assert_eq!(site.ingest(&rx, &mut notes), 2);

        assert_eq!(site.alerts.latest().unwrap().location, "Shaft B-2");
        let row = &site.supervisor.crew[1];
        assert_eq!(row.status, CrewStatus::Emergency);
        assert_eq!(row.location, "Shaft B-2");
    }

    #[test]
    fn test_seeded_roster_has_no_unbacked_emergency() {
        let mut site = MineSite::seeded(SiteConfig::default()).unwrap();
        assert!(site.alerts.is_empty());
        assert!(site.supervisor.crew.iter().all(|m| m.status != CrewStatus::Emergency));

        let mut notes = Vec::new();
        let mike = WorkerRef::new(5, "Mike Wilson");
        let alert = site.raise_for(mike, "Tunnel B-7", &mut notes).unwrap();
        assert_eq!(site.supervisor.crew[4].status, CrewStatus::Emergency);

        site.respond(alert.id, &mut notes);
        site.resolve(alert.id, &mut notes);
        assert_eq!(site.supervisor.crew[4].status, CrewStatus::Active);
    }
}
