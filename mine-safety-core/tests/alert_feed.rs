//! End-to-end checks through the public API: generator → feed → site

use chrono::Utc;
use mine_safety_core::feed;
use mine_safety_core::site::supervisor::CrewStatus;
use mine_safety_core::{
    AlertSource, AlertStatus, FeedConfig, MineSite, Notification, Position, RandomAlertSource,
    SiteConfig, Transition, WorkerRef,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn generator_alerts_flow_into_site() {
    init_logging();

    let config = SiteConfig::default().with_feed_probability(1.0).with_feed_seed(11);
    let mut site = MineSite::seeded(config.clone()).unwrap();
    let (tx, rx) = feed::channel(config.feed.queue_capacity);
    let mut source = RandomAlertSource::new(&config.feed).unwrap();
    let mut notes: Vec<Notification> = Vec::new();

    let report = source.run_ticks(3, Utc::now(), &tx).unwrap();
    assert_eq!(report.published, 3);

    assert_eq!(site.ingest(&rx, &mut notes), 3);
    assert_eq!(site.alerts.len(), 3);
    assert!(site.alerts.iter().all(|a| a.source == AlertSource::Feed));
    assert!(site.alerts.iter().all(|a| a.status() == AlertStatus::Active));
    assert_eq!(notes.len(), 3);

    // Every worker named in an alert is flagged on the roster
    for alert in site.alerts.iter() {
        let member = site
            .supervisor
            .crew
            .iter()
            .find(|m| m.id == alert.worker.id)
            .unwrap();
        assert_eq!(member.status, CrewStatus::Emergency);
    }
}

#[test]
fn feed_overflow_keeps_log_capped() {
    init_logging();

    let feed_config = FeedConfig {
        probability: 1.0,
        seed: Some(5),
        ..FeedConfig::default()
    };
    let mut site = MineSite::seeded(SiteConfig::default()).unwrap();
    let (tx, rx) = feed::channel(4);
    let mut source = RandomAlertSource::new(&feed_config).unwrap();
    let mut notes: Vec<Notification> = Vec::new();

    let report = source.run_ticks(10, Utc::now(), &tx).unwrap();
    assert_eq!(report.published, 4);
    assert_eq!(report.dropped, 6);

    site.ingest(&rx, &mut notes);
    source.run_ticks(4, Utc::now(), &tx).unwrap();
    site.ingest(&rx, &mut notes);

    assert_eq!(site.alerts.len(), 5);
    let ids: Vec<u64> = site.alerts.iter().map(|a| a.id.0).collect();
    assert_eq!(ids, vec![8, 7, 6, 5, 4]);
}

#[test]
fn worker_sos_lifecycle_scenario() {
    init_logging();

    let mut site = MineSite::seeded(SiteConfig::default()).unwrap();
    let mut notes: Vec<Notification> = Vec::new();

    let alert = site
        .raise_for(WorkerRef::new(5, "W1"), "Tunnel B-7", &mut notes)
        .unwrap();
    assert_eq!(site.alerts.len(), 1);
    assert_eq!(alert.status(), AlertStatus::Active);

    assert_eq!(
        site.respond(alert.id, &mut notes),
        Transition::Applied { status: AlertStatus::Responding }
    );
    let responded_at = site.alerts.get(alert.id).unwrap().responded_at();
    assert!(responded_at.is_some());

    // Second respond is ignored and keeps the original timestamp
    assert_eq!(
        site.respond(alert.id, &mut notes),
        Transition::Unchanged { status: AlertStatus::Responding }
    );
    assert_eq!(site.alerts.get(alert.id).unwrap().responded_at(), responded_at);

    assert!(site.resolve(alert.id, &mut notes).is_applied());
    assert_eq!(site.alerts.get(alert.id).unwrap().status(), AlertStatus::Resolved);
}

#[test]
fn map_click_refreshes_details() {
    let mut site = MineSite::seeded(SiteConfig::default()).unwrap();

    // Exactly 12 units from marker 3 at (450, 260)
    let panel = site.click(Position::new(462.0, 260.0));
    assert_eq!(panel.selected().map(|m| m.id), Some(3));

    let panel = site.click(Position::new(463.0, 260.0));
    assert!(panel.selected().is_none());
}
