//! Mine Safety Core Library
//!
//! The in-memory model behind the mine safety console: incident markers on a
//! 2D mine layout, emergency alerts with a three-state lifecycle, a bounded
//! alert feed, and the per-role desks (worker, supervisor, regulator).
//!
//! # Architecture
//!
//! - [`markers`] - fixed incident markers and the click hit-test engine
//! - [`alerts`] - alert state machine and the capped, newest-first alert log
//! - [`feed`] - bounded queue of raise requests plus a random generator
//! - [`site`] - the [`MineSite`] aggregate and the dashboards' data
//!
//! The library does NOT:
//! - Persist anything (the CLI keeps the logged-in role)
//! - Render dashboards
//! - Talk to the network
//!
//! # Example Usage
//!
//! ```
//! use mine_safety_core::{AlertLog, AlertStatus, Notification, WorkerRef};
//!
//! let mut log = AlertLog::new();
//! let mut notifications: Vec<Notification> = Vec::new();
//!
//! let alert = log.raise(WorkerRef::new(1, "W1"), "Tunnel B-7", &mut notifications);
//! log.respond(alert.id, &mut notifications);
//! log.resolve(alert.id, &mut notifications);
//!
//! assert_eq!(log.get(alert.id).unwrap().status(), AlertStatus::Resolved);
//! ```

// Public modules
pub mod alerts;
pub mod config;
pub mod feed;
pub mod markers;
pub mod notify;
pub mod site;
pub mod types;

// Re-export main types for convenience
pub use alerts::{Alert, AlertCounts, AlertId, AlertLog, AlertSource, AlertStatus, Transition};
pub use config::{FeedConfig, SiteConfig, DEFAULT_HIT_TOLERANCE};
pub use feed::{FeedReceiver, FeedSender, RaiseRequest, RandomAlertSource};
pub use markers::{hit_test, DetailsPanel, Marker, MarkerCategory, MarkerMap, MarkerSet};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use site::MineSite;
pub use types::{Position, Result, Role, SafetyError, Severity, Timestamp, WorkerRef};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
