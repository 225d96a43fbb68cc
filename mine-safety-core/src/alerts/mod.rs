//! Emergency alerts
//!
//! An alert moves through three states, `active → responding → resolved`,
//! and never goes back. The state enum carries the timestamps that belong to
//! it, so an alert cannot have a response time while still active.

use crate::types::{Timestamp, WorkerRef};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod tracker;

pub use tracker::{AlertCounts, AlertLog};

/// Alert identifier, assigned from a per-log counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlertId(pub u64);

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status without timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Responding,
    Resolved,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Active => write!(f, "active"),
            AlertStatus::Responding => write!(f, "responding"),
            AlertStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Lifecycle state with the timestamps recorded on each transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AlertState {
    Active,
    Responding {
        responded_at: Timestamp,
    },
    Resolved {
        responded_at: Timestamp,
        resolved_at: Timestamp,
    },
}

impl AlertState {
    pub fn status(&self) -> AlertStatus {
        match self {
            AlertState::Active => AlertStatus::Active,
            AlertState::Responding { .. } => AlertStatus::Responding,
            AlertState::Resolved { .. } => AlertStatus::Resolved,
        }
    }

    /// `active → responding`; `None` from any other state
    fn respond(self, at: Timestamp) -> Option<AlertState> {
        match self {
            AlertState::Active => Some(AlertState::Responding { responded_at: at }),
            _ => None,
        }
    }

    /// `responding → resolved`; `None` from any other state
    fn resolve(self, at: Timestamp) -> Option<AlertState> {
        match self {
            AlertState::Responding { responded_at } => Some(AlertState::Resolved {
                responded_at,
                resolved_at: at,
            }),
            _ => None,
        }
    }
}

/// Where an alert came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSource {
    /// Explicit SOS from a worker
    Worker,
    /// Ingested from the alert feed
    Feed,
}

/// An emergency alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub worker: WorkerRef,
    pub location: String,
    pub raised_at: Timestamp,
    pub source: AlertSource,
    #[serde(flatten)]
    pub state: AlertState,
}

impl Alert {
    pub fn status(&self) -> AlertStatus {
        self.state.status()
    }

    pub fn responded_at(&self) -> Option<Timestamp> {
        match self.state {
            AlertState::Active => None,
            AlertState::Responding { responded_at } => Some(responded_at),
            AlertState::Resolved { responded_at, .. } => Some(responded_at),
        }
    }

    pub fn resolved_at(&self) -> Option<Timestamp> {
        match self.state {
            AlertState::Resolved { resolved_at, .. } => Some(resolved_at),
            _ => None,
        }
    }
}

/// Outcome of a `respond` or `resolve` call
///
/// Calls in the wrong state are ignored rather than rejected; the outcome
/// says which case applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The alert moved to a new state
    Applied { status: AlertStatus },
    /// The alert exists but was not in the required state
    Unchanged { status: AlertStatus },
    /// No retained alert has this id
    NotFound,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    #[test]
    fn test_state_machine_forward_only() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 15, 9, 45, 0).unwrap();

        let active = AlertState::Active;
        assert!(active.resolve(t1).is_none());

        let responding = active.respond(t1).unwrap();
        assert_eq!(responding.status(), AlertStatus::Responding);
        assert!(responding.respond(t2).is_none());

        let resolved = responding.resolve(t2).unwrap();
        assert_eq!(
            resolved,
            AlertState::Resolved {
                responded_at: t1,
                resolved_at: t2
            }
        );
        assert!(resolved.respond(t2).is_none());
        assert!(resolved.resolve(t2).is_none());
    }

    #[test]
    fn test_alert_serializes_flat_status() {
        let alert = Alert {
            id: AlertId(7),
            worker: WorkerRef::new(5, "Mike Wilson"),
            location: "Tunnel B-7".to_string(),
            raised_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
            source: AlertSource::Worker,
            state: AlertState::Active,
        };

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["id"], 7);
        assert_eq!(json["worker"]["name"], "Mike Wilson");
    }
}
