//! Core types shared across the mine safety library
//!
//! Positions, severities, roles and the library error type live here so the
//! marker, alert and site modules can agree on them without depending on
//! each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, SafetyError>;

/// Errors that can occur in the mine safety library
#[derive(Debug, thiserror::Error)]
pub enum SafetyError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid marker: {0}")]
    InvalidMarker(String),

    #[error("Task not found: {0}")]
    TaskNotFound(u32),

    #[error("Worker not found: {0}")]
    WorkerNotFound(u32),

    #[error("Leave request not found: {0}")]
    LeaveNotFound(u32),

    #[error("Compliance report not found: {0}")]
    ReportNotFound(u32),

    #[error("Compliance report {0} is not ready for export")]
    ReportNotReady(u32),

    #[error("Unknown role: {0}")]
    InvalidRole(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Alert feed is full (capacity {0})")]
    FeedFull(usize),

    #[error("Alert feed consumer has gone away")]
    FeedClosed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A point on the mine layout canvas, in logical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Three-level severity used by markers and incidents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Dashboard role chosen at login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Worker,
    Supervisor,
    /// Mine safety regulator (DGMS)
    Regulator,
}

impl Role {
    /// Title shown at the top of the role's dashboard
    pub fn dashboard_title(&self) -> &'static str {
        match self {
            Role::Worker => "Worker Dashboard",
            Role::Supervisor => "Supervisor Control Center",
            Role::Regulator => "DGMS Analytics Hub",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Worker => write!(f, "worker"),
            Role::Supervisor => write!(f, "supervisor"),
            Role::Regulator => write!(f, "regulator"),
        }
    }
}

impl FromStr for Role {
    type Err = SafetyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "worker" => Ok(Role::Worker),
            "supervisor" => Ok(Role::Supervisor),
            "regulator" | "dgms" => Ok(Role::Regulator),
            other => Err(SafetyError::InvalidRole(other.to_string())),
        }
    }
}

/// Identifier and display name of a worker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerRef {
    pub id: u32,
    pub name: String,
}

impl WorkerRef {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for WorkerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// Reject blank free-text input, returning the trimmed value
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SafetyError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("worker".parse::<Role>().unwrap(), Role::Worker);
        assert_eq!(" Supervisor\n".parse::<Role>().unwrap(), Role::Supervisor);
        assert_eq!("dgms".parse::<Role>().unwrap(), Role::Regulator);
        assert_eq!("regulator".parse::<Role>().unwrap(), Role::Regulator);
        assert!(matches!("admin".parse::<Role>(), Err(SafetyError::InvalidRole(_))));
    }

    #[test]
    fn test_role_display_round_trip() {
        for role in [Role::Worker, Role::Supervisor, Role::Regulator] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("location", "  Shaft A-2 ").unwrap(), "Shaft A-2");
        assert!(matches!(require_text("location", "   "), Err(SafetyError::Validation(_))));
    }
}
