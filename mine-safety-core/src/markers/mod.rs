//! Incident markers on the mine layout
//!
//! Markers are fixed points of interest (hazards, emergencies, maintenance
//! jobs) placed on a 2D canvas. They are created once and never mutated.
//! This module contains the marker types, the validated marker set, the
//! hit-test engine and the details panel driven by map clicks.

use crate::types::{Position, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod map;
pub mod set;

// Re-export key types for convenience
pub use hit_test::hit_test;
pub use map::{DetailsPanel, MarkerMap};
pub use set::{MarkerSet, MarkerStats};

/// What kind of incident a marker represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerCategory {
    Hazard,
    Emergency,
    Maintenance,
    Completed,
}

impl fmt::Display for MarkerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerCategory::Hazard => write!(f, "hazard"),
            MarkerCategory::Emergency => write!(f, "emergency"),
            MarkerCategory::Maintenance => write!(f, "maintenance"),
            MarkerCategory::Completed => write!(f, "completed"),
        }
    }
}

/// A single incident marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique marker identifier
    pub id: u32,
    /// Location on the canvas
    pub position: Position,
    /// Incident kind (fixed at creation)
    pub category: MarkerCategory,
    pub severity: Severity,
    /// Short human-readable description
    pub label: String,
    /// Longer record shown in the details panel (area, mineral, notes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Marker {
    pub fn new(
        id: u32,
        position: Position,
        category: MarkerCategory,
        severity: Severity,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            position,
            category,
            severity,
            label: label.into(),
            details: None,
        }
    }

    /// Builder method: attach a details record
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
