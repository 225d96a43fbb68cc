//! Validated, immutable collection of markers
//!
//! Keeps the caller's ordering, since hit-testing resolves overlaps by
//! position in the list.

use super::{Marker, MarkerCategory};
use crate::config::SiteConfig;
use crate::types::{Position, Result, SafetyError, Severity};
use std::collections::HashSet;

/// The fixed set of markers shown on the mine layout
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    /// Build a marker set, checking ids are unique and positions fit the canvas
    pub fn new(markers: Vec<Marker>, config: &SiteConfig) -> Result<Self> {
        let mut seen = HashSet::new();

        for marker in &markers {
            if !seen.insert(marker.id) {
                return Err(SafetyError::InvalidMarker(format!(
                    "duplicate marker id {}",
                    marker.id
                )));
            }

            let Position { x, y } = marker.position;
            let inside = marker.position.is_finite()
                && (0.0..=config.canvas_width).contains(&x)
                && (0.0..=config.canvas_height).contains(&y);
            if !inside {
                return Err(SafetyError::InvalidMarker(format!(
                    "marker {} at {} is outside the {}x{} canvas",
                    marker.id, marker.position, config.canvas_width, config.canvas_height
                )));
            }
        }

        log::debug!("Marker set created with {} markers", markers.len());
        Ok(Self { markers })
    }

    /// The built-in site layout
    pub fn default_site() -> Self {
        let markers = vec![
            Marker::new(
                1,
                Position::new(120.0, 80.0),
                MarkerCategory::Hazard,
                Severity::High,
                "Loose rocks, Tunnel B-7 Section 3",
            )
            .with_details("Jharia Coalfield. Mineral: coal. Largest coalfield in Jharkhand, rich in coking coal for the steel industry."),
            Marker::new(
                2,
                Position::new(300.0, 150.0),
                MarkerCategory::Emergency,
                Severity::High,
                "Gas leak detected, Shaft A-2",
            )
            .with_details("Dhanbad. Mineral: coal. Numerous collieries under BCCL operations."),
            Marker::new(
                3,
                Position::new(450.0, 260.0),
                MarkerCategory::Maintenance,
                Severity::Medium,
                "Ventilation fan service, Tunnel C-1",
            )
            .with_details("East Bokaro Coalfield. Mineral: coal. Holds both coking and non-coking reserves."),
            Marker::new(
                4,
                Position::new(200.0, 320.0),
                MarkerCategory::Completed,
                Severity::Low,
                "Daily safety check, Tunnel A-5",
            )
            .with_details("Rajrappa Area. Mineral: coal. CCL area in Ramgarh district producing non-coking coal."),
            Marker::new(
                5,
                Position::new(520.0, 90.0),
                MarkerCategory::Hazard,
                Severity::Medium,
                "Water seepage, Shaft B-2",
            )
            .with_details("Giridih Coalfield. Mineral: coal. Oldest mining region in Jharkhand with prime coking seams."),
            Marker::new(
                6,
                Position::new(80.0, 250.0),
                MarkerCategory::Maintenance,
                Severity::Low,
                "Conveyor belt inspection, Surface",
            )
            .with_details("Kathara Area. Mineral: coal. Major CCL production region in Bokaro."),
        ];

        Self { markers }
    }

    /// Markers in hit-test order
    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Count markers per category
    pub fn stats(&self) -> MarkerStats {
        let mut stats = MarkerStats::default();
        for marker in &self.markers {
            match marker.category {
                MarkerCategory::Hazard => stats.hazards += 1,
                MarkerCategory::Emergency => stats.emergencies += 1,
                MarkerCategory::Maintenance => stats.maintenance += 1,
                MarkerCategory::Completed => stats.completed += 1,
            }
        }
        stats
    }
}

/// Marker counts by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerStats {
    pub hazards: usize,
    pub emergencies: usize,
    pub maintenance: usize,
    pub completed: usize,
}

impl MarkerStats {
    pub fn total(&self) -> usize {
        self.hazards + self.emergencies + self.maintenance + self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_at(id: u32, x: f64, y: f64) -> Marker {
        Marker::new(id, Position::new(x, y), MarkerCategory::Hazard, Severity::Low, "test")
    }

    #[test]
    fn test_default_site_is_valid() {
        let site = MarkerSet::default_site();
        let rebuilt = MarkerSet::new(site.as_slice().to_vec(), &SiteConfig::default()).unwrap();
        assert_eq!(rebuilt.len(), 6);

        let stats = rebuilt.stats();
        assert_eq!(stats.hazards, 2);
        assert_eq!(stats.emergencies, 1);
        assert_eq!(stats.total(), 6);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let markers = vec![marker_at(1, 10.0, 10.0), marker_at(1, 20.0, 20.0)];
        let result = MarkerSet::new(markers, &SiteConfig::default());
        assert!(matches!(result, Err(SafetyError::InvalidMarker(_))));
    }

    #[test]
    fn test_out_of_canvas_rejected() {
        let config = SiteConfig::default();
        assert!(MarkerSet::new(vec![marker_at(1, 601.0, 10.0)], &config).is_err());
        assert!(MarkerSet::new(vec![marker_at(1, 10.0, -1.0)], &config).is_err());
        // Canvas edges are part of the canvas
        assert!(MarkerSet::new(vec![marker_at(1, 600.0, 400.0)], &config).is_ok());
    }

    #[test]
    fn test_lookup_by_id() {
        let site = MarkerSet::default_site();
        assert_eq!(site.get(2).map(|m| m.category), Some(MarkerCategory::Emergency));
        assert!(site.get(99).is_none());
    }

    #[test]
    fn test_default_site_carries_area_details() {
        let site = MarkerSet::default_site();
        assert!(site.iter().all(|m| m.details.is_some()));
        let jharia = site.get(1).and_then(|m| m.details.as_deref()).unwrap();
        assert!(jharia.starts_with("Jharia Coalfield"));
        assert!(marker_at(9, 1.0, 1.0).details.is_none());
    }
}
