//! Clickable mine map
//!
//! Couples the marker set with a details panel: every click runs the
//! hit-test and refreshes the panel with the selected marker, or with the
//! placeholder when nothing was hit.

use super::{hit_test, Marker, MarkerSet};
use crate::types::Position;

/// What the details view currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailsPanel {
    /// No marker selected
    #[default]
    Placeholder,
    /// Full record of the selected marker
    Selected(Marker),
}

impl DetailsPanel {
    pub fn selected(&self) -> Option<&Marker> {
        match self {
            DetailsPanel::Selected(marker) => Some(marker),
            DetailsPanel::Placeholder => None,
        }
    }
}

/// Marker set plus the details view it drives
#[derive(Debug, Clone)]
pub struct MarkerMap {
    markers: MarkerSet,
    tolerance: f64,
    details: DetailsPanel,
}

impl MarkerMap {
    pub fn new(markers: MarkerSet, tolerance: f64) -> Self {
        Self {
            markers,
            tolerance,
            details: DetailsPanel::Placeholder,
        }
    }

    /// Handle a pointer click and refresh the details view
    pub fn click(&mut self, point: Position) -> &DetailsPanel {
        self.details = match hit_test(self.markers.as_slice(), point, self.tolerance) {
            Some(marker) => {
                log::debug!("Click at {} selected marker {}", point, marker.id);
                DetailsPanel::Selected(marker.clone())
            }
            None => {
                log::trace!("Click at {} hit nothing", point);
                DetailsPanel::Placeholder
            }
        };
        &self.details
    }

    pub fn details(&self) -> &DetailsPanel {
        &self.details
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HIT_TOLERANCE;

    #[test]
    fn test_click_selects_then_clears() {
        let mut map = MarkerMap::new(MarkerSet::default_site(), DEFAULT_HIT_TOLERANCE);
        assert_eq!(map.details(), &DetailsPanel::Placeholder);

        let panel = map.click(Position::new(302.0, 148.0));
        assert_eq!(panel.selected().map(|m| m.id), Some(2));

        // A miss replaces the previous selection with the placeholder
        let panel = map.click(Position::new(10.0, 10.0));
        assert_eq!(panel, &DetailsPanel::Placeholder);
    }
}
