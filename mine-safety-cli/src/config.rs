//! Configuration loading and parsing
//!
//! Every section is optional; a missing file section falls back to the
//! library defaults.

use anyhow::{Context, Result};
use mine_safety_core::config::{DEFAULT_ALERT_CAPACITY, DEFAULT_CANVAS, DEFAULT_HIT_TOLERANCE};
use mine_safety_core::{FeedConfig, Marker, MarkerSet, SiteConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Replaces the built-in layout when non-empty
    #[serde(default)]
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlertsConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Directory holding the role file
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_tolerance() -> f64 {
    DEFAULT_HIT_TOLERANCE
}

fn default_width() -> f64 {
    DEFAULT_CANVAS.0
}

fn default_height() -> f64 {
    DEFAULT_CANVAS.1
}

fn default_capacity() -> usize {
    DEFAULT_ALERT_CAPACITY
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".mine-safety")
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            width: default_width(),
            height: default_height(),
            markers: Vec::new(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

impl AppConfig {
    /// Library-side view of the settings
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            hit_tolerance: self.map.tolerance,
            canvas_width: self.map.width,
            canvas_height: self.map.height,
            alert_capacity: self.alerts.capacity,
            feed: self.feed.clone(),
        }
    }

    /// Configured markers, or the built-in layout when none are listed
    pub fn marker_set(&self) -> Result<MarkerSet> {
        if self.map.markers.is_empty() {
            return Ok(MarkerSet::default_site());
        }
        MarkerSet::new(self.map.markers.clone(), &self.site_config())
            .context("Invalid [[map.markers]] entry")
    }

    /// Check values and marker layout
    pub fn validate(&self) -> Result<()> {
        self.site_config()
            .validate()
            .context("Invalid configuration values")?;
        self.marker_set()?;
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mine_safety_core::MarkerCategory;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [map]
            tolerance = 8.0

            [[map.markers]]
            id = 10
            position = { x = 100.0, y = 50.0 }
            category = "hazard"
            severity = "high"
            label = "Roof fall risk, Panel 4"

            [[map.markers]]
            id = 11
            position = { x = 300.0, y = 200.0 }
            category = "maintenance"
            severity = "low"
            label = "Pump service"
            details = "North Karanpura. Mineral: coal."

            [alerts]
            capacity = 3

            [feed]
            probability = 0.25
            seed = 99

            [session]
            state_dir = "/tmp/mine"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.map.tolerance, 8.0);
        assert_eq!(config.map.width, 600.0);
        assert_eq!(config.map.markers.len(), 2);
        assert_eq!(config.map.markers[1].category, MarkerCategory::Maintenance);
        assert_eq!(config.map.markers[0].details, None);
        assert_eq!(config.map.markers[1].details.as_deref(), Some("North Karanpura. Mineral: coal."));
        assert_eq!(config.alerts.capacity, 3);
        assert_eq!(config.feed.seed, Some(99));
        assert_eq!(config.feed.tick_secs, 5);
        assert_eq!(config.session.state_dir, PathBuf::from("/tmp/mine"));

        assert!(config.validate().is_ok());
        assert_eq!(config.marker_set().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let site = config.site_config();
        assert_eq!(site, SiteConfig::default());
        assert_eq!(config.marker_set().unwrap().len(), 6);
    }

    #[test]
    fn test_validation_errors() {
        let config: AppConfig = toml::from_str("[feed]\nprobability = 2.0").unwrap();
        assert!(config.validate().is_err());

        let config: AppConfig = toml::from_str(
            r#"
            [[map.markers]]
            id = 1
            position = { x = 900.0, y = 50.0 }
            category = "hazard"
            severity = "high"
            label = "Off the map"
        "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
