//! Configuration for the route controller
//!
//! Every section has a `Default` that reproduces the stock behavior, and the
//! whole tree can be loaded from JSON so a host can tweak icons, colors and
//! animation timing without recompiling.

use crate::{
    core::{constants, geo::LatLng},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub view: ViewConfig,
    pub animation: AnimationConfig,
    pub route: RouteStyle,
    pub icons: IconSet,
}

impl ControllerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.view.center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "initial center {} is out of range",
                self.view.center
            )));
        }
        if self.animation.tick_interval_ms == 0 || self.animation.speed == 0 {
            return Err(MapError::Session(
                "animation tick interval and speed must be positive".to_string(),
            ));
        }
        if self.animation.speed > constants::MAX_ARROW_SPEED {
            return Err(MapError::Session(format!(
                "animation speed {} exceeds {}",
                self.animation.speed,
                constants::MAX_ARROW_SPEED
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub place_zoom: f64,
    pub single_marker_padding: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let (lat, lng) = constants::DEFAULT_CENTER;
        Self {
            center: LatLng::new(lat, lng),
            zoom: constants::DEFAULT_ZOOM,
            place_zoom: constants::PLACE_ZOOM,
            single_marker_padding: constants::SINGLE_MARKER_PADDING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub tick_interval_ms: u64,
    pub speed: u32,
}

impl AnimationConfig {
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: constants::ARROW_TICK_MS,
            speed: constants::ARROW_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    pub color: String,
    pub width: f32,
    pub opacity: f32,
    pub arrow_scale: f32,
    pub geodesic: bool,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            color: constants::ROUTE_COLOR.to_string(),
            width: constants::ROUTE_WIDTH,
            opacity: 1.0,
            arrow_scale: constants::ARROW_SCALE,
            geodesic: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSet {
    pub start: String,
    pub destination: String,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            start: constants::START_ICON_URL.to_string(),
            destination: constants::DESTINATION_ICON_URL.to_string(),
        }
    }
}
