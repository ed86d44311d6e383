use crate::{core::constants::KILOMETER_THRESHOLD, core::geo::LatLng, traits::MapSurface};

/// Formats a distance in meters for display.
///
/// Below one kilometer the value is shown in whole meters (truncated, so
/// 999.6 m stays "999 m"), otherwise in kilometers with three decimals.
pub fn format_distance(meters: f64) -> String {
    if meters < KILOMETER_THRESHOLD {
        format!("{:.0} m", meters.floor())
    } else {
        format!("{:.3} km", meters / 1000.0)
    }
}

/// Rounds to two decimals, the precision the route distance is cached at
fn round_centimeters(meters: f64) -> f64 {
    (meters * 100.0).round() / 100.0
}

/// Distance state of the current route.
///
/// The distance is measured once per route and only shown after the user
/// asked for it; until then the info panel offers a "calculate" button.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteMeasure {
    distance: Option<f64>,
    requested: bool,
}

impl RouteMeasure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure and cache the straight-line distance between the endpoints
    pub fn measure(&mut self, surface: &dyn MapSurface, start: &LatLng, destination: &LatLng) -> f64 {
        let distance = round_centimeters(surface.distance_between(start, destination));
        self.distance = Some(distance);
        distance
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Forget the "calculate" request, keeping any cached distance
    pub fn reset_request(&mut self) {
        self.requested = false;
    }

    /// Forget both the distance and the request
    pub fn clear(&mut self) {
        self.distance = None;
        self.requested = false;
    }

    /// Info panel text, `None` when nothing has been measured
    pub fn label(&self) -> Option<String> {
        self.distance
            .map(|meters| format!("Distance: {}", format_distance(meters)))
    }
}
