use crate::core::{
    config::RouteStyle,
    geo::{LatLng, LatLngBounds},
};

/// The rendered line between the start and destination markers.
///
/// Carries a single forward arrow decoration whose position along the line
/// is expressed as a percentage of its length.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    start: LatLng,
    destination: LatLng,
    style: RouteStyle,
    arrow_offset: f64,
}

impl RoutePath {
    pub fn new(start: LatLng, destination: LatLng, style: RouteStyle) -> Self {
        Self {
            start,
            destination,
            style,
            arrow_offset: 100.0,
        }
    }

    pub fn start(&self) -> LatLng {
        self.start
    }

    pub fn destination(&self) -> LatLng {
        self.destination
    }

    pub fn points(&self) -> [LatLng; 2] {
        [self.start, self.destination]
    }

    pub fn midpoint(&self) -> LatLng {
        self.start.midpoint(&self.destination)
    }

    pub fn bounds(&self) -> LatLngBounds {
        let mut bounds = LatLngBounds::from_point(self.start);
        bounds.extend(&self.destination);
        bounds
    }

    pub fn style(&self) -> &RouteStyle {
        &self.style
    }

    pub fn arrow_offset(&self) -> f64 {
        self.arrow_offset
    }

    pub fn set_arrow_offset(&mut self, percent: f64) {
        self.arrow_offset = percent;
    }

    /// Offset in the `"<n>%"` form map SDKs expect for symbol offsets
    pub fn arrow_offset_css(&self) -> String {
        format!("{}%", self.arrow_offset)
    }
}
