//! Geocoding collaborators
//!
//! `NominatimClient` talks to an OpenStreetMap Nominatim server; the
//! `StaticGeocoder` answers from an in-memory table for offline sessions and
//! tests.

pub mod nominatim;

pub use nominatim::NominatimClient;

use crate::{
    core::geo::LatLng,
    prelude::HashMap,
    traits::{PlaceGeometry, PlaceSearch, ReverseGeocoder},
    MapError, Result,
};
use async_trait::async_trait;

/// How far (meters) a lookup may be from a known address and still match it
const DEFAULT_MATCH_RADIUS: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct StaticGeocoder {
    addresses: Vec<(LatLng, String)>,
    places: HashMap<String, PlaceGeometry>,
    fallback: Option<String>,
    match_radius: f64,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self {
            addresses: Vec::new(),
            places: HashMap::default(),
            fallback: None,
            match_radius: DEFAULT_MATCH_RADIUS,
        }
    }

    pub fn with_address(mut self, position: LatLng, address: impl Into<String>) -> Self {
        self.addresses.push((position, address.into()));
        self
    }

    /// Address returned for positions with no nearby entry
    pub fn with_fallback(mut self, address: impl Into<String>) -> Self {
        self.fallback = Some(address.into());
        self
    }

    pub fn with_place(mut self, name: &str, place: PlaceGeometry) -> Self {
        self.places.insert(name.trim().to_lowercase(), place);
        self
    }

    pub fn with_match_radius(mut self, meters: f64) -> Self {
        self.match_radius = meters;
        self
    }

    fn nearest(&self, position: &LatLng) -> Option<&str> {
        self.addresses
            .iter()
            .map(|(at, address)| (at.distance_to(position), address))
            .filter(|(distance, _)| *distance <= self.match_radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, address)| address.as_str())
    }
}

impl Default for StaticGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReverseGeocoder for StaticGeocoder {
    async fn reverse(&self, position: LatLng) -> Result<String> {
        self.nearest(&position)
            .or(self.fallback.as_deref())
            .map(str::to_string)
            .ok_or_else(|| MapError::Geocoding(format!("no address near {}", position)))
    }
}

#[async_trait]
impl PlaceSearch for StaticGeocoder {
    async fn search(&self, query: &str) -> Result<Option<PlaceGeometry>> {
        Ok(self.places.get(&query.trim().to_lowercase()).copied())
    }
}
