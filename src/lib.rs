//! # pinroute
//!
//! A pin-dropping map controller: place markers on a map, designate one as
//! the start and one as the destination, and get the connecting route with
//! its distance and an animated direction arrow.
//!
//! The crate owns the marker/selection state machine and talks to the map,
//! the UI and the geocoder through the collaborator traits in [`traits`].

pub mod animation;
pub mod controller;
pub mod core;
pub mod geocoding;
pub mod input;
pub mod layers;
pub mod plugins;
pub mod prelude;
pub mod runtime;
pub mod session;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    builder::ControllerBuilder,
    config::ControllerConfig,
    geo::{LatLng, LatLngBounds},
    selection::{Role, RoleSelection, RoleSlots},
};

pub use controller::RouteController;

pub use layers::{
    headless::{HeadlessEffects, HeadlessSurface},
    marker::{Marker, MarkerAnimation, MarkerIcon, MarkerId},
    route::RoutePath,
};

pub use input::events::MapEvent;

pub use session::MapSession;

pub use plugins::measure::format_distance;

pub use ui::address::wrap_address;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Session error: {0}")]
    Session(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Install `env_logger` as the `log` backend, honouring `RUST_LOG`.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
