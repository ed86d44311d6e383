use crate::core::{
    config::IconSet,
    geo::{LatLng, LatLngBounds},
};
use serde::{Deserialize, Serialize};

/// Stable identity of a placed marker.
///
/// The map surface uses it as the rendering handle; the controller uses it to
/// find a marker again after its list index may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerIcon {
    /// The surface's stock pin
    #[default]
    Default,
    Start,
    Destination,
}

impl MarkerIcon {
    /// Icon URL to paint, `None` for the stock pin
    pub fn url<'a>(&self, icons: &'a IconSet) -> Option<&'a str> {
        match self {
            MarkerIcon::Default => None,
            MarkerIcon::Start => Some(&icons.start),
            MarkerIcon::Destination => Some(&icons.destination),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerAnimation {
    #[default]
    None,
    /// One-shot fall onto the map
    Drop,
    /// Continuous bounce while the marker is a route endpoint
    Bounce,
}

pub struct Marker {
    id: MarkerId,
    position: LatLng,
    address: String,
    icon: MarkerIcon,
    animation: MarkerAnimation,
}

impl Marker {
    pub fn new(id: MarkerId, position: LatLng) -> Self {
        Self {
            id,
            position,
            address: String::new(),
            icon: MarkerIcon::Default,
            animation: MarkerAnimation::Drop,
        }
    }

    pub fn with_address(mut self, address: String) -> Self {
        self.address = address;
        self
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    /// Line-wrapped address as shown in the info panel
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn icon(&self) -> MarkerIcon {
        self.icon
    }

    pub fn set_icon(&mut self, icon: MarkerIcon) {
        self.icon = icon;
    }

    pub fn animation(&self) -> MarkerAnimation {
        self.animation
    }

    pub fn set_animation(&mut self, animation: MarkerAnimation) {
        self.animation = animation;
    }

    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::from_point(self.position)
    }
}

impl std::fmt::Debug for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marker")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("icon", &self.icon)
            .finish()
    }
}
