use crate::{
    core::geo::LatLng,
    layers::marker::MarkerId,
    traits::PlaceGeometry,
};

/// Everything a map session reacts to.
///
/// User interactions come from the host UI; `AddressResolved` and
/// `ArrowTick` are produced by the session's own background work.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Click on an empty spot of the map
    MapClicked(LatLng),
    /// The map finished rendering a view
    MapIdle,
    /// A place was picked in the search box; `None` when it has no geometry
    PlaceSelected(Option<PlaceGeometry>),
    /// Free-text search submitted; resolved through the session's place search
    SearchSubmitted(String),
    MarkerClicked(MarkerId),
    MarkerRightClicked(MarkerId),
    MarkerDragged { id: MarkerId, position: LatLng },
    RouteClicked,
    StartPressed,
    DestinationPressed,
    DeletePressed,
    DeleteAllPressed,
    DeselectPressed,
    CalculatePressed,
    FitMapPressed,
    GuideIconPressed,
    CloseGuidePressed,
    /// Outcome of a reverse geocoding lookup; `None` when there was no usable result
    AddressResolved {
        id: MarkerId,
        address: Option<String>,
    },
    /// One frame of the route arrow animation started with `generation`
    ArrowTick { generation: u64 },
    /// Stop the session loop
    Shutdown,
}

impl MapEvent {
    /// Events produced by the session itself rather than the user
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            MapEvent::AddressResolved { .. } | MapEvent::ArrowTick { .. }
        )
    }
}

/// Whether an event changed anything
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl From<bool> for EventHandled {
    fn from(handled: bool) -> Self {
        if handled {
            EventHandled::Handled
        } else {
            EventHandled::NotHandled
        }
    }
}
