//! Prelude module for common pinroute types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use pinroute::prelude::*;`

pub use crate::core::{
    builder::ControllerBuilder,
    config::{AnimationConfig, ControllerConfig, IconSet, RouteStyle, ViewConfig},
    geo::{LatLng, LatLngBounds},
    selection::{Role, RoleSelection, RoleSlots},
};

pub use crate::layers::{
    headless::{HeadlessEffects, HeadlessSurface},
    marker::{Marker, MarkerAnimation, MarkerIcon, MarkerId},
    route::RoutePath,
};

pub use crate::traits::{
    GuideStore, InfoAnchor, InfoContent, MapSurface, PlaceGeometry, PlaceSearch, ReverseGeocoder,
    TickScheduler, UiEffects, UiElement, FadeSpeed,
};

pub use crate::animation::{arrow::ArrowCycle, ticker::ManualTicker};

pub use crate::geocoding::{nominatim::NominatimClient, StaticGeocoder};

pub use crate::ui::guide::{FileGuideStore, MemoryGuideStore, OnboardingGuide};

pub use crate::runtime::AsyncHandle;

pub use crate::controller::{PendingMarker, RouteController};

pub use crate::input::events::MapEvent;

pub use crate::session::MapSession;

pub use crate::{Error as MapError, Result};

pub use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
