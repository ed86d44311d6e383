//! Collaborator abstractions
//!
//! The controller never renders, animates DOM nodes, talks HTTP or touches
//! browser storage itself. Everything it needs from the outside world goes
//! through the traits in this module so the same state machine can drive a
//! browser map, a native widget or the headless recorder used in tests.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::{
        marker::{MarkerAnimation, MarkerIcon, MarkerId},
        route::RoutePath,
    },
    runtime::AsyncHandle,
    Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the info panel currently shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InfoContent {
    /// Address of the selected marker plus its action buttons
    MarkerDetails { address: String },
    /// The "calculate distance" button offered once a route exists
    CalculatePrompt,
    /// A formatted route distance, e.g. `Distance: 1.250 km`
    Distance(String),
}

/// Where the info panel opens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InfoAnchor {
    Marker(MarkerId),
    At(LatLng),
    /// Reopen wherever it was last anchored
    Current,
}

/// Map rendering primitives
pub trait MapSurface: Send {
    fn add_marker(&mut self, id: MarkerId, position: LatLng, animation: MarkerAnimation);

    fn remove_marker(&mut self, id: MarkerId);

    /// Paint `icon`; `url` is `None` for the stock pin
    fn set_marker_icon(&mut self, id: MarkerId, icon: MarkerIcon, url: Option<&str>);

    fn set_marker_animation(&mut self, id: MarkerId, animation: MarkerAnimation);

    fn pan_to(&mut self, position: LatLng);

    fn set_center(&mut self, position: LatLng);

    fn set_zoom(&mut self, zoom: f64);

    fn fit_bounds(&mut self, bounds: &LatLngBounds);

    fn show_route(&mut self, route: &RoutePath);

    fn hide_route(&mut self);

    /// Move the route's arrow decoration to `percent` of the line length
    fn set_arrow_offset(&mut self, percent: f64);

    fn set_info_content(&mut self, content: InfoContent);

    fn open_info(&mut self, anchor: InfoAnchor);

    fn close_info(&mut self);

    /// Straight-line distance in meters
    fn distance_between(&self, a: &LatLng, b: &LatLng) -> f64 {
        a.distance_to(b)
    }
}

/// Page elements the controller animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiElement {
    Map,
    TopPanel,
    Guide,
    GuideIcon,
    MarkerInfo,
    CalculateButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeSpeed {
    Fast,
    Slow,
}

impl FadeSpeed {
    pub fn duration(self) -> Duration {
        match self {
            FadeSpeed::Fast => Duration::from_millis(200),
            FadeSpeed::Slow => Duration::from_millis(600),
        }
    }
}

/// UI effects: fades, inline styles, tooltips
pub trait UiEffects: Send {
    fn fade_in(&mut self, element: UiElement, speed: FadeSpeed);

    fn fade_out(&mut self, element: UiElement, speed: FadeSpeed);

    fn fade_to(&mut self, element: UiElement, speed: FadeSpeed, opacity: f32);

    fn set_style(&mut self, element: UiElement, property: &str, value: &str);

    fn activate_tooltips(&mut self);
}

/// Position to human-readable address
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// The formatted address of the best match; an error when there is none
    async fn reverse(&self, position: LatLng) -> Result<String>;
}

/// Result of a place search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceGeometry {
    pub location: LatLng,
    pub viewport: Option<LatLngBounds>,
}

/// Free-text place lookup backing the search box
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// `Ok(None)` when nothing matched
    async fn search(&self, query: &str) -> Result<Option<PlaceGeometry>>;
}

/// Repeating timer used for the route arrow animation.
///
/// Each started timer delivers ticks tagged with `generation` back to the
/// controller until its handle is cancelled.
pub trait TickScheduler: Send {
    fn start(&mut self, interval: Duration, generation: u64) -> Box<dyn AsyncHandle>;
}

/// Persistence of the "onboarding guide dismissed" flag
pub trait GuideStore: Send {
    fn is_dismissed(&self) -> Result<bool>;

    fn mark_dismissed(&mut self) -> Result<()>;
}
