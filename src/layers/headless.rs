//! Headless collaborators
//!
//! `HeadlessSurface` and `HeadlessEffects` stand in for a real map and page.
//! They keep the state a user would see and log every call, which makes them
//! usable both for running a session without any UI and for asserting on the
//! controller's output in tests.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::{
        marker::{MarkerAnimation, MarkerIcon, MarkerId},
        route::RoutePath,
    },
    prelude::{HashMap, HashSet},
    traits::{FadeSpeed, InfoAnchor, InfoContent, MapSurface, UiEffects, UiElement},
    ui::popup::InfoPopup,
};

/// A marker as currently drawn
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMarker {
    pub position: LatLng,
    pub icon: MarkerIcon,
    pub icon_url: Option<String>,
    pub animation: MarkerAnimation,
}

pub struct HeadlessSurface {
    markers: HashMap<MarkerId, RenderedMarker>,
    route: Option<RoutePath>,
    info: InfoPopup,
    center: LatLng,
    zoom: f64,
    last_fit: Option<LatLngBounds>,
    arrow_updates: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::with_view(LatLng::default(), 0.0)
    }

    pub fn with_view(center: LatLng, zoom: f64) -> Self {
        Self {
            markers: HashMap::default(),
            route: None,
            info: InfoPopup::new(),
            center,
            zoom,
            last_fit: None,
            arrow_updates: 0,
        }
    }

    pub fn marker(&self, id: MarkerId) -> Option<&RenderedMarker> {
        self.markers.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn route(&self) -> Option<&RoutePath> {
        self.route.as_ref()
    }

    pub fn arrow_offset(&self) -> Option<f64> {
        self.route.as_ref().map(|route| route.arrow_offset())
    }

    /// Number of arrow frames drawn since the surface was created
    pub fn arrow_updates(&self) -> usize {
        self.arrow_updates
    }

    pub fn info(&self) -> &InfoPopup {
        &self.info
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn last_fit(&self) -> Option<LatLngBounds> {
        self.last_fit
    }

    fn with_marker(&mut self, id: MarkerId, f: impl FnOnce(&mut RenderedMarker)) {
        match self.markers.get_mut(&id) {
            Some(marker) => f(marker),
            None => log::debug!("headless: {} is not rendered", id),
        }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSurface for HeadlessSurface {
    fn add_marker(&mut self, id: MarkerId, position: LatLng, animation: MarkerAnimation) {
        log::debug!("headless: add {} at {}", id, position);
        self.markers.insert(
            id,
            RenderedMarker {
                position,
                icon: MarkerIcon::Default,
                icon_url: None,
                animation,
            },
        );
    }

    fn remove_marker(&mut self, id: MarkerId) {
        log::debug!("headless: remove {}", id);
        self.markers.remove(&id);
    }

    fn set_marker_icon(&mut self, id: MarkerId, icon: MarkerIcon, url: Option<&str>) {
        self.with_marker(id, |marker| {
            marker.icon = icon;
            marker.icon_url = url.map(str::to_string);
        });
    }

    fn set_marker_animation(&mut self, id: MarkerId, animation: MarkerAnimation) {
        self.with_marker(id, |marker| marker.animation = animation);
    }

    fn pan_to(&mut self, position: LatLng) {
        log::debug!("headless: pan to {}", position);
        self.center = position;
    }

    fn set_center(&mut self, position: LatLng) {
        self.center = position;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        log::debug!(
            "headless: fit SW{} NE{}",
            bounds.south_west,
            bounds.north_east
        );
        self.center = bounds.center();
        self.last_fit = Some(*bounds);
    }

    fn show_route(&mut self, route: &RoutePath) {
        log::debug!("headless: route {} -> {}", route.start(), route.destination());
        self.route = Some(route.clone());
    }

    fn hide_route(&mut self) {
        if self.route.take().is_some() {
            log::debug!("headless: route removed");
        }
    }

    fn set_arrow_offset(&mut self, percent: f64) {
        if let Some(route) = self.route.as_mut() {
            route.set_arrow_offset(percent);
            self.arrow_updates += 1;
        }
    }

    fn set_info_content(&mut self, content: InfoContent) {
        self.info.set_content(content);
    }

    fn open_info(&mut self, anchor: InfoAnchor) {
        self.info.open(anchor);
        if let Some(text) = self.info.text() {
            log::info!("info panel: {}", text);
        }
    }

    fn close_info(&mut self) {
        if let Some(shown) = self.info.open_for() {
            log::debug!("headless: info panel closed after {:?}", shown);
        }
        self.info.close();
    }
}

/// One recorded UI effect
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FadeIn(UiElement, FadeSpeed),
    FadeOut(UiElement, FadeSpeed),
    FadeTo(UiElement, FadeSpeed, f32),
    Style(UiElement, String, String),
    Tooltips,
}

#[derive(Debug, Default)]
pub struct HeadlessEffects {
    effects: Vec<Effect>,
    styles: HashMap<(UiElement, String), String>,
    shown: HashSet<UiElement>,
}

impl HeadlessEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn style(&self, element: UiElement, property: &str) -> Option<&str> {
        self.styles
            .get(&(element, property.to_string()))
            .map(String::as_str)
    }

    /// Whether the last fade left `element` visible
    pub fn is_shown(&self, element: UiElement) -> bool {
        self.shown.contains(&element)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

impl UiEffects for HeadlessEffects {
    fn fade_in(&mut self, element: UiElement, speed: FadeSpeed) {
        self.shown.insert(element);
        self.effects.push(Effect::FadeIn(element, speed));
    }

    fn fade_out(&mut self, element: UiElement, speed: FadeSpeed) {
        self.shown.remove(&element);
        self.effects.push(Effect::FadeOut(element, speed));
    }

    fn fade_to(&mut self, element: UiElement, speed: FadeSpeed, opacity: f32) {
        self.effects.push(Effect::FadeTo(element, speed, opacity));
    }

    fn set_style(&mut self, element: UiElement, property: &str, value: &str) {
        self.styles
            .insert((element, property.to_string()), value.to_string());
        self.effects.push(Effect::Style(
            element,
            property.to_string(),
            value.to_string(),
        ));
    }

    fn activate_tooltips(&mut self) {
        self.effects.push(Effect::Tooltips);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_info_ends_open_time() {
        let mut surface = HeadlessSurface::new();
        surface.set_info_content(InfoContent::CalculatePrompt);
        surface.open_info(InfoAnchor::At(LatLng::new(50.0, 20.0)));
        assert!(surface.info().open_for().is_some());

        surface.close_info();
        assert!(!surface.info().is_visible());
        assert_eq!(surface.info().open_for(), None);
    }
}
