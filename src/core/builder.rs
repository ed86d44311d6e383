//! Controller builder for fluent configuration
//!
//! Collects the configuration and the collaborators a [`RouteController`]
//! needs. Everything except the reverse geocoder has a default: a
//! [`ManualTicker`] for the arrow timer and an in-memory onboarding flag.

use crate::{
    animation::ticker::ManualTicker,
    controller::RouteController,
    core::{
        config::{ControllerConfig, IconSet, RouteStyle},
        geo::LatLng,
    },
    prelude::Arc,
    traits::{GuideStore, MapSurface, ReverseGeocoder, TickScheduler, UiEffects},
    ui::guide::MemoryGuideStore,
    MapError, Result,
};

/// Builder for creating and configuring [`RouteController`] instances
pub struct ControllerBuilder {
    config: ControllerConfig,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
    ticker: Option<Box<dyn TickScheduler>>,
    guide_store: Option<Box<dyn GuideStore>>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::default(),
            geocoder: None,
            ticker: None,
            guide_store: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the initial center and zoom level
    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: f64) -> Self {
        self.config.view.center = center;
        self.config.view.zoom = zoom;
        self
    }

    pub fn with_route_style(mut self, style: RouteStyle) -> Self {
        self.config.route = style;
        self
    }

    pub fn with_icons(mut self, icons: IconSet) -> Self {
        self.config.icons = icons;
        self
    }

    /// Arrow timer interval and the number of ticks per percent of travel
    pub fn with_arrow_timing(mut self, tick_interval_ms: u64, speed: u32) -> Self {
        self.config.animation.tick_interval_ms = tick_interval_ms;
        self.config.animation.speed = speed;
        self
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_ticker(mut self, ticker: Box<dyn TickScheduler>) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn with_guide_store(mut self, store: Box<dyn GuideStore>) -> Self {
        self.guide_store = Some(store);
        self
    }

    /// Build the controller on top of the given map and page
    pub fn build<S: MapSurface, U: UiEffects>(
        self,
        surface: S,
        effects: U,
    ) -> Result<RouteController<S, U>> {
        self.config.validate()?;

        let geocoder = self
            .geocoder
            .ok_or_else(|| MapError::Session("no reverse geocoder configured".to_string()))?;
        let ticker = self
            .ticker
            .unwrap_or_else(|| Box::new(ManualTicker::new()));
        let guide_store = self
            .guide_store
            .unwrap_or_else(|| Box::new(MemoryGuideStore::new()));

        log::debug!(
            "building controller: center {}, zoom {}, arrow every {} ms",
            self.config.view.center,
            self.config.view.zoom,
            self.config.animation.tick_interval_ms
        );

        Ok(RouteController::new(
            self.config,
            surface,
            effects,
            geocoder,
            ticker,
            guide_store,
        ))
    }
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geocoding::StaticGeocoder,
        layers::headless::{HeadlessEffects, HeadlessSurface},
    };

    #[test]
    fn test_builder_requires_geocoder() {
        let result = ControllerBuilder::new().build(HeadlessSurface::new(), HeadlessEffects::new());
        assert!(matches!(result, Err(MapError::Session(_))));
    }

    #[test]
    fn test_builder_applies_view() {
        let controller = ControllerBuilder::new()
            .with_center_and_zoom(LatLng::new(52.2297, 21.0122), 12.0)
            .with_geocoder(Arc::new(StaticGeocoder::new()))
            .build(HeadlessSurface::new(), HeadlessEffects::new())
            .unwrap();

        assert_eq!(controller.config().view.center, LatLng::new(52.2297, 21.0122));
        assert_eq!(controller.config().view.zoom, 12.0);
        assert!(controller.markers().is_empty());
    }

    #[test]
    fn test_builder_rejects_zero_speed() {
        let result = ControllerBuilder::new()
            .with_arrow_timing(16, 0)
            .with_geocoder(Arc::new(StaticGeocoder::new()))
            .build(HeadlessSurface::new(), HeadlessEffects::new());
        assert!(result.is_err());
    }
}
