//! Marker & route controller
//!
//! Owns the placed markers, the start/destination selection, the rendered
//! route and the arrow animation. Every public method is one UI or SDK event;
//! each runs to completion and leaves the invariants below intact:
//!
//! * role indices always point into `markers`,
//! * no marker holds both roles,
//! * a route (and its animation timer) exists only while both roles are set.

use crate::{
    animation::arrow::ArrowCycle,
    core::{
        config::ControllerConfig,
        geo::{LatLng, LatLngBounds},
        selection::{Role, RoleSlots},
    },
    layers::{
        marker::{Marker, MarkerAnimation, MarkerIcon, MarkerId},
        route::RoutePath,
    },
    plugins::measure::RouteMeasure,
    prelude::{Arc, HashMap},
    runtime::AsyncHandle,
    traits::{
        FadeSpeed, GuideStore, InfoAnchor, InfoContent, MapSurface, PlaceGeometry,
        ReverseGeocoder, TickScheduler, UiEffects, UiElement,
    },
    ui::{address::wrap_address, guide::OnboardingGuide},
    Result,
};

/// A marker that is drawn but still waiting for its address
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMarker {
    pub id: MarkerId,
    pub position: LatLng,
}

struct ArrowAnimation {
    generation: u64,
    handle: Box<dyn AsyncHandle>,
    cycle: ArrowCycle,
}

pub struct RouteController<S: MapSurface, U: UiEffects> {
    config: ControllerConfig,
    surface: S,
    effects: U,
    geocoder: Arc<dyn ReverseGeocoder>,
    ticker: Box<dyn TickScheduler>,
    guide: OnboardingGuide,
    markers: Vec<Marker>,
    pending: HashMap<MarkerId, LatLng>,
    roles: RoleSlots,
    selected: Option<MarkerId>,
    /// Marker the info panel is anchored to, if any
    info_marker: Option<MarkerId>,
    route: Option<RoutePath>,
    measure: RouteMeasure,
    animation: Option<ArrowAnimation>,
    next_marker_id: u64,
    next_generation: u64,
    map_ready: bool,
}

impl<S: MapSurface, U: UiEffects> RouteController<S, U> {
    pub fn new(
        config: ControllerConfig,
        surface: S,
        effects: U,
        geocoder: Arc<dyn ReverseGeocoder>,
        ticker: Box<dyn TickScheduler>,
        guide_store: Box<dyn GuideStore>,
    ) -> Self {
        Self {
            config,
            surface,
            effects,
            geocoder,
            ticker,
            guide: OnboardingGuide::new(guide_store),
            markers: Vec::new(),
            pending: HashMap::default(),
            roles: RoleSlots::new(),
            selected: None,
            info_marker: None,
            route: None,
            measure: RouteMeasure::new(),
            animation: None,
            next_marker_id: 0,
            next_generation: 0,
            map_ready: false,
        }
    }

    /// Initial view, tooltips and the first-visit guide
    pub fn init(&mut self) {
        self.surface.set_center(self.config.view.center);
        self.surface.set_zoom(self.config.view.zoom);
        self.effects.activate_tooltips();
        self.guide.show_if_first_visit(&mut self.effects);
    }

    // ---- accessors -------------------------------------------------------

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn effects(&self) -> &U {
        &self.effects
    }

    pub fn geocoder(&self) -> Arc<dyn ReverseGeocoder> {
        self.geocoder.clone()
    }

    pub fn guide(&self) -> &OnboardingGuide {
        &self.guide
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.id() == id)
    }

    pub fn index_of(&self, id: MarkerId) -> Option<usize> {
        self.markers.iter().position(|marker| marker.id() == id)
    }

    pub fn roles(&self) -> &RoleSlots {
        &self.roles
    }

    /// The marker currently holding `role`
    pub fn role_marker(&self, role: Role) -> Option<&Marker> {
        self.roles.index(role).and_then(|index| self.markers.get(index))
    }

    pub fn selected(&self) -> Option<&Marker> {
        self.selected.and_then(|id| self.marker(id))
    }

    pub fn is_pending(&self, id: MarkerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn route(&self) -> Option<&RoutePath> {
        self.route.as_ref()
    }

    /// Cached straight-line distance of the current route in meters
    pub fn distance(&self) -> Option<f64> {
        self.measure.distance()
    }

    pub fn is_calculation_requested(&self) -> bool {
        self.measure.is_requested()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Generation of the running arrow timer
    pub fn animation_generation(&self) -> Option<u64> {
        self.animation.as_ref().map(|animation| animation.generation)
    }

    // ---- placing ---------------------------------------------------------

    /// Draws a marker at `position` and pans to it right away.
    ///
    /// The marker joins the list only once [`complete_place_marker`] receives
    /// its address.
    ///
    /// [`complete_place_marker`]: Self::complete_place_marker
    pub fn begin_place_marker(&mut self, position: LatLng) -> PendingMarker {
        let id = MarkerId(self.next_marker_id);
        self.next_marker_id += 1;

        self.surface.add_marker(id, position, MarkerAnimation::Drop);
        self.pending.insert(id, position);
        self.surface.pan_to(position);
        log::debug!("{} placed at {}, awaiting address", id, position);

        PendingMarker { id, position }
    }

    /// Finishes placing a marker with the outcome of its address lookup.
    ///
    /// Returns the marker's list index when it was added. A lookup without a
    /// usable address removes the drawn marker; a lookup for a marker that
    /// was deleted in the meantime is ignored.
    pub fn complete_place_marker(&mut self, id: MarkerId, address: Option<String>) -> Option<usize> {
        let Some(position) = self.pending.remove(&id) else {
            log::debug!("ignoring address for {}: no longer pending", id);
            return None;
        };

        let Some(address) = address.filter(|address| !address.trim().is_empty()) else {
            log::warn!("no address found for {} at {}, dropping it", id, position);
            self.surface.remove_marker(id);
            return None;
        };

        self.markers
            .push(Marker::new(id, position).with_address(wrap_address(&address)));
        self.selected = Some(id);
        self.show_marker_info(id);
        log::info!("{} added: {}", id, address);

        Some(self.markers.len() - 1)
    }

    /// Places a marker and waits for its address
    pub async fn place_marker(&mut self, position: LatLng) -> Option<MarkerId> {
        let pending = self.begin_place_marker(position);
        let geocoder = self.geocoder.clone();

        let address = match geocoder.reverse(position).await {
            Ok(address) => Some(address),
            Err(e) => {
                log::warn!("reverse geocoding failed for {}: {}", position, e);
                None
            }
        };

        self.complete_place_marker(pending.id, address)
            .map(|_| pending.id)
    }

    /// Handles a pick in the place search box
    pub fn on_place_selected(&mut self, place: Option<PlaceGeometry>) -> Option<PendingMarker> {
        let place = place?;

        match place.viewport {
            Some(viewport) => self.surface.fit_bounds(&viewport),
            None => {
                self.surface.set_center(place.location);
                self.surface.set_zoom(self.config.view.place_zoom);
            }
        }

        Some(self.begin_place_marker(place.location))
    }

    /// Moving a marker re-creates it at the drop position
    pub fn on_marker_dragged(&mut self, id: MarkerId, position: LatLng) -> Option<PendingMarker> {
        self.index_of(id)?;
        let pending = self.begin_place_marker(position);
        self.delete_marker(id);
        Some(pending)
    }

    // ---- selection -------------------------------------------------------

    pub fn on_marker_clicked(&mut self, id: MarkerId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        self.show_marker_info(id);
        true
    }

    fn show_marker_info(&mut self, id: MarkerId) {
        let Some(marker) = self.marker(id) else {
            return;
        };
        let address = marker.address().to_string();

        self.surface
            .set_info_content(InfoContent::MarkerDetails { address });
        self.effects.fade_in(UiElement::MarkerInfo, FadeSpeed::Slow);
        self.open_info(InfoAnchor::Marker(id));
    }

    /// Makes the marker `id` hold `role`.
    ///
    /// If the marker held the other role, that role is cleared. Returns
    /// `false` when `id` is not a placed marker.
    pub fn select_as_role(&mut self, id: MarkerId, role: Role) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("cannot make {} the {}: not placed", id, role);
            return false;
        };

        if let Some(previous) = self.roles.index(role) {
            self.set_icon(previous, MarkerIcon::Default);
            self.set_animation(previous, MarkerAnimation::Drop);
            if let Some(other) = self.roles.index(role.other()) {
                self.set_animation(other, MarkerAnimation::Drop);
            }
        }

        let position = self.markers[index].position();
        if let Some(cleared) = self.roles.assign(role, index, position) {
            log::debug!("{} is now the {}, clearing its {} role", id, role, cleared);
        }
        self.set_icon(index, role.icon());

        self.stop_animation();
        self.compute_route();
        true
    }

    /// Applies `role` to the selected marker
    pub fn select_selected_as(&mut self, role: Role) -> bool {
        match self.selected_id() {
            Some(id) => self.select_as_role(id, role),
            None => false,
        }
    }

    /// Drops whichever role `id` holds and tears down the route.
    ///
    /// No-op when the marker holds no role.
    pub fn deselect_marker(&mut self, id: MarkerId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let Some(role) = self.roles.role_at(index) else {
            return false;
        };

        if let Some(other) = self.roles.index(role.other()) {
            self.set_animation(index, MarkerAnimation::Drop);
            self.set_animation(other, MarkerAnimation::Drop);
        }

        self.roles.clear(role);
        self.stop_animation();
        self.close_info();
        self.tear_down_route();
        self.measure.clear();
        log::debug!("{} is no longer the {}", id, role);
        true
    }

    /// Deselects the selected marker and restores its stock icon
    pub fn deselect_selected(&mut self) -> bool {
        let Some(id) = self.selected_id() else {
            return false;
        };
        let deselected = self.deselect_marker(id);
        if let Some(index) = self.index_of(id) {
            self.set_icon(index, MarkerIcon::Default);
        }
        deselected
    }

    // ---- deleting --------------------------------------------------------

    /// Removes a marker from the map and the list.
    ///
    /// Role indices past the removed marker shift down by one. Deleting a
    /// marker that is still waiting for its address cancels the placement.
    pub fn delete_marker(&mut self, id: MarkerId) -> bool {
        if self.pending.remove(&id).is_some() {
            self.surface.remove_marker(id);
            log::debug!("{} deleted before its address arrived", id);
            return true;
        }

        let Some(index) = self.index_of(id) else {
            return false;
        };

        self.surface.remove_marker(id);
        self.deselect_marker(id);
        self.roles.shift_for_removal(index);
        self.markers.remove(index);

        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.info_marker == Some(id) {
            self.close_info();
        }
        log::debug!("{} deleted", id);
        true
    }

    pub fn on_marker_right_clicked(&mut self, id: MarkerId) -> bool {
        self.delete_marker(id)
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected_id() {
            Some(id) => self.delete_marker(id),
            None => false,
        }
    }

    /// Deletes every placed marker, last first
    pub fn delete_all(&mut self) -> usize {
        let ids: Vec<MarkerId> = self.markers.iter().rev().map(Marker::id).collect();
        ids.into_iter().filter(|id| self.delete_marker(*id)).count()
    }

    // ---- route -----------------------------------------------------------

    /// Redraws (or removes) the route after the role selection changed
    pub fn compute_route(&mut self) {
        let (Some((start, destination)), Some(start_index), Some(destination_index)) = (
            self.roles.endpoints(),
            self.roles.index(Role::Start),
            self.roles.index(Role::Destination),
        ) else {
            self.measure.reset_request();
            self.stop_animation();
            self.tear_down_route();
            return;
        };

        self.set_animation(start_index, MarkerAnimation::Bounce);
        self.set_animation(destination_index, MarkerAnimation::Bounce);

        let route = RoutePath::new(start, destination, self.config.route.clone());
        self.surface.fit_bounds(&route.bounds());

        self.measure.measure(&self.surface, &start, &destination);
        if self.measure.is_requested() {
            self.show_distance();
        } else {
            self.surface.set_info_content(InfoContent::CalculatePrompt);
            self.effects
                .set_style(UiElement::CalculateButton, "display", "block");
        }

        self.surface.show_route(&route);
        let midpoint = route.midpoint();
        self.route = Some(route);
        self.start_animation();

        self.open_info(InfoAnchor::At(midpoint));
    }

    /// The "calculate" button: show the distance from now on
    pub fn request_distance(&mut self) {
        self.measure.request();
        self.show_distance();
    }

    pub fn on_route_clicked(&mut self) -> bool {
        let Some(midpoint) = self.route.as_ref().map(RoutePath::midpoint) else {
            return false;
        };

        if self.measure.is_requested() {
            self.show_distance();
            self.open_info(InfoAnchor::At(midpoint));
        } else {
            self.open_info(InfoAnchor::Current);
        }
        true
    }

    fn show_distance(&mut self) {
        if let Some(label) = self.measure.label() {
            self.surface.set_info_content(InfoContent::Distance(label));
        }
    }

    fn tear_down_route(&mut self) {
        self.route = None;
        self.surface.hide_route();
    }

    // ---- animation -------------------------------------------------------

    fn start_animation(&mut self) {
        self.stop_animation();

        self.next_generation += 1;
        let generation = self.next_generation;
        let handle = self
            .ticker
            .start(self.config.animation.tick_interval(), generation);

        self.animation = Some(ArrowAnimation {
            generation,
            handle,
            cycle: ArrowCycle::from_config(&self.config.animation),
        });
    }

    fn stop_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.handle.cancel();
            log::trace!("arrow timer {} cancelled", animation.generation);
        }
    }

    /// Advances the arrow one frame; ticks from a cancelled timer are ignored
    pub fn on_arrow_tick(&mut self, generation: u64) -> bool {
        let Some(animation) = self
            .animation
            .as_mut()
            .filter(|animation| animation.generation == generation)
        else {
            return false;
        };

        let offset = animation.cycle.advance();
        self.surface.set_arrow_offset(offset);
        if let Some(route) = self.route.as_mut() {
            route.set_arrow_offset(offset);
        }
        true
    }

    // ---- view & chrome ---------------------------------------------------

    /// Fits the view to every placed marker
    pub fn fit_all_markers(&mut self) -> bool {
        let positions: Vec<LatLng> = self.markers.iter().map(Marker::position).collect();
        let Some(mut bounds) = LatLngBounds::from_points(&positions) else {
            return false;
        };

        if self.markers.len() == 1 {
            bounds.pad_around_north_east(self.config.view.single_marker_padding);
        }

        self.surface.fit_bounds(&bounds);
        self.surface.set_center(bounds.center());
        true
    }

    /// Reveals the top panel and guide icon once the map first settles
    pub fn on_map_idle(&mut self) {
        if self.map_ready {
            return;
        }
        self.effects.fade_in(UiElement::TopPanel, FadeSpeed::Fast);
        self.effects
            .set_style(UiElement::TopPanel, "display", "flex");
        self.effects.fade_in(UiElement::GuideIcon, FadeSpeed::Fast);
        self.map_ready = true;
    }

    pub fn show_guide(&mut self) {
        self.guide.show(&mut self.effects);
    }

    pub fn dismiss_guide(&mut self) -> Result<()> {
        self.guide.dismiss(&mut self.effects)
    }

    // ---- helpers ---------------------------------------------------------

    fn selected_id(&self) -> Option<MarkerId> {
        self.selected.filter(|id| self.index_of(*id).is_some())
    }

    fn open_info(&mut self, anchor: InfoAnchor) {
        match anchor {
            InfoAnchor::Marker(id) => self.info_marker = Some(id),
            InfoAnchor::At(_) => self.info_marker = None,
            InfoAnchor::Current => {}
        }
        self.surface.open_info(anchor);
    }

    fn close_info(&mut self) {
        self.info_marker = None;
        self.surface.close_info();
    }

    fn set_icon(&mut self, index: usize, icon: MarkerIcon) {
        let marker = &mut self.markers[index];
        marker.set_icon(icon);
        self.surface
            .set_marker_icon(marker.id(), icon, icon.url(&self.config.icons));
    }

    fn set_animation(&mut self, index: usize, animation: MarkerAnimation) {
        let marker = &mut self.markers[index];
        marker.set_animation(animation);
        self.surface.set_marker_animation(marker.id(), animation);
    }
}

impl<S: MapSurface, U: UiEffects> Drop for RouteController<S, U> {
    fn drop(&mut self) {
        self.stop_animation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::ticker::ManualTicker,
        core::builder::ControllerBuilder,
        geocoding::StaticGeocoder,
        layers::headless::{HeadlessEffects, HeadlessSurface},
    };

    type TestController = RouteController<HeadlessSurface, HeadlessEffects>;

    fn controller() -> (TestController, ManualTicker) {
        let ticker = ManualTicker::new();
        let controller = ControllerBuilder::new()
            .with_geocoder(Arc::new(StaticGeocoder::new().with_fallback("Somewhere")))
            .with_ticker(Box::new(ticker.clone()))
            .build(HeadlessSurface::new(), HeadlessEffects::new())
            .unwrap();
        (controller, ticker)
    }

    fn place(controller: &mut TestController, lat: f64, lng: f64) -> MarkerId {
        let pending = controller.begin_place_marker(LatLng::new(lat, lng));
        controller.complete_place_marker(pending.id, Some(format!("{}, {}", lat, lng)));
        pending.id
    }

    #[test]
    fn test_placed_marker_becomes_selected() {
        let (mut controller, _) = controller();
        let pending = controller.begin_place_marker(LatLng::new(50.0, 20.0));

        assert!(controller.markers().is_empty());
        assert!(controller.is_pending(pending.id));
        assert_eq!(controller.surface().center(), LatLng::new(50.0, 20.0));

        let index = controller.complete_place_marker(pending.id, Some("Rynek Główny".into()));
        assert_eq!(index, Some(0));
        assert_eq!(controller.selected().map(Marker::id), Some(pending.id));
        assert!(controller.surface().info().is_visible());
        assert_eq!(
            controller.surface().info().anchor(),
            Some(InfoAnchor::Marker(pending.id))
        );
    }

    #[test]
    fn test_failed_lookup_removes_rendered_marker() {
        let (mut controller, _) = controller();
        let pending = controller.begin_place_marker(LatLng::new(50.0, 20.0));
        assert_eq!(controller.surface().marker_count(), 1);

        assert_eq!(controller.complete_place_marker(pending.id, None), None);
        assert_eq!(controller.surface().marker_count(), 0);
        assert!(!controller.is_pending(pending.id));

        let pending = controller.begin_place_marker(LatLng::new(50.0, 20.0));
        assert_eq!(controller.complete_place_marker(pending.id, Some("  ".into())), None);
        assert_eq!(controller.surface().marker_count(), 0);
    }

    #[test]
    fn test_late_address_for_deleted_marker_is_ignored() {
        let (mut controller, _) = controller();
        let pending = controller.begin_place_marker(LatLng::new(50.0, 20.0));

        assert!(controller.delete_marker(pending.id));
        assert_eq!(controller.complete_place_marker(pending.id, Some("Late".into())), None);
        assert!(controller.markers().is_empty());
        assert_eq!(controller.surface().marker_count(), 0);
    }

    #[test]
    fn test_reassigning_role_clears_other_role() {
        let (mut controller, _) = controller();
        let a = place(&mut controller, 50.0, 20.0);
        let b = place(&mut controller, 50.1, 20.1);

        controller.select_as_role(a, Role::Start);
        controller.select_as_role(b, Role::Destination);
        assert!(controller.route().is_some());

        controller.select_as_role(b, Role::Start);
        assert_eq!(controller.roles().index(Role::Start), Some(1));
        assert_eq!(controller.roles().index(Role::Destination), None);
        assert_eq!(controller.marker(a).unwrap().icon(), MarkerIcon::Default);
        assert_eq!(controller.marker(b).unwrap().icon(), MarkerIcon::Start);
        assert!(controller.route().is_none());
        assert!(!controller.is_animating());
    }

    #[test]
    fn test_route_shows_prompt_then_distance() {
        let (mut controller, _) = controller();
        let a = place(&mut controller, 50.0, 20.0);
        let b = place(&mut controller, 50.0, 20.01);

        controller.select_as_role(a, Role::Start);
        controller.select_as_role(b, Role::Destination);

        let route = controller.route().unwrap();
        assert_eq!(
            controller.surface().info().anchor(),
            Some(InfoAnchor::At(route.midpoint()))
        );
        assert_eq!(
            controller.surface().info().content(),
            Some(&InfoContent::CalculatePrompt)
        );
        assert_eq!(
            controller.effects().style(UiElement::CalculateButton, "display"),
            Some("block")
        );
        assert_eq!(
            controller.marker(a).unwrap().animation(),
            MarkerAnimation::Bounce
        );

        controller.request_distance();
        let distance = controller.distance().unwrap();
        assert!((distance - 714.0).abs() < 5.0, "got {}", distance);
        match controller.surface().info().content() {
            Some(InfoContent::Distance(label)) => assert!(label.starts_with("Distance: ")),
            other => panic!("unexpected info content: {:?}", other),
        }
    }

    #[test]
    fn test_deselect_tears_down_route() {
        let (mut controller, ticker) = controller();
        let a = place(&mut controller, 50.0, 20.0);
        let b = place(&mut controller, 50.1, 20.1);
        controller.select_as_role(a, Role::Start);
        controller.select_as_role(b, Role::Destination);
        controller.request_distance();
        assert_eq!(ticker.active(), 1);

        assert!(controller.deselect_marker(a));
        assert!(controller.route().is_none());
        assert!(controller.surface().route().is_none());
        assert!(!controller.is_calculation_requested());
        assert_eq!(controller.distance(), None);
        assert_eq!(ticker.active(), 0);
        assert!(!controller.surface().info().is_visible());

        // Holds no role any more.
        assert!(!controller.deselect_marker(a));
    }

    #[test]
    fn test_stale_tick_does_not_move_arrow() {
        let (mut controller, ticker) = controller();
        let a = place(&mut controller, 50.0, 20.0);
        let b = place(&mut controller, 50.1, 20.1);
        controller.select_as_role(a, Role::Start);
        controller.select_as_role(b, Role::Destination);

        let stale = ticker.last_generation();
        controller.select_as_role(b, Role::Destination);
        assert_ne!(ticker.last_generation(), stale);
        assert_eq!(ticker.active(), 1);

        assert!(!controller.on_arrow_tick(stale));
        assert_eq!(controller.surface().arrow_updates(), 0);

        assert!(controller.on_arrow_tick(ticker.last_generation()));
        assert_eq!(controller.surface().arrow_offset(), Some(0.25));
    }

    #[test]
    fn test_fit_single_marker_is_padded() {
        let (mut controller, _) = controller();
        assert!(!controller.fit_all_markers());

        place(&mut controller, 50.0, 20.0);
        assert!(controller.fit_all_markers());

        let bounds = controller.surface().last_fit().unwrap();
        assert!((bounds.north_east.lat - 50.01).abs() < 1e-9);
        assert!((bounds.south_west.lng - 19.99).abs() < 1e-9);
    }

    #[test]
    fn test_first_idle_reveals_panel_once() {
        let (mut controller, _) = controller();
        controller.on_map_idle();
        controller.on_map_idle();

        let fades = controller
            .effects()
            .effects()
            .iter()
            .filter(|effect| {
                matches!(
                    effect,
                    crate::layers::headless::Effect::FadeIn(UiElement::TopPanel, FadeSpeed::Fast)
                )
            })
            .count();
        assert_eq!(fades, 1);
        assert_eq!(
            controller.effects().style(UiElement::TopPanel, "display"),
            Some("flex")
        );
    }
}
