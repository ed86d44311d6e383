//! Event loop around a [`RouteController`]
//!
//! A session owns the controller and an unbounded event queue. Host UIs push
//! [`MapEvent`]s through [`MapSession::sender`]; address lookups and place
//! searches run as spawned futures that post their outcome back into the
//! same queue, so the controller only ever sees one event at a time.

use crate::{
    controller::{PendingMarker, RouteController},
    core::{builder::ControllerBuilder, selection::Role},
    input::events::{EventHandled, MapEvent},
    prelude::{Arc, Future},
    runtime::{self, AsyncHandle, AsyncSpawner},
    traits::{MapSurface, PlaceSearch, UiEffects},
    Result,
};
use futures::{
    channel::mpsc::{self, UnboundedReceiver, UnboundedSender},
    StreamExt,
};

pub struct MapSession<S: MapSurface, U: UiEffects> {
    controller: RouteController<S, U>,
    sender: UnboundedSender<MapEvent>,
    receiver: UnboundedReceiver<MapEvent>,
    search: Option<Arc<dyn PlaceSearch>>,
    spawner: Option<Arc<dyn AsyncSpawner>>,
}

impl<S: MapSurface, U: UiEffects> MapSession<S, U> {
    /// Builds the controller with an arrow timer that feeds this session's queue
    pub fn new(builder: ControllerBuilder, surface: S, effects: U) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded();

        #[cfg(feature = "tokio-runtime")]
        let builder = builder.with_ticker(Box::new(
            crate::animation::ticker::TokioTicker::new(sender.clone()),
        ));

        let controller = builder.build(surface, effects)?;
        Ok(Self {
            controller,
            sender,
            receiver,
            search: None,
            spawner: None,
        })
    }

    /// Keeps whatever tick scheduler the builder was given
    pub fn with_controller(controller: RouteController<S, U>) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            controller,
            sender,
            receiver,
            search: None,
            spawner: None,
        }
    }

    pub fn with_place_search(mut self, search: Arc<dyn PlaceSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Runs lookups and searches on `spawner` instead of the global runtime
    pub fn with_spawner(mut self, spawner: Arc<dyn AsyncSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub fn sender(&self) -> UnboundedSender<MapEvent> {
        self.sender.clone()
    }

    pub fn controller(&self) -> &RouteController<S, U> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RouteController<S, U> {
        &mut self.controller
    }

    pub fn into_controller(self) -> RouteController<S, U> {
        self.controller
    }

    /// Initialises the controller and handles events until `Shutdown`
    pub async fn run(&mut self) -> Result<()> {
        self.controller.init();
        log::info!("map session started");

        while let Some(event) = self.receiver.next().await {
            if event == MapEvent::Shutdown {
                break;
            }
            self.handle_event(event);
        }

        log::info!("map session stopped");
        Ok(())
    }

    /// Waits for the next queued event and handles it.
    ///
    /// Returns `None` once `Shutdown` is received.
    pub async fn step(&mut self) -> Option<EventHandled> {
        match self.receiver.next().await {
            Some(MapEvent::Shutdown) | None => None,
            Some(event) => Some(self.handle_event(event)),
        }
    }

    /// Handles every event already queued without waiting for more
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(Some(event)) = self.receiver.try_next() {
            if event == MapEvent::Shutdown {
                break;
            }
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    pub fn handle_event(&mut self, event: MapEvent) -> EventHandled {
        if !event.is_internal() {
            log::debug!("event: {:?}", event);
        }

        let controller = &mut self.controller;
        let handled = match event {
            MapEvent::MapClicked(position) => {
                let pending = controller.begin_place_marker(position);
                self.lookup_address(pending);
                true
            }
            MapEvent::MapIdle => {
                controller.on_map_idle();
                true
            }
            MapEvent::PlaceSelected(place) => match controller.on_place_selected(place) {
                Some(pending) => {
                    self.lookup_address(pending);
                    true
                }
                None => false,
            },
            MapEvent::SearchSubmitted(query) => self.search_place(query),
            MapEvent::MarkerClicked(id) => controller.on_marker_clicked(id),
            MapEvent::MarkerRightClicked(id) => controller.on_marker_right_clicked(id),
            MapEvent::MarkerDragged { id, position } => {
                match controller.on_marker_dragged(id, position) {
                    Some(pending) => {
                        self.lookup_address(pending);
                        true
                    }
                    None => false,
                }
            }
            MapEvent::RouteClicked => controller.on_route_clicked(),
            MapEvent::StartPressed => controller.select_selected_as(Role::Start),
            MapEvent::DestinationPressed => controller.select_selected_as(Role::Destination),
            MapEvent::DeletePressed => controller.delete_selected(),
            MapEvent::DeleteAllPressed => controller.delete_all() > 0,
            MapEvent::DeselectPressed => controller.deselect_selected(),
            MapEvent::CalculatePressed => {
                controller.request_distance();
                true
            }
            MapEvent::FitMapPressed => controller.fit_all_markers(),
            MapEvent::GuideIconPressed => {
                controller.show_guide();
                true
            }
            MapEvent::CloseGuidePressed => {
                if let Err(e) = controller.dismiss_guide() {
                    log::warn!("could not persist onboarding flag: {}", e);
                }
                true
            }
            MapEvent::AddressResolved { id, address } => {
                controller.complete_place_marker(id, address).is_some()
            }
            MapEvent::ArrowTick { generation } => controller.on_arrow_tick(generation),
            MapEvent::Shutdown => false,
        };

        handled.into()
    }

    fn spawn<F>(&self, future: F) -> Box<dyn AsyncHandle>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match &self.spawner {
            Some(spawner) => spawner.spawn_boxed(Box::pin(future)),
            None => runtime::spawn(future),
        }
    }

    fn lookup_address(&self, pending: PendingMarker) {
        let geocoder = self.controller.geocoder();
        let sender = self.sender.clone();

        self.spawn(async move {
            let address = match geocoder.reverse(pending.position).await {
                Ok(address) => Some(address),
                Err(e) => {
                    log::warn!("reverse geocoding failed for {}: {}", pending.position, e);
                    None
                }
            };
            let _ = sender.unbounded_send(MapEvent::AddressResolved {
                id: pending.id,
                address,
            });
        });
    }

    fn search_place(&self, query: String) -> bool {
        let Some(search) = self.search.clone() else {
            log::warn!("no place search configured, ignoring {:?}", query);
            return false;
        };
        let sender = self.sender.clone();

        self.spawn(async move {
            match search.search(&query).await {
                Ok(place) => {
                    if place.is_none() {
                        log::info!("no place found for {:?}", query);
                    }
                    let _ = sender.unbounded_send(MapEvent::PlaceSelected(place));
                }
                Err(e) => log::warn!("place search for {:?} failed: {}", query, e),
            }
        });
        true
    }
}
