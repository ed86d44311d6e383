use pinroute::input::EventHandled;
use pinroute::prelude::*;
use pinroute::runtime::{spawners::tokio_impl::TokioSpawner, AsyncSpawner};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::timeout;

/// Sessions fed through their event queue, with lookups and arrow ticks
/// running on the tokio runtime
#[cfg(test)]
mod session_tests {
    use super::*;

    type Session = MapSession<HeadlessSurface, HeadlessEffects>;

    fn session() -> Session {
        let rynek = PlaceGeometry {
            location: LatLng::new(50.0617, 19.9373),
            viewport: None,
        };
        let geocoder = StaticGeocoder::new()
            .with_address(LatLng::new(50.0617, 19.9373), "Rynek Główny, Kraków, Polska")
            .with_address(LatLng::new(50.0540, 19.9354), "Wawel 5, Kraków, Polska")
            .with_place("Rynek Główny", rynek);

        let builder = ControllerBuilder::new().with_geocoder(Arc::new(geocoder.clone()));
        MapSession::new(builder, HeadlessSurface::new(), HeadlessEffects::new())
            .unwrap()
            .with_place_search(Arc::new(geocoder))
    }

    /// Handles queued events until `done` holds for the handled event
    async fn step_until(session: &mut Session, done: impl Fn(&Session) -> bool) {
        timeout(Duration::from_secs(5), async {
            while !done(session) {
                if session.step().await.is_none() {
                    break;
                }
            }
        })
        .await
        .expect("session did not reach the expected state");
    }

    #[tokio::test]
    async fn test_click_places_marker_after_lookup() {
        let mut session = session();
        let sender = session.sender();

        sender
            .unbounded_send(MapEvent::MapClicked(LatLng::new(50.0617, 19.9373)))
            .unwrap();
        step_until(&mut session, |s| !s.controller().markers().is_empty()).await;

        let marker = &session.controller().markers()[0];
        assert_eq!(marker.address(), "Rynek Główny,<br>Kraków,<br>Polska");
        assert_eq!(session.controller().surface().marker_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_rendered() {
        let mut session = session();
        let sender = session.sender();

        sender
            .unbounded_send(MapEvent::MapClicked(LatLng::new(0.0, 0.0)))
            .unwrap();
        step_until(&mut session, |s| s.controller().pending_count() == 1).await;
        step_until(&mut session, |s| s.controller().pending_count() == 0).await;

        assert!(session.controller().markers().is_empty());
        assert_eq!(session.controller().surface().marker_count(), 0);
    }

    #[tokio::test]
    async fn test_address_for_deleted_marker_is_ignored() {
        let mut session = session();
        let sender = session.sender();

        sender
            .unbounded_send(MapEvent::MapClicked(LatLng::new(50.0617, 19.9373)))
            .unwrap();
        sender
            .unbounded_send(MapEvent::MarkerRightClicked(MarkerId(0)))
            .unwrap();

        assert_eq!(session.step().await, Some(EventHandled::Handled));
        assert_eq!(session.step().await, Some(EventHandled::Handled));
        assert_eq!(session.step().await, Some(EventHandled::NotHandled));

        assert!(session.controller().markers().is_empty());
        assert_eq!(session.controller().surface().marker_count(), 0);
    }

    #[tokio::test]
    async fn test_route_arrow_animates() {
        let mut session = session();
        let sender = session.sender();

        sender
            .unbounded_send(MapEvent::MapClicked(LatLng::new(50.0617, 19.9373)))
            .unwrap();
        step_until(&mut session, |s| s.controller().markers().len() == 1).await;
        sender.unbounded_send(MapEvent::StartPressed).unwrap();

        sender
            .unbounded_send(MapEvent::MapClicked(LatLng::new(50.0540, 19.9354)))
            .unwrap();
        step_until(&mut session, |s| s.controller().markers().len() == 2).await;
        sender.unbounded_send(MapEvent::DestinationPressed).unwrap();
        step_until(&mut session, |s| s.controller().route().is_some()).await;

        step_until(&mut session, |s| s.controller().surface().arrow_updates() >= 3).await;
        let offset = session.controller().surface().arrow_offset().unwrap();
        assert!(offset > 0.0 && offset < 100.0, "offset {}", offset);

        sender.unbounded_send(MapEvent::CalculatePressed).unwrap();
        step_until(&mut session, |s| s.controller().is_calculation_requested()).await;
        match session.controller().surface().info().content() {
            Some(InfoContent::Distance(label)) => assert!(label.ends_with(" m"), "{}", label),
            other => panic!("unexpected info content: {:?}", other),
        }

        sender.unbounded_send(MapEvent::DeselectPressed).unwrap();
        step_until(&mut session, |s| !s.controller().is_animating()).await;
        assert!(session.controller().surface().route().is_none());
    }

    #[tokio::test]
    async fn test_search_places_marker() {
        let mut session = session();
        let sender = session.sender();

        sender
            .unbounded_send(MapEvent::SearchSubmitted("rynek główny".to_string()))
            .unwrap();
        step_until(&mut session, |s| !s.controller().markers().is_empty()).await;

        assert_eq!(session.controller().surface().zoom(), 17.0);
        assert_eq!(
            session.controller().markers()[0].position(),
            LatLng::new(50.0617, 19.9373)
        );
    }

    /// Delegates to tokio and counts what it was asked to run
    struct CountingSpawner {
        spawned: Arc<AtomicUsize>,
    }

    impl AsyncSpawner for CountingSpawner {
        fn spawn_boxed(
            &self,
            future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
        ) -> Box<dyn AsyncHandle> {
            self.spawned.fetch_add(1, Ordering::SeqCst);
            TokioSpawner.spawn_boxed(future)
        }
    }

    #[tokio::test]
    async fn test_lookups_run_on_session_spawner() {
        let spawned = Arc::new(AtomicUsize::new(0));
        let mut session = session().with_spawner(Arc::new(CountingSpawner {
            spawned: spawned.clone(),
        }));
        let sender = session.sender();

        sender
            .unbounded_send(MapEvent::MapClicked(LatLng::new(50.0617, 19.9373)))
            .unwrap();
        sender
            .unbounded_send(MapEvent::SearchSubmitted("Rynek Główny".to_string()))
            .unwrap();
        step_until(&mut session, |s| s.controller().markers().len() == 2).await;

        // Click lookup, search, and the lookup for the searched place.
        assert_eq!(spawned.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut session = session();
        let sender = session.sender();

        sender.unbounded_send(MapEvent::MapIdle).unwrap();
        sender.unbounded_send(MapEvent::CloseGuidePressed).unwrap();
        sender.unbounded_send(MapEvent::Shutdown).unwrap();
        timeout(Duration::from_secs(5), session.run())
            .await
            .unwrap()
            .unwrap();

        let effects = session.controller().effects();
        assert!(effects.is_shown(UiElement::TopPanel));
        assert!(effects.is_shown(UiElement::GuideIcon));
        assert!(!session.controller().guide().is_visible());
    }
}
