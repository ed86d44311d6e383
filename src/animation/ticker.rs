//! Tick schedulers for the route arrow animation

use crate::{runtime::AsyncHandle, traits::TickScheduler};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

/// Scheduler that never fires on its own.
///
/// The host (or a test) drives frames by calling the controller's tick
/// handler with [`ManualTicker::last_generation`]. It keeps count of timers
/// that were started but not yet cancelled.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: Arc<AtomicUsize>,
    started: Arc<AtomicUsize>,
    last_generation: Arc<AtomicU64>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers started and not cancelled
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn last_generation(&self) -> u64 {
        self.last_generation.load(Ordering::SeqCst)
    }
}

impl TickScheduler for ManualTicker {
    fn start(&mut self, interval: Duration, generation: u64) -> Box<dyn AsyncHandle> {
        log::trace!("manual ticker started: generation {} every {:?}", generation, interval);
        self.active.fetch_add(1, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
        self.last_generation.store(generation, Ordering::SeqCst);
        Box::new(ManualHandle {
            active: self.active.clone(),
            cancelled: AtomicBool::new(false),
        })
    }
}

struct ManualHandle {
    active: Arc<AtomicUsize>,
    cancelled: AtomicBool,
}

impl AsyncHandle for ManualHandle {
    fn is_finished(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[cfg(feature = "tokio-runtime")]
pub use tokio_ticker::TokioTicker;

#[cfg(feature = "tokio-runtime")]
mod tokio_ticker {
    use super::*;
    use crate::{input::events::MapEvent, runtime};
    use futures::channel::mpsc::UnboundedSender;

    /// Posts `MapEvent::ArrowTick` into a session's event queue on a tokio interval
    pub struct TokioTicker {
        events: UnboundedSender<MapEvent>,
    }

    impl TokioTicker {
        pub fn new(events: UnboundedSender<MapEvent>) -> Self {
            Self { events }
        }
    }

    impl TickScheduler for TokioTicker {
        fn start(&mut self, interval: Duration, generation: u64) -> Box<dyn AsyncHandle> {
            let events = self.events.clone();
            runtime::spawn(async move {
                let mut interval = ::tokio::time::interval(interval);
                // The first tick completes immediately; the arrow moves one period later.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    if events
                        .unbounded_send(MapEvent::ArrowTick { generation })
                        .is_err()
                    {
                        log::debug!("arrow timer {} stopping: session closed", generation);
                        break;
                    }
                }
            })
        }
    }
}
