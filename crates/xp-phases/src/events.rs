//! Change notifications delivered synchronously to registered observers.

use std::sync::mpsc::Sender;
use xp_core::{Id, ObserverId};

/// What changed in a [`PhaseStore`](crate::PhaseStore). Indices are positions at emission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    PhaseAdded,
    PhaseRemoved(usize),
    PhaseChanged(usize),
    PhaseReloaded(usize),
    ReflectionAdded(usize),
    ReflectionDeleted { phase: usize, reflection: usize },
}

/// Receiver of store notifications.
pub trait PhaseObserver {
    fn notify(&mut self, event: &PhaseEvent);
}

impl<F> PhaseObserver for F
where
    F: FnMut(&PhaseEvent),
{
    fn notify(&mut self, event: &PhaseEvent) {
        self(event)
    }
}

/// Forward events to a channel, e.g. a display thread draining a `Receiver`.
impl PhaseObserver for Sender<PhaseEvent> {
    fn notify(&mut self, event: &PhaseEvent) {
        // A dropped receiver just stops listening.
        let _ = self.send(*event);
    }
}

/// Registration list with stable handles.
#[derive(Default)]
pub struct ObserverList {
    next: u32,
    observers: Vec<(ObserverId, Box<dyn PhaseObserver>)>,
}

impl ObserverList {
    pub fn subscribe(&mut self, observer: Box<dyn PhaseObserver>) -> ObserverId {
        let id = Id::from_index(self.next);
        self.next += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` if the handle was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver in registration order.
    pub fn emit(&mut self, event: PhaseEvent) {
        tracing::trace!(?event, observers = self.observers.len(), "emit");
        for (_, observer) in &mut self.observers {
            observer.notify(&event);
        }
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}
