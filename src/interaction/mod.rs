mod deferred;
mod throttle;

pub use deferred::{DeferredQueue, DeferredTask};
pub use throttle::PointerThrottle;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::events::EventPayload;

/// Pointer activity tracked on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Click,
    Move,
}

impl PointerKind {
    pub const ALL: [Self; 2] = [Self::Click, Self::Move];

    /// Event name used when dispatching through an `EventHub`.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Move => "move",
        }
    }
}

/// Raw pointer input in host viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub client_x: f64,
    pub client_y: f64,
    pub timestamp_ms: f64,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerKind, client_x: f64, client_y: f64, timestamp_ms: f64) -> Self {
        Self {
            kind,
            client_x,
            client_y,
            timestamp_ms,
        }
    }

    #[must_use]
    pub const fn click(client_x: f64, client_y: f64, timestamp_ms: f64) -> Self {
        Self::new(PointerKind::Click, client_x, client_y, timestamp_ms)
    }

    #[must_use]
    pub const fn moved(client_x: f64, client_y: f64, timestamp_ms: f64) -> Self {
        Self::new(PointerKind::Move, client_x, client_y, timestamp_ms)
    }
}

impl EventPayload for PointerEvent {
    fn event_kind(&self) -> Option<&str> {
        Some(self.kind.event_name())
    }
}

/// Cursor cue the host shows over the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerAffordance {
    #[default]
    Default,
    Pointer,
}

/// Host capability for switching the cursor cue.
pub trait PointerAffordanceSink {
    fn set_affordance(&mut self, affordance: PointerAffordance);
}

impl<T: PointerAffordanceSink> PointerAffordanceSink for Rc<RefCell<T>> {
    fn set_affordance(&mut self, affordance: PointerAffordance) {
        self.borrow_mut().set_affordance(affordance);
    }
}

/// Sink for hosts without a cursor concept.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAffordance;

impl PointerAffordanceSink for NoopAffordance {
    fn set_affordance(&mut self, _affordance: PointerAffordance) {}
}
