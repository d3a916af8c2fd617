//! Per-object observer registry.
//!
//! `EventHub` maps an event name to an ordered list of handlers. It is a thin
//! dispatch primitive: handler errors propagate out of `emit` unchanged.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::ChartResult;

/// Payloads carry a discriminating kind; payloads without one are not
/// dispatched.
pub trait EventPayload {
    fn event_kind(&self) -> Option<&str>;
}

/// Shared handler. Identity (for `off`) is the `Rc` allocation.
pub type Handler<P, C> = Rc<dyn Fn(&P, &mut C) -> ChartResult<()>>;

pub struct EventHub<P, C> {
    handlers: IndexMap<String, SmallVec<[Handler<P, C>; 2]>>,
}

impl<P, C> Default for EventHub<P, C> {
    fn default() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }
}

impl<P, C> fmt::Debug for EventHub<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, list) in &self.handlers {
            map.entry(name, &list.len());
        }
        map.finish()
    }
}

impl<P: EventPayload, C> EventHub<P, C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler`; duplicates are kept and each fires.
    pub fn on(&mut self, event_name: &str, handler: Handler<P, C>) {
        self.handlers
            .entry(event_name.to_owned())
            .or_default()
            .push(handler);
    }

    /// With a handler, removes its first registration under `event_name`.
    /// Without one, clears every handler for `event_name`.
    ///
    /// Returns the number of handlers removed.
    pub fn off(&mut self, event_name: &str, handler: Option<&Handler<P, C>>) -> usize {
        let Some(list) = self.handlers.get_mut(event_name) else {
            return 0;
        };

        match handler {
            Some(handler) => match list.iter().position(|entry| Rc::ptr_eq(entry, handler)) {
                Some(index) => {
                    list.remove(index);
                    1
                }
                None => 0,
            },
            None => {
                let removed = list.len();
                list.clear();
                removed
            }
        }
    }

    /// Invokes every handler for `event_name` in registration order.
    ///
    /// A missing payload, or one without a kind, is a no-op. The first handler
    /// error aborts the remaining handlers and is returned.
    pub fn emit(&self, event_name: &str, payload: Option<&P>, context: &mut C) -> ChartResult<()> {
        let Some(payload) = payload else {
            return Ok(());
        };
        if payload.event_kind().is_none() {
            return Ok(());
        }
        let Some(list) = self.handlers.get(event_name) else {
            return Ok(());
        };

        for handler in list {
            handler(payload, context)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers.get(event_name).map_or(0, |list| list.len())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{EventHub, EventPayload, Handler};
    use crate::error::{ChartError, ChartResult};

    struct Ping(Option<&'static str>);

    impl EventPayload for Ping {
        fn event_kind(&self) -> Option<&str> {
            self.0
        }
    }

    type Log = Vec<&'static str>;

    fn recorder(tag: &'static str) -> Handler<Ping, Log> {
        Rc::new(move |_: &Ping, log: &mut Log| -> ChartResult<()> {
            log.push(tag);
            Ok(())
        })
    }

    #[test]
    fn handlers_fire_in_registration_order_with_duplicates() {
        let mut hub = EventHub::new();
        let first = recorder("first");
        hub.on("move", first.clone());
        hub.on("move", recorder("second"));
        hub.on("move", first);

        let mut log = Log::new();
        hub.emit("move", Some(&Ping(Some("move"))), &mut log)
            .expect("emit");
        assert_eq!(log, vec!["first", "second", "first"]);
    }

    #[test]
    fn off_with_handler_removes_only_first_match_for_that_name() {
        let mut hub = EventHub::new();
        let shared = recorder("shared");
        hub.on("move", shared.clone());
        hub.on("move", shared.clone());
        hub.on("click", shared.clone());

        assert_eq!(hub.off("move", Some(&shared)), 1);
        assert_eq!(hub.handler_count("move"), 1);
        assert_eq!(hub.handler_count("click"), 1);
    }

    #[test]
    fn off_without_handler_clears_name() {
        let mut hub = EventHub::new();
        hub.on("move", recorder("a"));
        hub.on("move", recorder("b"));
        hub.on("click", recorder("c"));

        assert_eq!(hub.off("move", None), 2);
        assert_eq!(hub.handler_count("move"), 0);
        assert_eq!(hub.handler_count("click"), 1);
        assert_eq!(hub.off("missing", None), 0);
    }

    #[test]
    fn emit_ignores_missing_or_kindless_payload() {
        let mut hub = EventHub::new();
        hub.on("move", recorder("fired"));

        let mut log = Log::new();
        hub.emit("move", None, &mut log).expect("emit");
        hub.emit("move", Some(&Ping(None)), &mut log).expect("emit");
        assert!(log.is_empty());
    }

    #[test]
    fn handler_error_propagates_and_stops_later_handlers() {
        let mut hub: EventHub<Ping, Log> = EventHub::new();
        hub.on(
            "click",
            Rc::new(|_: &Ping, _: &mut Log| -> ChartResult<()> {
                Err(ChartError::InvalidData("boom".to_owned()))
            }),
        );
        hub.on("click", recorder("after"));

        let mut log = Log::new();
        let result = hub.emit("click", Some(&Ping(Some("click"))), &mut log);
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
        assert!(log.is_empty());
    }
}
