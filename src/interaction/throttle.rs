use super::PointerEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    due_ms: f64,
    event: PointerEvent,
}

/// Rate limiter for one pointer event name.
///
/// An event dispatches immediately when at least `window_ms` elapsed since the
/// previous dispatch. Otherwise it replaces any pending event and is scheduled
/// as a trailing dispatch `window_ms` after its own timestamp. Every new event
/// cancels the previously scheduled trailing dispatch, so intermediate events
/// are dropped, never queued.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerThrottle {
    window_ms: f64,
    last_dispatch_ms: Option<f64>,
    pending: Option<Pending>,
}

impl PointerThrottle {
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(0.0),
            last_dispatch_ms: None,
            pending: None,
        }
    }

    #[must_use]
    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    pub fn set_window_ms(&mut self, window_ms: f64) {
        self.window_ms = window_ms.max(0.0);
    }

    /// Offers a new event; returns it when it should dispatch now.
    pub fn offer(&mut self, event: PointerEvent) -> Option<PointerEvent> {
        self.pending = None;
        let now = event.timestamp_ms;
        let open = self
            .last_dispatch_ms
            .is_none_or(|last| now - last >= self.window_ms);

        if open {
            self.last_dispatch_ms = Some(now);
            Some(event)
        } else {
            self.pending = Some(Pending {
                due_ms: now + self.window_ms,
                event,
            });
            None
        }
    }

    /// Releases the trailing event once its deadline has passed.
    ///
    /// The release is recorded at the deadline, not at `now_ms`, so a late
    /// poll does not push back the next leading dispatch.
    pub fn poll(&mut self, now_ms: f64) -> Option<PointerEvent> {
        let pending = self.pending?;
        if now_ms < pending.due_ms {
            return None;
        }
        self.pending = None;
        self.last_dispatch_ms = Some(pending.due_ms);
        Some(pending.event)
    }

    /// Time at which `poll` will release the pending event, if any.
    #[must_use]
    pub fn deadline_ms(&self) -> Option<f64> {
        self.pending.map(|pending| pending.due_ms)
    }

    pub fn reset(&mut self) {
        self.last_dispatch_ms = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::PointerThrottle;
    use crate::interaction::PointerEvent;

    fn run(throttle: &mut PointerThrottle, times: &[f64], flush_at: f64) -> Vec<f64> {
        let mut dispatched = Vec::new();
        for &time in times {
            if let Some(event) = throttle.poll(time) {
                dispatched.push(event.timestamp_ms);
            }
            if let Some(event) = throttle.offer(PointerEvent::moved(time, 0.0, time)) {
                dispatched.push(event.timestamp_ms);
            }
        }
        if let Some(event) = throttle.poll(flush_at) {
            dispatched.push(event.timestamp_ms);
        }
        dispatched
    }

    #[test]
    fn burst_inside_window_coalesces_to_leading_and_last() {
        let mut throttle = PointerThrottle::new(50.0);
        let dispatched = run(&mut throttle, &[0.0, 10.0, 20.0, 60.0], 1_000.0);
        assert_eq!(dispatched, vec![0.0, 60.0]);
    }

    #[test]
    fn trailing_event_fires_once_after_window() {
        let mut throttle = PointerThrottle::new(50.0);
        assert!(throttle.offer(PointerEvent::moved(1.0, 0.0, 0.0)).is_some());
        assert!(throttle.offer(PointerEvent::moved(2.0, 0.0, 10.0)).is_none());
        assert!(throttle.offer(PointerEvent::moved(3.0, 0.0, 30.0)).is_none());
        assert_eq!(throttle.deadline_ms(), Some(80.0));

        assert!(throttle.poll(79.0).is_none());
        let trailing = throttle.poll(80.0).expect("trailing dispatch");
        assert_eq!(trailing.client_x, 3.0);
        assert!(throttle.poll(500.0).is_none());
    }

    #[test]
    fn late_poll_keeps_next_event_leading() {
        let mut throttle = PointerThrottle::new(50.0);
        assert!(throttle.offer(PointerEvent::moved(1.0, 0.0, 0.0)).is_some());
        assert!(throttle.offer(PointerEvent::moved(2.0, 0.0, 30.0)).is_none());

        let trailing = throttle.poll(200.0).expect("overdue trailing dispatch");
        assert_eq!(trailing.timestamp_ms, 30.0);
        assert!(throttle.offer(PointerEvent::moved(3.0, 0.0, 200.0)).is_some());
    }

    #[test]
    fn zero_window_dispatches_everything() {
        let mut throttle = PointerThrottle::new(0.0);
        let dispatched = run(&mut throttle, &[0.0, 0.0, 1.0], 10.0);
        assert_eq!(dispatched, vec![0.0, 0.0, 1.0]);
    }
}
