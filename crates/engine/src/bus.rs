//! Event fan-out to subscribed sinks.
//!
//! Delivery is synchronous and best effort: a sink that fails (closed channel,
//! broken pipe) is logged and skipped, never propagated back into the game.

use std::io::Write;
use std::sync::mpsc;

use tracing::warn;

use crate::core::GameEvent;

/// Receiver of game notifications
pub trait EventSink {
    fn publish(&mut self, event: &GameEvent);
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F: FnMut(&GameEvent)> EventSink for FnSink<F> {
    fn publish(&mut self, event: &GameEvent) {
        (self.0)(event)
    }
}

impl EventSink for mpsc::Sender<GameEvent> {
    fn publish(&mut self, event: &GameEvent) {
        // Receiver dropped; nothing left to notify.
        let _ = self.send(event.clone());
    }
}

/// Writes one JSON object per event, newline terminated
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &GameEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn publish(&mut self, event: &GameEvent) {
        if let Err(err) = self.write_event(event) {
            warn!(event = event.name(), error = %err, "failed to write event");
        }
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(u32);

#[derive(Default)]
pub struct EventBus {
    sinks: Vec<(SinkId, Box<dyn EventSink>)>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) -> SinkId {
        let id = SinkId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.sinks.push((id, Box::new(sink)));
        id
    }

    pub fn subscribe_fn(&mut self, f: impl FnMut(&GameEvent) + 'static) -> SinkId {
        self.subscribe(FnSink(f))
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SinkId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sid, _)| *sid != id);
        self.sinks.len() != before
    }

    /// Deliver to every sink in subscription order
    pub fn publish(&mut self, event: &GameEvent) {
        for (_, sink) in &mut self.sinks {
            sink.publish(event);
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tick(ms: u64) -> GameEvent {
        GameEvent::TimeTick { time_played: ms }
    }

    #[test]
    fn delivers_to_all_sinks_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let a = Rc::clone(&seen);
        bus.subscribe_fn(move |e| a.borrow_mut().push(("a", e.clone())));
        let b = Rc::clone(&seen);
        bus.subscribe_fn(move |e| b.borrow_mut().push(("b", e.clone())));

        bus.publish(&tick(1));

        assert_eq!(*seen.borrow(), vec![("a", tick(1)), ("b", tick(1))]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let (tx, rx) = mpsc::channel();
        let mut bus = EventBus::new();
        let id = bus.subscribe(tx);

        bus.publish(&tick(1));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&tick(2));

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![tick(1)]);
        assert!(bus.is_empty());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut bus = EventBus::new();
        bus.subscribe(tx);
        bus.publish(&tick(1));
    }

    #[test]
    fn json_lines_output() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.publish(&tick(1000));
        sink.publish(&GameEvent::ComboUpdated {
            combo: 0,
            is_reset: true,
        });

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"event":"time:tick","payload":{"timePlayed":1000}}"#
        );
        assert_eq!(
            lines[1],
            r#"{"event":"combo:updated","payload":{"combo":0,"isReset":true}}"#
        );
    }
}
