//! Event dispatch to subscribers and cross-thread taps.

use std::fmt;

use crossbeam_channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;

use crate::event::{Event, EventKind};

/// A subscriber callback. Runs synchronously at emission, in
/// subscription order.
pub type Subscriber = Box<dyn FnMut(&Event) + Send>;

/// Dispatches events to per-kind subscriber lists and to any attached
/// channels.
///
/// Subscribers are keyed by event kind; within a kind they run in the
/// order they subscribed. Channel taps receive every event (all kinds)
/// as owned clones, letting a host thread — a renderer, a debug panel —
/// consume the stream without sharing the VM.
#[derive(Default)]
pub struct EventBus {
    subscribers: IndexMap<EventKind, Vec<Subscriber>>,
    taps: Vec<Sender<Event>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "subscribers",
                &self
                    .subscribers
                    .iter()
                    .map(|(kind, subs)| (kind, subs.len()))
                    .collect::<Vec<_>>(),
            )
            .field("taps", &self.taps.len())
            .finish()
    }
}

impl EventBus {
    /// An empty bus.
    pub fn new() -> EventBus {
        EventBus::default()
    }

    /// Register a callback for one event kind.
    pub fn subscribe(&mut self, kind: EventKind, subscriber: Subscriber) {
        self.subscribers.entry(kind).or_default().push(subscriber);
    }

    /// Attach a channel receiving every event. The sender half lives in
    /// the bus; dropping the returned receiver detaches the tap at the
    /// next emission.
    pub fn attach_channel(&mut self) -> Receiver<Event> {
        let (tx, rx) = unbounded();
        self.taps.push(tx);
        rx
    }

    /// Dispatch one event: kind subscribers first, in order, then the
    /// channel taps.
    pub fn emit(&mut self, event: &Event) {
        if let Some(list) = self.subscribers.get_mut(&event.kind()) {
            for subscriber in list.iter_mut() {
                subscriber(event);
            }
        }
        self.taps.retain(|tap| tap.send(event.clone()).is_ok());
    }

    /// Number of registered subscribers across all kinds.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.values().map(Vec::len).sum()
    }
}
