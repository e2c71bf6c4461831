mod event;

pub use event::{
    Event, PayloadBreakpointChanged, PayloadOrientationChanged, PayloadScaleChanged,
    PayloadZoomIndicatorChanged,
};

/// Generic sink receiving stage events.
///
/// Works with `crossbeam::channel::Sender<Event>`, closures `Fn(Event)`, or
/// custom implementations.
pub trait EventSink {
    fn send(&self, event: Event);
}

impl EventSink for crossbeam::channel::Sender<Event> {
    fn send(&self, event: Event) {
        // Disconnected consumers just miss events.
        let _ = self.try_send(event);
    }
}

impl<F> EventSink for F
where
    F: Fn(Event),
{
    fn send(&self, event: Event) {
        self(event);
    }
}
