use dispatch_core::clock::TripEvent;
use dispatch_core::dispatcher::Dispatcher;

/// Collects every event emitted while stepping a dispatcher.
#[derive(Debug, Default)]
pub struct TickRecorder {
    pub events: Vec<TripEvent>,
    pub ticks: u64,
}

impl TickRecorder {
    pub fn step(&mut self, dispatcher: &mut Dispatcher) -> &[TripEvent] {
        let start = self.events.len();
        self.events.extend(dispatcher.tick());
        self.ticks += 1;
        &self.events[start..]
    }

    pub fn step_n(&mut self, dispatcher: &mut Dispatcher, n: u64) {
        for _ in 0..n {
            self.step(dispatcher);
        }
    }

    /// Ticks until the dispatcher reports no active trip, up to `limit` ticks.
    pub fn drain(&mut self, dispatcher: &mut Dispatcher, limit: u64) {
        while self.ticks < limit && !dispatcher.snapshot().active_trips.is_empty() {
            self.step(dispatcher);
        }
    }
}
