use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::ecs::{DriverId, RideId};
use crate::spatial::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripEventKind {
    Pickup,
    Dropoff,
}

/// Emitted by a tick when a driver reaches the target of its current leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripEvent {
    #[serde(rename = "type")]
    pub kind: TripEventKind,
    pub ride_id: RideId,
    pub driver_id: DriverId,
    pub location: Location,
    pub tick: u64,
}

/// Discrete simulation time, counted in ticks.
#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Starts the next tick and returns its number.
    pub fn advance(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}

/// Events produced during the current tick, drained by the caller afterwards.
#[derive(Debug, Default, Resource)]
pub struct TickEvents(pub Vec<TripEvent>);

impl TickEvents {
    pub fn push(&mut self, event: TripEvent) {
        self.0.push(event);
    }

    pub fn drain(&mut self) -> Vec<TripEvent> {
        std::mem::take(&mut self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_one_tick_at_a_time() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.now(), 2);
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = TripEvent {
            kind: TripEventKind::Pickup,
            ride_id: RideId::new("ride_1"),
            driver_id: DriverId::new("driver_1"),
            location: Location::new(3, 2),
            tick: 5,
        };
        let value = serde_json::to_value(&event).expect("json");
        assert_eq!(value["type"], "pickup");
        assert_eq!(value["ride_id"], "ride_1");
        assert_eq!(value["driver_id"], "driver_1");
        assert_eq!(value["location"]["x"], 3);
        assert_eq!(value["location"]["y"], 2);
        assert_eq!(value["tick"], 5);
    }

    #[test]
    fn tick_events_drain_empties_buffer() {
        let mut events = TickEvents::default();
        events.push(TripEvent {
            kind: TripEventKind::Dropoff,
            ride_id: RideId::new("ride_1"),
            driver_id: DriverId::new("driver_1"),
            location: Location::new(0, 0),
            tick: 1,
        });
        assert_eq!(events.drain().len(), 1);
        assert!(events.drain().is_empty());
    }
}
