//! Event queue for the parallel per-car update phase.
//!
//! Cars are updated in parallel and may only mutate themselves; anything
//! that touches shared state (here: the event log) is collected as an event
//! and applied serially afterwards.

use super::event_log::{EventColor, EventLog};

/// State changes produced during the parallel update.
#[derive(Debug, Clone)]
pub enum SimulationEvent {
    /// A car hit traffic or a border.
    CarCrashed {
        /// Index of the car in the population.
        car: usize,
        /// Its score at the moment of the crash.
        score: f32,
    },
    /// A car raised the generation's best overtake count.
    MeritAdvanced {
        /// Index of the car in the population.
        car: usize,
        /// New overtake count.
        merit: u32,
    },
}

/// Queue collecting events from the parallel phase.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Drains all queued events.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.drain(..)
    }
}

/// Applies queued events serially to the event log.
pub fn apply_events(log: &mut EventLog, time: f64, mut queue: EventQueue) {
    for event in queue.drain() {
        match event {
            SimulationEvent::CarCrashed { car, score } => {
                log.log(
                    time,
                    format!("car {car} crashed at score {score:.1}"),
                    EventColor::Crash,
                );
            }
            SimulationEvent::MeritAdvanced { car, merit } => {
                log.log(
                    time,
                    format!("car {car} leads with {merit} overtakes"),
                    EventColor::Record,
                );
            }
        }
    }
}
