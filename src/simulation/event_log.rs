//! Bounded log of recent simulation events for the UI panel.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A logged event for display in the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Timestamp when the event occurred.
    pub time: f64,
    /// Human-readable description.
    pub description: String,
    /// Color hint for the UI.
    pub color: EventColor,
}

/// Color categories for events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum EventColor {
    /// A car crashed (red).
    Crash,
    /// A new overtake record (yellow).
    Record,
    /// Generation turnover (green).
    Evolution,
    /// A network was saved or restored (blue).
    Persistence,
}

/// Event log that keeps the most recent events, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<LoggedEvent>,
    max_events: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(20)
    }
}

impl EventLog {
    /// Creates a log with the given capacity.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Adds an event, dropping the oldest past capacity.
    pub fn log(&mut self, time: f64, description: String, color: EventColor) {
        self.events.push_front(LoggedEvent {
            time,
            description,
            color,
        });

        while self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// All events, newest first.
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.events
    }

    /// Clears the log.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
