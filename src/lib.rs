//! # Neurodrive - Evolutionary Driving Simulation
//!
//! A population of cars, each steered by a small feed-forward network,
//! learns collision-avoidant overtaking on a busy road through generational
//! search: every round the best network is kept, merged and mutated into
//! the next population. There is no gradient training.
//!
//! ## Features
//!
//! - Feed-forward autopilot brains (tanh activation) with mutation and merge
//! - Raycasting sensors against traffic and road borders
//! - Segment-test polygon collision, no physics engine
//! - Overtake/maneuver/distance fitness with an anti-stalling demerit
//! - Generation lifecycle with death and stall timers on an injected clock
//! - JSON key-value persistence for networks and UI configuration
//! - Real-time visualization with egui/macroquad
//!
//! ## Core Modules
//!
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::sensor`] - Raycasting perception
//! - [`simulation::vehicle`] - Kinematics and autopilot
//! - [`simulation::manager`] - Generation lifecycle
//! - [`simulation::store`] - Persistence collaborator

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural networks for vehicle autopilots.
    pub mod brain;
    /// Bounded log of recent events for the UI.
    pub mod event_log;
    /// Event queue for the parallel update phase.
    pub mod events;
    /// Points, shapes and segment intersection.
    pub mod geometry;
    /// Generation lifecycle manager.
    pub mod manager;
    /// Simulation parameters.
    pub mod params;
    /// Road geometry and borders.
    pub mod road;
    /// Fitness scoring.
    pub mod scoring;
    /// Raycasting sensor.
    pub mod sensor;
    /// Key-value persistence.
    pub mod store;
    /// Procedural traffic generation.
    pub mod traffic;
    /// Vehicle kinematics and autopilot.
    pub mod vehicle;
}

/// Macroquad rendering of the road, vehicles and sensor rays.
pub mod graphics;

/// egui panels: HUD, configuration, actions, plots and the event log.
pub mod ui;
