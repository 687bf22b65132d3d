//! Generation lifecycle: population spawning, per-frame updates, death and
//! stall timers, game-over detection and round transitions.
//!
//! The manager is driven by three logically concurrent event sources on one
//! thread: the frame callback and two interval timers. Timers are plain
//! deadlines against a caller-supplied clock, so tests inject fake times
//! instead of waiting. The one ordering rule that matters: timers are always
//! cancelled before `restart` mutates the population, so a stale tick can
//! never fire against cars that have been replaced.

use rayon::prelude::*;
use std::sync::Mutex;

use super::brain::{Brain, BrainSnapshot};
use super::event_log::{EventColor, EventLog};
use super::events::{self, EventQueue, SimulationEvent};
use super::geometry::{Shape, point};
use super::params::Params;
use super::road::Road;
use super::store::{self, KeyValueStore};
use super::traffic;
use super::vehicle::{ControlSource, Vehicle};

/// Ticks produced by the interval timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerTick {
    /// Crash stragglers and advance the traffic wavefront.
    DeathCheck,
    /// Demerit bookkeeping for stalled cars.
    StallCheck,
}

/// Deadline-based replacement for wall-clock interval timers.
///
/// Cancellation is best-effort immediate: it only prevents future ticks,
/// it never interrupts one being processed.
#[derive(Debug, Default)]
struct Scheduler {
    next_death_check: Option<f64>,
    next_stall_check: Option<f64>,
}

impl Scheduler {
    /// Arms both timers relative to `now`.
    fn start(&mut self, now: f64, params: &Params) {
        self.next_death_check = Some(now + params.death_check_interval);
        self.next_stall_check = Some(now + params.stall_check_interval);
    }

    /// Disarms both timers.
    fn cancel(&mut self) {
        self.next_death_check = None;
        self.next_stall_check = None;
    }

    /// Returns the ticks due at `now`, at most one per timer, and re-arms
    /// each fired timer relative to `now` so a stalled frame cannot cause a
    /// burst of catch-up ticks.
    fn poll(&mut self, now: f64, params: &Params) -> Vec<TimerTick> {
        let mut ticks = Vec::new();

        if let Some(deadline) = self.next_death_check {
            if now >= deadline {
                ticks.push(TimerTick::DeathCheck);
                self.next_death_check = Some(now + params.death_check_interval);
            }
        }
        if let Some(deadline) = self.next_stall_check {
            if now >= deadline {
                ticks.push(TimerTick::StallCheck);
                self.next_stall_check = Some(now + params.stall_check_interval);
            }
        }

        ticks
    }
}

/// The generation's mutable snapshot. Replaced in content, not identity, on
/// every restart.
#[derive(Debug, Default)]
pub struct SimulationState {
    /// The population of racers.
    pub cars: Vec<Vehicle>,
    /// Obstacle vehicles.
    pub traffic: Vec<Vehicle>,
    /// Indices of undamaged cars, recomputed every update.
    pub alive: Vec<usize>,
    /// Camera-followed car.
    pub active: usize,
    /// Best-scoring car of the generation.
    pub best: usize,
    /// Set when every car is damaged.
    pub game_over: bool,
    /// When the game-over screen went up.
    pub game_over_at: Option<f64>,
    /// Frame counter for this generation.
    pub ticks: u64,
    /// Traffic row index cars must keep up with.
    pub wavefront: usize,
    /// Highest overtake count seen this generation.
    pub best_merit: u32,
}

/// Orchestrates the simulation across generations.
pub struct Manager {
    /// Simulation parameters.
    pub params: Params,
    /// Road geometry.
    pub road: Road,
    /// Live generation state.
    pub state: SimulationState,
    /// Recent events for the UI.
    pub event_log: EventLog,
    /// Completed restart count.
    pub generation: u32,
    store: Box<dyn KeyValueStore>,
    scheduler: Scheduler,
}

impl Manager {
    /// Creates a manager and spawns the first generation.
    pub fn new(params: Params, store: Box<dyn KeyValueStore>, now: f64) -> Self {
        let road = Road::new(&params);
        let mut manager = Self {
            params,
            road,
            state: SimulationState::default(),
            event_log: EventLog::default(),
            generation: 0,
            store,
            scheduler: Scheduler::default(),
        };
        manager.restart(now);
        manager
    }

    /// Read access to the persistence collaborator.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Mutable access to the persistence collaborator (used by the UI for
    /// the configuration keys).
    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    /// Tears down the round and spawns the next generation.
    ///
    /// The seed network is the persisted best, merged with the outgoing
    /// active car's network when that one scored higher (weighted toward
    /// the higher scorer). Car 0 inherits the seed unmutated; every other
    /// car gets an independent mutation.
    pub fn restart(&mut self, now: f64) {
        // Cancel old timers before touching the population.
        self.scheduler.cancel();

        let mutation_rate: f32 = store::get_json(self.store.as_ref(), store::MUTATION_RATE)
            .unwrap_or(self.params.mutation_rate);
        let cars_quantity: usize = store::get_json(self.store.as_ref(), store::CARS_QUANTITY)
            .unwrap_or(self.params.cars_quantity)
            .max(1);
        let hidden = store::get_json::<String>(self.store.as_ref(), store::NEURONS)
            .map(|s| parse_neurons(&s))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.params.hidden_layers.clone());
        let architecture = self.params.architecture(&hidden);

        let seed = self.pick_seed(&architecture);

        let spawn = point(
            self.road.lane_center(self.params.lane_count / 2),
            self.params.spawn_y,
        );

        let mut cars = Vec::with_capacity(cars_quantity);
        for i in 0..cars_quantity {
            let brain = match &seed {
                Some(s) if i == 0 => s.clone(),
                Some(s) => s.mutate(mutation_rate),
                None => Brain::new(&architecture),
            };
            let mut car = Vehicle::new_racer(spawn.clone(), &self.params, brain);
            car.ghost = i != 0;
            cars.push(car);
        }

        self.state = SimulationState {
            alive: (0..cars.len()).collect(),
            cars,
            traffic: traffic::generate(&self.params, &self.road),
            ..SimulationState::default()
        };

        self.generation += 1;
        self.event_log.log(
            now,
            format!("generation {} on the road", self.generation),
            EventColor::Evolution,
        );
        self.scheduler.start(now, &self.params);
    }

    /// Chooses the seed network for the next generation, or `None` for a
    /// fully random restart.
    fn pick_seed(&self, architecture: &[usize]) -> Option<Brain> {
        let persisted = store::get_json::<BrainSnapshot>(self.store.as_ref(), store::BEST_NETWORK)
            .map(|s| s.brain)
            .filter(|b| b.architecture == architecture);

        let outgoing = self
            .state
            .cars
            .get(self.state.active)
            .and_then(|car| {
                car.brain
                    .as_ref()
                    .map(|b| (b.clone(), car.score(&self.params)))
            })
            .filter(|(b, _)| b.architecture == architecture);

        match (persisted, outgoing) {
            (Some(best), Some((out, out_score))) if out_score > best.best_score => {
                // blend, weighted toward the higher scorer
                Some(Brain::merge(&best, &out, self.params.merge_ratio).unwrap_or(out))
            }
            (Some(best), _) => Some(best),
            (None, Some((out, _))) => Some(out),
            (None, None) => None,
        }
    }

    /// Recomputes the alive subset, the best car and the camera-followed
    /// car.
    ///
    /// Ties on score go to the car with the least forward progress: among
    /// equals, the one that died last is the generation's representative.
    pub fn update(&mut self) {
        let spawn_y = self.params.spawn_y;
        let state = &mut self.state;

        state.alive = state
            .cars
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.damaged)
            .map(|(i, _)| i)
            .collect();

        let mut best = 0;
        for i in 1..state.cars.len() {
            let (score, best_score) = (
                state.cars[i].score(&self.params),
                state.cars[best].score(&self.params),
            );
            if score > best_score
                || (score == best_score
                    && state.cars[i].progress(spawn_y) < state.cars[best].progress(spawn_y))
            {
                best = i;
            }
        }
        state.best = best;

        state.active = if state.game_over {
            state.best
        } else {
            // the forward-progress leader among alive cars
            state
                .alive
                .iter()
                .copied()
                .max_by(|&a, &b| {
                    state.cars[a]
                        .progress(spawn_y)
                        .partial_cmp(&state.cars[b].progress(spawn_y))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(state.best)
        };

        for (i, car) in state.cars.iter_mut().enumerate() {
            car.ghost = i != state.active;
        }
    }

    /// Per-frame control-source handoff for the manual-drive toggle.
    ///
    /// Hands every manually held car back to its brain, then puts the
    /// current active car under manual control when the toggle is on and
    /// returns it for the input adapter to steer. The active car changes
    /// whenever the lead does, so this must run every frame; a car released
    /// here thinks again on the next vehicle update.
    pub fn take_wheel(&mut self, manual: bool) -> Option<&mut Vehicle> {
        for car in &mut self.state.cars {
            if car.control_source == ControlSource::Manual {
                car.control_source = ControlSource::AutoPilot;
                car.controls.neutral();
            }
        }

        if !manual {
            return None;
        }

        let active = self.state.active;
        let car = self.state.cars.get_mut(active)?;
        car.control_source = ControlSource::Manual;
        Some(car)
    }

    /// Game-over transition check.
    ///
    /// Returns true exactly when a transition happens: either the display
    /// delay elapsed and the next round started, or the last car died and
    /// the best network was persisted.
    pub fn check_game_over(&mut self, now: f64) -> bool {
        if self.state.game_over {
            if let Some(since) = self.state.game_over_at {
                if now - since >= self.params.game_over_delay {
                    self.state.game_over_at = None;
                    self.restart(now);
                    return true;
                }
            }
            return false;
        }

        if self.state.alive.is_empty() {
            self.persist_best(now);
            self.state.game_over = true;
            self.state.game_over_at = Some(now);
            return true;
        }

        false
    }

    /// Advances every car and traffic vehicle by one tick and polls the
    /// interval timers.
    ///
    /// Cars are updated in parallel; each closure mutates only its own car,
    /// and shared effects go through the event queue, applied serially
    /// afterwards.
    pub fn update_vehicles(&mut self, now: f64) {
        let params = &self.params;
        let state = &mut self.state;
        state.ticks += 1;

        let mut obstacles: Vec<Shape> = state.traffic.iter().map(Vehicle::polygon).collect();
        obstacles.extend(self.road.borders());
        let traffic_y: Vec<f32> = state.traffic.iter().map(|t| t.pos[1]).collect();

        let queue = Mutex::new(EventQueue::new());
        let best_merit = state.best_merit;

        state.cars.par_iter_mut().enumerate().for_each(|(i, car)| {
            if car.damaged {
                return;
            }

            let (pos, heading) = (car.pos.clone(), car.heading);
            if let Some(sensor) = car.sensor.as_mut() {
                sensor.cast_rays(&pos, heading);
                sensor.check_collisions(&obstacles);
            }

            car.autopilot();
            car.move_tick();

            let overtakes = traffic_y.iter().filter(|&&y| y > car.pos[1]).count() as u32;
            let cone_distance = car.sensor.as_ref().map_or(f32::INFINITY, |s| {
                s.distance_in_cone(&obstacles, -params.maneuver_cone, params.maneuver_cone)
            });

            let (speed, braking, steer) = (car.speed, car.controls.brake, car.controls.steer);
            let mut merit_event = None;
            if let Some(stats) = car.stats.as_mut() {
                stats.observe_tick(speed, braking, steer, overtakes, cone_distance, params);
                if stats.merit > best_merit {
                    merit_event = Some(SimulationEvent::MeritAdvanced {
                        car: i,
                        merit: stats.merit,
                    });
                }
            }

            let crashed = car.assess_damage(&obstacles).then(|| {
                SimulationEvent::CarCrashed {
                    car: i,
                    score: car.score(params),
                }
            });

            if merit_event.is_some() || crashed.is_some() {
                let mut queue = queue.lock().unwrap();
                if let Some(event) = merit_event {
                    queue.push(event);
                }
                if let Some(event) = crashed {
                    queue.push(event);
                }
            }
        });

        for t in &mut state.traffic {
            t.advance_traffic();
        }

        state.best_merit = state
            .cars
            .iter()
            .filter_map(|c| c.stats.as_ref().map(|s| s.merit))
            .max()
            .unwrap_or(0);

        // Several cars can pass the record in the same tick; announce each
        // new maximum once.
        let mut raised = queue.into_inner().unwrap_or_default();
        let mut announced = EventQueue::new();
        let mut record = best_merit;
        for event in raised.drain() {
            if let SimulationEvent::MeritAdvanced { merit, .. } = event {
                if merit <= record {
                    continue;
                }
                record = merit;
            }
            announced.push(event);
        }
        events::apply_events(&mut self.event_log, now, announced);

        for tick in self.scheduler.poll(now, &self.params) {
            match tick {
                TimerTick::DeathCheck => self.death_check(now),
                TimerTick::StallCheck => self.stall_check(),
            }
        }
    }

    /// Crashes cars that fell behind the traffic wavefront or too far
    /// behind the leader, then advances the wavefront.
    fn death_check(&mut self, now: f64) {
        let spawn_y = self.params.spawn_y;
        let wavefront_progress = spawn_y - traffic::row_y(&self.params, self.state.wavefront);
        let leader_progress = self
            .state
            .cars
            .iter()
            .filter(|c| !c.damaged)
            .map(|c| c.progress(spawn_y))
            .fold(f32::NEG_INFINITY, f32::max);

        for (i, car) in self.state.cars.iter_mut().enumerate() {
            if car.damaged || car.brain.is_none() {
                continue;
            }
            let progress = car.progress(spawn_y);
            let behind_wavefront = progress < wavefront_progress;
            let behind_leader =
                leader_progress - progress > self.params.max_distance_from_leader;
            if behind_wavefront || behind_leader {
                car.damaged = true;
                car.speed = 0.0;
                car.controls.neutral();
                self.event_log.log(
                    now,
                    format!("car {i} fell behind and was retired"),
                    EventColor::Crash,
                );
            }
        }

        self.state.wavefront += 1;
    }

    /// Demerit bookkeeping: every alive car whose merit stalled since the
    /// last check accrues a point; progress resets the counter.
    fn stall_check(&mut self) {
        for car in self.state.cars.iter_mut().filter(|c| !c.damaged) {
            if let Some(stats) = car.stats.as_mut() {
                stats.stall_check();
            }
        }
    }

    /// Persists the best car's network, bumping its round bookkeeping.
    fn persist_best(&mut self, now: f64) -> bool {
        let best = self.state.best;
        let score = self
            .state
            .cars
            .get(best)
            .map(|c| c.score(&self.params))
            .unwrap_or(0.0);

        let Some(brain) = self.state.cars.get_mut(best).and_then(|c| c.brain.as_mut()) else {
            return false;
        };

        brain.record_round(score);
        let snapshot = BrainSnapshot::now(brain.clone());
        store::set_json(self.store.as_mut(), store::BEST_NETWORK, &snapshot);
        self.event_log.log(
            now,
            format!(
                "saved best network (score {score:.1}, round {})",
                snapshot.brain.survived_rounds
            ),
            EventColor::Persistence,
        );
        true
    }

    /// Snapshots the active car's network into the backup slot.
    pub fn save_network(&mut self, now: f64) -> bool {
        let Some(brain) = self
            .state
            .cars
            .get(self.state.active)
            .and_then(|c| c.brain.as_ref())
        else {
            return false;
        };
        let snapshot = BrainSnapshot::now(brain.clone());
        store::set_json(self.store.as_mut(), store::BACKUP_NETWORK, &snapshot);
        self.event_log
            .log(now, "network saved to backup".into(), EventColor::Persistence);
        true
    }

    /// Promotes the backup slot to best. Does not restart by itself.
    pub fn restore_network(&mut self, now: f64) -> bool {
        let Some(backup) =
            store::get_json::<BrainSnapshot>(self.store.as_ref(), store::BACKUP_NETWORK)
        else {
            return false;
        };
        store::set_json(self.store.as_mut(), store::BEST_NETWORK, &backup);
        self.event_log
            .log(now, "backup network restored".into(), EventColor::Persistence);
        true
    }

    /// Clears the persisted best; the next restart starts from random.
    pub fn reset_network(&mut self, now: f64) -> bool {
        let removed = self.store.remove(store::BEST_NETWORK);
        if removed {
            self.event_log
                .log(now, "best network cleared".into(), EventColor::Persistence);
        }
        removed
    }

    /// Restarts the round immediately.
    pub fn force_restart(&mut self, now: f64) -> bool {
        self.restart(now);
        true
    }

    /// Promotes the current best car's network to the persisted best
    /// immediately, with full round bookkeeping.
    pub fn evolve(&mut self, now: f64) -> bool {
        let persisted = self.persist_best(now);
        if persisted {
            self.event_log
                .log(now, "best network promoted".into(), EventColor::Evolution);
        }
        persisted
    }
}

/// Parses the comma-separated hidden-layer list from the store, dropping
/// anything unparsable or zero.
fn parse_neurons(raw: &str) -> Vec<usize> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .collect()
}
