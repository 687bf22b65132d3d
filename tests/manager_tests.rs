#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use neurodrive::simulation::brain::{Brain, BrainSnapshot};
use neurodrive::simulation::manager::Manager;
use neurodrive::simulation::params::Params;
use neurodrive::simulation::store::{self, KeyValueStore, MemoryStore};
use neurodrive::simulation::traffic;
use neurodrive::simulation::vehicle::ControlSource;

fn create_test_params() -> Params {
    Params {
        cars_quantity: 5,
        traffic_rows: 4,
        hidden_layers: vec![4],
        death_check_interval: 2.0,
        stall_check_interval: 4.0,
        game_over_delay: 3.0,
        ..Params::default()
    }
}

fn create_test_manager(params: &Params) -> Manager {
    Manager::new(params.clone(), Box::new(MemoryStore::new()), 0.0)
}

/// Zeroes every brain so the population sits still under test.
fn park_population(manager: &mut Manager) {
    for car in &mut manager.state.cars {
        if let Some(brain) = car.brain.as_mut() {
            for layer in &mut brain.layers {
                layer.weights.fill(0.0);
                layer.biases.fill(0.0);
            }
        }
    }
}

#[test]
fn test_manager_spawns_first_generation() {
    let params = create_test_params();
    let manager = create_test_manager(&params);

    assert_eq!(manager.generation, 1);
    assert_eq!(manager.state.cars.len(), params.cars_quantity);
    assert_eq!(manager.state.alive.len(), params.cars_quantity);
    assert!(!manager.state.game_over);
    assert!(!manager.state.traffic.is_empty());

    // Everyone starts stacked on the middle lane's spawn point.
    let middle = manager.road.lane_center(params.lane_count / 2);
    for car in &manager.state.cars {
        assert_eq!(car.pos[0], middle);
        assert_eq!(car.pos[1], params.spawn_y);
        assert!(!car.damaged);
        assert!(car.brain.is_some());
        assert!(car.sensor.is_some());
    }

    // Car 0 is the unmutated seed carrier and starts as the followed car.
    assert!(!manager.state.cars[0].ghost);
    assert!(manager.state.cars[1].ghost);
}

#[test]
fn test_traffic_always_leaves_a_free_lane() {
    let params = create_test_params();
    let manager = create_test_manager(&params);

    for row in 1..=params.traffic_rows {
        let y = traffic::row_y(&params, row);
        let in_row = manager
            .state
            .traffic
            .iter()
            .filter(|t| (t.pos[1] - y).abs() <= 20.0)
            .count();
        assert!(in_row >= 1);
        assert!(in_row <= params.lane_count - 1, "row {row} is fully blocked");
    }
}

#[test]
fn test_game_over_persists_best_and_restarts_after_delay() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);

    // Nothing to do while cars are alive.
    manager.update();
    assert!(!manager.check_game_over(1.0));
    assert!(store::get_json::<BrainSnapshot>(manager.store(), store::BEST_NETWORK).is_none());

    for car in &mut manager.state.cars {
        car.damaged = true;
    }
    manager.update();
    assert!(manager.state.alive.is_empty());

    // The frame that notices the wipe-out persists the best network once.
    assert!(manager.check_game_over(10.0));
    assert!(manager.state.game_over);
    let saved = store::get_json::<BrainSnapshot>(manager.store(), store::BEST_NETWORK)
        .expect("best network persisted");
    assert_eq!(saved.brain.survived_rounds, 1);

    // Still showing the game-over screen.
    assert!(!manager.check_game_over(11.0));
    assert_eq!(manager.generation, 1);

    // Delay elapsed: next generation spawns, seeded from the save.
    assert!(manager.check_game_over(13.5));
    assert_eq!(manager.generation, 2);
    assert!(!manager.state.game_over);
    assert_eq!(manager.state.alive.len(), params.cars_quantity);
    let seed_id = manager.state.cars[0].brain.as_ref().unwrap().id;
    assert_eq!(seed_id, saved.brain.id);
}

#[test]
fn test_persisted_network_seeds_the_population() {
    let params = create_test_params();
    let architecture = params.architecture(&params.hidden_layers);

    let mut seed = Brain::new(&architecture);
    seed.record_round(42.0);
    let seed_id = seed.id;

    let mut store = MemoryStore::new();
    store::set_json(&mut store, store::BEST_NETWORK, &BrainSnapshot::now(seed));

    let manager = Manager::new(params, Box::new(store), 0.0);

    // Car 0 carries the seed verbatim; mutants keep the lineage id.
    for car in &manager.state.cars {
        let brain = car.brain.as_ref().unwrap();
        assert_eq!(brain.id, seed_id);
        assert_eq!(brain.survived_rounds, 1);
        assert_eq!(brain.best_score, 42.0);
    }
}

#[test]
fn test_incompatible_persisted_network_is_ignored() {
    let params = create_test_params();

    // Saved under a different layer layout than the current settings.
    let mut stale = Brain::new(&[4, 4, 3]);
    stale.record_round(99.0);

    let mut store = MemoryStore::new();
    store::set_json(&mut store, store::BEST_NETWORK, &BrainSnapshot::now(stale));

    let manager = Manager::new(params.clone(), Box::new(store), 0.0);

    let expected = params.architecture(&params.hidden_layers);
    for car in &manager.state.cars {
        let brain = car.brain.as_ref().unwrap();
        assert_eq!(brain.architecture, expected);
        // Fresh random brains, not descendants of the stale save.
        assert_eq!(brain.survived_rounds, 0);
    }
}

#[test]
fn test_neurons_setting_shapes_the_architecture() {
    let params = create_test_params();

    let mut store = MemoryStore::new();
    store::set_json(&mut store, store::NEURONS, &"8, 5".to_string());

    let manager = Manager::new(params.clone(), Box::new(store), 0.0);

    let expected = params.architecture(&[8, 5]);
    let brain = manager.state.cars[0].brain.as_ref().unwrap();
    assert_eq!(brain.architecture, expected);
}

#[test]
fn test_cars_quantity_setting_overrides_default() {
    let params = create_test_params();

    let mut store = MemoryStore::new();
    store::set_json(&mut store, store::CARS_QUANTITY, &12usize);

    let manager = Manager::new(params, Box::new(store), 0.0);
    assert_eq!(manager.state.cars.len(), 12);
}

#[test]
fn test_death_check_retires_cars_behind_the_wavefront() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);
    park_population(&mut manager);

    // Car 1 drifted behind the spawn line (wavefront row 0).
    manager.state.cars[1].pos[1] = params.spawn_y + 10.0;
    manager.update();

    // First poll after the interval fires the death check.
    manager.update_vehicles(2.5);

    assert!(manager.state.cars[1].damaged);
    assert!(!manager.state.cars[0].damaged);
    assert_eq!(manager.state.wavefront, 1);
}

#[test]
fn test_death_check_retires_cars_far_behind_the_leader() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);
    park_population(&mut manager);

    // Car 0 broke away; everyone else trails past the allowed gap.
    manager.state.cars[0].pos[1] = -(params.max_distance_from_leader + 100.0);
    manager.update();

    manager.update_vehicles(2.5);

    assert!(!manager.state.cars[0].damaged);
    for car in &manager.state.cars[1..] {
        assert!(car.damaged);
    }
}

#[test]
fn test_stall_check_hands_out_demerits() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);
    park_population(&mut manager);

    // Past both intervals: the stall check penalizes the parked cars.
    manager.update_vehicles(4.5);

    for car in manager.state.cars.iter().filter(|c| !c.damaged) {
        assert_eq!(car.stats.as_ref().unwrap().demerit, 1);
    }
}

#[test]
fn test_best_tie_breaks_toward_least_progress() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);

    // Equal scores everywhere; car 2 has fallen back the farthest.
    manager.state.cars[2].pos[1] = 5.0;
    manager.update();

    assert_eq!(manager.state.best, 2);

    // The camera still follows the forward-progress leader.
    manager.state.cars[3].pos[1] = -50.0;
    manager.update();
    assert_eq!(manager.state.active, 3);
    assert!(!manager.state.cars[3].ghost);
    assert!(manager.state.cars[0].ghost);
}

#[test]
fn test_manual_network_actions() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);

    // Nothing to restore before a backup exists.
    assert!(!manager.restore_network(1.0));

    assert!(manager.save_network(2.0));
    assert!(manager.store().get_raw(store::BACKUP_NETWORK).is_some());

    assert!(manager.restore_network(3.0));
    assert_eq!(
        manager.store().get_raw(store::BEST_NETWORK),
        manager.store().get_raw(store::BACKUP_NETWORK)
    );

    assert!(manager.reset_network(4.0));
    assert!(manager.store().get_raw(store::BEST_NETWORK).is_none());
    assert!(!manager.reset_network(5.0));
}

#[test]
fn test_force_restart_and_evolve() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);

    assert!(manager.force_restart(1.0));
    assert_eq!(manager.generation, 2);

    manager.update();
    assert!(manager.evolve(2.0));
    let saved = store::get_json::<BrainSnapshot>(manager.store(), store::BEST_NETWORK)
        .expect("evolve persists the best network");
    assert_eq!(saved.brain.survived_rounds, 1);
}

#[test]
fn test_manual_control_follows_the_lead_change() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);
    park_population(&mut manager);

    manager.update();
    let first = manager.state.active;
    {
        let car = manager.take_wheel(true).expect("active car");
        car.controls.throttle = 1.0;
    }
    assert_eq!(
        manager.state.cars[first].control_source,
        ControlSource::Manual
    );

    // Another car takes the lead; the old driver must go back to its
    // brain with its stale inputs cleared, not sit frozen under manual
    // control for the rest of the round.
    let next = (first + 1) % manager.state.cars.len();
    manager.state.cars[next].pos[1] = -100.0;
    manager.update();
    assert_eq!(manager.state.active, next);

    manager.take_wheel(true).expect("active car");
    assert_eq!(
        manager.state.cars[first].control_source,
        ControlSource::AutoPilot
    );
    assert_eq!(manager.state.cars[first].controls.throttle, 0.0);
    assert_eq!(
        manager.state.cars[next].control_source,
        ControlSource::Manual
    );
}

#[test]
fn test_releasing_the_wheel_frees_every_car() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);
    park_population(&mut manager);

    manager.update();
    manager.take_wheel(true).expect("active car");

    assert!(manager.take_wheel(false).is_none());
    for car in &manager.state.cars {
        assert_eq!(car.control_source, ControlSource::AutoPilot);
    }
}

#[test]
fn test_simultaneous_record_breakers_log_once() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);
    park_population(&mut manager);

    // Two cars pass the entire field in the same tick and tie on the new
    // overtake record; the log announces it once.
    manager.state.cars[0].pos[1] = -10_000.0;
    manager.state.cars[1].pos[1] = -10_000.0;
    manager.update();
    manager.update_vehicles(0.5);

    let announcements = manager
        .event_log
        .events()
        .iter()
        .filter(|e| e.description.contains("overtakes"))
        .count();
    assert_eq!(announcements, 1);
    assert_eq!(manager.state.best_merit, manager.state.traffic.len() as u32);
}

#[test]
fn test_update_vehicles_advances_traffic() {
    let params = create_test_params();
    let mut manager = create_test_manager(&params);
    park_population(&mut manager);

    let before: Vec<f32> = manager.state.traffic.iter().map(|t| t.pos[1]).collect();
    manager.update_vehicles(0.5);

    for (t, y) in manager.state.traffic.iter().zip(&before) {
        assert_eq!(t.pos[1], y - t.speed);
    }
    assert_eq!(manager.state.ticks, 1);
}
