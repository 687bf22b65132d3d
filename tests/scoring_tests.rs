#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use neurodrive::simulation::params::Params;
use neurodrive::simulation::scoring::CarStats;

fn create_test_params() -> Params {
    Params {
        overtake_weight: 3.0,
        brake_weight: 5.0,
        turn_weight: 5.0,
        distance_weight: 0.01,
        demerit_weight: 10.0,
        reaction_distance: 60.0,
        steer_threshold: 0.5,
        ..Params::default()
    }
}

#[test]
fn test_merit_never_decreases() {
    let params = create_test_params();
    let mut stats = CarStats::default();

    stats.observe_tick(1.0, false, 0.0, 3, f32::INFINITY, &params);
    assert_eq!(stats.merit, 3);

    // Falling back behind traffic does not claw merit back.
    stats.observe_tick(1.0, false, 0.0, 1, f32::INFINITY, &params);
    assert_eq!(stats.merit, 3);

    stats.observe_tick(1.0, false, 0.0, 5, f32::INFINITY, &params);
    assert_eq!(stats.merit, 5);
}

#[test]
fn test_distance_accumulates_absolute_speed() {
    let params = create_test_params();
    let mut stats = CarStats::default();

    stats.observe_tick(2.0, false, 0.0, 0, f32::INFINITY, &params);
    stats.observe_tick(-1.5, false, 0.0, 0, f32::INFINITY, &params);

    assert!((stats.distance - 3.5).abs() < 1e-6);
}

#[test]
fn test_smart_brake_counts_once_per_episode() {
    let params = create_test_params();
    let mut stats = CarStats::default();

    // Sustained braking near an obstacle is one maneuver, not five.
    for _ in 0..5 {
        stats.observe_tick(2.0, true, 0.0, 0, 30.0, &params);
    }
    assert_eq!(stats.smart_brakes, 1);

    // Releasing the pedal re-arms the detector.
    stats.observe_tick(2.0, false, 0.0, 0, 30.0, &params);
    stats.observe_tick(2.0, true, 0.0, 0, 30.0, &params);
    assert_eq!(stats.smart_brakes, 2);
}

#[test]
fn test_braking_in_the_clear_earns_nothing() {
    let params = create_test_params();
    let mut stats = CarStats::default();

    stats.observe_tick(2.0, true, 0.0, 0, f32::INFINITY, &params);
    stats.observe_tick(2.0, true, 0.0, 0, params.reaction_distance + 1.0, &params);

    assert_eq!(stats.smart_brakes, 0);
}

#[test]
fn test_smart_turn_requires_deliberate_steering() {
    let params = create_test_params();
    let mut stats = CarStats::default();

    // Below the threshold: lane wobble, not a maneuver.
    stats.observe_tick(2.0, false, 0.3, 0, 30.0, &params);
    assert_eq!(stats.smart_turns, 0);

    for _ in 0..4 {
        stats.observe_tick(2.0, false, -0.8, 0, 30.0, &params);
    }
    assert_eq!(stats.smart_turns, 1);

    // Straightening out and swerving again is a second maneuver.
    stats.observe_tick(2.0, false, 0.0, 0, 30.0, &params);
    stats.observe_tick(2.0, false, 0.9, 0, 30.0, &params);
    assert_eq!(stats.smart_turns, 2);
}

#[test]
fn test_maneuvers_require_forward_motion() {
    let params = create_test_params();
    let mut stats = CarStats::default();

    stats.observe_tick(0.0, true, 0.9, 0, 30.0, &params);
    stats.observe_tick(-1.0, true, 0.9, 0, 30.0, &params);

    assert_eq!(stats.smart_brakes, 0);
    assert_eq!(stats.smart_turns, 0);
}

#[test]
fn test_stall_check_accrues_and_resets_demerit() {
    let params = create_test_params();
    let mut stats = CarStats::default();

    stats.stall_check();
    stats.stall_check();
    assert_eq!(stats.demerit, 2);

    // An overtake since the last check wipes the penalty.
    stats.observe_tick(1.0, false, 0.0, 2, f32::INFINITY, &params);
    stats.stall_check();
    assert_eq!(stats.demerit, 0);

    // Stalling again starts accruing from zero.
    stats.stall_check();
    assert_eq!(stats.demerit, 1);
}

#[test]
fn test_score_combines_weighted_components() {
    let params = create_test_params();
    let mut stats = CarStats::default();

    // 4 overtakes, distance 2: 4*3 + 2*0.01 = 12.02.
    stats.observe_tick(2.0, false, 0.0, 4, f32::INFINITY, &params);
    assert!((stats.score(&params) - 12.02).abs() < 1e-4);

    // One smart brake adds its weight.
    stats.observe_tick(2.0, true, 0.0, 4, 30.0, &params);
    assert!((stats.score(&params) - 17.04).abs() < 1e-4);

    // Demerits subtract.
    stats.stall_check();
    stats.stall_check();
    assert!((stats.score(&params) - 7.04).abs() < 1e-4);
}
