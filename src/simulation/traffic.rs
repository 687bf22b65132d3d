//! Procedural traffic generation.
//!
//! Traffic vehicles are brainless obstacles laid out in rows ahead of the
//! spawn line, with difficulty graduating as the rows get farther out: more
//! occupied lanes, but always at least one free lane to thread through.

use rand::Rng;
use rand::seq::SliceRandom;

use super::geometry::point;
use super::params::Params;
use super::road::Road;
use super::vehicle::Vehicle;

/// Generates a fresh traffic layout for one round.
pub fn generate(params: &Params, road: &Road) -> Vec<Vehicle> {
    let mut rng = rand::rng();
    let mut traffic = Vec::new();

    for row in 1..=params.traffic_rows {
        let y = row_y(params, row);

        // graduated difficulty, capped so one lane stays free
        let max_cars = params.lane_count - 1;
        let cars_in_row = (1 + row / 3).min(max_cars);

        let mut lanes: Vec<usize> = (0..params.lane_count).collect();
        lanes.shuffle(&mut rng);

        for &lane in lanes.iter().take(cars_in_row) {
            // alternate parked and slowly creeping rows
            let speed = if row % 2 == 0 {
                params.traffic_speed
            } else {
                0.0
            };
            let jitter: f32 = rng.random_range(-10.0..10.0);
            let pos = point(road.lane_center(lane), y + jitter);
            traffic.push(Vehicle::new_traffic(pos, speed, params));
        }
    }

    traffic
}

/// Forward coordinate of traffic row `row` (row 0 is the spawn line).
pub fn row_y(params: &Params, row: usize) -> f32 {
    params.spawn_y - row as f32 * params.row_spacing
}
