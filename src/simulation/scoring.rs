//! Fitness scoring: overtakes, smart maneuvers, distance and the
//! anti-stalling demerit.

use serde::{Deserialize, Serialize};

use super::params::Params;

/// Per-car scoring record, recomputed every tick and compared by generation
/// selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarStats {
    /// Overtaken traffic vehicles; monotonic, only ever raised.
    pub merit: u32,
    /// Distinct collision-avoiding braking maneuvers.
    pub smart_brakes: u32,
    /// Distinct collision-avoiding turning maneuvers.
    pub smart_turns: u32,
    /// Total distance traveled.
    pub distance: f32,
    /// Stall penalty points accrued by the checkpoint mechanism.
    pub demerit: u32,
    /// Merit recorded at the last stall check.
    checkpoint: u32,
    /// Latch so a continuous braking maneuver counts once.
    brake_latch: bool,
    /// Latch so a continuous turning maneuver counts once.
    turn_latch: bool,
}

impl CarStats {
    /// Folds one tick of telemetry into the record.
    ///
    /// `overtakes` is the number of traffic vehicles currently behind the
    /// car; `obstacle_distance` is the nearest hit inside the forward cone
    /// (infinite when clear). The maneuver detectors are edge-triggered:
    /// each continuous braking or turning episode near an obstacle counts
    /// once.
    pub fn observe_tick(
        &mut self,
        speed: f32,
        braking: bool,
        steer: f32,
        overtakes: u32,
        obstacle_distance: f32,
        params: &Params,
    ) {
        self.merit = self.merit.max(overtakes);
        self.distance += speed.abs();

        let obstacle_ahead =
            obstacle_distance.is_finite() && obstacle_distance < params.reaction_distance;

        let smart_brake = speed > 0.0 && braking && obstacle_ahead;
        if smart_brake && !self.brake_latch {
            self.smart_brakes += 1;
        }
        self.brake_latch = smart_brake;

        let smart_turn = speed > 0.0 && steer.abs() > params.steer_threshold && obstacle_ahead;
        if smart_turn && !self.turn_latch {
            self.smart_turns += 1;
        }
        self.turn_latch = smart_turn;
    }

    /// Periodic anti-stalling check: a demerit when merit has not advanced
    /// since the previous check, reset to zero otherwise.
    pub fn stall_check(&mut self) {
        if self.merit <= self.checkpoint {
            self.demerit += 1;
        } else {
            self.demerit = 0;
        }
        self.checkpoint = self.merit;
    }

    /// Net fitness under the configured weights.
    pub fn score(&self, params: &Params) -> f32 {
        self.merit as f32 * params.overtake_weight
            + self.smart_brakes as f32 * params.brake_weight
            + self.smart_turns as f32 * params.turn_weight
            + self.distance * params.distance_weight
            - self.demerit as f32 * params.demerit_weight
    }
}
