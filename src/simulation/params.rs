use serde::{Deserialize, Serialize};

/// Simulation parameters that control vehicles, sensing, scoring and the
/// generation lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    // Road
    /// Number of lanes on the road.
    pub lane_count: usize,
    /// Width of a single lane in world units.
    pub lane_width: f32,
    /// Forward coordinate where the population spawns (y shrinks going forward).
    pub spawn_y: f32,

    // Vehicle
    /// Vehicle body width.
    pub car_width: f32,
    /// Vehicle body height.
    pub car_height: f32,
    /// Top forward speed per tick.
    pub max_speed: f32,
    /// Speed gained per tick at full throttle.
    pub acceleration: f32,
    /// Top reverse speed per tick.
    pub max_reverse: f32,
    /// Speed shed per tick while braking.
    pub brake_power: f32,
    /// Linear coasting decay applied when no control input is active.
    pub friction: f32,

    // Sensor
    /// Number of sensor rays per vehicle.
    pub ray_count: usize,
    /// Maximum ray reach in world units.
    pub ray_length: f32,
    /// Total fan angle of the sensor in radians.
    pub ray_spread: f32,

    // Brain
    /// Hidden layer sizes; input and output sizes are derived from the
    /// sensor and the control mapping.
    pub hidden_layers: Vec<usize>,
    /// Default population size (overridable through the store).
    pub cars_quantity: usize,
    /// Default mutation rate in [0, 1] (overridable through the store).
    pub mutation_rate: f32,
    /// Blend ratio applied toward the higher-scoring parent when merging the
    /// outgoing champion with the persisted best network.
    pub merge_ratio: f32,

    // Scoring
    /// Fitness weight per overtaken traffic vehicle.
    pub overtake_weight: f32,
    /// Fitness weight per smart braking maneuver.
    pub brake_weight: f32,
    /// Fitness weight per smart turning maneuver.
    pub turn_weight: f32,
    /// Fitness weight per unit of distance traveled.
    pub distance_weight: f32,
    /// Fitness penalty per accrued demerit point.
    pub demerit_weight: f32,
    /// Obstacle distance below which a braking/turning maneuver counts as
    /// collision avoidance.
    pub reaction_distance: f32,
    /// Half-angle of the forward cone scanned by the maneuver detectors.
    pub maneuver_cone: f32,
    /// Steering magnitude above which a turn is considered deliberate.
    pub steer_threshold: f32,

    // Traffic
    /// Number of traffic rows generated per round.
    pub traffic_rows: usize,
    /// Forward distance between consecutive traffic rows.
    pub row_spacing: f32,
    /// Speed of forward-moving traffic vehicles.
    pub traffic_speed: f32,

    // Generation lifecycle
    /// Seconds between death checks against the traffic wavefront.
    pub death_check_interval: f64,
    /// Seconds between merit stall checks.
    pub stall_check_interval: f64,
    /// Seconds the game-over screen stays up before the next round starts.
    pub game_over_delay: f64,
    /// Maximum distance a car may trail the leader before it is crashed.
    pub max_distance_from_leader: f32,
}

impl Params {
    /// Brain output size: throttle, brake, steering.
    pub const BRAIN_OUTPUTS: usize = 3;

    /// Brain input size: one value per sensor ray plus normalized speed.
    pub fn brain_inputs(&self) -> usize {
        self.ray_count + 1
    }

    /// Full layer-size list for the given hidden layers.
    pub fn architecture(&self, hidden: &[usize]) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(hidden.len() + 2);
        sizes.push(self.brain_inputs());
        sizes.extend_from_slice(hidden);
        sizes.push(Self::BRAIN_OUTPUTS);
        sizes
    }

    /// Total road width.
    pub fn road_width(&self) -> f32 {
        self.lane_count as f32 * self.lane_width
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            lane_count: 3,
            lane_width: 60.0,
            spawn_y: 0.0,

            car_width: 30.0,
            car_height: 50.0,
            max_speed: 5.0,
            acceleration: 0.2,
            max_reverse: 1.5,
            brake_power: 0.4,
            friction: 0.05,

            ray_count: 7,
            ray_length: 150.0,
            ray_spread: std::f32::consts::PI / 2.0,

            hidden_layers: vec![6],
            cars_quantity: 100,
            mutation_rate: 0.1,
            merge_ratio: 0.75,

            overtake_weight: 3.0,
            brake_weight: 5.0,
            turn_weight: 5.0,
            distance_weight: 0.01,
            demerit_weight: 10.0,
            reaction_distance: 60.0,
            maneuver_cone: std::f32::consts::PI / 6.0,
            steer_threshold: 0.5,

            traffic_rows: 10,
            row_spacing: 200.0,
            traffic_speed: 1.2,

            death_check_interval: 2.0,
            stall_check_interval: 4.0,
            game_over_delay: 3.0,
            max_distance_from_leader: 400.0,
        }
    }
}
