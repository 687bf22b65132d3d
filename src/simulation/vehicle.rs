//! Vehicle kinematics and the autopilot that maps sensor readings to
//! controls.
//!
//! There is a single vehicle entity; variants are expressed through
//! composition: an optional sensor and brain (traffic obstacles have
//! neither), an optional scoring record, and a control-source tag instead
//! of a class hierarchy.

use ndarray::Array1;

use super::brain::Brain;
use super::geometry::Shape;
use super::params::Params;
use super::scoring::CarStats;
use super::sensor::Sensor;

/// Per-vehicle tuning constants, owned exclusively by one vehicle.
#[derive(Debug, Clone)]
pub struct Features {
    /// Top forward speed per tick.
    pub max_speed: f32,
    /// Speed gained per tick at full throttle.
    pub acceleration: f32,
    /// Top reverse speed per tick.
    pub max_reverse: f32,
    /// Speed shed per tick while braking.
    pub brake_power: f32,
    /// Linear coasting decay toward zero when no input is active.
    pub friction: f32,
}

impl Features {
    /// Builds the shared feature set from the simulation parameters.
    pub fn from_params(params: &Params) -> Self {
        Self {
            max_speed: params.max_speed,
            acceleration: params.acceleration,
            max_reverse: params.max_reverse,
            brake_power: params.brake_power,
            friction: params.friction,
        }
    }
}

/// Input intent written each tick by the autopilot or a manual adapter and
/// read by the kinematics step.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    /// Signed throttle in [-1, 1]; negative reverses.
    pub throttle: f32,
    /// Brake pedal.
    pub brake: bool,
    /// Signed steering in [-1, 1]; positive steers left (heading grows,
    /// x shrinks).
    pub steer: f32,
}

impl Controls {
    /// Zeroes every input.
    pub fn neutral(&mut self) {
        self.throttle = 0.0;
        self.brake = false;
        self.steer = 0.0;
    }
}

/// Who writes the vehicle's controls each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSource {
    /// A human-input adapter outside the core.
    Manual,
    /// The onboard brain.
    AutoPilot,
}

/// A vehicle: either a population racer (sensor + brain + stats) or a
/// brainless traffic obstacle.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Position in world space; y shrinks going forward.
    pub pos: Array1<f32>,
    /// Heading in radians; 0 faces negative y.
    pub heading: f32,
    /// Signed speed per tick.
    pub speed: f32,
    /// Body width.
    pub width: f32,
    /// Body height.
    pub height: f32,
    /// Tuning constants.
    pub features: Features,
    /// Current input intent.
    pub controls: Controls,
    /// Raycasting sensor; absent on traffic vehicles.
    pub sensor: Option<Sensor>,
    /// Autopilot network; absence marks a non-crashable obstacle.
    pub brain: Option<Brain>,
    /// Scoring record; only racers carry one.
    pub stats: Option<CarStats>,
    /// Who writes the controls.
    pub control_source: ControlSource,
    /// Set once on collision; terminal for this generation.
    pub damaged: bool,
    /// Rendering hint: not the camera-followed car.
    pub ghost: bool,
}

impl Vehicle {
    /// Creates a population racer with a sensor, a brain and a scoring
    /// record.
    pub fn new_racer(pos: Array1<f32>, params: &Params, brain: Brain) -> Self {
        Self {
            pos,
            heading: 0.0,
            speed: 0.0,
            width: params.car_width,
            height: params.car_height,
            features: Features::from_params(params),
            controls: Controls::default(),
            sensor: Some(Sensor::new(
                params.ray_count,
                params.ray_length,
                params.ray_spread,
            )),
            brain: Some(brain),
            stats: Some(CarStats::default()),
            control_source: ControlSource::AutoPilot,
            damaged: false,
            ghost: true,
        }
    }

    /// Creates a brainless traffic obstacle moving forward at a constant
    /// speed (zero for a parked obstacle).
    pub fn new_traffic(pos: Array1<f32>, speed: f32, params: &Params) -> Self {
        Self {
            pos,
            heading: 0.0,
            speed,
            width: params.car_width,
            height: params.car_height,
            features: Features::from_params(params),
            controls: Controls::default(),
            sensor: None,
            brain: None,
            stats: None,
            control_source: ControlSource::Manual,
            damaged: false,
            ghost: false,
        }
    }

    /// Oriented body rectangle, recomputed from the current pose.
    pub fn polygon(&self) -> Shape {
        Shape::oriented_rect(&self.pos, self.heading, self.width, self.height)
    }

    /// Forward progress from the spawn line.
    pub fn progress(&self, spawn_y: f32) -> f32 {
        spawn_y - self.pos[1]
    }

    /// Runs the brain on the current sensor readings and writes the
    /// controls.
    ///
    /// Inputs are one value per ray (`1 - offset` for a hit, so a closer
    /// obstacle reads nearer 1; 0 for a miss) followed by normalized speed.
    /// Outputs: `[0]` signed throttle, `[1] > 0` brake, `[2]` signed
    /// steering. The mapping is fixed across generations; it defines what
    /// the evolved weights mean.
    pub fn autopilot(&mut self) {
        if self.damaged || self.control_source != ControlSource::AutoPilot {
            return;
        }
        let (Some(sensor), Some(brain)) = (&self.sensor, &self.brain) else {
            return;
        };

        let mut inputs = Array1::zeros(sensor.ray_count + 1);
        for (i, reading) in sensor.readings.iter().enumerate() {
            inputs[i] = match reading {
                Some(hit) => 1.0 - hit.offset,
                None => 0.0,
            };
        }
        inputs[sensor.ray_count] = self.speed / self.features.max_speed;

        let outputs = brain.think(&inputs);

        self.controls.throttle = outputs[0];
        self.controls.brake = outputs[1] > 0.0;
        self.controls.steer = outputs[2];
    }

    /// Integrates speed, heading and position for one tick.
    ///
    /// Steering authority depends on speed: quadratic above |v| = 1, linear
    /// below, which makes the turn radius sluggish at both very low and very
    /// high speed.
    pub fn move_tick(&mut self) {
        if self.damaged {
            return;
        }

        if self.controls.throttle != 0.0 {
            self.speed += self.features.acceleration * self.controls.throttle;
        }
        self.speed = self
            .speed
            .clamp(-self.features.max_reverse, self.features.max_speed);

        if self.controls.brake {
            if self.speed > 0.0 {
                self.speed = (self.speed - self.features.brake_power).max(0.0);
            } else if self.speed < 0.0 {
                self.speed = (self.speed + self.features.brake_power).min(0.0);
            }
        } else if self.controls.throttle == 0.0 {
            // coasting friction, linear decay toward zero
            if self.speed.abs() <= self.features.friction {
                self.speed = 0.0;
            } else {
                self.speed -= self.features.friction * self.speed.signum();
            }
        }

        if self.speed != 0.0 && self.controls.steer != 0.0 {
            self.heading += steering_power(self.speed) * self.controls.steer;
        }

        self.pos[0] -= self.heading.sin() * self.speed;
        self.pos[1] -= self.heading.cos() * self.speed;
    }

    /// Advances a traffic obstacle by its constant speed.
    pub fn advance_traffic(&mut self) {
        self.pos[1] -= self.speed;
    }

    /// Checks the body polygon against every obstacle shape and marks the
    /// vehicle damaged on overlap.
    ///
    /// Only brain-carrying vehicles are crashable; traffic obstacles pass
    /// through each other. Returns true when the damage is new this tick.
    pub fn assess_damage(&mut self, obstacles: &[Shape]) -> bool {
        if self.damaged || self.brain.is_none() {
            return false;
        }

        let body = self.polygon();
        for shape in obstacles {
            if super::geometry::polygons_intersect(&body, shape) {
                self.damaged = true;
                self.speed = 0.0;
                self.controls.neutral();
                return true;
            }
        }
        false
    }

    /// Current score, or 0 for vehicles without a scoring record.
    pub fn score(&self, params: &Params) -> f32 {
        self.stats.as_ref().map_or(0.0, |s| s.score(params))
    }
}

/// Speed-dependent steering authority.
///
/// Coefficients are part of the simulation's tuning and must not drift:
/// evolved brains are calibrated against them.
pub fn steering_power(speed: f32) -> f32 {
    let v = speed.abs();
    if v > 1.0 {
        0.000444 * v * v - 0.007667 * v + 0.037222
    } else {
        0.03 * v - 0.003
    }
}
