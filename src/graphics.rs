//! Macroquad rendering of the simulation world.
//!
//! The camera follows the active car. Everything here is read-only over the
//! simulation state; a skipped frame is harmless.

use macroquad::prelude::*;
use ndarray::Array1;

use crate::simulation::geometry::Shape;
use crate::simulation::manager::Manager;
use crate::simulation::vehicle::Vehicle;

/// Fraction of the screen height where the followed car sits.
const CAMERA_ANCHOR: f32 = 0.7;
const LANE_DASH: f32 = 30.0;

/// World-to-screen transform centered on the followed car.
#[derive(Debug, Clone, Copy)]
struct Camera {
    x: f32,
    y: f32,
}

impl Camera {
    fn follow(car: &Vehicle) -> Self {
        Self {
            x: car.pos[0],
            y: car.pos[1],
        }
    }

    fn to_screen(&self, world: &Array1<f32>) -> Vec2 {
        vec2(
            screen_width() / 2.0 + (world[0] - self.x),
            screen_height() * CAMERA_ANCHOR + (world[1] - self.y),
        )
    }
}

/// Draws the road, traffic, the population and the active car's sensor.
pub fn draw_scene(manager: &Manager, show_rays: bool) {
    let Some(active) = manager.state.cars.get(manager.state.active) else {
        return;
    };
    let camera = Camera::follow(active);

    draw_road(manager, camera);

    for vehicle in &manager.state.traffic {
        draw_vehicle(vehicle, camera, Color::from_rgba(200, 60, 60, 255));
    }

    for vehicle in &manager.state.cars {
        let alpha = if vehicle.ghost { 40 } else { 255 };
        let color = if vehicle.damaged {
            Color::from_rgba(90, 90, 90, alpha)
        } else {
            Color::from_rgba(60, 120, 220, alpha)
        };
        draw_vehicle(vehicle, camera, color);
    }

    if show_rays {
        draw_sensor(active, camera);
    }
}

fn draw_road(manager: &Manager, camera: Camera) {
    let road = &manager.road;
    let top = camera.y - screen_height();
    let bottom = camera.y + screen_height();

    let sx = |x: f32| screen_width() / 2.0 + (x - camera.x);
    let sy = |y: f32| screen_height() * CAMERA_ANCHOR + (y - camera.y);

    // asphalt strip
    draw_rectangle(
        sx(road.left),
        sy(top),
        road.right - road.left,
        bottom - top,
        Color::from_rgba(50, 50, 55, 255),
    );

    for border in [road.left, road.right] {
        draw_line(sx(border), sy(top), sx(border), sy(bottom), 4.0, WHITE);
    }

    // dashed lane separators
    for lane in 1..road.lane_count {
        let x = road.left + lane as f32 * road.lane_width;
        let mut y = (top / (LANE_DASH * 2.0)).floor() * LANE_DASH * 2.0;
        while y < bottom {
            draw_line(sx(x), sy(y), sx(x), sy(y + LANE_DASH), 2.0, LIGHTGRAY);
            y += LANE_DASH * 2.0;
        }
    }
}

fn draw_vehicle(vehicle: &Vehicle, camera: Camera, color: Color) {
    draw_shape(&vehicle.polygon(), camera, color);
}

fn draw_shape(shape: &Shape, camera: Camera, color: Color) {
    let pts: Vec<Vec2> = shape.points.iter().map(|p| camera.to_screen(p)).collect();
    // fan triangulation; vehicle bodies are convex quads
    for i in 1..pts.len() - 1 {
        draw_triangle(pts[0], pts[i], pts[i + 1], color);
    }
}

fn draw_sensor(vehicle: &Vehicle, camera: Camera) {
    let Some(sensor) = &vehicle.sensor else {
        return;
    };

    for (i, (start, end)) in sensor.rays.iter().enumerate() {
        let s = camera.to_screen(start);
        let e = camera.to_screen(end);

        match sensor.readings.get(i).and_then(|r| r.as_ref()) {
            Some(hit) => {
                let h = camera.to_screen(&hit.point);
                draw_line(s.x, s.y, h.x, h.y, 2.0, YELLOW);
                draw_line(h.x, h.y, e.x, e.y, 1.0, Color::from_rgba(80, 80, 80, 180));
                draw_circle(h.x, h.y, 3.0, ORANGE);
            }
            None => {
                draw_line(s.x, s.y, e.x, e.y, 1.0, Color::from_rgba(220, 220, 80, 120));
            }
        }
    }
}
