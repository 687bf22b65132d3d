use egui_macroquad::egui;
use macroquad::time::get_fps;

use crate::simulation::manager::Manager;

/// Top-right telemetry for the camera-followed car and the round.
pub(super) fn draw_hud_panel(egui_ctx: &egui::Context, manager: &Manager) {
    egui::Window::new("Telemetry")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .resizable(false)
        .show(egui_ctx, |ui| {
            let state = &manager.state;
            let active = state.cars.get(state.active);

            ui.label(format!("generation: {}", manager.generation));
            ui.label(format!(
                "alive: {} / {}",
                state.alive.len(),
                state.cars.len()
            ));
            ui.label(format!("fps: {}", get_fps()));

            ui.separator();

            match active {
                Some(car) => {
                    let id = car.brain.as_ref().map_or(0, |b| b.id);
                    let rounds = car.brain.as_ref().map_or(0, |b| b.survived_rounds);
                    ui.label(format!("car: #{id:08x}"));
                    ui.label(format!("score: {:.1}", car.score(&manager.params)));
                    ui.label(format!("survived rounds: {rounds}"));
                    ui.label(format!("speed: {:.2}", car.speed));
                    if let Some(stats) = &car.stats {
                        ui.label(format!("overtakes: {}", stats.merit));
                        ui.label(format!("demerit: {}", stats.demerit));
                    }
                }
                None => {
                    ui.label("no active car");
                }
            }

            if state.game_over {
                ui.separator();
                ui.label(
                    egui::RichText::new("ROUND OVER")
                        .color(egui::Color32::from_rgb(255, 120, 120))
                        .strong(),
                );
            }
        });
}
