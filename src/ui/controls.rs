use egui_macroquad::egui;

use super::UIState;

/// Left panel: evolution configuration and manual actions.
pub(super) fn draw_controls_panel(egui_ctx: &egui::Context, state: &mut UIState) {
    egui::SidePanel::left("controls_panel")
        .default_width(230.0)
        .show(egui_ctx, |ui| {
            ui.heading("Evolution");
            ui.separator();

            ui.label("Mutation rate");
            ui.add(egui::Slider::new(&mut state.mutation_rate, 0.0..=1.0));

            ui.label("Cars per generation");
            ui.add(egui::Slider::new(&mut state.cars_quantity, 1..=300));

            ui.label("Hidden neurons (comma-separated)");
            ui.text_edit_singleline(&mut state.neurons_text);
            ui.small("applies at the next restart");

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("💾 Save").clicked() {
                    state.save_requested = true;
                }
                if ui.button("📂 Restore").clicked() {
                    state.restore_requested = true;
                }
                if ui.button("🗑 Reset").clicked() {
                    state.reset_requested = true;
                }
            });
            ui.horizontal(|ui| {
                if ui.button("🔄 Restart").clicked() {
                    state.restart_requested = true;
                }
                if ui.button("🧬 Evolve").clicked() {
                    state.evolve_requested = true;
                }
            });

            if let Some(ref msg) = state.status_message {
                ui.separator();
                ui.label(egui::RichText::new(msg).color(egui::Color32::from_rgb(150, 220, 150)));
            }

            ui.separator();
            ui.checkbox(&mut state.paused, "Paused");
            ui.checkbox(&mut state.show_rays, "Show sensor rays");
            ui.checkbox(&mut state.manual_drive, "Manual drive (arrow keys)");
        });
}
