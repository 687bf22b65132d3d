use egui_macroquad::egui;
use egui_plot::{Line, Plot, PlotPoints};

use super::UIState;

/// Bottom-right plot of the best score per finished generation.
pub(super) fn draw_score_plot(egui_ctx: &egui::Context, state: &UIState) {
    if state.best_score_history.is_empty() {
        return;
    }

    egui::Window::new("Best score")
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -10.0))
        .default_size(egui::vec2(320.0, 160.0))
        .show(egui_ctx, |ui| {
            let points: PlotPoints = state
                .best_score_history
                .iter()
                .map(|&(generation, score)| [generation, score])
                .collect();

            Plot::new("best_score_plot")
                .height(140.0)
                .allow_drag(false)
                .allow_zoom(false)
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new(points).color(egui::Color32::from_rgb(120, 220, 120)));
                });
        });
}
