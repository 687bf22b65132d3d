//! egui panels: evolution controls, telemetry HUD, score plot and the
//! event log.

mod controls;
mod events;
mod hud;
mod stats;

use std::collections::VecDeque;

use egui_macroquad::egui;

use crate::simulation::manager::Manager;
use crate::simulation::store;

const MAX_HISTORY_POINTS: usize = 500;

/// UI-side state: slider values, pending action requests and plot history.
#[allow(clippy::struct_excessive_bools)]
pub struct UIState {
    /// Mutation rate slider.
    pub mutation_rate: f32,
    /// Population size slider.
    pub cars_quantity: i32,
    /// Hidden-layer sizes as comma-separated ints.
    pub neurons_text: String,
    /// Save-to-backup requested this frame.
    pub save_requested: bool,
    /// Restore-from-backup requested this frame.
    pub restore_requested: bool,
    /// Clear-best-network requested this frame.
    pub reset_requested: bool,
    /// Immediate restart requested this frame.
    pub restart_requested: bool,
    /// Immediate evolve requested this frame.
    pub evolve_requested: bool,
    /// Simulation paused.
    pub paused: bool,
    /// Draw the active car's sensor rays.
    pub show_rays: bool,
    /// Drive the active car with the arrow keys instead of its brain.
    pub manual_drive: bool,
    /// Transient feedback line under the buttons.
    pub status_message: Option<String>,
    /// Best score per finished generation, for the plot.
    pub best_score_history: VecDeque<(f64, f64)>,
    last_recorded_generation: u32,
    applied_mutation_rate: f32,
    applied_cars_quantity: i32,
    applied_neurons_text: String,
}

impl UIState {
    /// Seeds the widgets from the persisted configuration, falling back to
    /// the parameter defaults.
    pub fn new(manager: &Manager) -> Self {
        let mutation_rate = store::get_json(manager.store(), store::MUTATION_RATE)
            .unwrap_or(manager.params.mutation_rate);
        let cars_quantity = store::get_json::<usize>(manager.store(), store::CARS_QUANTITY)
            .unwrap_or(manager.params.cars_quantity) as i32;
        let neurons_text = store::get_json::<String>(manager.store(), store::NEURONS)
            .unwrap_or_else(|| {
                manager
                    .params
                    .hidden_layers
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            });

        Self {
            mutation_rate,
            cars_quantity,
            neurons_text: neurons_text.clone(),
            save_requested: false,
            restore_requested: false,
            reset_requested: false,
            restart_requested: false,
            evolve_requested: false,
            paused: false,
            show_rays: true,
            manual_drive: false,
            status_message: None,
            best_score_history: VecDeque::new(),
            last_recorded_generation: 0,
            applied_mutation_rate: mutation_rate,
            applied_cars_quantity: cars_quantity,
            applied_neurons_text: neurons_text,
        }
    }

    /// Records the finished generation's best score once per round for the
    /// plot.
    pub fn update_history(&mut self, manager: &Manager) {
        if manager.state.game_over && self.last_recorded_generation != manager.generation {
            self.last_recorded_generation = manager.generation;
            let best_score = manager
                .state
                .cars
                .get(manager.state.best)
                .map(|c| c.score(&manager.params))
                .unwrap_or(0.0);
            self.best_score_history
                .push_back((manager.generation as f64, best_score as f64));
            if self.best_score_history.len() > MAX_HISTORY_POINTS {
                self.best_score_history.pop_front();
            }
        }
    }

    /// Writes changed configuration through to the store and runs any
    /// requested manual action against the manager.
    pub fn apply(&mut self, manager: &mut Manager, now: f64) {
        if self.mutation_rate != self.applied_mutation_rate {
            store::set_json(manager.store_mut(), store::MUTATION_RATE, &self.mutation_rate);
            self.applied_mutation_rate = self.mutation_rate;
        }
        if self.cars_quantity != self.applied_cars_quantity {
            store::set_json(
                manager.store_mut(),
                store::CARS_QUANTITY,
                &(self.cars_quantity.max(1) as usize),
            );
            self.applied_cars_quantity = self.cars_quantity;
        }
        if self.neurons_text != self.applied_neurons_text {
            store::set_json(manager.store_mut(), store::NEURONS, &self.neurons_text);
            self.applied_neurons_text = self.neurons_text.clone();
        }

        if std::mem::take(&mut self.save_requested) {
            self.report("network saved", "no network to save", manager.save_network(now));
        }
        if std::mem::take(&mut self.restore_requested) {
            self.report(
                "backup restored as best",
                "no backup to restore",
                manager.restore_network(now),
            );
        }
        if std::mem::take(&mut self.reset_requested) {
            self.report(
                "best network cleared",
                "nothing to clear",
                manager.reset_network(now),
            );
        }
        if std::mem::take(&mut self.evolve_requested) {
            self.report("best network promoted", "no best car", manager.evolve(now));
        }
        if std::mem::take(&mut self.restart_requested) {
            manager.force_restart(now);
            self.status_message = Some("round restarted".into());
        }
    }

    fn report(&mut self, ok: &str, failed: &str, result: bool) {
        self.status_message = Some(if result { ok.into() } else { failed.into() });
    }
}

/// Draws every panel. Call inside the frame, before `egui_macroquad::draw`.
pub fn draw_ui(state: &mut UIState, manager: &Manager) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        egui_ctx.set_visuals(visuals);

        controls::draw_controls_panel(egui_ctx, state);
        hud::draw_hud_panel(egui_ctx, manager);
        stats::draw_score_plot(egui_ctx, state);
        events::draw_events_panel(egui_ctx, &manager.event_log);
    });
}
