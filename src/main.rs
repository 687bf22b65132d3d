use macroquad::prelude::*;

use neurodrive::graphics;
use neurodrive::simulation::manager::Manager;
use neurodrive::simulation::params::Params;
use neurodrive::simulation::store::FileStore;
use neurodrive::ui::{self, UIState};

const STORE_PATH: &str = "neurodrive_store.json";

fn window_conf() -> Conf {
    Conf {
        window_title: "Neurodrive".to_string(),
        window_width: 1280,
        window_height: 800,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut genesis = true;
    let mut world: Option<(Manager, UIState)> = None;

    let params = Params::default();

    println!("Starting neurodrive simulation");

    loop {
        if genesis {
            clear_background(LIGHTGRAY);
            let text = "Start a new evolution by pressing Enter";
            let font_size = 30.0;

            let text_size = measure_text(text, None, font_size as _, 1.0);
            draw_text(
                text,
                screen_width() / 2. - text_size.width / 2.,
                screen_height() / 2. - text_size.height / 2.,
                font_size,
                DARKGRAY,
            );

            if is_key_down(KeyCode::Enter) {
                genesis = false;

                let store = FileStore::open(STORE_PATH);
                let manager = Manager::new(params.clone(), Box::new(store), get_time());
                let ui_state = UIState::new(&manager);
                world = Some((manager, ui_state));
            }
            next_frame().await;
            continue;
        }

        clear_background(Color::from_rgba(30, 90, 40, 255));

        if let Some((ref mut manager, ref mut ui_state)) = world {
            let now = get_time();

            manager.update();
            ui_state.update_history(manager);
            manager.check_game_over(now);

            if !ui_state.paused {
                drive_manually(manager, ui_state.manual_drive);
                manager.update_vehicles(now);
            }

            graphics::draw_scene(manager, ui_state.show_rays);
            ui::draw_ui(ui_state, manager);
            ui_state.apply(manager, now);
            egui_macroquad::draw();
        }

        next_frame().await
    }
}

/// Arrow-key adapter for the manually driven car.
///
/// The handoff itself lives in [`Manager::take_wheel`], which releases any
/// previously held car back to its brain before granting the current one.
fn drive_manually(manager: &mut Manager, enabled: bool) {
    let Some(car) = manager.take_wheel(enabled) else {
        return;
    };

    car.controls.throttle = if is_key_down(KeyCode::Up) {
        1.0
    } else if is_key_down(KeyCode::Down) {
        -1.0
    } else {
        0.0
    };
    car.controls.brake = is_key_down(KeyCode::Space);
    car.controls.steer = if is_key_down(KeyCode::Left) {
        1.0
    } else if is_key_down(KeyCode::Right) {
        -1.0
    } else {
        0.0
    };
}
