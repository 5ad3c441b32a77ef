//! Interactive map viewer window.
//!
//! Translates window input into controller events, executes the effectful
//! actions the controller requests (regenerate, save, export), and blits
//! the rendered frame. Map generation runs synchronously on this thread;
//! while it runs, the progress sink repaints the window from inside the
//! generator's callback and watches for a quit, which terminates the
//! process immediately rather than returning into the generator.

use std::path::Path;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::camera::{ViewMode, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::generator::{MapConfig, MapGenerator};
use crate::progress::ProgressSink;
use crate::render;
use crate::session::{InputEvent, MoveInput, RenderState, SessionState, StepAction};
use crate::storage;
use crate::worldmap::WorldMap;

/// How the viewer loop ended.
pub enum ViewerExit {
    /// Escape from detail view: back to the setup menu.
    ToMenu,
    /// Window closed or hard quit.
    Quit,
}

pub fn create_window() -> Window {
    let mut window = Window::new(
        "Realm Viewer",
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .expect("Failed to create window");
    window.set_target_fps(60);
    window
}

/// Progress sink that keeps the window alive during generation. Each
/// report repaints the bar and pumps the window's event queue; a closed
/// window exits the process (generation is cancel-and-terminate, there is
/// no partial map to resume).
struct WindowProgress<'a> {
    window: &'a mut Window,
    buffer: Vec<u32>,
}

impl ProgressSink for WindowProgress<'_> {
    fn report(&mut self, fraction: f32, message: &str) {
        render::render_progress(&mut self.buffer, fraction);
        self.window.set_title(&format!("Generating map — {}", message));
        self.window
            .update_with_buffer(&self.buffer, SCREEN_WIDTH, SCREEN_HEIGHT)
            .expect("Failed to update window");
        if !self.window.is_open() || self.window.is_key_down(Key::Q) {
            println!("Generation aborted");
            std::process::exit(0);
        }
    }
}

/// Generate a map while keeping the window responsive.
pub fn generate_with_progress(window: &mut Window, config: &MapConfig) -> WorldMap {
    let mut generator = MapGenerator::new(config);
    println!("Generating map with seed: {}", generator.seed());
    let mut sink = WindowProgress {
        window,
        buffer: vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT],
    };
    let map = generator.generate(&mut sink);
    println!(
        "Map generated: {}x{} tiles, {} settlements",
        map.width,
        map.height,
        map.settlements.len()
    );
    map
}

/// Run the viewer until the user leaves for the menu or quits.
pub fn run_viewer(mut window: Window, map: WorldMap, maps_dir: &Path) -> ViewerExit {
    let mut session = SessionState::new(map);
    let mut buffer = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
    let mut was_mouse_down = false;

    while window.is_open() {
        let mut events: Vec<InputEvent> = Vec::new();
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            events.push(InputEvent::ExitView);
        }
        if window.is_key_pressed(Key::M, KeyRepeat::No) {
            events.push(InputEvent::ToggleOverview);
        }
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            events.push(InputEvent::Regenerate);
        }
        if window.is_key_pressed(Key::Enter, KeyRepeat::No) {
            events.push(InputEvent::Save);
        }
        if window.is_key_pressed(Key::E, KeyRepeat::No) {
            events.push(InputEvent::Export);
        }

        let mouse_down = window.get_mouse_down(MouseButton::Left);
        if mouse_down && !was_mouse_down {
            if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Clamp) {
                events.push(InputEvent::Click {
                    px: mx as usize,
                    py: my as usize,
                });
            }
        }
        was_mouse_down = mouse_down;

        for event in events {
            match session.handle_event(event) {
                StepAction::None => {}
                StepAction::Quit => return ViewerExit::Quit,
                StepAction::ExitToMenu => return ViewerExit::ToMenu,
                StepAction::Regenerate => {
                    println!("Regenerating map...");
                    let config = MapConfig {
                        width: session.map.width,
                        height: session.map.height,
                        seed: None,
                    };
                    let map = generate_with_progress(&mut window, &config);
                    session.replace_map(map);
                }
                StepAction::Save => match storage::save_map(&session.map, maps_dir) {
                    Ok(path) => println!("Map saved to {}", path.display()),
                    // The in-memory map is untouched; play continues.
                    Err(e) => eprintln!("Failed to save map: {}", e),
                },
                StepAction::Export => {
                    let filename =
                        format!("realm_{}.png", session.map.seed.unwrap_or_default());
                    match render::export_png(&session.map, &filename) {
                        Ok(()) => println!("Exported map to {}", filename),
                        Err(e) => eprintln!("Export failed: {}", e),
                    }
                }
            }
        }

        session.apply_movement(MoveInput {
            left: window.is_key_down(Key::Left) || window.is_key_down(Key::A),
            right: window.is_key_down(Key::Right) || window.is_key_down(Key::D),
            up: window.is_key_down(Key::Up) || window.is_key_down(Key::W),
            down: window.is_key_down(Key::Down) || window.is_key_down(Key::S),
        });

        let state = session.render_state();
        render::render_frame(&session.map, &state, &mut buffer);
        window.set_title(&title_for(&session, &state));
        window
            .update_with_buffer(&buffer, SCREEN_WIDTH, SCREEN_HEIGHT)
            .expect("Failed to update window");
    }

    ViewerExit::Quit
}

fn title_for(session: &SessionState, state: &RenderState) -> String {
    let camera = match state.mode {
        ViewMode::Detail => state.detail_camera,
        ViewMode::Overview => state.overview_camera,
    };
    let status = state
        .status
        .and_then(|id| session.map.settlement(id))
        .map(|s| format!(" | {}: {}", s.kind.name(), s.name))
        .unwrap_or_default();
    format!(
        "{} — {} ({}, {}){} | M overview, click select/zoom, R regenerate, Enter save, E export, Esc menu",
        session.map.name,
        state.mode.label(),
        camera.x,
        camera.y,
        status,
    )
}
