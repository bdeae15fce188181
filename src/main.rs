//! Meteor Strafe headless runner
//!
//! Runs a seeded, scripted session without a renderer or physics engine and
//! logs the outcome. Set `RUST_LOG=debug` to follow spawns and hits.

#[cfg(not(target_arch = "wasm32"))]
use meteor_strafe::{
    HudSnapshot,
    consts::SIM_DT_MS,
    sim::{FixedStep, GameEvent, GameState, HeadlessContacts, TickInput, tick},
};

/// Two minutes of frames at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 120 * 60;
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;
#[cfg(not(target_arch = "wasm32"))]
const SEED: u64 = 0x5EED;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Meteor Strafe (headless) starting, seed {SEED:#x}");

    let mut state = GameState::new(SEED);
    let mut stepper = FixedStep::new();
    let mut contacts = HeadlessContacts::new();
    let mut registered = 0usize;

    for frame in 0..MAX_FRAMES {
        for _ in 0..stepper.steps(FRAME_MS) {
            let input = scripted_input(frame);
            tick(&mut state, &input, SIM_DT_MS);

            registered += state.entities.drain_physics_commands().len();
            let started = contacts.step(&state.entities);
            state.collisions.extend(started);

            for event in state.take_events() {
                if let GameEvent::GameOver { reason, score } = event {
                    log::info!("Game over ({reason:?}) with score {score}");
                }
            }
        }
        if state.is_game_over() {
            break;
        }
    }

    log::info!(
        "Ran {:.1} s of simulation, {} physics commands issued",
        state.now_ms() / 1000.0,
        registered
    );
    match HudSnapshot::capture(&state).to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize HUD: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}

/// Hold fire and sweep up and down the screen
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(frame: u32) -> TickInput {
    let sweep = (frame / 90) % 2 == 0;
    TickInput {
        fire: true,
        up: sweep,
        down: !sweep,
        ..Default::default()
    }
}
