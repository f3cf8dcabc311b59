use anyhow::{Context, Result};
use combo_controller::engine::game_loop::GameLoop;
use combo_controller::engine::input::InputAction;
use combo_controller::game::characters::{Character, CharacterConfig, CharacterEvent, CharacterRig};
use glam::{Vec2, Vec3};
use log::{debug, info};
use std::time::Duration;

/// Scripted input, applied before the fixed step it is keyed to
enum Cue {
    Move(Vec2),
    Press(InputAction),
    Release(InputAction),
    Hit { knockback: Vec3, stun: f32 },
}

/// Walk, run, stop, jump, three-hit combo, then take a hit (60 steps per second)
const SCRIPT: &[(u64, Cue)] = &[
    (0, Cue::Move(Vec2::new(0.0, 1.0))),
    (60, Cue::Press(InputAction::Run)),
    (120, Cue::Release(InputAction::Run)),
    (150, Cue::Move(Vec2::ZERO)),
    (160, Cue::Press(InputAction::Jump)),
    (165, Cue::Release(InputAction::Jump)),
    (230, Cue::Press(InputAction::Attack)),
    (231, Cue::Release(InputAction::Attack)),
    (240, Cue::Press(InputAction::Attack)),
    (241, Cue::Release(InputAction::Attack)),
    (275, Cue::Press(InputAction::Attack)),
    (276, Cue::Release(InputAction::Attack)),
    (
        400,
        Cue::Hit {
            knockback: Vec3::new(0.0, 0.0, -4.0),
            stun: 0.5,
        },
    ),
];

const DEMO_STEPS: u64 = 480;

/// Simulated display refresh (144 Hz)
const FRAME_TIME: Duration = Duration::from_micros(6_944);

fn apply_cues(step: u64, rig: &CharacterRig, character: &mut Character) {
    for (_, cue) in SCRIPT.iter().filter(|(at, _)| *at == step) {
        match cue {
            Cue::Move(value) => rig.input.set_movement(*value),
            Cue::Press(action) => rig.input.press(*action),
            Cue::Release(action) => rig.input.release(*action),
            Cue::Hit { knockback, stun } => character.take_hit(*knockback, *stun),
        }
    }
}

fn report(step: u64, character: &mut Character) {
    for event in character.take_events() {
        match event {
            CharacterEvent::StateChanged { from, to } => {
                info!("[{:>3}] {}: {} -> {}", step, character.name, from, to);
            }
            CharacterEvent::Damage {
                stage,
                combo_index,
                damage,
            } => {
                info!(
                    "[{:>3}] {} deals {} damage with {} (combo #{})",
                    step, character.name, damage, stage, combo_index
                );
            }
            CharacterEvent::Impulse { stage, impulse } => {
                debug!("[{:>3}] {} lunges {:?}", step, stage, impulse);
            }
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting combo controller demo...");

    let config = match std::env::args().nth(1) {
        Some(path) => CharacterConfig::load(&path)
            .with_context(|| format!("Cannot start with config {}", path))?,
        None => CharacterConfig::standard(),
    };

    let rig = CharacterRig::new(&config, Vec3::ZERO);
    let mut character = Character::new(0, "Hero", config, rig.collaborators())?;
    let mut game_loop = GameLoop::new();

    let mut step = 0;
    while step < DEMO_STEPS {
        let updates = game_loop.begin_frame(FRAME_TIME);
        for _ in 0..updates {
            apply_cues(step, &rig, &mut character);
            character.frame(game_loop.fixed_timestep());
            report(step, &mut character);
            step += 1;
        }
    }

    let position = character.position();
    info!(
        "Demo finished after {} frames ({:.2}s simulated): {} at ({:.2}, {:.2}, {:.2})",
        game_loop.frame_count(),
        game_loop.simulated_time().as_secs_f32(),
        character.state(),
        position.x,
        position.y,
        position.z
    );

    Ok(())
}
