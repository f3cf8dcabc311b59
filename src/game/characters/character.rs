// Character entity and its reference collaborators

use crate::engine::camera::OrbitCamera;
use crate::engine::forces::{ForceReceiver, DEFAULT_DRAG, GRAVITY};
use crate::engine::input::ActionMapInput;
use crate::engine::physics::KinematicMover;
use glam::{Quat, Vec3};
use log::{debug, info};

use super::animation::AnimatorParameters;
use super::config::{CharacterConfig, ConfigError};
use super::state::{CharacterEvent, CollaboratorsBuilder, StateId, StateMachine};

/// Unique identifier for a character
pub type CharacterId = u32;

/// Reference collaborators for one character
///
/// Every field is a shared handle: the rig keeps one clone for the
/// application (device input, rendering, tests) and hands the others to the
/// state machine through [`CharacterRig::collaborators`].
#[derive(Debug, Clone)]
pub struct CharacterRig {
    pub input: ActionMapInput,
    pub mover: KinematicMover,
    pub animator: AnimatorParameters,
    pub forces: ForceReceiver,
    pub camera: OrbitCamera,
}

impl CharacterRig {
    /// Rig standing at `spawn`, with gravity scaled by the config
    pub fn new(config: &CharacterConfig, spawn: Vec3) -> Self {
        Self {
            input: ActionMapInput::new(),
            mover: KinematicMover::new(spawn),
            animator: AnimatorParameters::new(),
            forces: ForceReceiver::with_params(GRAVITY * config.air.gravity_scale, DEFAULT_DRAG),
            camera: OrbitCamera::new(),
        }
    }

    pub fn collaborators(&self) -> CollaboratorsBuilder {
        CollaboratorsBuilder::new()
            .input(self.input.clone())
            .mover(self.mover.clone())
            .animator(self.animator.clone())
            .forces(self.forces.clone())
            .camera(self.camera.clone())
    }
}

/// A controllable character: its state machine plus identity
pub struct Character {
    /// Unique identifier
    pub id: CharacterId,
    /// Character name (for display)
    pub name: String,
    machine: StateMachine,
}

impl Character {
    pub fn new(
        id: CharacterId,
        name: &str,
        config: CharacterConfig,
        collaborators: CollaboratorsBuilder,
    ) -> Result<Self, ConfigError> {
        let machine = StateMachine::initialize(config, collaborators)?;
        info!("Character {} '{}' ready", id, name);

        Ok(Self {
            id,
            name: name.to_string(),
            machine,
        })
    }

    /// Run one frame: input, update, physics, then integrate external forces
    pub fn frame(&mut self, dt: f32) {
        self.machine.handle_input();
        self.machine.update(dt);
        self.machine.physics_update(dt);

        let collaborators = self.machine.collaborators_mut();
        let grounded = collaborators.mover.is_grounded();
        collaborators.forces.tick(dt, grounded);
    }

    /// Apply knockback and interrupt the current state with a hit stun
    pub fn take_hit(&mut self, knockback: Vec3, stun: f32) {
        debug!("{} hit: knockback {:?}, stun {}s", self.name, knockback, stun);
        self.machine.collaborators_mut().forces.add_impulse(knockback);
        self.machine.apply_hit_stun(stun);
    }

    pub fn state(&self) -> StateId {
        self.machine.current_state()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut StateMachine {
        &mut self.machine
    }

    /// Get character's current position
    pub fn position(&self) -> Vec3 {
        self.machine.collaborators().mover.position()
    }

    pub fn facing(&self) -> Quat {
        self.machine.shared().facing
    }

    pub fn is_grounded(&self) -> bool {
        self.machine.collaborators().mover.is_grounded()
    }

    /// Take the events produced since the last call
    pub fn take_events(&mut self) -> Vec<CharacterEvent> {
        self.machine.drain_events()
    }
}
