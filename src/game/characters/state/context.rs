// Shared runtime fields, collaborators and the per-call state context

use super::StateId;
use crate::engine::camera::OrientationSource;
use crate::engine::forces::ForceAccumulator;
use crate::engine::input::InputSource;
use crate::engine::physics::CharacterMover;
use crate::game::characters::animation::AnimatorSink;
use crate::game::characters::attack::AttackChain;
use crate::game::characters::config::{CharacterConfig, ConfigError};
use glam::{Quat, Vec2, Vec3};
use log::debug;

/// Per-character fields read and written by whichever state is active
#[derive(Debug, Clone, PartialEq)]
pub struct SharedRuntimeState {
    /// Movement axis read this frame (x = lateral, y = forward)
    pub movement_input: Vec2,
    /// Speed before the state's modifier (units/second)
    pub movement_speed: f32,
    /// Multiplier set by the active state
    pub movement_speed_modifier: f32,
    pub rotation_damping: f32,
    /// Position of the active attack stage in the combo chain (0 outside attacks)
    pub combo_index: usize,
    /// Seconds since the active state was entered
    pub time_in_state: f32,
    /// Whether the run button is held, tracked from every delivered run edge
    pub run_held: bool,
    /// Rotation of the character transform
    pub facing: Quat,
}

impl SharedRuntimeState {
    pub fn from_config(config: &CharacterConfig) -> Self {
        Self {
            movement_input: Vec2::ZERO,
            movement_speed: config.ground.base_speed,
            movement_speed_modifier: 1.0,
            rotation_damping: config.ground.base_rotation_damping,
            combo_index: 0,
            time_in_state: 0.0,
            run_held: false,
            facing: Quat::IDENTITY,
        }
    }
}

/// Something a state reports to the owning character
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterEvent {
    StateChanged {
        from: StateId,
        to: StateId,
    },
    /// An attack stage's damage window opened
    Damage {
        stage: String,
        combo_index: usize,
        damage: u32,
    },
    /// An attack stage pushed the character
    Impulse {
        stage: String,
        impulse: Vec3,
    },
}

/// Handles to the character's collaborators
pub struct Collaborators {
    pub input: Box<dyn InputSource>,
    pub mover: Box<dyn CharacterMover>,
    pub animator: Box<dyn AnimatorSink>,
    pub forces: Box<dyn ForceAccumulator>,
    pub camera: Box<dyn OrientationSource>,
}

/// Builder that checks every collaborator is present before a machine starts
#[derive(Default)]
pub struct CollaboratorsBuilder {
    input: Option<Box<dyn InputSource>>,
    mover: Option<Box<dyn CharacterMover>>,
    animator: Option<Box<dyn AnimatorSink>>,
    forces: Option<Box<dyn ForceAccumulator>>,
    camera: Option<Box<dyn OrientationSource>>,
}

impl CollaboratorsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    pub fn mover(mut self, mover: impl CharacterMover + 'static) -> Self {
        self.mover = Some(Box::new(mover));
        self
    }

    pub fn animator(mut self, animator: impl AnimatorSink + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    pub fn forces(mut self, forces: impl ForceAccumulator + 'static) -> Self {
        self.forces = Some(Box::new(forces));
        self
    }

    pub fn camera(mut self, camera: impl OrientationSource + 'static) -> Self {
        self.camera = Some(Box::new(camera));
        self
    }

    /// Fails with the first missing collaborator
    pub fn build(self) -> Result<Collaborators, ConfigError> {
        Ok(Collaborators {
            input: self
                .input
                .ok_or(ConfigError::MissingCollaborator("input"))?,
            mover: self
                .mover
                .ok_or(ConfigError::MissingCollaborator("mover"))?,
            animator: self
                .animator
                .ok_or(ConfigError::MissingCollaborator("animator"))?,
            forces: self
                .forces
                .ok_or(ConfigError::MissingCollaborator("forces"))?,
            camera: self
                .camera
                .ok_or(ConfigError::MissingCollaborator("camera"))?,
        })
    }
}

/// Everything a state may read or write during one call
///
/// Lent by the machine for the duration of the call; the state never keeps it.
pub struct StateContext<'a> {
    pub shared: &'a mut SharedRuntimeState,
    pub collaborators: &'a mut Collaborators,
    pub config: &'a CharacterConfig,
    pub chain: &'a AttackChain,
    events: &'a mut Vec<CharacterEvent>,
    requested: Option<StateId>,
}

impl<'a> StateContext<'a> {
    pub fn new(
        shared: &'a mut SharedRuntimeState,
        collaborators: &'a mut Collaborators,
        config: &'a CharacterConfig,
        chain: &'a AttackChain,
        events: &'a mut Vec<CharacterEvent>,
    ) -> Self {
        Self {
            shared,
            collaborators,
            config,
            chain,
            events,
            requested: None,
        }
    }

    /// Ask the machine to switch state once the current call returns.
    /// A later request in the same call replaces an earlier one.
    pub fn request(&mut self, next: StateId) {
        if let Some(previous) = self.requested.replace(next) {
            debug!("Transition request {} replaced by {}", previous, next);
        }
    }

    pub fn requested(&self) -> Option<StateId> {
        self.requested
    }

    pub fn emit(&mut self, event: CharacterEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::OrbitCamera;
    use crate::engine::forces::ForceReceiver;
    use crate::engine::input::ActionMapInput;
    use crate::engine::physics::KinematicMover;
    use crate::game::characters::animation::AnimatorParameters;

    fn full_builder() -> CollaboratorsBuilder {
        CollaboratorsBuilder::new()
            .input(ActionMapInput::new())
            .mover(KinematicMover::new(Vec3::ZERO))
            .animator(AnimatorParameters::new())
            .forces(ForceReceiver::new())
            .camera(OrbitCamera::new())
    }

    #[test]
    fn test_builder_with_everything() {
        assert!(full_builder().build().is_ok());
    }

    #[test]
    fn test_builder_reports_missing_collaborator() {
        let result = CollaboratorsBuilder::new()
            .input(ActionMapInput::new())
            .mover(KinematicMover::new(Vec3::ZERO))
            .animator(AnimatorParameters::new())
            .camera(OrbitCamera::new())
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingCollaborator("forces"))
        ));
    }

    #[test]
    fn test_shared_state_from_config() {
        let config = CharacterConfig::default();
        let shared = SharedRuntimeState::from_config(&config);
        assert_eq!(shared.movement_speed, config.ground.base_speed);
        assert_eq!(shared.rotation_damping, config.ground.base_rotation_damping);
        assert_eq!(shared.combo_index, 0);
        assert_eq!(shared.facing, Quat::IDENTITY);
    }

    #[test]
    fn test_last_request_wins() {
        let config = CharacterConfig::default();
        let chain = AttackChain::default();
        let mut shared = SharedRuntimeState::from_config(&config);
        let mut collaborators = full_builder().build().unwrap();
        let mut events = Vec::new();

        let mut ctx = StateContext::new(&mut shared, &mut collaborators, &config, &chain, &mut events);
        assert_eq!(ctx.requested(), None);
        ctx.request(StateId::Walk);
        ctx.request(StateId::Jump);
        assert_eq!(ctx.requested(), Some(StateId::Jump));

        ctx.emit(CharacterEvent::StateChanged {
            from: StateId::Idle,
            to: StateId::Walk,
        });
        assert_eq!(events.len(), 1);
    }
}
