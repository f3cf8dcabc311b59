// Character state machine
//
// - `machine`: owns the active state, the shared runtime fields and the collaborators
// - `context`: what a state may touch during one call
// - `base`: behaviour every state shares (input callbacks, locomotion, animation helpers)
// - one module per concrete state

pub mod base;
pub mod context;
pub mod machine;

mod attack;
mod fall;
mod grounded;
mod idle;
mod jump;
mod run;
mod stunned;
mod walk;

pub use base::Subscriptions;
pub use context::{
    CharacterEvent, Collaborators, CollaboratorsBuilder, SharedRuntimeState, StateContext,
};
pub use machine::StateMachine;

use crate::engine::input::{ActionEvent, ActionPhase, InputAction};
use std::fmt;

/// Identifies one state instance in the machine's roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    /// Standing still on ground
    Idle,
    /// Moving on ground at walk speed
    Walk,
    /// Moving on ground at run speed
    Run,
    /// Rising after a jump
    Jump,
    /// In the air, moving downward
    Falling,
    /// Attack stage at the given chain position
    Attack(usize),
    /// Taking a hit
    Stunned,
}

impl Default for StateId {
    fn default() -> Self {
        Self::Idle
    }
}

impl StateId {
    /// Check if the state keeps the character on the ground
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Idle | Self::Walk | Self::Run)
    }

    /// Check if the character is in the air
    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::Jump | Self::Falling)
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, Self::Attack(_))
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Falling => "fall",
            Self::Attack(_) => "attack",
            Self::Stunned => "stunned",
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack(position) => write!(f, "attack#{position}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Capability set of every character state
///
/// Default methods carry the shared behaviour; a state overrides only what
/// differs. Transitions are requested through the context and carried out by
/// the machine once the call returns.
pub trait State {
    fn id(&self) -> StateId;

    /// Input subscriptions held while the state is active
    fn subscriptions(&mut self) -> &mut Subscriptions;

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        base::enter(self.subscriptions(), ctx);
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        base::exit(self.subscriptions(), ctx);
    }

    fn handle_input(&mut self, ctx: &mut StateContext<'_>) {
        base::read_movement_input(ctx);
    }

    fn update(&mut self, ctx: &mut StateContext<'_>, dt: f32) {
        base::locomotion(ctx, dt);
    }

    fn physics_update(&mut self, _ctx: &mut StateContext<'_>, _dt: f32) {}

    fn on_movement_canceled(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_run_started(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_run_canceled(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_jump_started(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_attack_started(&mut self, _ctx: &mut StateContext<'_>) {}
}

/// Route an action edge to the matching callback
pub(crate) fn dispatch(state: &mut dyn State, event: ActionEvent, ctx: &mut StateContext<'_>) {
    match (event.action, event.phase) {
        (InputAction::Movement, ActionPhase::Canceled) => state.on_movement_canceled(ctx),
        (InputAction::Run, ActionPhase::Started) => state.on_run_started(ctx),
        (InputAction::Run, ActionPhase::Canceled) => state.on_run_canceled(ctx),
        (InputAction::Jump, ActionPhase::Started) => state.on_jump_started(ctx),
        (InputAction::Attack, ActionPhase::Started) => state.on_attack_started(ctx),
        _ => {}
    }
}
