// Shared state behaviour: input callbacks, locomotion, animation helpers

use super::context::StateContext;
use crate::engine::input::{ActionPhase, InputAction, InputSource, SubscriptionToken};
use crate::game::characters::animation::AnimationParam;
use crate::game::characters::motion;
use glam::Vec3;
use log::{debug, warn};

/// Action edges every state listens to while active
pub const INPUT_CALLBACKS: [(InputAction, ActionPhase); 5] = [
    (InputAction::Movement, ActionPhase::Canceled),
    (InputAction::Run, ActionPhase::Started),
    (InputAction::Run, ActionPhase::Canceled),
    (InputAction::Jump, ActionPhase::Started),
    (InputAction::Attack, ActionPhase::Started),
];

/// Tokens a state acquired on enter and must release on exit
#[derive(Debug, Default)]
pub struct Subscriptions {
    tokens: Vec<SubscriptionToken>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one edge; an unbound action is logged and skipped
    pub fn subscribe(&mut self, input: &mut dyn InputSource, action: InputAction, phase: ActionPhase) {
        match input.subscribe(action, phase) {
            Ok(token) => self.tokens.push(token),
            Err(err) => warn!("Skipping {} {:?} callback: {}", action, phase, err),
        }
    }

    /// Release every held token
    pub fn release_all(&mut self, input: &mut dyn InputSource) {
        for token in self.tokens.drain(..) {
            if let Err(err) = input.unsubscribe(token) {
                warn!("Failed to release input callback: {}", err);
            }
        }
    }

    /// Whether a delivery addressed to `token` belongs to this state
    pub fn holds(&self, token: SubscriptionToken) -> bool {
        self.tokens.contains(&token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Register the shared input callbacks
pub fn enter(subscriptions: &mut Subscriptions, ctx: &mut StateContext<'_>) {
    if !subscriptions.is_empty() {
        warn!("State entered while still holding {} callbacks", subscriptions.len());
        subscriptions.release_all(ctx.collaborators.input.as_mut());
    }
    for (action, phase) in INPUT_CALLBACKS {
        subscriptions.subscribe(ctx.collaborators.input.as_mut(), action, phase);
    }
}

/// Release everything registered by [`enter`]
pub fn exit(subscriptions: &mut Subscriptions, ctx: &mut StateContext<'_>) {
    subscriptions.release_all(ctx.collaborators.input.as_mut());
}

/// Read the movement axis into shared state, keeping the last value on failure
pub fn read_movement_input(ctx: &mut StateContext<'_>) {
    match ctx.collaborators.input.read_axis(InputAction::Movement) {
        Ok(value) => ctx.shared.movement_input = value,
        Err(err) => warn!("Keeping previous movement input: {}", err),
    }
}

/// Ground-movement step: direction from input, rotate, then translate
pub fn locomotion(ctx: &mut StateContext<'_>, dt: f32) {
    let direction = movement_direction(ctx);
    rotate(ctx, direction, dt);
    translate(ctx, direction, dt);
}

/// World-space direction for this frame's input
pub fn movement_direction(ctx: &StateContext<'_>) -> Vec3 {
    let camera = &ctx.collaborators.camera;
    motion::movement_direction(camera.forward(), camera.right(), ctx.shared.movement_input)
}

/// Turn the facing towards `direction`
pub fn rotate(ctx: &mut StateContext<'_>, direction: Vec3, dt: f32) {
    ctx.shared.facing = motion::smooth_rotation(
        ctx.shared.facing,
        direction,
        ctx.shared.rotation_damping,
        dt,
    );
}

/// Submit this frame's displacement (input motion plus external force) to the mover
pub fn translate(ctx: &mut StateContext<'_>, direction: Vec3, dt: f32) {
    let speed = motion::effective_speed(
        ctx.shared.movement_speed,
        ctx.shared.movement_speed_modifier,
    );
    let force = ctx.collaborators.forces.movement();
    let displacement = motion::frame_displacement(direction, speed, force, dt);
    ctx.collaborators.mover.move_by(displacement);

    let flags = ctx.collaborators.mover.collision_flags();
    if flags.sides || flags.above {
        debug!("Movement blocked: {:?}", flags);
    }
}

pub fn start_animation(ctx: &mut StateContext<'_>, param: AnimationParam) {
    ctx.collaborators.animator.set_bool(param, true);
}

pub fn stop_animation(ctx: &mut StateContext<'_>, param: AnimationParam) {
    ctx.collaborators.animator.set_bool(param, false);
}
