// Jump state - rising after a jump

use super::base::{self, Subscriptions};
use super::context::StateContext;
use super::{State, StateId};
use crate::game::characters::animation::AnimationParam;

#[derive(Debug, Default)]
pub struct JumpState {
    subscriptions: Subscriptions,
    /// Set once the mover reports leaving the ground
    left_ground: bool,
}

impl JumpState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State for JumpState {
    fn id(&self) -> StateId {
        StateId::Jump
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        base::enter(&mut self.subscriptions, ctx);
        self.left_ground = false;
        ctx.collaborators.forces.jump(ctx.config.air.jump_force);
        base::start_animation(ctx, AnimationParam::Air);
        base::start_animation(ctx, AnimationParam::Jump);
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        base::exit(&mut self.subscriptions, ctx);
        base::stop_animation(ctx, AnimationParam::Air);
        base::stop_animation(ctx, AnimationParam::Jump);
    }

    fn physics_update(&mut self, ctx: &mut StateContext<'_>, _dt: f32) {
        let grounded = ctx.collaborators.mover.is_grounded();
        if !grounded {
            self.left_ground = true;
        }

        if ctx.collaborators.forces.vertical_velocity() <= 0.0 {
            ctx.request(StateId::Falling);
        } else if grounded && self.left_ground {
            // Hit a ledge on the way up
            ctx.request(StateId::Idle);
        }
    }
}
