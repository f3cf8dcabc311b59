// Fall state - airborne and moving down

use super::base::{self, Subscriptions};
use super::context::StateContext;
use super::{State, StateId};
use crate::game::characters::animation::AnimationParam;

#[derive(Debug, Default)]
pub struct FallState {
    subscriptions: Subscriptions,
}

impl FallState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State for FallState {
    fn id(&self) -> StateId {
        StateId::Falling
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        base::enter(&mut self.subscriptions, ctx);
        base::start_animation(ctx, AnimationParam::Air);
        base::start_animation(ctx, AnimationParam::Fall);
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        base::exit(&mut self.subscriptions, ctx);
        base::stop_animation(ctx, AnimationParam::Air);
        base::stop_animation(ctx, AnimationParam::Fall);
    }

    fn physics_update(&mut self, ctx: &mut StateContext<'_>, _dt: f32) {
        if ctx.collaborators.mover.is_grounded() {
            ctx.request(StateId::Idle);
        }
    }
}
