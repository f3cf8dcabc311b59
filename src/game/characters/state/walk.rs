// Walk state - moving on ground at walk speed

use super::base::{self, Subscriptions};
use super::context::StateContext;
use super::grounded;
use super::{State, StateId};
use crate::game::characters::animation::AnimationParam;

#[derive(Debug, Default)]
pub struct WalkState {
    subscriptions: Subscriptions,
}

impl WalkState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State for WalkState {
    fn id(&self) -> StateId {
        StateId::Walk
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        base::enter(&mut self.subscriptions, ctx);
        ctx.shared.movement_speed_modifier = ctx.config.ground.walk_speed_modifier;
        grounded::enter(ctx);
        base::start_animation(ctx, AnimationParam::Walk);
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        base::exit(&mut self.subscriptions, ctx);
        grounded::exit(ctx);
        base::stop_animation(ctx, AnimationParam::Walk);
    }

    fn physics_update(&mut self, ctx: &mut StateContext<'_>, _dt: f32) {
        grounded::check_ground(ctx);
    }

    fn on_movement_canceled(&mut self, ctx: &mut StateContext<'_>) {
        grounded::on_movement_canceled(ctx);
    }

    fn on_run_started(&mut self, ctx: &mut StateContext<'_>) {
        ctx.request(StateId::Run);
    }

    fn on_jump_started(&mut self, ctx: &mut StateContext<'_>) {
        grounded::on_jump_started(ctx);
    }

    fn on_attack_started(&mut self, ctx: &mut StateContext<'_>) {
        grounded::on_attack_started(ctx);
    }
}
