// Idle state - standing on ground

use super::base::{self, Subscriptions};
use super::context::StateContext;
use super::grounded;
use super::{State, StateId};
use crate::game::characters::animation::AnimationParam;
use glam::Vec2;

#[derive(Debug, Default)]
pub struct IdleState {
    subscriptions: Subscriptions,
}

impl IdleState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State for IdleState {
    fn id(&self) -> StateId {
        StateId::Idle
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        base::enter(&mut self.subscriptions, ctx);
        ctx.shared.movement_speed_modifier = 0.0;
        grounded::enter(ctx);
        base::start_animation(ctx, AnimationParam::Idle);
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        base::exit(&mut self.subscriptions, ctx);
        grounded::exit(ctx);
        base::stop_animation(ctx, AnimationParam::Idle);
    }

    fn handle_input(&mut self, ctx: &mut StateContext<'_>) {
        base::read_movement_input(ctx);
        if ctx.shared.movement_input == Vec2::ZERO {
            return;
        }
        if ctx.shared.run_held {
            ctx.request(StateId::Run);
        } else {
            ctx.request(StateId::Walk);
        }
    }

    fn physics_update(&mut self, ctx: &mut StateContext<'_>, _dt: f32) {
        grounded::check_ground(ctx);
    }

    fn on_jump_started(&mut self, ctx: &mut StateContext<'_>) {
        grounded::on_jump_started(ctx);
    }

    fn on_attack_started(&mut self, ctx: &mut StateContext<'_>) {
        grounded::on_attack_started(ctx);
    }
}
