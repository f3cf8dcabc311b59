// Stunned state - hit stun with knockback

use super::base::{self, Subscriptions};
use super::context::StateContext;
use super::{State, StateId};
use crate::game::characters::animation::AnimationParam;
use glam::Vec3;

#[derive(Debug, Default)]
pub struct StunnedState {
    subscriptions: Subscriptions,
    /// Seconds of stun left
    remaining: f32,
}

impl StunnedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stun length for the next activation
    pub fn set_duration(&mut self, seconds: f32) {
        self.remaining = seconds;
    }

    /// Lengthen an active stun; a shorter hit never cuts it short
    pub fn extend(&mut self, seconds: f32) {
        self.remaining = self.remaining.max(seconds);
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl State for StunnedState {
    fn id(&self) -> StateId {
        StateId::Stunned
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        base::enter(&mut self.subscriptions, ctx);
        ctx.shared.movement_speed_modifier = 0.0;
        base::start_animation(ctx, AnimationParam::Stunned);
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        base::exit(&mut self.subscriptions, ctx);
        self.remaining = 0.0;
        base::stop_animation(ctx, AnimationParam::Stunned);
    }

    /// Knockback only: no rotation, no input-driven motion
    fn update(&mut self, ctx: &mut StateContext<'_>, dt: f32) {
        base::translate(ctx, Vec3::ZERO, dt);

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            if ctx.collaborators.mover.is_grounded() {
                ctx.request(StateId::Idle);
            } else {
                ctx.request(StateId::Falling);
            }
        }
    }
}
