// Behaviour shared by the grounded locomotion states (idle, walk, run)

use super::base;
use super::context::StateContext;
use super::StateId;
use crate::game::characters::animation::AnimationParam;
use log::debug;

pub fn enter(ctx: &mut StateContext<'_>) {
    base::start_animation(ctx, AnimationParam::Ground);
}

pub fn exit(ctx: &mut StateContext<'_>) {
    base::stop_animation(ctx, AnimationParam::Ground);
}

/// Leaving the ground without jumping starts a fall
pub fn check_ground(ctx: &mut StateContext<'_>) {
    if !ctx.collaborators.mover.is_grounded() {
        ctx.request(StateId::Falling);
    }
}

pub fn on_jump_started(ctx: &mut StateContext<'_>) {
    ctx.request(StateId::Jump);
}

pub fn on_attack_started(ctx: &mut StateContext<'_>) {
    if ctx.chain.is_empty() {
        debug!("Attack pressed but no attack stage is enabled");
        return;
    }
    ctx.request(StateId::Attack(0));
}

pub fn on_movement_canceled(ctx: &mut StateContext<'_>) {
    ctx.request(StateId::Idle);
}
