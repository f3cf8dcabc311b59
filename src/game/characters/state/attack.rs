// Attack state - one stage of the combo chain

use super::base::{self, Subscriptions};
use super::context::{CharacterEvent, StateContext};
use super::{State, StateId};
use crate::game::characters::animation::AnimationParam;
use crate::game::characters::motion;
use log::{debug, warn};

/// Plays the attack stage at one chain position
///
/// Timing is local to the activation: `elapsed` restarts on every enter, and
/// the damage, impulse and combo flags each fire at most once per activation.
#[derive(Debug)]
pub struct AttackState {
    position: usize,
    subscriptions: Subscriptions,
    /// Seconds since the stage started
    elapsed: f32,
    combo_queued: bool,
    damage_dealt: bool,
    force_applied: bool,
}

impl AttackState {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            subscriptions: Subscriptions::new(),
            elapsed: 0.0,
            combo_queued: false,
            damage_dealt: false,
            force_applied: false,
        }
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.combo_queued = false;
        self.damage_dealt = false;
        self.force_applied = false;
    }
}

impl State for AttackState {
    fn id(&self) -> StateId {
        StateId::Attack(self.position)
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        base::enter(&mut self.subscriptions, ctx);
        self.reset();

        ctx.shared.movement_speed_modifier = 0.0;
        ctx.shared.combo_index = self.position;

        base::start_animation(ctx, AnimationParam::Attack);
        base::start_animation(ctx, AnimationParam::ComboAttack);
        let combo = i32::try_from(self.position).unwrap_or(i32::MAX);
        ctx.collaborators.animator.set_integer(AnimationParam::Combo, combo);
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        base::exit(&mut self.subscriptions, ctx);
        base::stop_animation(ctx, AnimationParam::Attack);
        base::stop_animation(ctx, AnimationParam::ComboAttack);
    }

    fn update(&mut self, ctx: &mut StateContext<'_>, dt: f32) {
        let chain = ctx.chain;
        let Some(stage) = chain.get(self.position) else {
            warn!("No attack stage at chain position {}", self.position);
            ctx.request(StateId::Idle);
            return;
        };

        let previous = self.elapsed;
        self.elapsed += dt;

        if !self.force_applied && stage.force_due(self.elapsed) {
            self.force_applied = true;
            if stage.force != 0.0 {
                let impulse = motion::facing_forward(ctx.shared.facing) * stage.force;
                ctx.collaborators.forces.add_impulse(impulse);
                ctx.emit(CharacterEvent::Impulse {
                    stage: stage.name.clone(),
                    impulse,
                });
            }
        }

        if !self.damage_dealt && stage.reaches_damage_window(previous, self.elapsed) {
            self.damage_dealt = true;
            ctx.collaborators.animator.set_trigger(AnimationParam::Hit);
            ctx.emit(CharacterEvent::Damage {
                stage: stage.name.clone(),
                combo_index: self.position,
                damage: stage.damage,
            });
        }

        base::locomotion(ctx, dt);

        if stage.is_finished(self.elapsed) {
            let next = if self.combo_queued {
                chain.next(self.position)
            } else {
                None
            };
            match next {
                Some(position) => ctx.request(StateId::Attack(position)),
                None => ctx.request(StateId::Idle),
            }
        }
    }

    fn on_attack_started(&mut self, ctx: &mut StateContext<'_>) {
        if self.combo_queued {
            return;
        }

        let Some(stage) = ctx.chain.get(self.position) else {
            return;
        };
        if !stage.in_combo_window(self.elapsed) {
            debug!(
                "{} pressed outside the combo window ({:.2})",
                stage.name,
                stage.normalized(self.elapsed)
            );
            return;
        }
        if ctx.chain.next(self.position).is_some() {
            self.combo_queued = true;
            debug!("Combo queued after {}", stage.name);
        }
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
    use crate::game::characters::attack::{AttackChain, AttackStage, AttackTable};
    use crate::game::characters::config::CharacterConfig;
    use crate::game::characters::state::context::{CollaboratorsBuilder, SharedRuntimeState};
    use glam::Vec3;

    struct Fixture {
        config: CharacterConfig,
        chain: AttackChain,
        shared: SharedRuntimeState,
        collaborators: crate::game::characters::state::Collaborators,
        events: Vec<CharacterEvent>,
        forces: ForceReceiver,
        animator: AnimatorParameters,
    }

    impl Fixture {
        fn new(stages: Vec<AttackStage>) -> Self {
            let config = CharacterConfig {
                attacks: AttackTable::new(stages),
                ..CharacterConfig::default()
            };
            let chain = AttackChain::compile(&config.attacks);
            let shared = SharedRuntimeState::from_config(&config);
            let forces = ForceReceiver::new();
            let animator = AnimatorParameters::new();
            let collaborators = CollaboratorsBuilder::new()
                .input(ActionMapInput::new())
                .mover(KinematicMover::new(Vec3::ZERO))
                .animator(animator.clone())
                .forces(forces.clone())
                .camera(OrbitCamera::new())
                .build()
                .unwrap();
            Self {
                config,
                chain,
                shared,
                collaborators,
                events: Vec::new(),
                forces,
                animator,
            }
        }

        /// Run one call and return the transition it requested
        fn with<F>(&mut self, f: F) -> Option<StateId>
        where
            F: FnOnce(&mut StateContext<'_>),
        {
            let mut ctx = StateContext::new(
                &mut self.shared,
                &mut self.collaborators,
                &self.config,
                &self.chain,
                &mut self.events,
            );
            f(&mut ctx);
            ctx.requested()
        }

        fn damage_events(&self) -> usize {
            self.events
                .iter()
                .filter(|event| matches!(event, CharacterEvent::Damage { .. }))
                .count()
        }
    }

    fn two_stages() -> Vec<AttackStage> {
        vec![
            AttackStage::new("Jab", 0, 0.3, 10)
                .with_damage_window(0.18, 0.4)
                .with_force(0.1, 2.0),
            AttackStage::new("Cross", 1, 0.3, 15),
        ]
    }

    #[test]
    fn test_enter_sets_combo_parameters() {
        let mut fixture = Fixture::new(two_stages());
        let mut state = AttackState::new(1);
        fixture.shared.movement_speed_modifier = 1.0;

        fixture.with(|ctx| state.enter(ctx));

        assert_eq!(fixture.shared.combo_index, 1);
        assert_eq!(fixture.shared.movement_speed_modifier, 0.0);
        assert!(fixture.animator.get_bool(AnimationParam::Attack));
        assert!(fixture.animator.get_bool(AnimationParam::ComboAttack));
        assert_eq!(fixture.animator.get_integer(AnimationParam::Combo), 1);

        fixture.with(|ctx| state.exit(ctx));
        assert!(!fixture.animator.get_bool(AnimationParam::Attack));
        assert!(state.subscriptions.is_empty());
    }

    #[test]
    fn test_damage_dealt_once_inside_window() {
        let mut fixture = Fixture::new(two_stages());
        let mut state = AttackState::new(0);
        fixture.with(|ctx| state.enter(ctx));

        let mut dealt_at = Vec::new();
        for frame in 0..12 {
            fixture.with(|ctx| state.update(ctx, 0.05));
            if fixture.damage_events() > dealt_at.len() {
                dealt_at.push(frame);
            }
        }

        assert_eq!(fixture.damage_events(), 1);
        // Window opens at 0.18 of a one second animation
        assert_eq!(dealt_at, vec![3]);
        assert_eq!(fixture.animator.take_triggers(), vec![AnimationParam::Hit]);
    }

    #[test]
    fn test_zero_width_damage_window_deals_once() {
        let mut fixture = Fixture::new(vec![
            AttackStage::new("Flick", 0, 0.3, 7).with_damage_window(0.5, 0.5)
        ]);
        let mut state = AttackState::new(0);
        fixture.with(|ctx| state.enter(ctx));

        for _ in 0..61 {
            fixture.with(|ctx| state.update(ctx, 1.0 / 60.0));
        }

        assert_eq!(fixture.damage_events(), 1);
    }

    #[test]
    fn test_damage_window_narrower_than_step() {
        let mut fixture = Fixture::new(vec![
            AttackStage::new("Flick", 0, 0.3, 7).with_damage_window(0.42, 0.44)
        ]);
        let mut state = AttackState::new(0);
        fixture.with(|ctx| state.enter(ctx));

        let mut dealt_at = None;
        for frame in 0..10 {
            fixture.with(|ctx| state.update(ctx, 0.1));
            if dealt_at.is_none() && fixture.damage_events() == 1 {
                dealt_at = Some(frame);
            }
        }

        assert_eq!(fixture.damage_events(), 1);
        // Step from 0.4 to 0.5 covers the window
        assert_eq!(dealt_at, Some(4));
    }

    #[test]
    fn test_impulse_along_facing_once() {
        let mut fixture = Fixture::new(two_stages());
        let mut state = AttackState::new(0);
        fixture.with(|ctx| state.enter(ctx));

        for _ in 0..6 {
            fixture.with(|ctx| state.update(ctx, 0.05));
        }

        assert_eq!(fixture.forces.impact(), Vec3::new(0.0, 0.0, 2.0));
        let impulses = fixture
            .events
            .iter()
            .filter(|event| matches!(event, CharacterEvent::Impulse { .. }))
            .count();
        assert_eq!(impulses, 1);
    }

    #[test]
    fn test_combo_press_inside_window_queues_next_stage() {
        let mut fixture = Fixture::new(two_stages());
        let mut state = AttackState::new(0);
        fixture.with(|ctx| state.enter(ctx));
        fixture.with(|ctx| state.update(ctx, 0.25));

        fixture.with(|ctx| state.on_attack_started(ctx));
        assert!(state.combo_queued);

        let requested = fixture.with(|ctx| state.update(ctx, 0.8));
        assert_eq!(requested, Some(StateId::Attack(1)));
    }

    #[test]
    fn test_combo_press_at_window_end_counts() {
        let mut fixture = Fixture::new(two_stages());
        let mut state = AttackState::new(0);
        fixture.with(|ctx| state.enter(ctx));
        fixture.with(|ctx| state.update(ctx, 0.3));

        fixture.with(|ctx| state.on_attack_started(ctx));
        assert!(state.combo_queued);
    }

    #[test]
    fn test_late_press_returns_to_idle() {
        let mut fixture = Fixture::new(two_stages());
        let mut state = AttackState::new(0);
        fixture.with(|ctx| state.enter(ctx));
        fixture.with(|ctx| state.update(ctx, 0.35));

        fixture.with(|ctx| state.on_attack_started(ctx));
        assert!(!state.combo_queued);

        let requested = fixture.with(|ctx| state.update(ctx, 0.7));
        assert_eq!(requested, Some(StateId::Idle));
    }

    #[test]
    fn test_last_stage_never_queues() {
        let mut fixture = Fixture::new(two_stages());
        let mut state = AttackState::new(1);
        fixture.with(|ctx| state.enter(ctx));
        fixture.with(|ctx| state.on_attack_started(ctx));
        assert!(!state.combo_queued);

        let requested = fixture.with(|ctx| state.update(ctx, 1.0));
        assert_eq!(requested, Some(StateId::Idle));
    }

    #[test]
    fn test_reenter_resets_timers() {
        let mut fixture = Fixture::new(two_stages());
        let mut state = AttackState::new(0);
        fixture.with(|ctx| state.enter(ctx));
        fixture.with(|ctx| state.update(ctx, 0.3));
        fixture.with(|ctx| state.on_attack_started(ctx));
        fixture.with(|ctx| state.exit(ctx));

        fixture.with(|ctx| state.enter(ctx));
        assert_eq!(state.elapsed, 0.0);
        assert!(!state.combo_queued);
        assert!(!state.damage_dealt);
        assert!(!state.force_applied);
    }
}
