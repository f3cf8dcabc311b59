// State machine - owns the active state and drives the transition protocol

use super::attack::AttackState;
use super::context::{
    CharacterEvent, Collaborators, CollaboratorsBuilder, SharedRuntimeState, StateContext,
};
use super::fall::FallState;
use super::idle::IdleState;
use super::jump::JumpState;
use super::run::RunState;
use super::stunned::StunnedState;
use super::walk::WalkState;
use super::{dispatch, State, StateId};
use crate::engine::input::{ActionPhase, InputAction};
use crate::game::characters::attack::AttackChain;
use crate::game::characters::config::{CharacterConfig, ConfigError};
use log::{debug, error, info, warn};

/// Every state instance, created once and reused
#[derive(Debug)]
struct StateRoster {
    idle: IdleState,
    walk: WalkState,
    run: RunState,
    jump: JumpState,
    fall: FallState,
    stunned: StunnedState,
    /// One attack state per chain position
    attacks: Vec<AttackState>,
}

impl StateRoster {
    fn new(chain: &AttackChain) -> Self {
        Self {
            idle: IdleState::new(),
            walk: WalkState::new(),
            run: RunState::new(),
            jump: JumpState::new(),
            fall: FallState::new(),
            stunned: StunnedState::new(),
            attacks: (0..chain.len()).map(AttackState::new).collect(),
        }
    }

    fn contains(&self, id: StateId) -> bool {
        match id {
            StateId::Attack(position) => position < self.attacks.len(),
            _ => true,
        }
    }

    fn get_mut(&mut self, id: StateId) -> Option<&mut dyn State> {
        let state: &mut dyn State = match id {
            StateId::Idle => &mut self.idle,
            StateId::Walk => &mut self.walk,
            StateId::Run => &mut self.run,
            StateId::Jump => &mut self.jump,
            StateId::Falling => &mut self.fall,
            StateId::Stunned => &mut self.stunned,
            StateId::Attack(position) => self.attacks.get_mut(position)?,
        };
        Some(state)
    }
}

/// Character state machine
///
/// Exactly one state is active after [`StateMachine::initialize`]. Per frame
/// the owner calls [`handle_input`](Self::handle_input),
/// [`update`](Self::update) and [`physics_update`](Self::physics_update) in
/// that order; each is delegated to whichever state is current at that moment.
pub struct StateMachine {
    current: StateId,
    previous: Option<StateId>,
    shared: SharedRuntimeState,
    collaborators: Collaborators,
    config: CharacterConfig,
    chain: AttackChain,
    roster: StateRoster,
    events: Vec<CharacterEvent>,
}

impl StateMachine {
    /// Build every state and enter Idle.
    ///
    /// Fails if a collaborator is missing or the tuning is invalid. Invalid
    /// attack stages do not fail; they are disabled and skipped.
    pub fn initialize(
        config: CharacterConfig,
        collaborators: CollaboratorsBuilder,
    ) -> Result<Self, ConfigError> {
        let collaborators = collaborators.build().map_err(|err| {
            error!("Cannot start state machine: {}", err);
            err
        })?;
        config.validate().map_err(|err| {
            error!("Cannot start state machine: {}", err);
            err
        })?;

        let chain = AttackChain::compile(&config.attacks);
        let roster = StateRoster::new(&chain);

        let mut machine = Self {
            current: StateId::Idle,
            previous: None,
            shared: SharedRuntimeState::from_config(&config),
            collaborators,
            config,
            chain,
            roster,
            events: Vec::new(),
        };

        let requested = machine.call(StateId::Idle, |state, ctx| state.enter(ctx));
        machine.apply(requested);

        info!(
            "State machine started in {} with {} attack stage(s)",
            machine.current,
            machine.chain.len()
        );
        Ok(machine)
    }

    /// Switch the active state: exit the old one, then enter the new one.
    ///
    /// A no-op when `next` is already active or names an attack stage the
    /// chain does not have.
    pub fn change_state(&mut self, next: StateId) {
        if next == self.current {
            debug!("Already in {}", next);
            return;
        }
        if !self.roster.contains(next) {
            warn!("Ignoring transition to unknown state {}", next);
            return;
        }

        let from = self.current;
        if let Some(ignored) = self.call(from, |state, ctx| state.exit(ctx)) {
            debug!("Ignoring transition to {} requested while leaving {}", ignored, from);
        }

        self.previous = Some(from);
        self.current = next;
        self.shared.time_in_state = 0.0;
        if !next.is_attack() {
            self.shared.combo_index = 0;
        }
        self.events.push(CharacterEvent::StateChanged { from, to: next });
        debug!("State {} -> {}", from, next);

        let requested = self.call(next, |state, ctx| state.enter(ctx));
        self.apply(requested);
    }

    /// Dispatch pending action events, then let the active state read input
    pub fn handle_input(&mut self) {
        let deliveries = self.collaborators.input.drain_events();
        for delivery in deliveries {
            if delivery.event.action == InputAction::Run {
                self.shared.run_held = delivery.event.phase == ActionPhase::Started;
            }

            let current = self.current;
            let held = self
                .roster
                .get_mut(current)
                .map(|state| state.subscriptions().holds(delivery.token))
                .unwrap_or(false);
            if !held {
                debug!(
                    "Dropping {} {:?} delivered to a released subscription",
                    delivery.event.action, delivery.event.phase
                );
                continue;
            }

            let requested = self.call(current, |state, ctx| dispatch(state, delivery.event, ctx));
            self.apply(requested);
        }

        let current = self.current;
        let requested = self.call(current, |state, ctx| state.handle_input(ctx));
        self.apply(requested);
    }

    pub fn update(&mut self, dt: f32) {
        self.shared.time_in_state += dt;

        let current = self.current;
        let requested = self.call(current, |state, ctx| state.update(ctx, dt));
        self.apply(requested);
    }

    pub fn physics_update(&mut self, dt: f32) {
        let current = self.current;
        let requested = self.call(current, |state, ctx| state.physics_update(ctx, dt));
        self.apply(requested);
    }

    /// Interrupt the active state with a hit stun of `duration` seconds.
    /// A hit while already stunned extends the stun.
    pub fn apply_hit_stun(&mut self, duration: f32) {
        if !(duration.is_finite() && duration > 0.0) {
            warn!("Ignoring hit stun of {} seconds", duration);
            return;
        }

        if self.current == StateId::Stunned {
            self.roster.stunned.extend(duration);
            return;
        }
        self.roster.stunned.set_duration(duration);
        self.change_state(StateId::Stunned);
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn previous_state(&self) -> Option<StateId> {
        self.previous
    }

    pub fn shared(&self) -> &SharedRuntimeState {
        &self.shared
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.collaborators
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    pub fn chain(&self) -> &AttackChain {
        &self.chain
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<CharacterEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one state call with a fresh context and return its transition request
    fn call<F>(&mut self, id: StateId, f: F) -> Option<StateId>
    where
        F: FnOnce(&mut dyn State, &mut StateContext<'_>),
    {
        let Self {
            roster,
            shared,
            collaborators,
            config,
            chain,
            events,
            ..
        } = self;

        let Some(state) = roster.get_mut(id) else {
            warn!("No state instance for {}", id);
            return None;
        };
        let mut ctx = StateContext::new(shared, collaborators, config, chain, events);
        f(state, &mut ctx);
        ctx.requested()
    }

    fn apply(&mut self, requested: Option<StateId>) {
        if let Some(next) = requested {
            self.change_state(next);
        }
    }
}
