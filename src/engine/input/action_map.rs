// Action-map input source
//
// Reference implementation of `InputSource`. The device layer (or a test)
// feeds button presses and the movement axis through a cloned handle; the
// state machine holds another clone and receives the resulting edges.

use super::action::{ActionEvent, ActionPhase, InputAction};
use super::source::{Delivery, InputError, InputSource, SubscriptionToken};
use glam::Vec2;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

/// One entry of the subscription history, in call order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Subscribed {
        token: SubscriptionToken,
        action: InputAction,
        phase: ActionPhase,
    },
    Unsubscribed {
        token: SubscriptionToken,
    },
}

#[derive(Debug)]
struct ActionMap {
    /// Actions that currently have a binding
    bound: HashSet<InputAction>,
    /// Buttons currently held
    pressed: HashSet<InputAction>,
    /// Live subscriptions, ordered by token so delivery order is stable
    subscriptions: BTreeMap<SubscriptionToken, ActionEvent>,
    /// Edges produced since the last drain
    pending: Vec<ActionEvent>,
    movement: Vec2,
    axis_available: bool,
    next_token: u64,
    /// Subscribe/unsubscribe log, kept only while recording is on
    history: Option<Vec<Registration>>,
}

impl ActionMap {
    fn new() -> Self {
        Self {
            bound: InputAction::ALL.into_iter().collect(),
            pressed: HashSet::new(),
            subscriptions: BTreeMap::new(),
            pending: Vec::new(),
            movement: Vec2::ZERO,
            axis_available: true,
            next_token: 0,
            history: None,
        }
    }

    fn queue(&mut self, event: ActionEvent) {
        if self.bound.contains(&event.action) {
            self.pending.push(event);
        }
    }

    fn record(&mut self, registration: Registration) {
        if let Some(history) = self.history.as_mut() {
            history.push(registration);
        }
    }
}

/// Shared handle to an action map
#[derive(Debug, Clone)]
pub struct ActionMapInput {
    inner: Rc<RefCell<ActionMap>>,
}

impl ActionMapInput {
    /// Create an action map with every action bound
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ActionMap::new())),
        }
    }

    /// Register a button press
    pub fn press(&self, action: InputAction) {
        let mut map = self.inner.borrow_mut();
        if action.is_axis() || !map.pressed.insert(action) {
            return;
        }
        map.queue(ActionEvent::started(action));
    }

    /// Register a button release
    pub fn release(&self, action: InputAction) {
        let mut map = self.inner.borrow_mut();
        if map.pressed.remove(&action) {
            map.queue(ActionEvent::canceled(action));
        }
    }

    /// Set the movement axis, producing started/canceled edges on zero crossings
    pub fn set_movement(&self, value: Vec2) {
        let mut map = self.inner.borrow_mut();
        let was_zero = map.movement == Vec2::ZERO;
        let is_zero = value == Vec2::ZERO;
        map.movement = value;

        if was_zero && !is_zero {
            map.queue(ActionEvent::started(InputAction::Movement));
        } else if !was_zero && is_zero {
            map.queue(ActionEvent::canceled(InputAction::Movement));
        }
    }

    /// Remove the binding of an action
    pub fn unbind(&self, action: InputAction) {
        let mut map = self.inner.borrow_mut();
        map.bound.remove(&action);
        map.pressed.remove(&action);
    }

    /// Simulate a device dropout for the movement axis
    pub fn set_axis_available(&self, available: bool) {
        self.inner.borrow_mut().axis_available = available;
    }

    /// Check if a button is held
    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.inner.borrow().pressed.contains(&action)
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    /// Start (with an empty log) or stop recording subscribe/unsubscribe calls
    pub fn record_registrations(&self, enabled: bool) {
        self.inner.borrow_mut().history = enabled.then(Vec::new);
    }

    /// Subscribe/unsubscribe calls in order since recording started
    pub fn registrations(&self) -> Vec<Registration> {
        self.inner.borrow().history.clone().unwrap_or_default()
    }
}

impl Default for ActionMapInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for ActionMapInput {
    fn subscribe(
        &mut self,
        action: InputAction,
        phase: ActionPhase,
    ) -> Result<SubscriptionToken, InputError> {
        let mut map = self.inner.borrow_mut();
        if !map.bound.contains(&action) {
            return Err(InputError::Unbound(action));
        }

        let token = SubscriptionToken::new(map.next_token);
        map.next_token += 1;
        map.subscriptions.insert(token, ActionEvent { action, phase });
        map.record(Registration::Subscribed {
            token,
            action,
            phase,
        });
        Ok(token)
    }

    fn unsubscribe(&mut self, token: SubscriptionToken) -> Result<(), InputError> {
        let mut map = self.inner.borrow_mut();
        if map.subscriptions.remove(&token).is_none() {
            return Err(InputError::UnknownToken(token));
        }
        map.record(Registration::Unsubscribed { token });
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<Delivery> {
        let mut map = self.inner.borrow_mut();
        let pending = std::mem::take(&mut map.pending);

        let mut deliveries = Vec::new();
        for event in pending {
            for (token, wanted) in &map.subscriptions {
                if *wanted == event {
                    deliveries.push(Delivery {
                        token: *token,
                        event,
                    });
                }
            }
        }
        deliveries
    }

    fn read_axis(&self, action: InputAction) -> Result<Vec2, InputError> {
        let map = self.inner.borrow();
        if !action.is_axis() {
            return Err(InputError::NotAnAxis(action));
        }
        if !map.bound.contains(&action) {
            return Err(InputError::Unbound(action));
        }
        if !map.axis_available {
            return Err(InputError::AxisUnavailable(action));
        }
        Ok(map.movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_without_subscription_delivers_nothing() {
        let mut input = ActionMapInput::new();
        input.press(InputAction::Jump);
        assert!(input.drain_events().is_empty());
        assert!(input.is_pressed(InputAction::Jump));
    }

    #[test]
    fn test_subscribed_press_is_delivered_once() {
        let mut input = ActionMapInput::new();
        let token = input
            .subscribe(InputAction::Jump, ActionPhase::Started)
            .unwrap();

        input.press(InputAction::Jump);
        input.press(InputAction::Jump); // Held, no new edge

        let deliveries = input.drain_events();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].token, token);
        assert_eq!(deliveries[0].event, ActionEvent::started(InputAction::Jump));
        assert!(input.drain_events().is_empty());
    }

    #[test]
    fn test_duplicate_subscriptions_get_duplicate_deliveries() {
        let mut input = ActionMapInput::new();
        input.subscribe(InputAction::Run, ActionPhase::Started).unwrap();
        input.subscribe(InputAction::Run, ActionPhase::Started).unwrap();

        input.press(InputAction::Run);
        assert_eq!(input.drain_events().len(), 2);
    }

    #[test]
    fn test_release_produces_canceled_edge() {
        let mut input = ActionMapInput::new();
        input.subscribe(InputAction::Run, ActionPhase::Canceled).unwrap();

        input.press(InputAction::Run);
        input.release(InputAction::Run);

        let deliveries = input.drain_events();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].event.phase, ActionPhase::Canceled);
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = ActionMapInput::new();
        input.subscribe(InputAction::Run, ActionPhase::Canceled).unwrap();
        input.release(InputAction::Run);
        assert!(input.drain_events().is_empty());
    }

    #[test]
    fn test_movement_zero_crossings() {
        let mut input = ActionMapInput::new();
        input
            .subscribe(InputAction::Movement, ActionPhase::Started)
            .unwrap();
        input
            .subscribe(InputAction::Movement, ActionPhase::Canceled)
            .unwrap();

        input.set_movement(Vec2::new(0.0, 1.0));
        input.set_movement(Vec2::new(0.5, 0.5)); // Still non-zero, no edge
        input.set_movement(Vec2::ZERO);

        let phases: Vec<_> = input
            .drain_events()
            .into_iter()
            .map(|d| d.event.phase)
            .collect();
        assert_eq!(phases, vec![ActionPhase::Started, ActionPhase::Canceled]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut input = ActionMapInput::new();
        let token = input
            .subscribe(InputAction::Jump, ActionPhase::Started)
            .unwrap();
        input.unsubscribe(token).unwrap();

        input.press(InputAction::Jump);
        assert!(input.drain_events().is_empty());
        assert_eq!(input.subscription_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_token() {
        let mut input = ActionMapInput::new();
        let token = SubscriptionToken::new(42);
        assert_eq!(
            input.unsubscribe(token),
            Err(InputError::UnknownToken(token))
        );
    }

    #[test]
    fn test_unbound_action_rejects_subscription() {
        let mut input = ActionMapInput::new();
        input.unbind(InputAction::Jump);
        assert_eq!(
            input.subscribe(InputAction::Jump, ActionPhase::Started),
            Err(InputError::Unbound(InputAction::Jump))
        );
    }

    #[test]
    fn test_read_axis() {
        let input = ActionMapInput::new();
        input.set_movement(Vec2::new(1.0, 0.0));
        assert_eq!(
            input.read_axis(InputAction::Movement),
            Ok(Vec2::new(1.0, 0.0))
        );
        assert_eq!(
            input.read_axis(InputAction::Jump),
            Err(InputError::NotAnAxis(InputAction::Jump))
        );

        input.set_axis_available(false);
        assert_eq!(
            input.read_axis(InputAction::Movement),
            Err(InputError::AxisUnavailable(InputAction::Movement))
        );
    }

    #[test]
    fn test_clones_share_state() {
        let mut machine_side = ActionMapInput::new();
        let device_side = machine_side.clone();
        machine_side
            .subscribe(InputAction::Attack, ActionPhase::Started)
            .unwrap();

        device_side.press(InputAction::Attack);
        assert_eq!(machine_side.drain_events().len(), 1);
        assert_eq!(device_side.subscription_count(), 1);
    }

    #[test]
    fn test_registration_history_order() {
        let mut input = ActionMapInput::new();
        input.record_registrations(true);
        let a = input.subscribe(InputAction::Run, ActionPhase::Started).unwrap();
        input.unsubscribe(a).unwrap();
        let b = input.subscribe(InputAction::Jump, ActionPhase::Started).unwrap();

        assert_eq!(
            input.registrations(),
            vec![
                Registration::Subscribed {
                    token: a,
                    action: InputAction::Run,
                    phase: ActionPhase::Started
                },
                Registration::Unsubscribed { token: a },
                Registration::Subscribed {
                    token: b,
                    action: InputAction::Jump,
                    phase: ActionPhase::Started
                },
            ]
        );
    }

    #[test]
    fn test_registrations_not_kept_by_default() {
        let mut input = ActionMapInput::new();
        for _ in 0..10_000 {
            let token = input.subscribe(InputAction::Run, ActionPhase::Started).unwrap();
            input.unsubscribe(token).unwrap();
        }

        assert!(input.registrations().is_empty());
        assert!(input.inner.borrow().history.is_none());
        assert_eq!(input.subscription_count(), 0);
    }

    #[test]
    fn test_stop_recording_drops_log() {
        let mut input = ActionMapInput::new();
        input.record_registrations(true);
        input.subscribe(InputAction::Jump, ActionPhase::Started).unwrap();
        assert_eq!(input.registrations().len(), 1);

        input.record_registrations(false);
        input.subscribe(InputAction::Jump, ActionPhase::Started).unwrap();
        assert!(input.registrations().is_empty());
    }
}
