// Input collaborator interface

use super::action::{ActionEvent, ActionPhase, InputAction};
use glam::Vec2;

/// Opaque handle returned by [`InputSource::subscribe`]
///
/// Must be handed back to [`InputSource::unsubscribe`] to release the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// An action event addressed to one live subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub token: SubscriptionToken,
    pub event: ActionEvent,
}

/// Input failures. All of them are recoverable for the frame loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("action {0} is not bound")]
    Unbound(InputAction),

    #[error("action {0} has no axis value")]
    NotAnAxis(InputAction),

    #[error("axis {0} is unavailable this frame")]
    AxisUnavailable(InputAction),

    #[error("unknown subscription token {0:?}")]
    UnknownToken(SubscriptionToken),
}

/// Source of player input consumed by the state machine
///
/// Discrete edges are delivered through explicit subscriptions; the continuous
/// movement vector is read on demand.
pub trait InputSource {
    /// Register interest in one edge of an action
    fn subscribe(
        &mut self,
        action: InputAction,
        phase: ActionPhase,
    ) -> Result<SubscriptionToken, InputError>;

    /// Release a previously acquired subscription
    fn unsubscribe(&mut self, token: SubscriptionToken) -> Result<(), InputError>;

    /// Take every event queued since the last drain, one delivery per matching subscription
    fn drain_events(&mut self) -> Vec<Delivery>;

    /// Read the current value of an axis action
    fn read_axis(&self, action: InputAction) -> Result<Vec2, InputError>;
}
