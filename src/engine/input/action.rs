// Controller action definitions

use std::fmt;

/// Named actions the character controller listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputAction {
    /// Continuous 2D movement axis (x = lateral, y = forward)
    Movement,
    /// Held to run
    Run,
    Jump,
    Attack,
}

impl InputAction {
    /// Every action, in binding order
    pub const ALL: [InputAction; 4] = [
        InputAction::Movement,
        InputAction::Run,
        InputAction::Jump,
        InputAction::Attack,
    ];

    /// Binding name of the action
    pub fn name(&self) -> &'static str {
        match self {
            Self::Movement => "Movement",
            Self::Run => "Run",
            Self::Jump => "Jump",
            Self::Attack => "Attack",
        }
    }

    /// Whether the action carries a continuous value rather than a button state
    pub fn is_axis(&self) -> bool {
        matches!(self, Self::Movement)
    }
}

impl fmt::Display for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Edge of an action that a callback can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionPhase {
    /// Button went down / axis left zero
    Started,
    /// Button went up / axis returned to zero
    Canceled,
}

/// A discrete action edge produced by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionEvent {
    pub action: InputAction,
    pub phase: ActionPhase,
}

impl ActionEvent {
    pub fn started(action: InputAction) -> Self {
        Self {
            action,
            phase: ActionPhase::Started,
        }
    }

    pub fn canceled(action: InputAction) -> Self {
        Self {
            action,
            phase: ActionPhase::Canceled,
        }
    }
}
