// Animator parameters driven by the character states

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Parameters exposed by the character's animator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationParam {
    /// Any grounded locomotion state
    Ground,
    Idle,
    Walk,
    Run,
    /// Any airborne state
    Air,
    Jump,
    Fall,
    /// Any attack stage
    Attack,
    /// Attack stage that belongs to a combo chain
    ComboAttack,
    /// Integer: position in the combo chain
    Combo,
    Stunned,
    /// Trigger fired when a stage's damage window opens
    Hit,
}

impl AnimationParam {
    /// Parameter name as authored in the animator
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ground => "@Ground",
            Self::Idle => "Idle",
            Self::Walk => "Walk",
            Self::Run => "Run",
            Self::Air => "@Air",
            Self::Jump => "Jump",
            Self::Fall => "Fall",
            Self::Attack => "@Attack",
            Self::ComboAttack => "ComboAttack",
            Self::Combo => "Combo",
            Self::Stunned => "Stunned",
            Self::Hit => "Hit",
        }
    }
}

impl fmt::Display for AnimationParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fire-and-forget sink for animator parameters
pub trait AnimatorSink {
    fn set_bool(&mut self, param: AnimationParam, value: bool);

    fn set_trigger(&mut self, param: AnimationParam);

    fn set_integer(&mut self, param: AnimationParam, value: i32);
}

#[derive(Debug, Default)]
struct Parameters {
    bools: HashMap<AnimationParam, bool>,
    integers: HashMap<AnimationParam, i32>,
    triggers: Vec<AnimationParam>,
}

/// Shared handle to an animator parameter block
///
/// Stores the last value of every parameter and queues triggers until the
/// playback side consumes them.
#[derive(Debug, Clone, Default)]
pub struct AnimatorParameters {
    params: Rc<RefCell<Parameters>>,
}

impl AnimatorParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a boolean parameter (false if never set)
    pub fn get_bool(&self, param: AnimationParam) -> bool {
        self.params
            .borrow()
            .bools
            .get(&param)
            .copied()
            .unwrap_or(false)
    }

    /// Current value of an integer parameter (0 if never set)
    pub fn get_integer(&self, param: AnimationParam) -> i32 {
        self.params
            .borrow()
            .integers
            .get(&param)
            .copied()
            .unwrap_or(0)
    }

    /// Boolean parameters that are currently on
    pub fn active(&self) -> Vec<AnimationParam> {
        self.params
            .borrow()
            .bools
            .iter()
            .filter(|(_, on)| **on)
            .map(|(param, _)| *param)
            .collect()
    }

    /// Take every trigger fired since the last call
    pub fn take_triggers(&self) -> Vec<AnimationParam> {
        std::mem::take(&mut self.params.borrow_mut().triggers)
    }
}

impl AnimatorSink for AnimatorParameters {
    fn set_bool(&mut self, param: AnimationParam, value: bool) {
        self.params.borrow_mut().bools.insert(param, value);
    }

    fn set_trigger(&mut self, param: AnimationParam) {
        self.params.borrow_mut().triggers.push(param);
    }

    fn set_integer(&mut self, param: AnimationParam, value: i32) {
        self.params.borrow_mut().integers.insert(param, value);
    }
}
