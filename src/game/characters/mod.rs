// Character system
//
// This module contains everything related to controllable characters:
// - Character data structure and its reference collaborators
// - Tuning data and the data-driven attack table
// - Motion resolution (camera-relative direction, rotation smoothing)
// - State machine for character behavior
// - Animator parameter sink

pub mod animation;
pub mod attack;
pub mod character;
pub mod config;
pub mod motion;
pub mod state;

// Re-export commonly used types
pub use animation::{AnimationParam, AnimatorParameters, AnimatorSink};
pub use attack::{AttackChain, AttackStage, AttackStageIssue, AttackTable};
pub use character::{Character, CharacterId, CharacterRig};
pub use config::{AirData, CharacterConfig, ConfigError, GroundData};
pub use state::{
    CharacterEvent, Collaborators, CollaboratorsBuilder, SharedRuntimeState, StateId,
    StateMachine,
};
