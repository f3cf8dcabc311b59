// Attack table: data-driven combo stages

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Allowed range of normalized animation times
pub const NORMALIZED_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Allowed range of the force delay, in seconds
pub const FORCE_TIME_RANGE: RangeInclusive<f32> = 0.0..=3.0;
/// Allowed range of the impulse strength
pub const FORCE_RANGE: RangeInclusive<f32> = -10.0..=10.0;

fn default_animation_length() -> f32 {
    1.0
}

/// One stage of a combo chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackStage {
    /// Unique name within the table
    pub name: String,
    /// Position in the combo chain
    pub combo_index: usize,
    /// Normalized time up to which a repeated attack queues the next stage
    pub combo_transition_time: f32,
    /// Seconds after stage start at which the impulse is applied
    pub force_transition_time: f32,
    /// Impulse along the character's facing (negative pushes back)
    pub force: f32,
    pub damage: u32,
    /// Normalized time at which the damage window opens
    pub dealing_start: f32,
    /// Normalized time at which the damage window closes
    pub dealing_end: f32,
    /// Length of the stage's animation, in seconds
    #[serde(default = "default_animation_length")]
    pub animation_length: f32,
}

impl AttackStage {
    /// Stage with the given timing and a one second animation
    pub fn new(name: &str, combo_index: usize, combo_transition_time: f32, damage: u32) -> Self {
        Self {
            name: name.to_string(),
            combo_index,
            combo_transition_time,
            force_transition_time: 0.0,
            force: 0.0,
            damage,
            dealing_start: 0.0,
            dealing_end: 1.0,
            animation_length: default_animation_length(),
        }
    }

    pub fn with_force(mut self, force_transition_time: f32, force: f32) -> Self {
        self.force_transition_time = force_transition_time;
        self.force = force;
        self
    }

    pub fn with_damage_window(mut self, start: f32, end: f32) -> Self {
        self.dealing_start = start;
        self.dealing_end = end;
        self
    }

    pub fn with_animation_length(mut self, seconds: f32) -> Self {
        self.animation_length = seconds;
        self
    }

    /// Fraction of the animation played after `elapsed` seconds
    pub fn normalized(&self, elapsed: f32) -> f32 {
        elapsed / self.animation_length
    }

    /// Whether a follow-up input at `elapsed` still queues the next stage.
    /// The upper bound is inclusive.
    pub fn in_combo_window(&self, elapsed: f32) -> bool {
        self.normalized(elapsed) <= self.combo_transition_time
    }

    /// Whether the stretch of animation played between `from` and `to`
    /// seconds touches the damage window (both ends inclusive)
    pub fn reaches_damage_window(&self, from: f32, to: f32) -> bool {
        self.normalized(to) >= self.dealing_start && self.normalized(from) <= self.dealing_end
    }

    /// Whether the impulse is due at `elapsed`
    pub fn force_due(&self, elapsed: f32) -> bool {
        elapsed >= self.force_transition_time
    }

    /// Whether the animation has played to the end at `elapsed`
    pub fn is_finished(&self, elapsed: f32) -> bool {
        self.normalized(elapsed) >= 1.0
    }

    fn check_fields(&self) -> Vec<AttackStageIssue> {
        let mut issues = Vec::new();
        let mut check = |field: &'static str, value: f32, range: &RangeInclusive<f32>| {
            if !range.contains(&value) {
                issues.push(AttackStageIssue::OutOfRange {
                    name: self.name.clone(),
                    field,
                    value,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        };

        check("combo_transition_time", self.combo_transition_time, &NORMALIZED_RANGE);
        check("force_transition_time", self.force_transition_time, &FORCE_TIME_RANGE);
        check("force", self.force, &FORCE_RANGE);
        check("dealing_start", self.dealing_start, &NORMALIZED_RANGE);
        check("dealing_end", self.dealing_end, &NORMALIZED_RANGE);

        if self.dealing_start > self.dealing_end {
            issues.push(AttackStageIssue::InvertedDamageWindow {
                name: self.name.clone(),
                start: self.dealing_start,
                end: self.dealing_end,
            });
        }

        if !(self.animation_length.is_finite() && self.animation_length > 0.0) {
            issues.push(AttackStageIssue::NonPositiveLength {
                name: self.name.clone(),
                length: self.animation_length,
            });
        }

        issues
    }
}

/// A malformed stage. Each issue disables the stage it names.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttackStageIssue {
    #[error("stage {name:?}: {field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("stage {name:?}: damage window starts at {start} after it ends at {end}")]
    InvertedDamageWindow { name: String, start: f32, end: f32 },

    #[error("stage {name:?}: animation length must be positive, got {length}")]
    NonPositiveLength { name: String, length: f32 },

    #[error("stage name {name:?} is used more than once")]
    DuplicateName { name: String },

    #[error("stage {name:?}: combo index {index} is already taken")]
    DuplicateIndex { name: String, index: usize },

    #[error("stage {name:?}: combo index {index} leaves a gap (expected {expected})")]
    NonContiguousIndex {
        name: String,
        index: usize,
        expected: usize,
    },
}

impl AttackStageIssue {
    /// Name of the stage this issue disables
    pub fn stage_name(&self) -> &str {
        match self {
            Self::OutOfRange { name, .. }
            | Self::InvertedDamageWindow { name, .. }
            | Self::NonPositiveLength { name, .. }
            | Self::DuplicateName { name }
            | Self::DuplicateIndex { name, .. }
            | Self::NonContiguousIndex { name, .. } => name,
        }
    }
}

/// Authored combo stages, as loaded from data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttackTable {
    stages: Vec<AttackStage>,
}

impl AttackTable {
    pub fn new(stages: Vec<AttackStage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[AttackStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Check every stage; returns one entry per problem found.
    ///
    /// Issues are reported against positions in `stages()`.
    pub fn validate(&self) -> Vec<(usize, AttackStageIssue)> {
        let mut issues = Vec::new();

        for (slot, stage) in self.stages.iter().enumerate() {
            issues.extend(stage.check_fields().into_iter().map(|issue| (slot, issue)));
        }

        let mut names = HashSet::new();
        for (slot, stage) in self.stages.iter().enumerate() {
            if !names.insert(stage.name.as_str()) {
                issues.push((
                    slot,
                    AttackStageIssue::DuplicateName {
                        name: stage.name.clone(),
                    },
                ));
            }
        }

        // Indices must run 0, 1, 2, ... once sorted; everything past a gap is unreachable
        let mut order: Vec<usize> = (0..self.stages.len()).collect();
        order.sort_by_key(|&slot| self.stages[slot].combo_index);

        let mut expected = 0;
        let mut previous = None;
        for slot in order {
            let stage = &self.stages[slot];
            if previous == Some(stage.combo_index) {
                issues.push((
                    slot,
                    AttackStageIssue::DuplicateIndex {
                        name: stage.name.clone(),
                        index: stage.combo_index,
                    },
                ));
            } else if stage.combo_index != expected {
                issues.push((
                    slot,
                    AttackStageIssue::NonContiguousIndex {
                        name: stage.name.clone(),
                        index: stage.combo_index,
                        expected,
                    },
                ));
            } else {
                expected += 1;
            }
            previous = Some(stage.combo_index);
        }

        issues
    }
}

/// The executable combo chain: enabled stages in combo-index order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackChain {
    stages: Vec<AttackStage>,
}

impl AttackChain {
    /// Validate a table and keep only the stages without issues.
    ///
    /// Every issue is logged; disabled stages are skipped, so the chain links
    /// the remaining stages directly.
    pub fn compile(table: &AttackTable) -> Self {
        let issues = table.validate();
        let mut disabled = vec![false; table.len()];
        for (slot, issue) in &issues {
            warn!("Disabling attack stage: {}", issue);
            disabled[*slot] = true;
        }

        let mut stages: Vec<AttackStage> = table
            .stages()
            .iter()
            .zip(disabled)
            .filter(|(_, off)| !off)
            .map(|(stage, _)| stage.clone())
            .collect();
        stages.sort_by_key(|stage| stage.combo_index);

        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage at a chain position
    pub fn get(&self, position: usize) -> Option<&AttackStage> {
        self.stages.get(position)
    }

    /// Position that follows `position`, if the chain continues
    pub fn next(&self, position: usize) -> Option<usize> {
        let next = position + 1;
        (next < self.stages.len()).then_some(next)
    }

    pub fn stages(&self) -> &[AttackStage] {
        &self.stages
    }
}
