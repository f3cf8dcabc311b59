// Character mover interface

use glam::Vec3;

/// Sides of the character's capsule that touched something during the last move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    /// Touched ground
    pub below: bool,
    /// Touched a wall
    pub sides: bool,
    /// Touched a ceiling
    pub above: bool,
}

impl CollisionFlags {
    pub const NONE: Self = Self {
        below: false,
        sides: false,
        above: false,
    };

    pub fn any(&self) -> bool {
        self.below || self.sides || self.above
    }
}

/// Physics/collision resolver that moves the character
///
/// `move_by` does not report anything; grounded and collision facts are read
/// back through the query methods afterwards.
pub trait CharacterMover {
    /// Move by a world-space displacement, resolving collisions
    fn move_by(&mut self, displacement: Vec3);

    /// Whether the last move ended in contact with the ground
    fn is_grounded(&self) -> bool;

    /// Contacts produced by the last move
    fn collision_flags(&self) -> CollisionFlags;

    /// Current world-space position
    fn position(&self) -> Vec3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_flags_any() {
        assert!(!CollisionFlags::NONE.any());
        assert!(CollisionFlags {
            sides: true,
            ..CollisionFlags::default()
        }
        .any());
    }
}
