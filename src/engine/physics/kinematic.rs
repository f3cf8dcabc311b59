// Kinematic mover over a flat arena

use super::mover::{CharacterMover, CollisionFlags};
use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;

/// Default half-size of the square arena (world units)
pub const DEFAULT_ARENA_HALF_EXTENT: f32 = 50.0;

/// Distance below which the character snaps onto the ground
const GROUND_SNAP: f32 = 1.0e-4;

#[derive(Debug)]
struct KinematicBody {
    position: Vec3,
    ground_height: f32,
    half_extent: f32,
    grounded: bool,
    flags: CollisionFlags,
    last_displacement: Vec3,
}

/// Shared handle to a kinematic character body
///
/// The arena is a flat floor at `ground_height` bounded by walls at
/// `±half_extent` on X and Z. Moves are clamped against both.
#[derive(Debug, Clone)]
pub struct KinematicMover {
    body: Rc<RefCell<KinematicBody>>,
}

impl KinematicMover {
    /// Create a mover standing on the floor at `position.xz`
    pub fn new(position: Vec3) -> Self {
        Self::with_arena(position, 0.0, DEFAULT_ARENA_HALF_EXTENT)
    }

    /// Create a mover inside a custom arena
    pub fn with_arena(position: Vec3, ground_height: f32, half_extent: f32) -> Self {
        let position = Vec3::new(position.x, position.y.max(ground_height), position.z);
        let grounded = position.y - ground_height <= GROUND_SNAP;
        Self {
            body: Rc::new(RefCell::new(KinematicBody {
                position,
                ground_height,
                half_extent: half_extent.max(0.0),
                grounded,
                flags: CollisionFlags {
                    below: grounded,
                    ..CollisionFlags::default()
                },
                last_displacement: Vec3::ZERO,
            })),
        }
    }

    /// Displacement requested by the last `move_by`
    pub fn last_displacement(&self) -> Vec3 {
        self.body.borrow().last_displacement
    }

    /// Teleport without collision resolution (for respawning)
    pub fn set_position(&self, position: Vec3) {
        let mut body = self.body.borrow_mut();
        body.position = position;
        body.grounded = position.y - body.ground_height <= GROUND_SNAP;
    }
}

impl CharacterMover for KinematicMover {
    fn move_by(&mut self, displacement: Vec3) {
        let mut body = self.body.borrow_mut();
        body.last_displacement = displacement;

        let mut target = body.position + displacement;
        let mut flags = CollisionFlags::NONE;

        let limit = body.half_extent;
        if target.x.abs() > limit {
            target.x = target.x.clamp(-limit, limit);
            flags.sides = true;
        }
        if target.z.abs() > limit {
            target.z = target.z.clamp(-limit, limit);
            flags.sides = true;
        }

        // Moving down into (or resting on) the floor grounds the body;
        // moving up always leaves it.
        if target.y - body.ground_height <= GROUND_SNAP && displacement.y <= 0.0 {
            target.y = body.ground_height;
            flags.below = true;
        }

        body.grounded = flags.below;
        body.flags = flags;
        body.position = target;
    }

    fn is_grounded(&self) -> bool {
        self.body.borrow().grounded
    }

    fn collision_flags(&self) -> CollisionFlags {
        self.body.borrow().flags
    }

    fn position(&self) -> Vec3 {
        self.body.borrow().position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_starts_grounded_on_floor() {
        let mover = KinematicMover::new(Vec3::ZERO);
        assert!(mover.is_grounded());
        assert!(mover.collision_flags().below);
    }

    #[test]
    fn test_horizontal_move_keeps_ground_contact() {
        let mut mover = KinematicMover::new(Vec3::ZERO);
        mover.move_by(Vec3::new(0.0, 0.0, 0.5));
        assert!(mover.is_grounded());
        assert_abs_diff_eq!(mover.position().z, 0.5);
    }

    #[test]
    fn test_upward_move_leaves_ground() {
        let mut mover = KinematicMover::new(Vec3::ZERO);
        mover.move_by(Vec3::new(0.0, 0.2, 0.0));
        assert!(!mover.is_grounded());
        assert_abs_diff_eq!(mover.position().y, 0.2);
    }

    #[test]
    fn test_falling_through_floor_is_clamped() {
        let mut mover = KinematicMover::new(Vec3::new(0.0, 1.0, 0.0));
        assert!(!mover.is_grounded());

        mover.move_by(Vec3::new(0.0, -3.0, 0.0));
        assert!(mover.is_grounded());
        assert_eq!(mover.position().y, 0.0);
    }

    #[test]
    fn test_walls_clamp_and_flag_sides() {
        let mut mover = KinematicMover::with_arena(Vec3::ZERO, 0.0, 2.0);
        mover.move_by(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(mover.position().x, 2.0);
        assert!(mover.collision_flags().sides);
        assert!(mover.collision_flags().below);
    }

    #[test]
    fn test_clones_share_body() {
        let mut machine_side = KinematicMover::new(Vec3::ZERO);
        let render_side = machine_side.clone();
        machine_side.move_by(Vec3::X);
        assert_eq!(render_side.position(), Vec3::X);
        assert_eq!(render_side.last_displacement(), Vec3::X);
    }
}
