// Math utilities and helper functions

use glam::{Quat, Vec3};

/// Tolerance used when deciding whether two rotations are the same
pub const ROTATION_EPSILON: f32 = 1.0e-6;

/// Project a vector onto the horizontal (XZ) plane and renormalize it.
/// Returns zero when the vector has no horizontal component.
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Rotation that looks along `direction` with +Y up and +Z as the identity forward.
///
/// Only the horizontal part of `direction` is used, so the result is a pure yaw.
pub fn look_rotation(direction: Vec3) -> Quat {
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}

/// Whether two unit quaternions describe the same orientation (q and -q included)
pub fn same_rotation(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() >= 1.0 - ROTATION_EPSILON
}
