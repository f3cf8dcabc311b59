// Camera orientation source

use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

/// Read-only view of the camera's basis vectors
pub trait OrientationSource {
    /// World-space forward vector
    fn forward(&self) -> Vec3;

    /// World-space right vector
    fn right(&self) -> Vec3;
}

#[derive(Debug)]
struct Orbit {
    yaw: f32,
    pitch: f32,
}

/// Shared handle to an orbiting third-person camera
///
/// Yaw turns about +Y (0 = looking along +Z), pitch tilts the view down
/// (positive) or up (negative). Both are in radians.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    orbit: Rc<RefCell<Orbit>>,
}

impl OrbitCamera {
    /// Camera looking along +Z
    pub fn new() -> Self {
        Self::with_angles(0.0, 0.0)
    }

    pub fn with_angles(yaw: f32, pitch: f32) -> Self {
        Self {
            orbit: Rc::new(RefCell::new(Orbit { yaw, pitch })),
        }
    }

    pub fn set_yaw(&self, yaw: f32) {
        self.orbit.borrow_mut().yaw = yaw;
    }

    pub fn set_pitch(&self, pitch: f32) {
        self.orbit.borrow_mut().pitch = pitch;
    }

    /// Full camera rotation
    pub fn rotation(&self) -> Quat {
        let orbit = self.orbit.borrow();
        Quat::from_rotation_y(orbit.yaw) * Quat::from_rotation_x(orbit.pitch)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationSource for OrbitCamera {
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    fn right(&self) -> Vec3 {
        // Left-handed basis: +X is right of +Z when looking down from +Y
        self.rotation() * Vec3::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_camera_basis() {
        let camera = OrbitCamera::new();
        assert_eq!(camera.forward(), Vec3::Z);
        assert_eq!(camera.right(), Vec3::X);
    }

    #[test]
    fn test_yaw_turns_basis() {
        let camera = OrbitCamera::with_angles(FRAC_PI_2, 0.0);
        let forward = camera.forward();
        assert_abs_diff_eq!(forward.x, 1.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(forward.z, 0.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_pitch_tilts_forward_only() {
        let camera = OrbitCamera::with_angles(0.0, 0.5);
        assert!(camera.forward().y < 0.0);
        assert_abs_diff_eq!(camera.right().y, 0.0, epsilon = 1.0e-6);
    }

    #[test]
    fn test_clones_follow_updates() {
        let camera = OrbitCamera::new();
        let view = camera.clone();
        camera.set_yaw(FRAC_PI_2);
        assert_abs_diff_eq!(view.forward().x, 1.0, epsilon = 1.0e-5);
    }
}
