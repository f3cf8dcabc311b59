// Motion resolver - turns input and camera basis into world-space motion
//
// All functions are pure so the per-frame kinematics stay deterministic for a
// given input, camera and delta time.

use crate::core::math::{flatten, look_rotation, same_rotation};
use glam::{Quat, Vec2, Vec3};

/// World-space movement direction for a 2D input relative to the camera.
///
/// The camera's forward and right vectors are flattened onto the horizontal
/// plane, then weighted by `input.y` (forward axis) and `input.x` (lateral
/// axis). The result has no vertical component and is never longer than the
/// input itself. A degenerate (vertical) camera axis contributes nothing.
pub fn movement_direction(camera_forward: Vec3, camera_right: Vec3, input: Vec2) -> Vec3 {
    if input == Vec2::ZERO {
        return Vec3::ZERO;
    }

    let forward = flatten(camera_forward);
    let right = flatten(camera_right);
    let direction = forward * input.y + right * input.x;

    direction.clamp_length_max(input.length())
}

/// Turn `current` towards the direction of travel.
///
/// Uses spherical interpolation with `t = clamp(damping * dt, 0, 1)`, so a
/// large step can reach the target but never pass it. A zero direction keeps
/// the current facing; once converged, the target is returned unchanged.
pub fn smooth_rotation(current: Quat, direction: Vec3, damping: f32, dt: f32) -> Quat {
    if direction == Vec3::ZERO {
        return current;
    }

    let target = look_rotation(direction);
    if same_rotation(current, target) {
        return target;
    }

    let t = (damping * dt).clamp(0.0, 1.0);
    current.slerp(target, t).normalize()
}

/// Speed after the active state's modifier
pub fn effective_speed(movement_speed: f32, speed_modifier: f32) -> f32 {
    movement_speed * speed_modifier
}

/// Displacement for one frame: input-driven velocity plus external force
pub fn frame_displacement(direction: Vec3, speed: f32, force: Vec3, dt: f32) -> Vec3 {
    (direction * speed + force) * dt
}

/// Forward vector of a facing rotation
pub fn facing_forward(facing: Quat) -> Vec3 {
    facing * Vec3::Z
}
