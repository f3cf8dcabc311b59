// External force accumulation (gravity, jumps, knockback)

use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;

/// Standard gravity (units/second²)
pub const GRAVITY: f32 = -9.81;

/// Default decay rate of horizontal impacts (1/second)
pub const DEFAULT_DRAG: f32 = 6.0;

/// Impacts weaker than this are dropped
const IMPACT_CUTOFF: f32 = 0.01;

/// Sums externally applied velocity into one contribution consumed by movement
pub trait ForceAccumulator {
    /// Current additive velocity (impacts plus vertical velocity)
    fn movement(&self) -> Vec3;

    /// Add an instantaneous velocity change (knockback, attack lunge)
    fn add_impulse(&mut self, impulse: Vec3);

    /// Add upward velocity
    fn jump(&mut self, force: f32);

    /// Current vertical velocity
    fn vertical_velocity(&self) -> f32;

    /// Integrate gravity and decay impacts over `dt`
    fn tick(&mut self, dt: f32, grounded: bool);

    /// Drop all accumulated velocity
    fn reset(&mut self);
}

#[derive(Debug)]
struct ForceState {
    gravity: f32,
    drag: f32,
    impact: Vec3,
    vertical_velocity: f32,
}

/// Shared handle to a force receiver
#[derive(Debug, Clone)]
pub struct ForceReceiver {
    state: Rc<RefCell<ForceState>>,
}

impl ForceReceiver {
    pub fn new() -> Self {
        Self::with_params(GRAVITY, DEFAULT_DRAG)
    }

    /// Create a receiver with custom gravity (negative is down) and drag
    pub fn with_params(gravity: f32, drag: f32) -> Self {
        Self {
            state: Rc::new(RefCell::new(ForceState {
                gravity,
                drag: drag.max(0.0),
                impact: Vec3::ZERO,
                vertical_velocity: 0.0,
            })),
        }
    }

    /// Current horizontal impact velocity
    pub fn impact(&self) -> Vec3 {
        self.state.borrow().impact
    }
}

impl Default for ForceReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceAccumulator for ForceReceiver {
    fn movement(&self) -> Vec3 {
        let state = self.state.borrow();
        state.impact + Vec3::Y * state.vertical_velocity
    }

    fn add_impulse(&mut self, impulse: Vec3) {
        self.state.borrow_mut().impact += impulse;
    }

    fn jump(&mut self, force: f32) {
        self.state.borrow_mut().vertical_velocity += force;
    }

    fn vertical_velocity(&self) -> f32 {
        self.state.borrow().vertical_velocity
    }

    fn tick(&mut self, dt: f32, grounded: bool) {
        let mut state = self.state.borrow_mut();

        // Keep a small downward velocity while grounded so the mover stays in contact
        if grounded && state.vertical_velocity < 0.0 {
            state.vertical_velocity = state.gravity * dt;
        } else {
            state.vertical_velocity += state.gravity * dt;
        }

        let decay = (1.0 - state.drag * dt).max(0.0);
        state.impact *= decay;
        if state.impact.length() < IMPACT_CUTOFF {
            state.impact = Vec3::ZERO;
        }
    }

    fn reset(&mut self) {
        let mut state = self.state.borrow_mut();
        state.impact = Vec3::ZERO;
        state.vertical_velocity = 0.0;
    }
}
