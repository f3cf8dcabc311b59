// Character physics
//
// The controller only needs a mover: something that accepts a displacement
// and reports ground/collision facts afterwards.

pub mod kinematic;
pub mod mover;

pub use kinematic::KinematicMover;
pub use mover::{CharacterMover, CollisionFlags};
