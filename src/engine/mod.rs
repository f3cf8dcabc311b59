// Engine modules: input, physics, forces, camera, frame timing

pub mod camera;
pub mod forces;
pub mod game_loop;
pub mod input;
pub mod physics;
