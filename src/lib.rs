// Combo controller: a frame-driven character state machine with
// camera-relative locomotion and data-driven combo attacks

pub mod core;
pub mod engine;
pub mod game;
