// Input handling
//
// The controller never polls devices directly. It talks to an `InputSource`,
// which delivers discrete action edges through explicit subscriptions and
// exposes the movement axis on demand.
//
// ## Architecture
//
// - `action`: Controller actions and their edges
// - `source`: The `InputSource` trait, subscription tokens and input errors
// - `action_map`: Reference `InputSource` fed by a device layer or a test
//
// ## Usage Example
//
// ```rust
// use combo_controller::engine::input::{ActionMapInput, InputAction};
//
// let input = ActionMapInput::new();
// let device = input.clone(); // keep one handle for the device layer
//
// device.press(InputAction::Jump);
// device.set_movement(glam::Vec2::new(0.0, 1.0));
// ```

pub mod action;
pub mod action_map;
pub mod source;

// Re-export commonly used types
pub use action::{ActionEvent, ActionPhase, InputAction};
pub use action_map::{ActionMapInput, Registration};
pub use source::{Delivery, InputError, InputSource, SubscriptionToken};
