//! Reference move implementations.
//!
//! These moves exercise the [`Move`](crate::components::moves::Move)
//! contract with the smallest useful behaviour. They read the actor's
//! [`ActorPhysics`](crate::components::actorphysics::ActorPhysics) and
//! [`InputState`](crate::resources::input::InputState) and never write
//! physics; velocity changes belong to the external controller.
//!
//! - [`groundcontrol`] – ground locomotion, Active whenever grounded
//! - [`roll`] – rolling stance entered with Down at speed
//! - [`duck`] – crouch entered with Down while slow
//! - [`spindash`] – charge from a duck; requires [`duck::Duck`] on the actor

pub mod duck;
pub mod groundcontrol;
pub mod roll;
pub mod spindash;

pub use duck::Duck;
pub use groundcontrol::GroundControl;
pub use roll::Roll;
pub use spindash::Spindash;
