//! Hedgehog motion library.
//!
//! This module exposes the move lifecycle state machine, the sprite rotation
//! controller and the ECS systems driving them, for use in integration tests
//! and as a reusable library.

pub mod angle;
pub mod components;
pub mod events;
pub mod game;
pub mod moves;
pub mod resources;
pub mod systems;
