//! Engine systems.
//!
//! Submodules overview
//! - [`moves`] – drive move managers and push their state to the animator
//! - [`rotation`] – quantized sprite rotation from physics and move state
//! - [`time`] – update simulation time and delta

pub mod moves;
pub mod rotation;
pub mod time;
