//! ECS components for actors.
//!
//! This module groups all component types that can be attached to an actor:
//! its physics snapshot, its moves and their manager, the animator
//! parameters moves drive, and the sprite rotation controller.
//!
//! Submodules overview:
//! - [`actorphysics`] – grounded state, surface angle, gravity and velocity
//! - [`animator`] – boolean and trigger parameters consumed by the animator
//! - [`movemanager`] – per-actor move registry and transition authority
//! - [`moves`] – the move contract: states, handles, context and the [`moves::Move`] trait
//! - [`rotation`] – visible rotation and the quantizing sprite rotation controller

pub mod actorphysics;
pub mod animator;
pub mod movemanager;
pub mod moves;
pub mod rotation;
