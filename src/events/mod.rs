//! Event types and observers used by the move framework.
//!
//! Events provide a decoupled way for gameplay, animation and audio code to
//! react to move lifecycle changes without holding references to the
//! [`MoveManager`](crate::components::movemanager::MoveManager).
//!
//! Submodules:
//! - [`moves`] – [`MoveEvent`](moves::MoveEvent), fired for every move notification
pub mod moves;
