//! ECS resources made available to systems.
//!
//! Overview
//! - `gameconfig` – designer tunables for moves, rotation and the fixed step
//! - `input` – per-frame action state read by move predicates
//! - `worldtime` – simulation time, variable delta and fixed step
pub mod gameconfig;
pub mod input;
pub mod worldtime;
