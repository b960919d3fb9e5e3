//! Read-only physics snapshot of a platformer actor.
//!
//! The [`ActorPhysics`] component is written by the external character
//! controller (collision, ground detection and velocity integration live
//! there) and only read by moves and the rotation system.
//!
//! # Angle conventions
//!
//! - `surface_angle` – angle of the ground under the actor in degrees, `0` is
//!   flat floor under default gravity, increasing counter-clockwise.
//! - `gravity_direction` – direction gravity pulls in degrees, `270` is
//!   straight down.
//! - [`ActorPhysics::gravity_angle`] – the upright sprite rotation for the
//!   current gravity, `0` for default gravity.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::angle;

/// Gravity direction that yields an upright rotation of 0°.
pub const DEFAULT_GRAVITY_DIRECTION: f32 = 270.0;

#[derive(Component, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorPhysics {
    /// Whether the actor is standing on a surface this frame.
    pub grounded: bool,
    /// Signed speed along the ground surface, in world units per second.
    pub ground_velocity: f32,
    /// Angle of the ground surface in degrees.
    pub surface_angle: f32,
    /// Direction gravity pulls in degrees (270 = down).
    pub gravity_direction: f32,
    /// World-space velocity in units per second.
    pub velocity: Vec2,
}

impl Default for ActorPhysics {
    fn default() -> Self {
        Self {
            grounded: true,
            ground_velocity: 0.0,
            surface_angle: 0.0,
            gravity_direction: DEFAULT_GRAVITY_DIRECTION,
            velocity: Vec2::ZERO,
        }
    }
}

impl ActorPhysics {
    /// Grounded snapshot on a surface of the given angle.
    pub fn grounded_on(surface_angle: f32, ground_velocity: f32) -> Self {
        Self {
            grounded: true,
            ground_velocity,
            surface_angle: angle::normalize(surface_angle),
            ..Self::default()
        }
    }

    /// Airborne snapshot with the given world velocity.
    pub fn airborne(velocity: Vec2) -> Self {
        Self {
            grounded: false,
            ground_velocity: 0.0,
            velocity,
            ..Self::default()
        }
    }

    /// Builder: replace the gravity direction.
    pub fn with_gravity_direction(mut self, degrees: f32) -> Self {
        self.gravity_direction = angle::normalize(degrees);
        self
    }

    /// Upright sprite rotation for the current gravity, normalized.
    pub fn gravity_angle(&self) -> f32 {
        angle::normalize(self.gravity_direction - DEFAULT_GRAVITY_DIRECTION)
    }

    /// Unit vector pointing the way gravity pulls.
    pub fn gravity_down(&self) -> Vec2 {
        Vec2::from_angle(self.gravity_direction.to_radians())
    }

    /// Whether the actor is grounded with no ground speed.
    pub fn is_standing(&self) -> bool {
        self.grounded && self.ground_velocity == 0.0
    }

    /// Absolute ground speed, or 0 when airborne.
    pub fn ground_speed(&self) -> f32 {
        if self.grounded {
            self.ground_velocity.abs()
        } else {
            0.0
        }
    }
}
