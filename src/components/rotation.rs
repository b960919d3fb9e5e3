//! Sprite rotation components.
//!
//! - [`Rotation`] – the visible rotation in degrees, read by the renderer
//! - [`SpriteRotation`] – controller that derives a stepped, hysteresis
//!   stabilized rotation from the actor's surface angle and gravity
//!
//! # Quantization
//!
//! `true_rotation` follows the physics every frame. The visible `rotation` is
//! `true_rotation` snapped to the nearest `interval` step measured from the
//! gravity-aligned angle, and it only changes once `true_rotation` leaves the
//! band `[interval_min, interval_max]`:
//!
//! ```text
//!  interval_min                 rotation                 interval_max
//!       |<-- threshold -->|<-- interval/2 -->|<-- interval/2 -->|<-- threshold -->|
//! ```
//!
//! The band is rebuilt around the new step only when the step changes, so a
//! `true_rotation` jittering across the half-way point between two steps does
//! not flicker the sprite.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::angle;
use crate::components::actorphysics::ActorPhysics;
use crate::components::moves::{MoveHandle, MoveKind, MoveStates};

/// Hysteresis fractions at or above one half would let a band reach the
/// centre of the neighbouring step.
pub const MAX_THRESHOLD: f32 = 0.49;

#[derive(Component, Clone, Debug, Copy, Default)]
pub struct Rotation {
    pub degrees: f32,
}

/// Designer tunables of the rotation controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Surfaces closer than this to the gravity angle count as flat.
    pub min_angle: f32,
    /// Quantization step in degrees.
    pub interval: f32,
    /// Hysteresis widening of the band, as a fraction of `interval`.
    pub threshold: f32,
    /// Airborne recovery speed toward upright, degrees per second.
    pub air_recovery_rate: f32,
    /// Follow the surface while standing still.
    pub rotate_during_stand: bool,
    /// Follow the surface while rolling.
    pub rotate_during_roll: bool,
    /// Recover gradually in the air instead of snapping upright.
    pub rotate_in_air: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            min_angle: 22.5,
            interval: 45.0,
            threshold: 0.1,
            air_recovery_rate: 360.0,
            rotate_during_stand: false,
            rotate_during_roll: false,
            rotate_in_air: true,
        }
    }
}

/// Rotation controller state of one actor.
///
/// Reads the actor's [`ActorPhysics`] and, when linked, the Active flags of
/// its roll and ground-control moves. Link once at setup with
/// [`SpriteRotation::link`]; unlinked moves read as inactive.
#[derive(Component, Clone, Debug)]
pub struct SpriteRotation {
    pub config: RotationConfig,
    /// Continuous rotation in degrees.
    pub true_rotation: f32,
    rotation: f32,
    interval_min: f32,
    interval_max: f32,
    roll: Option<MoveHandle>,
    ground_control: Option<MoveHandle>,
}

impl Default for SpriteRotation {
    fn default() -> Self {
        Self::new(RotationConfig::default())
    }
}

impl SpriteRotation {
    pub fn new(config: RotationConfig) -> Self {
        let mut sr = Self {
            config,
            true_rotation: 0.0,
            rotation: 0.0,
            interval_min: 0.0,
            interval_max: 0.0,
            roll: None,
            ground_control: None,
        };
        sr.rebuild_band();
        sr
    }

    /// Builder: resolve the roll and ground-control moves once.
    pub fn link(mut self, moves: &MoveStates) -> Self {
        self.resolve_links(moves);
        self
    }

    pub fn resolve_links(&mut self, moves: &MoveStates) {
        self.roll = moves.handle_of(MoveKind::ROLL);
        self.ground_control = moves.handle_of(MoveKind::GROUND_CONTROL);
    }

    /// The visible, quantized rotation.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Current hysteresis band `(min, max)`.
    pub fn band(&self) -> (f32, f32) {
        (self.interval_min, self.interval_max)
    }

    pub fn roll_handle(&self) -> Option<MoveHandle> {
        self.roll
    }

    pub fn ground_control_handle(&self) -> Option<MoveHandle> {
        self.ground_control
    }

    /// Advance one variable-rate frame and return the visible rotation.
    ///
    /// `moves` is the actor's move view, if it has one.
    pub fn step(&mut self, physics: &ActorPhysics, moves: Option<&MoveStates>, delta: f32) -> f32 {
        let gravity_angle = physics.gravity_angle();
        let rolling = self.linked_active(self.roll, moves);

        if physics.grounded {
            let standing = physics.is_standing()
                && (self.ground_control.is_none() || self.linked_active(self.ground_control, moves));
            self.true_rotation = self.grounded_target(physics, standing, rolling);
        } else if self.config.rotate_in_air && !rolling {
            self.true_rotation = angle::rotate_towards(
                self.true_rotation,
                gravity_angle,
                self.config.air_recovery_rate * delta,
            );
        } else {
            self.true_rotation = gravity_angle;
        }

        self.fix_rotation(gravity_angle);
        self.rotation
    }

    /// Angle `true_rotation` should take on the ground.
    pub fn grounded_target(&self, physics: &ActorPhysics, standing: bool, rolling: bool) -> f32 {
        let gravity_angle = physics.gravity_angle();
        if standing && !self.config.rotate_during_stand {
            return gravity_angle;
        }
        if rolling && !self.config.rotate_during_roll {
            return gravity_angle;
        }
        if angle::delta(gravity_angle, physics.surface_angle).abs() < self.config.min_angle {
            return gravity_angle;
        }
        angle::normalize(physics.surface_angle)
    }

    /// Re-quantize if `true_rotation` left the band. Returns whether the
    /// visible rotation changed.
    pub fn fix_rotation(&mut self, reference: f32) -> bool {
        if angle::in_range(self.true_rotation, self.interval_min, self.interval_max) {
            return false;
        }
        let stepped = angle::round_to_interval(self.true_rotation, self.config.interval, reference);
        let changed = stepped != self.rotation;
        self.rotation = stepped;
        self.rebuild_band();
        changed
    }

    fn rebuild_band(&mut self) {
        let interval = self.config.interval.max(0.0);
        let widen = interval * self.config.threshold.clamp(0.0, MAX_THRESHOLD);
        let half = interval * 0.5 + widen;
        self.interval_min = self.rotation - half;
        self.interval_max = self.rotation + half;
    }

    fn linked_active(&self, handle: Option<MoveHandle>, moves: Option<&MoveStates>) -> bool {
        match (handle, moves) {
            (Some(handle), Some(moves)) => moves.is_handle_active(handle),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn approx_eq(a: f32, b: f32) -> bool {
        angle::delta(a, b).abs() < EPSILON
    }

    #[test]
    fn shallow_slope_counts_as_flat() {
        let mut sr = SpriteRotation::default();
        let physics = ActorPhysics::grounded_on(10.0, 120.0);
        sr.step(&physics, None, 1.0 / 60.0);
        assert!(approx_eq(sr.true_rotation, 0.0));
        assert!(approx_eq(sr.rotation(), 0.0));
    }

    #[test]
    fn steep_slope_is_followed_and_stepped() {
        let mut sr = SpriteRotation::default();
        let physics = ActorPhysics::grounded_on(50.0, 120.0);
        sr.step(&physics, None, 1.0 / 60.0);
        assert!(approx_eq(sr.true_rotation, 50.0));
        assert!(approx_eq(sr.rotation(), 45.0));
    }

    #[test]
    fn standing_stays_upright_unless_configured() {
        let physics = ActorPhysics::grounded_on(60.0, 0.0);
        let mut sr = SpriteRotation::default();
        sr.step(&physics, None, 1.0 / 60.0);
        assert!(approx_eq(sr.rotation(), 0.0));

        let mut sr = SpriteRotation::new(RotationConfig {
            rotate_during_stand: true,
            ..RotationConfig::default()
        });
        sr.step(&physics, None, 1.0 / 60.0);
        assert!(approx_eq(sr.rotation(), 45.0));
    }

    #[test]
    fn air_recovery_is_rate_limited() {
        let mut sr = SpriteRotation::default();
        sr.true_rotation = 90.0;
        let physics = ActorPhysics::airborne(glam::Vec2::ZERO);
        sr.step(&physics, None, 1.0 / 60.0);
        assert!(approx_eq(sr.true_rotation, 84.0));
        assert!(approx_eq(sr.rotation(), 90.0));
    }

    #[test]
    fn air_snap_when_recovery_disabled() {
        let mut sr = SpriteRotation::new(RotationConfig {
            rotate_in_air: false,
            ..RotationConfig::default()
        });
        sr.true_rotation = 90.0;
        sr.step(&ActorPhysics::airborne(glam::Vec2::ZERO), None, 1.0 / 60.0);
        assert!(approx_eq(sr.true_rotation, 0.0));
        assert!(approx_eq(sr.rotation(), 0.0));
    }

    #[test]
    fn fix_rotation_is_idempotent() {
        let mut sr = SpriteRotation::default();
        sr.true_rotation = 100.0;
        assert!(sr.fix_rotation(0.0));
        let first = sr.rotation();
        let band = sr.band();
        for _ in 0..10 {
            assert!(!sr.fix_rotation(0.0));
            assert_eq!(sr.rotation(), first);
            assert_eq!(sr.band(), band);
        }
    }

    #[test]
    fn oscillation_near_boundary_does_not_flicker() {
        for start in [15.0_f32, 30.0] {
            let mut sr = SpriteRotation::default();
            sr.true_rotation = start;
            sr.fix_rotation(0.0);
            let settled = sr.rotation();
            for i in 0..100 {
                let wobble = 4.5 * if i % 2 == 0 { 1.0 } else { -1.0 } * (i as f32 / 100.0);
                sr.true_rotation = 22.5 + wobble;
                sr.fix_rotation(0.0);
                assert_eq!(sr.rotation(), settled, "start {start} flickered at {i}");
            }
        }
    }

    #[test]
    fn band_wraps_across_zero() {
        let mut sr = SpriteRotation::default();
        sr.true_rotation = 350.0;
        assert!(!sr.fix_rotation(0.0));
        assert!(approx_eq(sr.rotation(), 0.0));
        sr.true_rotation = 330.0;
        assert!(sr.fix_rotation(0.0));
        assert!(approx_eq(sr.rotation(), 315.0));
    }

    #[test]
    fn threshold_is_clamped_below_half_interval() {
        let mut sr = SpriteRotation::new(RotationConfig {
            threshold: 2.0,
            ..RotationConfig::default()
        });
        sr.true_rotation = 45.0;
        sr.fix_rotation(0.0);
        let (min, max) = sr.band();
        assert!(max - min < 2.0 * 45.0);
    }
}
