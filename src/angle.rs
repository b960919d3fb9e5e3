//! Angle helpers on the circular degree domain.
//!
//! All functions take and return degrees. Angles are not required to be
//! normalized on input; outputs are normalized where documented.
//!
//! - [`normalize`] – wrap into `[0, 360)`
//! - [`delta`] – signed shortest arc from `a` to `b`, in `(-180, 180]`
//! - [`in_range`] – containment test for an arc that may wrap past 0°
//! - [`round_to_interval`] – snap to the nearest step relative to a reference axis
//! - [`rotate_towards`] – move toward a target by at most a given amount

/// Wrap an angle into `[0, 360)`.
pub fn normalize(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest-arc difference from `a` to `b`.
///
/// The result lies in `(-180, 180]` and satisfies
/// `normalize(a + delta(a, b)) == normalize(b)` up to float error.
pub fn delta(a: f32, b: f32) -> f32 {
    let d = normalize(b - a);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Whether `angle` lies on the arc going counter-clockwise from `min` to `max`.
///
/// Bounds are inclusive. `min` and `max` may be any real angles, the arc is
/// taken modulo 360 so `in_range(5.0, 340.0, 20.0)` holds. An arc whose length
/// is 360° or more contains every angle.
pub fn in_range(angle: f32, min: f32, max: f32) -> bool {
    if max - min >= 360.0 {
        return true;
    }
    let span = normalize(max - min);
    let offset = normalize(angle - min);
    offset <= span
}

/// Snap `degrees` to the nearest multiple of `interval` measured from `reference`.
///
/// The result is normalized. An `interval` of zero or less returns the
/// normalized input unchanged.
pub fn round_to_interval(degrees: f32, interval: f32, reference: f32) -> f32 {
    if interval <= 0.0 {
        return normalize(degrees);
    }
    let offset = delta(reference, degrees);
    normalize(reference + (offset / interval).round() * interval)
}

/// Rotate `current` toward `target` along the shorter arc, by at most `max_step`.
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let d = delta(current, target);
    if d.abs() <= max_step {
        normalize(target)
    } else {
        normalize(current + max_step.copysign(d))
    }
}
