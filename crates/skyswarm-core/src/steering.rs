//! Vector helpers for the steering rules.
//!
//! Every sub-force in the flocking pass follows the same recipe: scale the
//! desired direction to full speed, subtract the current velocity, and cap
//! the result. A zero desired vector stays zero when scaled, so no
//! normalization ever divides by zero.

use glam::Vec3;

/// Rescale `v` to magnitude `length`. The zero vector stays zero.
pub fn set_length(v: Vec3, length: f32) -> Vec3 {
    v.normalize_or_zero() * length
}

/// Cap the magnitude of `v` at `max`, keeping its direction.
///
/// Vectors already within the limit (including zero) are returned unchanged.
pub fn clamp_length(v: Vec3, max: f32) -> Vec3 {
    v.clamp_length_max(max)
}

/// Reynolds steering: full-speed `desired` minus `velocity`, capped at `max_force`.
pub fn steer(desired: Vec3, velocity: Vec3, max_speed: f32, max_force: f32) -> Vec3 {
    clamp_length(set_length(desired, max_speed) - velocity, max_force)
}
