//! Brad to pulse-width conversion.
//!
//! The protocol speaks brads, each actuator understands a pulse width in
//! microseconds. The mapping is affine over the joint's configured domain
//! and saturates at the boundaries instead of rejecting out-of-range
//! commands.
use crate::robot::config::JointConfig;

/// Saturates a commanded angle into the joint's brad domain.
pub fn clamp_brads(brads: i32, cfg: &JointConfig) -> i32 {
    brads.clamp(cfg.min_brads, cfg.max_brads)
}

/// Linearly interpolates a commanded angle onto the actuator pulse range.
/// Out-of-domain angles saturate to the nearest boundary first.
pub fn brads_to_pulse(brads: i32, cfg: &JointConfig) -> u16 {
    let brads = clamp_brads(brads, cfg);
    let pulse_range = (cfg.max_us - cfg.min_us) as i32;
    let domain = cfg.max_brads - cfg.min_brads;
    (cfg.min_us as i32 + (brads - cfg.min_brads) * pulse_range / domain) as u16
}

/// The part of a commanded elbow angle the V-arm actuator must provide
/// itself: the shoulder and the V-arm jointly determine the elbow, so the
/// shoulder's contribution is subtracted before mapping.
pub fn varm_contribution(elbow_brads: i32, shoulder_brads: i32) -> i32 {
    elbow_brads - shoulder_brads
}
