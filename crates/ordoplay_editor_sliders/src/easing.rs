// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves used by the slider transforms.
//!
//! All curves map a normalized position in [0, 1] to a weight in [0, 1].
//! Inputs outside that range are clamped.

/// Symmetric S-curve (ease-in and ease-out at once)
///
/// `slope` sharpens the transition; `1.0` is a straight line.
pub fn s_curve(x: f32, slope: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let a = x.powf(slope);
    let b = (1.0 - x).powf(slope);
    a / (a + b)
}

/// C-curve that starts slow and arrives fast
pub fn ease_in(x: f32, power: f32) -> f32 {
    x.clamp(0.0, 1.0).powf(power)
}

/// C-curve that starts fast and arrives slow
pub fn ease_out(x: f32, power: f32) -> f32 {
    1.0 - (1.0 - x.clamp(0.0, 1.0)).powf(power)
}
