// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for animation channels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Two keyframe times closer than this are considered the same frame
pub const TIME_EPSILON: f32 = 0.001;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpolation mode between a keyframe and the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Constant (step)
    Constant,
    /// Linear interpolation
    #[default]
    Linear,
    /// Cubic bezier interpolation using the keyframe handles
    Bezier,
}

/// Time and value of a keyframe, the part the slider tools rewrite
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyState {
    /// Time in frames
    pub time: f32,
    /// Curve value
    pub value: f32,
}

impl KeyState {
    /// Create a new key state
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }

    /// Same time, different value
    pub fn with_value(self, value: f32) -> Self {
        Self { value, ..self }
    }

    /// Same value, different time
    pub fn with_time(self, time: f32) -> Self {
        Self { time, ..self }
    }

    /// Bitwise comparison, used to verify exact restores
    pub fn bits_eq(&self, other: &KeyState) -> bool {
        self.time.to_bits() == other.time.to_bits() && self.value.to_bits() == other.value.to_bits()
    }
}

/// A keyframe on a channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time in frames
    pub time: f32,
    /// Value at this keyframe
    pub value: f32,
    /// Interpolation mode to next keyframe
    #[serde(default)]
    pub interpolation: InterpolationMode,
    /// In-handle for bezier curves, as (time, value) offset from the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_tangent: Option<[f32; 2]>,
    /// Out-handle for bezier curves, as (time, value) offset from the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_tangent: Option<[f32; 2]>,
}

impl Keyframe {
    /// Create a new keyframe
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            value,
            interpolation: InterpolationMode::Linear,
            in_tangent: None,
            out_tangent: None,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    /// Set handles for bezier interpolation
    pub fn with_tangents(mut self, in_tangent: [f32; 2], out_tangent: [f32; 2]) -> Self {
        self.in_tangent = Some(in_tangent);
        self.out_tangent = Some(out_tangent);
        self
    }

    /// Current time and value
    pub fn state(&self) -> KeyState {
        KeyState::new(self.time, self.value)
    }

    /// Overwrite time and value, leaving handles and interpolation untouched
    pub fn set_state(&mut self, state: KeyState) {
        self.time = state.time;
        self.value = state.value;
    }

    /// Interpolate from this keyframe towards `next` at `time`
    pub fn interpolate(&self, next: &Keyframe, time: f32) -> f32 {
        let span = next.time - self.time;
        if span.abs() < f32::EPSILON {
            return next.value;
        }
        let t = (time - self.time) / span;

        match self.interpolation {
            InterpolationMode::Constant => self.value,
            InterpolationMode::Linear => Interpolation::lerp(self.value, next.value, t),
            InterpolationMode::Bezier => {
                let p1 = self.value + self.out_tangent.map_or(0.0, |h| h[1]);
                let p2 = next.value + next.in_tangent.map_or(0.0, |h| h[1]);
                Interpolation::bezier(self.value, p1, p2, next.value, t)
            }
        }
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Position of `x` between `a` and `b`, `None` when the range is empty
    pub fn inverse_lerp(a: f32, b: f32, x: f32) -> Option<f32> {
        let span = b - a;
        if span.abs() < f32::EPSILON {
            None
        } else {
            Some((x - a) / span)
        }
    }

    /// Cubic bezier interpolation
    pub fn bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        p0 * mt3 + 3.0 * p1 * mt2 * t + 3.0 * p2 * mt * t2 + p3 * t3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_interpolation() {
        let a = Keyframe::new(0.0, 0.0);
        let b = Keyframe::new(10.0, 20.0);
        assert!((a.interpolate(&b, 5.0) - 10.0).abs() < 1e-6);
        assert!((a.interpolate(&b, 2.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_interpolation_holds_value() {
        let a = Keyframe::new(0.0, 3.0).with_interpolation(InterpolationMode::Constant);
        let b = Keyframe::new(10.0, 20.0);
        assert_eq!(a.interpolate(&b, 9.9), 3.0);
    }

    #[test]
    fn test_bezier_without_handles_matches_endpoints() {
        let a = Keyframe::new(0.0, 1.0).with_interpolation(InterpolationMode::Bezier);
        let b = Keyframe::new(4.0, 5.0);
        assert!((a.interpolate(&b, 0.0) - 1.0).abs() < 1e-6);
        assert!((a.interpolate(&b, 4.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_state_keeps_handles() {
        let mut key = Keyframe::new(1.0, 1.0).with_tangents([-1.0, 0.5], [1.0, -0.5]);
        key.set_state(KeyState::new(2.0, 3.0));
        assert_eq!(key.state(), KeyState::new(2.0, 3.0));
        assert_eq!(key.in_tangent, Some([-1.0, 0.5]));
        assert_eq!(key.out_tangent, Some([1.0, -0.5]));
    }

    #[test]
    fn test_inverse_lerp_guards_empty_range() {
        assert_eq!(Interpolation::inverse_lerp(2.0, 2.0, 3.0), None);
        assert_eq!(Interpolation::inverse_lerp(0.0, 10.0, 5.0), Some(0.5));
    }
}
