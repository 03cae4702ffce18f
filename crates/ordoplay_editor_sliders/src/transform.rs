// SPDX-License-Identifier: MIT OR Apache-2.0
//! The fourteen slider operations.
//!
//! Every operation is a pure function of a [`KeyContext`] and a factor. A key
//! whose required neighbor is missing, or whose neighbors collapse onto the
//! same frame, comes back unchanged. Results are never clamped here; the
//! factor is bounded by the session before it reaches these functions.

use crate::channel::ChannelId;
use crate::easing;
use crate::keyframe::{Interpolation, KeyState, TIME_EPSILON};
use crate::neighbors::Side;
use crate::settings::SliderSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Largest fraction of the gap to a neighbor a time offset may cover
///
/// Keeps shifted keys strictly between their neighbors.
pub const MAX_TIME_FRACTION: f32 = 0.99;

/// Slider operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SliderKind {
    /// S-shaped transition between the neighbors
    #[default]
    EaseToEase,
    /// C-shaped transition towards one neighbor
    Ease,
    /// Blend from the current values to the C-shaped transition
    BlendEase,
    /// Blend towards a neighbor's value
    BlendNeighbor,
    /// Blend towards the curve value at a reference frame
    BlendFrame,
    /// Move the whole run of keys towards a neighbor
    BlendOffset,
    /// Exaggerate or flatten keys relative to the neighbors' line
    PushPull,
    /// Scale around the average of the edited keys
    ScaleAverage,
    /// Scale around the left neighbor
    ScaleLeft,
    /// Scale around the right neighbor
    ScaleRight,
    /// Average each key with its neighbors
    Smooth,
    /// Add reproducible random offsets
    Noise,
    /// Slide keys in time towards a neighbor
    TimeOffset,
    /// Place keys on the neighbors' line
    Tween,
}

/// Keyboard shortcut for a slider operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    /// Number key
    pub key: char,
    /// Whether shift is held
    pub shift: bool,
}

/// Where a kind looks for neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborScope {
    /// Nearest keys that are not being edited
    Run,
    /// Immediately adjacent keys, edited or not
    Adjacent,
}

impl SliderKind {
    /// All kinds in menu order
    pub const ALL: [SliderKind; 14] = [
        SliderKind::EaseToEase,
        SliderKind::Ease,
        SliderKind::BlendEase,
        SliderKind::BlendNeighbor,
        SliderKind::BlendFrame,
        SliderKind::BlendOffset,
        SliderKind::PushPull,
        SliderKind::ScaleAverage,
        SliderKind::ScaleLeft,
        SliderKind::ScaleRight,
        SliderKind::Smooth,
        SliderKind::Noise,
        SliderKind::TimeOffset,
        SliderKind::Tween,
    ];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::EaseToEase => "Ease To Ease",
            Self::Ease => "Ease",
            Self::BlendEase => "Blend Ease",
            Self::BlendNeighbor => "Blend Neighbor",
            Self::BlendFrame => "Blend Frame",
            Self::BlendOffset => "Blend Offset",
            Self::PushPull => "Push Pull",
            Self::ScaleAverage => "Scale Average",
            Self::ScaleLeft => "Scale Left",
            Self::ScaleRight => "Scale Right",
            Self::Smooth => "Smooth",
            Self::Noise => "Noise",
            Self::TimeOffset => "Time Offset",
            Self::Tween => "Tween",
        }
    }

    /// Get the tooltip text
    pub fn description(&self) -> &'static str {
        match self {
            Self::EaseToEase => "S shape transition between the neighboring keys",
            Self::Ease => "C shape transition towards one neighboring key",
            Self::BlendEase => "From the current values to the C shape transition",
            Self::BlendNeighbor => "From the current values to the neighboring keys",
            Self::BlendFrame => "From the current values to the reference frames",
            Self::BlendOffset => "Offset the selected keys towards a neighbor",
            Self::PushPull => "Exaggerate or decrease key values",
            Self::ScaleAverage => "Scale from the average value of the selected keys",
            Self::ScaleLeft => "Scale anchored to the left neighbor",
            Self::ScaleRight => "Scale anchored to the right neighbor",
            Self::Smooth => "Average keys with their neighbors for a smoother curve",
            Self::Noise => "Add random values to keys",
            Self::TimeOffset => "Slide keys in time towards a neighbor",
            Self::Tween => "Set key values along the line between the neighbors",
        }
    }

    /// Get the hotkey for this kind
    pub fn shortcut(&self) -> Shortcut {
        let (key, shift) = match self {
            Self::EaseToEase => ('1', false),
            Self::Tween => ('1', true),
            Self::Ease => ('2', false),
            Self::BlendEase => ('2', true),
            Self::BlendNeighbor => ('3', false),
            Self::BlendFrame => ('3', true),
            Self::PushPull => ('4', false),
            Self::ScaleAverage => ('4', true),
            Self::ScaleLeft => ('5', false),
            Self::ScaleRight => ('5', true),
            Self::Smooth => ('6', false),
            Self::Noise => ('6', true),
            Self::TimeOffset => ('7', false),
            Self::BlendOffset => ('7', true),
        };
        Shortcut { key, shift }
    }

    /// Kind bound to a hotkey
    pub fn from_shortcut(key: char, shift: bool) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.shortcut() == Shortcut { key, shift })
    }

    /// Whether the slope setting changes the result
    pub fn uses_slope(&self) -> bool {
        matches!(self, Self::EaseToEase | Self::Ease | Self::BlendEase)
    }

    /// Whether the kind reads the reference frames
    pub fn uses_reference_frames(&self) -> bool {
        matches!(self, Self::BlendFrame)
    }

    /// Whether the noise phase setting changes the result
    pub fn uses_noise_phase(&self) -> bool {
        matches!(self, Self::Noise)
    }

    /// Whether the result ignores the key's current value
    pub fn ignores_original_value(&self) -> bool {
        matches!(self, Self::EaseToEase | Self::Ease | Self::Tween)
    }

    /// Where this kind looks for neighbors
    pub fn neighbor_scope(&self) -> NeighborScope {
        match self {
            Self::Smooth => NeighborScope::Adjacent,
            _ => NeighborScope::Run,
        }
    }
}

/// Everything a transform may read about one key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyContext {
    /// Channel the key lives on
    pub channel: ChannelId,
    /// Key state before the session started
    pub original: KeyState,
    /// Left neighbor, if any
    pub left: Option<KeyState>,
    /// Right neighbor, if any
    pub right: Option<KeyState>,
    /// First key of the edited run this key belongs to
    pub run_first: KeyState,
    /// Last key of the edited run this key belongs to
    pub run_last: KeyState,
    /// Curve value at the left reference frame
    pub left_reference: Option<f32>,
    /// Curve value at the right reference frame
    pub right_reference: Option<f32>,
    /// Seed that keeps noise stable for the channel across loads
    pub noise_seed: u64,
}

impl KeyContext {
    /// Context for a key with no neighbors, alone in its run
    pub fn new(channel: ChannelId, original: KeyState) -> Self {
        Self {
            channel,
            original,
            left: None,
            right: None,
            run_first: original,
            run_last: original,
            left_reference: None,
            right_reference: None,
            noise_seed: 0,
        }
    }

    /// Set both neighbors
    pub fn with_neighbors(mut self, left: Option<KeyState>, right: Option<KeyState>) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Set the edited run around the key
    pub fn with_run(mut self, first: KeyState, last: KeyState) -> Self {
        self.run_first = first;
        self.run_last = last;
        self
    }

    /// Set the noise seed, usually [`channel_seed`] of the channel name
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Set the sampled reference values
    pub fn with_references(mut self, left: Option<f32>, right: Option<f32>) -> Self {
        self.left_reference = left;
        self.right_reference = right;
        self
    }

    /// Neighbor on one side
    pub fn neighbor(&self, side: Side) -> Option<KeyState> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Reference value on one side
    pub fn reference(&self, side: Side) -> Option<f32> {
        match side {
            Side::Left => self.left_reference,
            Side::Right => self.right_reference,
        }
    }

    /// Edge of the run on one side
    pub fn run_edge(&self, side: Side) -> KeyState {
        match side {
            Side::Left => self.run_first,
            Side::Right => self.run_last,
        }
    }

    /// Both neighbors and the key's normalized position between them
    fn span(&self) -> Option<(KeyState, KeyState, f32)> {
        let (left, right) = (self.left?, self.right?);
        let x = Interpolation::inverse_lerp(left.time, right.time, self.original.time)?;
        Some((left, right, x))
    }
}

/// A configured slider operation, carrying only the parameters it reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// S-curve between the neighbors
    EaseToEase {
        /// Transition sharpness
        slope: f32,
    },
    /// C-curve towards the neighbor on the factor's side
    Ease {
        /// Transition sharpness
        slope: f32,
    },
    /// Blend towards the full C-curve
    BlendEase {
        /// Transition sharpness
        slope: f32,
    },
    /// Blend towards the neighbor's value
    BlendNeighbor,
    /// Blend towards the sampled reference values
    BlendFrame {
        /// Left reference frame
        left_frame: f32,
        /// Right reference frame
        right_frame: f32,
    },
    /// Rigid offset of the edited run
    BlendOffset,
    /// Scale away from the neighbors' line
    PushPull,
    /// Blend towards the three-point mean
    Smooth,
    /// Slide in time towards a neighbor
    TimeOffset,
    /// Reproducible random offset
    Noise {
        /// Noise shape selector
        phase: u8,
    },
    /// Scale around the left neighbor
    ScaleLeft,
    /// Scale around the right neighbor
    ScaleRight,
    /// Scale around a fixed pivot value
    ScaleAverage {
        /// Mean of the edited keys' original values
        pivot: f32,
    },
    /// Point on the neighbors' line
    Tween,
}

impl Transform {
    /// Build the transform for `settings`
    ///
    /// `average` is the mean original value of every edited key; only
    /// [`SliderKind::ScaleAverage`] reads it.
    pub fn from_settings(settings: &SliderSettings, average: f32) -> Self {
        let slope = settings.slope();
        match settings.kind() {
            SliderKind::EaseToEase => Transform::EaseToEase { slope },
            SliderKind::Ease => Transform::Ease { slope },
            SliderKind::BlendEase => Transform::BlendEase { slope },
            SliderKind::BlendNeighbor => Transform::BlendNeighbor,
            SliderKind::BlendFrame => Transform::BlendFrame {
                left_frame: settings.left_ref_frame,
                right_frame: settings.right_ref_frame,
            },
            SliderKind::BlendOffset => Transform::BlendOffset,
            SliderKind::PushPull => Transform::PushPull,
            SliderKind::ScaleAverage => Transform::ScaleAverage { pivot: average },
            SliderKind::ScaleLeft => Transform::ScaleLeft,
            SliderKind::ScaleRight => Transform::ScaleRight,
            SliderKind::Smooth => Transform::Smooth,
            SliderKind::Noise => Transform::Noise {
                phase: settings.noise_phase(),
            },
            SliderKind::TimeOffset => Transform::TimeOffset,
            SliderKind::Tween => Transform::Tween,
        }
    }

    /// Kind of this transform
    pub fn kind(&self) -> SliderKind {
        match self {
            Transform::EaseToEase { .. } => SliderKind::EaseToEase,
            Transform::Ease { .. } => SliderKind::Ease,
            Transform::BlendEase { .. } => SliderKind::BlendEase,
            Transform::BlendNeighbor => SliderKind::BlendNeighbor,
            Transform::BlendFrame { .. } => SliderKind::BlendFrame,
            Transform::BlendOffset => SliderKind::BlendOffset,
            Transform::PushPull => SliderKind::PushPull,
            Transform::Smooth => SliderKind::Smooth,
            Transform::TimeOffset => SliderKind::TimeOffset,
            Transform::Noise { .. } => SliderKind::Noise,
            Transform::ScaleLeft => SliderKind::ScaleLeft,
            Transform::ScaleRight => SliderKind::ScaleRight,
            Transform::ScaleAverage { .. } => SliderKind::ScaleAverage,
            Transform::Tween => SliderKind::Tween,
        }
    }

    /// New time and value for one key
    pub fn apply(&self, key: &KeyContext, factor: f32) -> KeyState {
        let result = match *self {
            Transform::EaseToEase { slope } => ease_to_ease(key, factor, slope),
            Transform::Ease { slope } => ease(key, factor, slope),
            Transform::BlendEase { slope } => blend_ease(key, factor, slope),
            Transform::BlendNeighbor => blend_neighbor(key, factor),
            Transform::BlendFrame {
                left_frame,
                right_frame,
            } => blend_frame(key, factor, left_frame, right_frame),
            Transform::BlendOffset => blend_offset(key, factor),
            Transform::PushPull => push_pull(key, factor),
            Transform::Smooth => smooth(key, factor),
            Transform::TimeOffset => time_offset(key, factor),
            Transform::Noise { phase } => Some(noise(key, factor, phase)),
            Transform::ScaleLeft => scale_around(key, key.left.map(|k| k.value), factor),
            Transform::ScaleRight => scale_around(key, key.right.map(|k| k.value), factor),
            Transform::ScaleAverage { pivot } => scale_around(key, Some(pivot), factor),
            Transform::Tween => tween(key, factor),
        };
        result.unwrap_or(key.original)
    }
}

fn ease_to_ease(key: &KeyContext, factor: f32, slope: f32) -> Option<KeyState> {
    let (left, right, x) = key.span()?;
    let weight = easing::s_curve(x + factor, slope);
    Some(key.original.with_value(Interpolation::lerp(left.value, right.value, weight)))
}

/// Value on the C-curve towards `side`, blended in from the straight line by `weight`
fn c_curve(left: KeyState, right: KeyState, x: f32, side: Side, slope: f32, weight: f32) -> f32 {
    let power = slope + 1.0;
    let curve = match side {
        Side::Left => easing::ease_in(x, power),
        Side::Right => easing::ease_out(x, power),
    };
    let shaped = x + (curve - x) * weight;
    Interpolation::lerp(left.value, right.value, shaped)
}

fn ease(key: &KeyContext, factor: f32, slope: f32) -> Option<KeyState> {
    let (left, right, x) = key.span()?;
    let weight = factor.abs().powf(slope);
    let value = c_curve(left, right, x, Side::from_factor(factor), slope, weight);
    Some(key.original.with_value(value))
}

fn blend_ease(key: &KeyContext, factor: f32, slope: f32) -> Option<KeyState> {
    let (left, right, x) = key.span()?;
    let target = c_curve(left, right, x, Side::from_factor(factor), slope, 1.0);
    Some(blend_towards(key.original, target, factor))
}

fn blend_towards(original: KeyState, target: f32, factor: f32) -> KeyState {
    original.with_value(original.value + (target - original.value) * factor.abs())
}

fn blend_neighbor(key: &KeyContext, factor: f32) -> Option<KeyState> {
    let neighbor = key.neighbor(Side::from_factor(factor))?;
    Some(blend_towards(key.original, neighbor.value, factor))
}

fn blend_frame(key: &KeyContext, factor: f32, left_frame: f32, right_frame: f32) -> Option<KeyState> {
    if (left_frame - right_frame).abs() < TIME_EPSILON {
        return None;
    }
    let target = key.reference(Side::from_factor(factor))?;
    Some(blend_towards(key.original, target, factor))
}

fn blend_offset(key: &KeyContext, factor: f32) -> Option<KeyState> {
    let side = Side::from_factor(factor);
    let neighbor = key.neighbor(side)?;
    let delta = (neighbor.value - key.run_edge(side).value) * factor.abs();
    Some(key.original.with_value(key.original.value + delta))
}

fn push_pull(key: &KeyContext, factor: f32) -> Option<KeyState> {
    let (left, right, x) = key.span()?;
    let line = Interpolation::lerp(left.value, right.value, x);
    let original = key.original.value;
    Some(key.original.with_value(original + (original - line) * factor))
}

fn smooth(key: &KeyContext, factor: f32) -> Option<KeyState> {
    let (left, right) = (key.left?, key.right?);
    let original = key.original.value;
    let mean = (left.value + original + right.value) / 3.0;
    Some(key.original.with_value(original + (mean - original) * factor))
}

fn time_offset(key: &KeyContext, factor: f32) -> Option<KeyState> {
    let neighbor = key.neighbor(Side::from_factor(factor))?;
    let gap = neighbor.time - key.original.time;
    if gap.abs() < TIME_EPSILON {
        return None;
    }
    let fraction = factor.abs().min(MAX_TIME_FRACTION);
    Some(key.original.with_time(key.original.time + gap * fraction))
}

fn noise(key: &KeyContext, factor: f32, phase: u8) -> KeyState {
    let offset = noise_sample(key.noise_seed, key.original.time, phase) * factor;
    key.original.with_value(key.original.value + offset)
}

/// Noise seed for a channel, derived from its name
///
/// Channel IDs are regenerated whenever curves are loaded, names are not.
pub fn channel_seed(name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

/// Reproducible noise in [-1, 1] for one key
pub fn noise_sample(seed: u64, time: f32, phase: u8) -> f32 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    time.to_bits().hash(&mut hasher);
    phase.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    rng.random_range(-1.0..=1.0)
}

fn scale_around(key: &KeyContext, pivot: Option<f32>, factor: f32) -> Option<KeyState> {
    let pivot = pivot?;
    let original = key.original.value;
    Some(key.original.with_value(original + (original - pivot) * factor))
}

fn tween(key: &KeyContext, factor: f32) -> Option<KeyState> {
    let (left, right) = (key.left?, key.right?);
    let t = (factor + 1.0) / 2.0;
    Some(key.original.with_value(Interpolation::lerp(left.value, right.value, t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    /// Key at frame 5 between (0, 0) and (10, 10)
    fn key(value: f32) -> KeyContext {
        KeyContext::new(ChannelId::new(), KeyState::new(5.0, value)).with_neighbors(
            Some(KeyState::new(0.0, 0.0)),
            Some(KeyState::new(10.0, 10.0)),
        )
    }

    fn every_transform() -> Vec<Transform> {
        vec![
            Transform::EaseToEase { slope: 2.0 },
            Transform::Ease { slope: 2.0 },
            Transform::BlendEase { slope: 2.0 },
            Transform::BlendNeighbor,
            Transform::BlendFrame {
                left_frame: 0.0,
                right_frame: 10.0,
            },
            Transform::BlendOffset,
            Transform::PushPull,
            Transform::Smooth,
            Transform::TimeOffset,
            Transform::Noise { phase: 1 },
            Transform::ScaleLeft,
            Transform::ScaleRight,
            Transform::ScaleAverage { pivot: 3.0 },
            Transform::Tween,
        ]
    }

    #[test]
    fn test_ease_to_ease_scenario() {
        let t = Transform::EaseToEase { slope: 2.0 };
        assert!(approx(t.apply(&key(7.0), 0.0).value, 5.0));
        assert!(approx(t.apply(&key(7.0), 1.0).value, 10.0));
        assert!(approx(t.apply(&key(7.0), -1.0).value, 0.0));
    }

    #[test]
    fn test_scale_left_scenario() {
        let ctx = KeyContext::new(ChannelId::new(), KeyState::new(5.0, 6.0))
            .with_neighbors(Some(KeyState::new(0.0, 2.0)), None);
        assert!(approx(Transform::ScaleLeft.apply(&ctx, 0.5).value, 8.0));
    }

    #[test]
    fn test_time_offset_scenario() {
        let ctx = KeyContext::new(ChannelId::new(), KeyState::new(10.0, 4.0))
            .with_neighbors(Some(KeyState::new(0.0, 0.0)), Some(KeyState::new(20.0, 0.0)));
        let result = Transform::TimeOffset.apply(&ctx, 0.3);
        assert!(approx(result.time, 13.0));
        assert_eq!(result.value, 4.0);

        let result = Transform::TimeOffset.apply(&ctx, -0.5);
        assert!(approx(result.time, 5.0));
    }

    #[test]
    fn test_time_offset_never_reaches_neighbor() {
        let ctx = KeyContext::new(ChannelId::new(), KeyState::new(10.0, 4.0))
            .with_neighbors(None, Some(KeyState::new(20.0, 0.0)));
        let result = Transform::TimeOffset.apply(&ctx, 2.0);
        assert!(result.time < 20.0);
        assert!(result.time > 19.0);
    }

    #[test]
    fn test_zero_factor_keeps_value() {
        for transform in every_transform() {
            if transform.kind().ignores_original_value() {
                continue;
            }
            let ctx = key(7.0).with_references(Some(1.0), Some(9.0));
            let result = transform.apply(&ctx, 0.0);
            assert!(result.bits_eq(&ctx.original), "{:?} moved the key", transform.kind());
        }
    }

    #[test]
    fn test_zero_factor_fixed_cases() {
        // Line between the neighbors at frame 5
        assert!(approx(Transform::Ease { slope: 3.0 }.apply(&key(7.0), 0.0).value, 5.0));
        assert!(approx(Transform::Tween.apply(&key(7.0), 0.0).value, 5.0));
    }

    #[test]
    fn test_missing_neighbors_is_noop() {
        let lonely = KeyContext::new(ChannelId::new(), KeyState::new(5.0, 7.0));
        for transform in every_transform() {
            if matches!(transform, Transform::Noise { .. } | Transform::ScaleAverage { .. }) {
                continue;
            }
            for factor in [-1.0, -0.4, 0.6, 1.0] {
                let result = transform.apply(&lonely, factor);
                assert!(result.bits_eq(&lonely.original), "{:?} moved the key", transform.kind());
            }
        }
    }

    #[test]
    fn test_zero_distance_neighbors_is_noop() {
        let ctx = KeyContext::new(ChannelId::new(), KeyState::new(5.0, 7.0))
            .with_neighbors(Some(KeyState::new(5.0, 0.0)), Some(KeyState::new(5.0, 10.0)));
        for transform in [
            Transform::EaseToEase { slope: 2.0 },
            Transform::Ease { slope: 2.0 },
            Transform::BlendEase { slope: 2.0 },
            Transform::PushPull,
            Transform::TimeOffset,
        ] {
            assert!(transform.apply(&ctx, 0.5).bits_eq(&ctx.original));
        }
    }

    #[test]
    fn test_equal_reference_frames_is_noop() {
        let ctx = key(7.0).with_references(Some(1.0), Some(1.0));
        let t = Transform::BlendFrame {
            left_frame: 4.0,
            right_frame: 4.0,
        };
        assert!(t.apply(&ctx, 1.0).bits_eq(&ctx.original));
    }

    #[test]
    fn test_ease_leans_towards_factor_side() {
        let t = Transform::Ease { slope: 2.0 };
        assert!(t.apply(&key(0.0), 1.0).value > 5.0);
        assert!(t.apply(&key(0.0), -1.0).value < 5.0);
        // Stays between the neighbors at full strength
        let right = t.apply(&key(0.0), 1.0).value;
        assert!(right <= 10.0);
    }

    #[test]
    fn test_blend_neighbor() {
        let t = Transform::BlendNeighbor;
        assert!(approx(t.apply(&key(4.0), 1.0).value, 10.0));
        assert!(approx(t.apply(&key(4.0), -1.0).value, 0.0));
        assert!(approx(t.apply(&key(4.0), 0.5).value, 7.0));
        // Overshoot goes past the neighbor
        assert!(approx(t.apply(&key(4.0), 2.0).value, 16.0));
    }

    #[test]
    fn test_blend_frame_uses_references() {
        let t = Transform::BlendFrame {
            left_frame: 0.0,
            right_frame: 20.0,
        };
        let ctx = key(4.0).with_references(Some(-2.0), Some(8.0));
        assert!(approx(t.apply(&ctx, 1.0).value, 8.0));
        assert!(approx(t.apply(&ctx, -0.5).value, 1.0));
    }

    #[test]
    fn test_blend_ease_full_strength_matches_ease() {
        let blend = Transform::BlendEase { slope: 2.0 }.apply(&key(3.0), 1.0).value;
        let ease = Transform::Ease { slope: 2.0 }.apply(&key(3.0), 1.0).value;
        assert!(approx(blend, ease));
    }

    #[test]
    fn test_blend_offset_moves_run_edge_onto_neighbor() {
        // Run from frame 4 (value 6) to frame 6 (value 8)
        let run_first = KeyState::new(4.0, 6.0);
        let run_last = KeyState::new(6.0, 8.0);
        let first = key(6.0).with_run(run_first, run_last);
        let last = KeyContext { original: run_last, ..first };

        let t = Transform::BlendOffset;
        assert!(approx(t.apply(&last, 1.0).value, 10.0));
        assert!(approx(t.apply(&first, 1.0).value, 8.0));
        assert!(approx(t.apply(&first, -1.0).value, 0.0));
    }

    #[test]
    fn test_push_pull() {
        let t = Transform::PushPull;
        // Line value at frame 5 is 5
        assert!(approx(t.apply(&key(7.0), 1.0).value, 9.0));
        assert!(approx(t.apply(&key(7.0), -1.0).value, 5.0));
    }

    #[test]
    fn test_smooth_full_factor_is_mean() {
        let t = Transform::Smooth;
        assert!(approx(t.apply(&key(8.0), 1.0).value, 6.0));
        assert!(approx(t.apply(&key(8.0), 0.5).value, 7.0));
    }

    #[test]
    fn test_scale_average() {
        let t = Transform::ScaleAverage { pivot: 3.0 };
        assert!(approx(t.apply(&key(5.0), 1.0).value, 7.0));
        assert!(approx(t.apply(&key(5.0), -1.0).value, 3.0));
    }

    #[test]
    fn test_tween_range() {
        let t = Transform::Tween;
        assert!(approx(t.apply(&key(100.0), -1.0).value, 0.0));
        assert!(approx(t.apply(&key(100.0), 1.0).value, 10.0));
        assert!(approx(t.apply(&key(100.0), 0.5).value, 7.5));
    }

    #[test]
    fn test_noise_is_reproducible() {
        let ctx = key(1.0);
        let t = Transform::Noise { phase: 3 };
        let a = t.apply(&ctx, 1.0);
        let b = t.apply(&ctx, 1.0);
        assert!(a.bits_eq(&b));
        assert!((a.value - 1.0).abs() <= 1.0);

        let sample = noise_sample(ctx.noise_seed, 5.0, 3);
        assert!(approx(t.apply(&ctx, 0.5).value, 1.0 + sample * 0.5));
    }

    #[test]
    fn test_noise_phase_changes_shape() {
        let seed = channel_seed("location.x");
        let samples: Vec<f32> = (1..=10).map(|phase| noise_sample(seed, 12.0, phase)).collect();
        assert!(samples.iter().any(|s| (s - samples[0]).abs() > 1e-6));
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_noise_follows_channel_name_not_id() {
        let original = KeyState::new(5.0, 7.0);
        let t = Transform::Noise { phase: 2 };
        let first = KeyContext::new(ChannelId::new(), original).with_noise_seed(channel_seed("rotation.z"));
        let reloaded = KeyContext::new(ChannelId::new(), original).with_noise_seed(channel_seed("rotation.z"));
        assert!(t.apply(&first, 1.0).bits_eq(&t.apply(&reloaded, 1.0)));
        assert_ne!(channel_seed("rotation.z"), channel_seed("rotation.y"));
    }

    #[test]
    fn test_shortcuts_are_unique() {
        for kind in SliderKind::ALL {
            let shortcut = kind.shortcut();
            assert_eq!(SliderKind::from_shortcut(shortcut.key, shortcut.shift), Some(kind));
        }
        assert_eq!(SliderKind::from_shortcut('1', true), Some(SliderKind::Tween));
        assert_eq!(SliderKind::from_shortcut('9', false), None);
    }

    #[test]
    fn test_kind_round_trip_through_settings() {
        for kind in SliderKind::ALL {
            let mut settings = SliderSettings::default();
            settings.set_kind(kind);
            assert_eq!(Transform::from_settings(&settings, 0.0).kind(), kind);
        }
    }
}
