// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-slider parameters.
//!
//! Setters clamp instead of rejecting. Values loaded from disk go through
//! [`SliderSettings::sanitized`].

use crate::transform::SliderKind;
use serde::{Deserialize, Serialize};

/// Slope range
pub const SLOPE_RANGE: (f32, f32) = (1.0, 10.0);
/// Noise phase range
pub const NOISE_PHASE_RANGE: (u8, u8) = (1, 10);

const DEFAULT_SLOPE: f32 = 2.0;
const DEFAULT_NOISE_PHASE: u8 = 1;

/// Allowed factor range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorBounds {
    /// Lowest factor
    pub min: f32,
    /// Highest factor
    pub max: f32,
}

impl FactorBounds {
    /// Regular bounds
    pub const NORMAL: FactorBounds = FactorBounds { min: -1.0, max: 1.0 };
    /// Bounds with overshoot enabled
    pub const OVERSHOOT: FactorBounds = FactorBounds { min: -2.0, max: 2.0 };

    /// Bounds for an overshoot flag
    pub fn new(overshoot: bool) -> Self {
        if overshoot {
            Self::OVERSHOOT
        } else {
            Self::NORMAL
        }
    }

    /// Clamp a factor into range; NaN becomes zero
    pub fn clamp(&self, factor: f32) -> f32 {
        if factor.is_nan() {
            0.0
        } else {
            factor.clamp(self.min, self.max)
        }
    }
}

/// Parameters of one slider (the default slider or a slot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderSettings {
    kind: SliderKind,
    factor: f32,
    slope: f32,
    overshoot: bool,
    noise_phase: u8,
    /// Left reference frame for [`SliderKind::BlendFrame`]
    pub left_ref_frame: f32,
    /// Right reference frame for [`SliderKind::BlendFrame`]
    pub right_ref_frame: f32,
    /// Persist reference frames as timeline markers
    pub use_markers: bool,
    /// Edit keys on channels that are not selected
    pub affect_non_selected_channels: bool,
    /// Edit unselected keys sharing a frame with a selected key, or with the playhead when nothing is selected
    pub affect_non_selected_keys_on_frame: bool,
}

impl Default for SliderSettings {
    fn default() -> Self {
        Self {
            kind: SliderKind::default(),
            factor: 0.0,
            slope: DEFAULT_SLOPE,
            overshoot: false,
            noise_phase: DEFAULT_NOISE_PHASE,
            left_ref_frame: 0.0,
            right_ref_frame: 0.0,
            use_markers: true,
            affect_non_selected_channels: true,
            affect_non_selected_keys_on_frame: false,
        }
    }
}

impl SliderSettings {
    /// Settings for a kind, everything else default
    pub fn for_kind(kind: SliderKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Operation kind
    pub fn kind(&self) -> SliderKind {
        self.kind
    }

    /// Change the kind. Overshoot is switched off whenever the kind changes.
    pub fn set_kind(&mut self, kind: SliderKind) {
        if self.kind != kind {
            self.kind = kind;
            self.set_overshoot(false);
        }
    }

    /// Current factor
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Set the factor, clamped to the current bounds
    pub fn set_factor(&mut self, factor: f32) -> f32 {
        self.factor = self.bounds().clamp(factor);
        self.factor
    }

    /// Transition sharpness
    pub fn slope(&self) -> f32 {
        self.slope
    }

    /// Set the slope, clamped to [`SLOPE_RANGE`]
    pub fn set_slope(&mut self, slope: f32) {
        self.slope = if slope.is_finite() {
            slope.clamp(SLOPE_RANGE.0, SLOPE_RANGE.1)
        } else {
            DEFAULT_SLOPE
        };
    }

    /// Whether overshoot is on
    pub fn overshoot(&self) -> bool {
        self.overshoot
    }

    /// Switch overshoot and re-clamp the factor
    pub fn set_overshoot(&mut self, overshoot: bool) {
        self.overshoot = overshoot;
        self.factor = self.bounds().clamp(self.factor);
    }

    /// Noise shape selector
    pub fn noise_phase(&self) -> u8 {
        self.noise_phase
    }

    /// Set the noise phase, clamped to [`NOISE_PHASE_RANGE`]
    pub fn set_noise_phase(&mut self, phase: u8) {
        self.noise_phase = phase.clamp(NOISE_PHASE_RANGE.0, NOISE_PHASE_RANGE.1);
    }

    /// Factor bounds for the overshoot flag
    pub fn bounds(&self) -> FactorBounds {
        FactorBounds::new(self.overshoot)
    }

    /// Set both reference frames
    pub fn set_reference_frames(&mut self, left: f32, right: f32) {
        self.left_ref_frame = left;
        self.right_ref_frame = right;
    }

    /// Copy with every value forced into range
    pub fn sanitized(mut self) -> Self {
        self.set_slope(self.slope);
        self.set_noise_phase(self.noise_phase);
        self.set_factor(self.factor);
        if !self.left_ref_frame.is_finite() {
            self.left_ref_frame = 0.0;
        }
        if !self.right_ref_frame.is_finite() {
            self.right_ref_frame = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SliderSettings::default();
        assert_eq!(settings.kind(), SliderKind::EaseToEase);
        assert_eq!(settings.slope(), 2.0);
        assert_eq!(settings.noise_phase(), 1);
        assert!(settings.use_markers);
        assert!(settings.affect_non_selected_channels);
        assert!(!settings.affect_non_selected_keys_on_frame);
    }

    #[test]
    fn test_factor_clamped_to_bounds() {
        let mut settings = SliderSettings::default();
        assert_eq!(settings.set_factor(1.7), 1.0);
        assert_eq!(settings.set_factor(-3.0), -1.0);

        settings.set_overshoot(true);
        assert_eq!(settings.set_factor(1.7), 1.7);
        assert_eq!(settings.set_factor(-3.0), -2.0);
    }

    #[test]
    fn test_disabling_overshoot_reclamps() {
        let mut settings = SliderSettings::default();
        settings.set_overshoot(true);
        settings.set_factor(1.5);
        settings.set_overshoot(false);
        assert_eq!(settings.factor(), 1.0);
    }

    #[test]
    fn test_kind_change_resets_overshoot() {
        let mut settings = SliderSettings::default();
        settings.set_overshoot(true);
        settings.set_factor(-1.8);

        settings.set_kind(SliderKind::EaseToEase);
        assert!(settings.overshoot());

        settings.set_kind(SliderKind::Smooth);
        assert!(!settings.overshoot());
        assert_eq!(settings.factor(), -1.0);
    }

    #[test]
    fn test_slope_and_phase_clamped() {
        let mut settings = SliderSettings::default();
        settings.set_slope(0.2);
        assert_eq!(settings.slope(), 1.0);
        settings.set_slope(50.0);
        assert_eq!(settings.slope(), 10.0);
        settings.set_slope(f32::NAN);
        assert_eq!(settings.slope(), 2.0);

        settings.set_noise_phase(0);
        assert_eq!(settings.noise_phase(), 1);
        settings.set_noise_phase(200);
        assert_eq!(settings.noise_phase(), 10);
    }

    #[test]
    fn test_sanitized_loaded_values() {
        let source = "(kind: Noise, factor: 4.0, slope: -1.0, noise_phase: 0, left_ref_frame: 12.0)";
        let settings: SliderSettings = ron::from_str(source).unwrap();
        let settings = settings.sanitized();
        assert_eq!(settings.kind(), SliderKind::Noise);
        assert_eq!(settings.factor(), 1.0);
        assert_eq!(settings.slope(), 1.0);
        assert_eq!(settings.noise_phase(), 1);
        assert_eq!(settings.left_ref_frame, 12.0);
        assert!(settings.use_markers);
    }

    #[test]
    fn test_nan_factor_becomes_zero() {
        assert_eq!(FactorBounds::NORMAL.clamp(f32::NAN), 0.0);
    }
}
