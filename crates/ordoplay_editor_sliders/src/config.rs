// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted slider configuration.

use crate::error::ConfigError;
use crate::modal::ModalSettings;
use crate::slots::SliderSlots;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Slider tool configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Format version
    pub version: u32,
    /// Modal drag tuning
    pub modal: ModalSettings,
    /// Default slider and slots
    pub sliders: SliderSlots,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            modal: ModalSettings::default(),
            sliders: SliderSlots::default(),
        }
    }
}

impl SliderConfig {
    /// Parse a configuration from RON text
    ///
    /// Out-of-range values are clamped rather than rejected.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SliderConfig = ron::from_str(source)?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        Ok(config.sanitized())
    }

    /// Serialize as pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!("Loaded slider config from {:?}", path);
        Ok(config)
    }

    /// Save to a configuration file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    fn sanitized(self) -> Self {
        Self {
            version: self.version,
            modal: self.modal.sanitized(),
            sliders: self.sliders.sanitized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::SlotRef;
    use crate::transform::SliderKind;

    #[test]
    fn test_default_config() {
        let config = SliderConfig::default();
        assert_eq!(config.version, CONFIG_FORMAT_VERSION);
        assert!(config.sliders.is_empty());
        assert_eq!(config.sliders.marker_prefix, "F");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = SliderConfig::default();
        let index = config.sliders.add_slot();
        config
            .sliders
            .get_mut(SlotRef::Slot(index))
            .unwrap()
            .set_kind(SliderKind::BlendFrame);
        config.modal.step = 0.05;

        let ron_str = config.to_ron_string().unwrap();
        let loaded = SliderConfig::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let loaded = SliderConfig::from_ron_str("(modal: (sensitivity: 0.02))").unwrap();
        assert_eq!(loaded.modal.sensitivity, 0.02);
        assert_eq!(loaded.modal.step, 0.1);
        assert_eq!(loaded.sliders, SliderSlots::default());
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = SliderConfig::from_ron_str("(version: 99)");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            SliderConfig::from_ron_str("(version: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_loaded_values_are_clamped() {
        let loaded = SliderConfig::from_ron_str(
            "(modal: (sensitivity: 0.0), sliders: (default: (slope: 40.0, noise_phase: 11)))",
        )
        .unwrap();
        assert_eq!(loaded.modal.sensitivity, ModalSettings::default().sensitivity);
        assert_eq!(loaded.sliders.default.slope(), 10.0);
        assert_eq!(loaded.sliders.default.noise_phase(), 10);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("sliders_{}.ron", uuid::Uuid::new_v4()));
        let config = SliderConfig::default();
        config.save(&path).unwrap();
        let loaded = SliderConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join(format!("missing_{}.ron", uuid::Uuid::new_v4()));
        assert!(matches!(SliderConfig::load(&path), Err(ConfigError::Io(_))));
    }
}
