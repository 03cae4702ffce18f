// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hand-editable scene files.
//!
//! A scene lists channels by name with their keys and selection flags. IDs
//! are generated on load, so scripts refer to channels by name.

use crate::error::{CliError, Result};
use ordoplay_editor_sliders::{
    AnimationStore, Channel, ChannelId, CurveSet, InterpolationMode, Keyframe, MarkerList,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One keyframe in a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Time in frames
    pub time: f32,
    /// Value
    pub value: f32,
    /// Whether the key starts selected
    #[serde(default)]
    pub selected: bool,
    /// Interpolation towards the next key
    #[serde(default)]
    pub interpolation: InterpolationMode,
    /// Bezier in-handle offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_tangent: Option<[f32; 2]>,
    /// Bezier out-handle offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_tangent: Option<[f32; 2]>,
}

/// One channel in a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    /// Unique channel name
    pub name: String,
    /// Locked channels are never edited
    #[serde(default)]
    pub locked: bool,
    /// Whether the channel starts selected
    #[serde(default)]
    pub selected: bool,
    /// Keys in any order
    #[serde(default)]
    pub keys: Vec<KeySpec>,
}

/// Scene file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    /// Playhead frame
    pub current_frame: f32,
    /// Channels in display order
    pub channels: Vec<ChannelSpec>,
    /// Timeline markers
    pub markers: MarkerList,
}

impl SceneFile {
    /// Parse a scene from RON text
    pub fn from_ron_str(source: &str, path: &str) -> Result<Self> {
        ron::from_str(source).map_err(|source| CliError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Load a scene file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&content, &path.display().to_string())
    }

    /// Save as pretty RON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, content).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Build the live curve set
    pub fn into_curves(self) -> Result<CurveSet> {
        let mut names = HashSet::new();
        let mut curves = CurveSet::new();
        curves.current_frame = self.current_frame;
        curves.markers = self.markers;

        for spec in self.channels {
            if !names.insert(spec.name.clone()) {
                return Err(CliError::Scene(format!("duplicate channel '{}'", spec.name)));
            }

            let mut channel = Channel::new(spec.name);
            channel.locked = spec.locked;
            let mut selected_keys = Vec::new();
            for key in spec.keys {
                let mut keyframe = Keyframe::new(key.time, key.value).with_interpolation(key.interpolation);
                keyframe.in_tangent = key.in_tangent;
                keyframe.out_tangent = key.out_tangent;
                let id = channel.add_keyframe(keyframe);
                if key.selected {
                    selected_keys.push(id);
                }
            }

            let id = curves.add_channel(channel);
            if spec.selected {
                curves.selection.select_channel(id);
            }
            for key in selected_keys {
                curves.selection.select_key(id, key);
            }
        }

        Ok(curves)
    }

    /// Capture the current state of a curve set
    pub fn from_curves(curves: &CurveSet) -> Self {
        let channels = curves
            .channels()
            .map(|channel| ChannelSpec {
                name: channel.name.clone(),
                locked: channel.locked,
                selected: curves.is_channel_selected(channel.id),
                keys: channel
                    .keyframes()
                    .iter()
                    .map(|key| KeySpec {
                        time: key.time,
                        value: key.value,
                        selected: curves.is_keyframe_selected(channel.id, key.id),
                        interpolation: key.interpolation,
                        in_tangent: key.in_tangent,
                        out_tangent: key.out_tangent,
                    })
                    .collect(),
            })
            .collect();

        Self {
            current_frame: curves.current_frame,
            channels,
            markers: curves.markers.clone(),
        }
    }
}

/// Find a channel by name
pub fn channel_by_name(curves: &CurveSet, name: &str) -> Option<ChannelId> {
    curves.channels().find(|channel| channel.name == name).map(|channel| channel.id)
}
