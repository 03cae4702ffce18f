// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host-side animation storage.
//!
//! The slider tools never own animation data. They read channels, selection and
//! the current frame through [`AnimationStore`] and write keyframe time/value
//! pairs back through it. [`CurveSet`] is the in-memory store used by the
//! headless host and the tests.

use crate::channel::{Channel, ChannelId};
use crate::error::{Result, SliderError};
use crate::keyframe::{KeyState, KeyframeId};
use crate::markers::MarkerList;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Selection state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Selected channels
    pub channels: HashSet<ChannelId>,
    /// Selected keyframes (`channel_id`, `keyframe_id`)
    pub keyframes: HashSet<(ChannelId, KeyframeId)>,
}

impl Selection {
    /// Select a keyframe, which also selects its channel
    pub fn select_key(&mut self, channel: ChannelId, key: KeyframeId) {
        self.channels.insert(channel);
        self.keyframes.insert((channel, key));
    }

    /// Deselect a keyframe
    pub fn deselect_key(&mut self, channel: ChannelId, key: KeyframeId) {
        self.keyframes.remove(&(channel, key));
    }

    /// Select a channel without selecting any of its keys
    pub fn select_channel(&mut self, channel: ChannelId) {
        self.channels.insert(channel);
    }

    /// Whether a keyframe is selected
    pub fn contains_key(&self, channel: ChannelId, key: KeyframeId) -> bool {
        self.keyframes.contains(&(channel, key))
    }

    /// Whether a channel is selected
    pub fn contains_channel(&self, channel: ChannelId) -> bool {
        self.channels.contains(&channel)
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.keyframes.is_empty()
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.channels.clear();
        self.keyframes.clear();
    }
}

/// Access to the host's live animation data
pub trait AnimationStore {
    /// IDs of all channels, in display order
    fn channel_ids(&self) -> Vec<ChannelId>;

    /// Read a channel
    fn channel(&self, id: ChannelId) -> Option<&Channel>;

    /// Whether a channel is selected in the editor
    fn is_channel_selected(&self, id: ChannelId) -> bool;

    /// Whether a keyframe is selected in the editor
    fn is_keyframe_selected(&self, channel: ChannelId, key: KeyframeId) -> bool;

    /// Frame under the playhead
    fn current_frame(&self) -> f32;

    /// Overwrite time and value of one keyframe, returning the previous state
    fn write_key(&mut self, channel: ChannelId, key: KeyframeId, state: KeyState) -> Result<KeyState>;
}

/// In-memory set of animation channels with selection, playhead and markers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveSet {
    /// Channels in display order
    channels: IndexMap<ChannelId, Channel>,
    /// Current selection
    #[serde(default)]
    pub selection: Selection,
    /// Frame under the playhead
    #[serde(default)]
    pub current_frame: f32,
    /// Named time markers
    #[serde(default)]
    pub markers: MarkerList,
}

impl CurveSet {
    /// Create an empty curve set
    pub fn new() -> Self {
        Self {
            channels: IndexMap::new(),
            selection: Selection::default(),
            current_frame: 0.0,
            markers: MarkerList::default(),
        }
    }

    /// Add a channel
    pub fn add_channel(&mut self, channel: Channel) -> ChannelId {
        let id = channel.id;
        self.channels.insert(id, channel);
        id
    }

    /// Remove a channel and anything selected on it
    pub fn remove_channel(&mut self, id: ChannelId) -> Option<Channel> {
        self.selection.channels.remove(&id);
        self.selection.keyframes.retain(|(channel, _)| *channel != id);
        self.channels.shift_remove(&id)
    }

    /// Get a mutable channel
    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut Channel> {
        self.channels.get_mut(&id)
    }

    /// Get all channels
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// Get channel count
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Select the keyframe on `channel` at `time`, returning its ID
    pub fn select_key_at(&mut self, channel: ChannelId, time: f32) -> Option<KeyframeId> {
        let key = self.channels.get(&channel)?.keyframe_at(time)?.id;
        self.selection.select_key(channel, key);
        Some(key)
    }
}

impl Default for CurveSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationStore for CurveSet {
    fn channel_ids(&self) -> Vec<ChannelId> {
        self.channels.keys().copied().collect()
    }

    fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.get(&id)
    }

    fn is_channel_selected(&self, id: ChannelId) -> bool {
        self.selection.contains_channel(id)
    }

    fn is_keyframe_selected(&self, channel: ChannelId, key: KeyframeId) -> bool {
        self.selection.contains_key(channel, key)
    }

    fn current_frame(&self) -> f32 {
        self.current_frame
    }

    fn write_key(&mut self, channel: ChannelId, key: KeyframeId, state: KeyState) -> Result<KeyState> {
        self.channels
            .get_mut(&channel)
            .ok_or(SliderError::ChannelNotFound(channel))?
            .set_key_state(key, state)
            .ok_or(SliderError::KeyframeNotFound(channel, key))
    }
}
