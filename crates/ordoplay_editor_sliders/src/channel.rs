// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation channels: one animated property as a time-ordered list of keyframes.

use crate::keyframe::{KeyState, Keyframe, KeyframeId, TIME_EPSILON};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub Uuid);

impl ChannelId {
    /// Create a new random channel ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

/// A single animated property
///
/// Keyframes are kept sorted by time and no two keyframes share a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Unique channel ID
    pub id: ChannelId,
    /// Channel name (usually the property path)
    pub name: String,
    /// Keyframes in this channel
    keyframes: Vec<Keyframe>,
    /// Whether the channel is locked against editing
    #[serde(default)]
    pub locked: bool,
}

impl Channel {
    /// Create a new empty channel
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ChannelId::new(),
            name: name.into(),
            keyframes: Vec::new(),
            locked: false,
        }
    }

    /// Add a keyframe, replacing the value of any keyframe already on that frame
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> KeyframeId {
        if let Some(existing) = self
            .keyframes
            .iter_mut()
            .find(|k| (k.time - keyframe.time).abs() < TIME_EPSILON)
        {
            existing.value = keyframe.value;
            return existing.id;
        }

        let id = keyframe.id;
        self.keyframes.push(keyframe);
        self.sort_keyframes();
        id
    }

    /// Insert or update a keyframe at `time`
    pub fn insert(&mut self, time: f32, value: f32) -> KeyframeId {
        self.add_keyframe(Keyframe::new(time, value))
    }

    /// Remove a keyframe
    pub fn remove_keyframe(&mut self, keyframe_id: KeyframeId) -> Option<Keyframe> {
        let index = self.index_of(keyframe_id)?;
        Some(self.keyframes.remove(index))
    }

    /// Sort keyframes by time
    fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the channel has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Position of a keyframe in time order
    pub fn index_of(&self, keyframe_id: KeyframeId) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == keyframe_id)
    }

    /// Get keyframe by ID
    pub fn keyframe(&self, keyframe_id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == keyframe_id)
    }

    /// Get keyframe at time (if exists)
    pub fn keyframe_at(&self, time: f32) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| (k.time - time).abs() < TIME_EPSILON)
    }

    /// Overwrite time and value of a keyframe
    ///
    /// Returns the previous state. Keyframes are re-sorted if the new time moved
    /// the key past a neighbor.
    pub fn set_key_state(&mut self, keyframe_id: KeyframeId, state: KeyState) -> Option<KeyState> {
        let index = self.index_of(keyframe_id)?;
        let key = &mut self.keyframes[index];
        let previous = key.state();
        key.set_state(state);

        let out_of_order = (index > 0 && self.keyframes[index - 1].time > state.time)
            || self
                .keyframes
                .get(index + 1)
                .is_some_and(|next| next.time < state.time);
        if out_of_order {
            self.sort_keyframes();
        }
        Some(previous)
    }

    /// Find keyframes surrounding a time
    fn find_keyframes(&self, time: f32) -> (Option<&Keyframe>, Option<&Keyframe>) {
        let next_idx = self.keyframes.iter().position(|k| k.time >= time);

        match next_idx {
            None => (self.keyframes.last(), None),
            Some(0) => (None, self.keyframes.first()),
            Some(idx) => (Some(&self.keyframes[idx - 1]), Some(&self.keyframes[idx])),
        }
    }

    /// Evaluate the channel at an arbitrary time
    ///
    /// Holds the first/last value outside the keyed range. Returns `None` for an
    /// empty channel.
    pub fn evaluate(&self, time: f32) -> Option<f32> {
        match self.find_keyframes(time) {
            (None, None) => None,
            (Some(kf), None) | (None, Some(kf)) => Some(kf.value),
            (Some(a), Some(b)) => Some(a.interpolate(b, time)),
        }
    }

    /// Get the time range covered by keyframes
    pub fn time_range(&self) -> Option<(f32, f32)> {
        Some((self.keyframes.first()?.time, self.keyframes.last()?.time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::InterpolationMode;

    fn channel() -> Channel {
        let mut channel = Channel::new("location.x");
        channel.insert(10.0, 5.0);
        channel.insert(0.0, 0.0);
        channel.insert(20.0, -5.0);
        channel
    }

    #[test]
    fn test_keyframes_sorted_on_insert() {
        let channel = channel();
        let times: Vec<f32> = channel.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_insert_on_existing_frame_replaces_value() {
        let mut channel = channel();
        let original = channel.keyframe_at(10.0).unwrap().id;
        let id = channel.insert(10.0, 7.0);
        assert_eq!(id, original);
        assert_eq!(channel.len(), 3);
        assert_eq!(channel.keyframe(id).unwrap().value, 7.0);
    }

    #[test]
    fn test_evaluate() {
        let channel = channel();
        assert_eq!(channel.evaluate(5.0), Some(2.5));
        assert_eq!(channel.evaluate(15.0), Some(0.0));
        // Held outside the keyed range
        assert_eq!(channel.evaluate(-10.0), Some(0.0));
        assert_eq!(channel.evaluate(40.0), Some(-5.0));
        assert_eq!(Channel::new("empty").evaluate(1.0), None);
    }

    #[test]
    fn test_evaluate_constant_segment() {
        let mut channel = Channel::new("visibility");
        channel.add_keyframe(Keyframe::new(0.0, 1.0).with_interpolation(InterpolationMode::Constant));
        channel.insert(10.0, 0.0);
        assert_eq!(channel.evaluate(9.0), Some(1.0));
    }

    #[test]
    fn test_set_key_state_resorts() {
        let mut channel = channel();
        let id = channel.keyframe_at(0.0).unwrap().id;
        let previous = channel.set_key_state(id, KeyState::new(15.0, 1.0));
        assert_eq!(previous, Some(KeyState::new(0.0, 0.0)));
        assert_eq!(channel.index_of(id), Some(1));
        assert_eq!(channel.time_range(), Some((10.0, 20.0)));
    }
}
