// SPDX-License-Identifier: MIT OR Apache-2.0
//! Neighbor lookup and reference sampling inside a channel.

use crate::channel::{Channel, ChannelId};
use crate::curves::AnimationStore;
use crate::keyframe::{KeyState, Keyframe, KeyframeId};
use crate::settings::SliderSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Side of a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Earlier in time
    Left,
    /// Later in time
    Right,
}

impl Side {
    /// Both sides, left first
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Side a factor points to: negative is left, zero and positive are right
    pub fn from_factor(factor: f32) -> Self {
        if factor < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Marker suffix letter
    pub fn letter(&self) -> char {
        match self {
            Side::Left => 'L',
            Side::Right => 'R',
        }
    }

    /// Unit sign of this side
    pub fn sign(&self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Which keyframes may act as neighbors
#[derive(Debug, Clone, Copy)]
pub enum NeighborFilter<'a> {
    /// Every keyframe in the channel
    All,
    /// Only keyframes in the set (selected keys)
    Only(&'a HashSet<KeyframeId>),
    /// Every keyframe except those in the set (keys being edited)
    Excluding(&'a HashSet<KeyframeId>),
}

impl<'a> NeighborFilter<'a> {
    /// Filter for a slider's neighbor search
    ///
    /// With `selected_only`, unselected keys are skipped unless the slider also
    /// affects non-selected keys on the frame.
    pub fn for_slider(
        selected_only: bool,
        affect_non_selected_keys_on_frame: bool,
        selected: &'a HashSet<KeyframeId>,
    ) -> Self {
        if selected_only && !affect_non_selected_keys_on_frame {
            NeighborFilter::Only(selected)
        } else {
            NeighborFilter::All
        }
    }

    /// Whether `key` may be a neighbor
    pub fn accepts(&self, key: KeyframeId) -> bool {
        match self {
            NeighborFilter::All => true,
            NeighborFilter::Only(keys) => keys.contains(&key),
            NeighborFilter::Excluding(keys) => !keys.contains(&key),
        }
    }
}

/// Left and right neighbors of a keyframe; `None` is an open boundary
#[derive(Debug, Clone, Copy)]
pub struct Neighbors<'a> {
    /// Nearest accepted keyframe before the target
    pub left: Option<&'a Keyframe>,
    /// Nearest accepted keyframe after the target
    pub right: Option<&'a Keyframe>,
}

impl<'a> Neighbors<'a> {
    /// Neighbor on one side
    pub fn side(&self, side: Side) -> Option<&'a Keyframe> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

fn neighbor_indices(channel: &Channel, index: usize, filter: &NeighborFilter) -> (Option<usize>, Option<usize>) {
    let keys = channel.keyframes();
    let left = (0..index).rev().find(|&i| filter.accepts(keys[i].id));
    let right = (index + 1..keys.len()).find(|&i| filter.accepts(keys[i].id));
    (left, right)
}

/// Find the neighbors of `key` in `channel`
///
/// Returns `None` if the key is not in the channel.
pub fn neighbors<'a>(channel: &'a Channel, key: KeyframeId, filter: &NeighborFilter) -> Option<Neighbors<'a>> {
    let index = channel.index_of(key)?;
    let keys = channel.keyframes();
    let (left, right) = neighbor_indices(channel, index, filter);
    Some(Neighbors {
        left: left.map(|i| &keys[i]),
        right: right.map(|i| &keys[i]),
    })
}

/// First and last keyframe of the run that contains `key` and lies strictly
/// between its neighbors
///
/// With [`NeighborFilter::Excluding`] over the edited keys this is the
/// contiguous block of edited keys around `key`.
pub fn run_bounds<'a>(
    channel: &'a Channel,
    key: KeyframeId,
    filter: &NeighborFilter,
) -> Option<(&'a Keyframe, &'a Keyframe)> {
    let index = channel.index_of(key)?;
    let keys = channel.keyframes();
    let (left, right) = neighbor_indices(channel, index, filter);
    let first = left.map_or(0, |i| i + 1);
    let last = right.map_or(keys.len() - 1, |i| i - 1);
    Some((&keys[first], &keys[last]))
}

/// Neighbors of a key as a slider with `settings` sees them in the host's store
///
/// This is the lookup hosts use to highlight blend targets. Sessions resolve
/// their own edited-run neighbors instead. Returns `None` for an unknown
/// channel or key.
pub fn slider_neighbors<S: AnimationStore + ?Sized>(
    store: &S,
    channel: ChannelId,
    key: KeyframeId,
    selected_only: bool,
    settings: &SliderSettings,
) -> Option<(Option<KeyState>, Option<KeyState>)> {
    let channel = store.channel(channel)?;
    let selected: HashSet<KeyframeId> = channel
        .keyframes()
        .iter()
        .filter(|k| store.is_keyframe_selected(channel.id, k.id))
        .map(|k| k.id)
        .collect();
    let filter = NeighborFilter::for_slider(selected_only, settings.affect_non_selected_keys_on_frame, &selected);
    let found = neighbors(channel, key, &filter)?;
    Some((found.left.map(Keyframe::state), found.right.map(Keyframe::state)))
}

/// Sample the channel's own interpolation at an arbitrary time
pub fn sample_at(channel: &Channel, time: f32) -> Option<f32> {
    channel.evaluate(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keys at frames 0, 10, 20, 30, 40 with value = frame / 10
    fn channel() -> (Channel, Vec<KeyframeId>) {
        let mut channel = Channel::new("location.z");
        let ids = (0..5)
            .map(|i| channel.insert(i as f32 * 10.0, i as f32))
            .collect();
        (channel, ids)
    }

    #[test]
    fn test_immediate_neighbors() {
        let (channel, ids) = channel();
        let n = neighbors(&channel, ids[2], &NeighborFilter::All).unwrap();
        assert_eq!(n.left.unwrap().id, ids[1]);
        assert_eq!(n.right.unwrap().id, ids[3]);
    }

    #[test]
    fn test_open_boundaries() {
        let (channel, ids) = channel();
        let first = neighbors(&channel, ids[0], &NeighborFilter::All).unwrap();
        assert!(first.left.is_none());
        let last = neighbors(&channel, ids[4], &NeighborFilter::All).unwrap();
        assert!(last.right.is_none());
    }

    #[test]
    fn test_excluding_skips_edited_keys() {
        let (channel, ids) = channel();
        let edited: HashSet<_> = [ids[1], ids[2], ids[3]].into_iter().collect();
        let filter = NeighborFilter::Excluding(&edited);

        let n = neighbors(&channel, ids[2], &filter).unwrap();
        assert_eq!(n.left.unwrap().id, ids[0]);
        assert_eq!(n.right.unwrap().id, ids[4]);

        let (first, last) = run_bounds(&channel, ids[2], &filter).unwrap();
        assert_eq!(first.id, ids[1]);
        assert_eq!(last.id, ids[3]);
    }

    #[test]
    fn test_run_bounds_at_channel_edge() {
        let (channel, ids) = channel();
        let edited: HashSet<_> = [ids[0], ids[1]].into_iter().collect();
        let (first, last) = run_bounds(&channel, ids[0], &NeighborFilter::Excluding(&edited)).unwrap();
        assert_eq!(first.id, ids[0]);
        assert_eq!(last.id, ids[1]);
    }

    #[test]
    fn test_selected_only_filter() {
        let (channel, ids) = channel();
        let selected: HashSet<_> = [ids[0], ids[2], ids[4]].into_iter().collect();

        let filter = NeighborFilter::for_slider(true, false, &selected);
        let n = neighbors(&channel, ids[2], &filter).unwrap();
        assert_eq!(n.left.unwrap().id, ids[0]);
        assert_eq!(n.right.unwrap().id, ids[4]);

        // Keys on the frame are affected too, so every key is a candidate
        let filter = NeighborFilter::for_slider(true, true, &selected);
        let n = neighbors(&channel, ids[2], &filter).unwrap();
        assert_eq!(n.left.unwrap().id, ids[1]);

        let filter = NeighborFilter::for_slider(false, false, &selected);
        let n = neighbors(&channel, ids[2], &filter).unwrap();
        assert_eq!(n.right.unwrap().id, ids[3]);
    }

    #[test]
    fn test_slider_neighbors_from_store() {
        use crate::curves::CurveSet;

        let (channel, ids) = channel();
        let mut curves = CurveSet::new();
        let ch = curves.add_channel(channel);
        for id in [ids[0], ids[2], ids[4]] {
            curves.selection.select_key(ch, id);
        }
        let mut settings = SliderSettings::default();

        let (left, right) = slider_neighbors(&curves, ch, ids[2], true, &settings).unwrap();
        assert_eq!(left.map(|k| k.time), Some(0.0));
        assert_eq!(right.map(|k| k.time), Some(40.0));

        let (left, _) = slider_neighbors(&curves, ch, ids[2], false, &settings).unwrap();
        assert_eq!(left.map(|k| k.time), Some(10.0));

        settings.affect_non_selected_keys_on_frame = true;
        let (_, right) = slider_neighbors(&curves, ch, ids[2], true, &settings).unwrap();
        assert_eq!(right.map(|k| k.time), Some(30.0));

        assert!(slider_neighbors(&curves, ChannelId::new(), ids[2], true, &settings).is_none());
    }

    #[test]
    fn test_unknown_key() {
        let (channel, _) = channel();
        assert!(neighbors(&channel, KeyframeId::new(), &NeighborFilter::All).is_none());
    }

    #[test]
    fn test_sample_at_does_not_mutate() {
        let (channel, _) = channel();
        let before = channel.keyframes().to_vec();
        assert_eq!(sample_at(&channel, 15.0), Some(1.5));
        assert_eq!(channel.keyframes().len(), before.len());
        assert!(channel
            .keyframes()
            .iter()
            .zip(&before)
            .all(|(a, b)| a.state().bits_eq(&b.state())));
    }

    #[test]
    fn test_side_from_factor() {
        assert_eq!(Side::from_factor(-0.1), Side::Left);
        assert_eq!(Side::from_factor(0.0), Side::Right);
        assert_eq!(Side::from_factor(1.0), Side::Right);
    }
}
