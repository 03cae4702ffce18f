// SPDX-License-Identifier: MIT OR Apache-2.0
//! The default slider plus any number of extra slider slots.
//!
//! Slots are numbered for display starting at 2 (the default slider is 1).
//! Each slider can persist its reference frames as a pair of named markers,
//! which the registry creates and deletes alongside the slot.

use crate::error::{Result, SliderError};
use crate::markers::{marker_name, MarkerStore, DEFAULT_MARKER_PREFIX};
use crate::neighbors::Side;
use crate::settings::SliderSettings;
use serde::{Deserialize, Serialize};

/// Addresses the default slider or one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotRef {
    /// The always-present slider
    Default,
    /// An extra slot by index
    Slot(usize),
}

impl SlotRef {
    /// Display number used in marker names
    pub fn slot_number(&self) -> usize {
        match self {
            SlotRef::Default => 1,
            SlotRef::Slot(index) => index + 2,
        }
    }
}

/// Registry of slider configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderSlots {
    /// The default slider
    pub default: SliderSettings,
    slots: Vec<SliderSettings>,
    /// Prefix of reference marker names
    pub marker_prefix: String,
}

impl Default for SliderSlots {
    fn default() -> Self {
        Self {
            default: SliderSettings::default(),
            slots: Vec::new(),
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
        }
    }
}

impl SliderSlots {
    /// Create a registry with only the default slider
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra slots in index order
    pub fn slots(&self) -> &[SliderSettings] {
        &self.slots
    }

    /// Number of extra slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no extra slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append a slot with default settings and return its index
    pub fn add_slot(&mut self) -> usize {
        self.slots.push(SliderSettings::default());
        let index = self.slots.len() - 1;
        tracing::debug!("Added slider slot {}", SlotRef::Slot(index).slot_number());
        index
    }

    /// Remove the highest-index slot and its reference markers
    ///
    /// Returns the removed index, or `None` if there were no slots.
    pub fn remove_last_slot(&mut self, markers: &mut dyn MarkerStore) -> Option<usize> {
        self.slots.pop()?;
        let index = self.slots.len();
        self.remove_markers(SlotRef::Slot(index), markers);
        tracing::debug!("Removed slider slot {}", SlotRef::Slot(index).slot_number());
        Some(index)
    }

    /// Settings of one slider
    pub fn get(&self, slot: SlotRef) -> Result<&SliderSettings> {
        match slot {
            SlotRef::Default => Ok(&self.default),
            SlotRef::Slot(index) => self.slots.get(index).ok_or(SliderError::SlotNotFound(index)),
        }
    }

    /// Mutable settings of one slider
    pub fn get_mut(&mut self, slot: SlotRef) -> Result<&mut SliderSettings> {
        match slot {
            SlotRef::Default => Ok(&mut self.default),
            SlotRef::Slot(index) => self.slots.get_mut(index).ok_or(SliderError::SlotNotFound(index)),
        }
    }

    /// Settings to run a slider with
    ///
    /// The two "affect non-selected" flags are shared by every slider and
    /// always come from the default one.
    pub fn effective(&self, slot: SlotRef) -> Result<SliderSettings> {
        let mut settings = self.get(slot)?.clone();
        settings.affect_non_selected_channels = self.default.affect_non_selected_channels;
        settings.affect_non_selected_keys_on_frame = self.default.affect_non_selected_keys_on_frame;
        Ok(settings)
    }

    /// Record a reference frame for one side of a slider
    ///
    /// With markers enabled the side's marker is created or moved; otherwise
    /// any markers left over for that slider are deleted.
    pub fn set_reference(
        &mut self,
        slot: SlotRef,
        side: Side,
        time: f32,
        markers: &mut dyn MarkerStore,
    ) -> Result<()> {
        let prefix = self.marker_prefix.clone();
        let settings = self.get_mut(slot)?;
        match side {
            Side::Left => settings.left_ref_frame = time,
            Side::Right => settings.right_ref_frame = time,
        }

        if settings.use_markers {
            markers.set_marker(&marker_name(&prefix, slot.slot_number(), side), time);
        } else {
            self.remove_markers(slot, markers);
        }
        Ok(())
    }

    fn remove_markers(&self, slot: SlotRef, markers: &mut dyn MarkerStore) {
        for side in Side::BOTH {
            markers.remove_marker(&marker_name(&self.marker_prefix, slot.slot_number(), side));
        }
    }

    /// Copy with every slider sanitized
    pub fn sanitized(mut self) -> Self {
        self.default = self.default.sanitized();
        self.slots = self.slots.into_iter().map(SliderSettings::sanitized).collect();
        if self.marker_prefix.is_empty() {
            self.marker_prefix = DEFAULT_MARKER_PREFIX.to_string();
        }
        self
    }
}
