// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named time markers used to persist slider reference frames.

use crate::neighbors::Side;
use serde::{Deserialize, Serialize};

/// Marker name prefix for slider reference frames
pub const DEFAULT_MARKER_PREFIX: &str = "F";

/// Default marker color
const MARKER_COLOR: [u8; 3] = [255, 200, 100];

/// Time marker in the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMarker {
    /// Time position
    pub time: f32,
    /// Marker name
    pub name: String,
    /// Marker color
    pub color: [u8; 3],
}

/// Name of the marker holding a slider's reference frame, e.g. `F2L`
pub fn marker_name(prefix: &str, slot_number: usize, side: Side) -> String {
    format!("{prefix}{slot_number}{}", side.letter())
}

/// A flat, host-global list of named markers
///
/// The slider tools only ever address markers by exact name.
pub trait MarkerStore {
    /// Create the marker, or move it if one with that name exists
    fn set_marker(&mut self, name: &str, time: f32);

    /// Delete a marker by name. Missing markers are ignored.
    fn remove_marker(&mut self, name: &str) -> bool;

    /// Look up a marker by name
    fn marker(&self, name: &str) -> Option<&TimeMarker>;
}

/// In-memory marker list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerList {
    markers: Vec<TimeMarker>,
}

impl MarkerList {
    /// Create an empty marker list
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all markers
    pub fn markers(&self) -> &[TimeMarker] {
        &self.markers
    }

    /// Number of markers
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether there are no markers
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl MarkerStore for MarkerList {
    fn set_marker(&mut self, name: &str, time: f32) {
        if let Some(marker) = self.markers.iter_mut().find(|m| m.name == name) {
            marker.time = time;
        } else {
            self.markers.push(TimeMarker {
                time,
                name: name.to_string(),
                color: MARKER_COLOR,
            });
        }
    }

    fn remove_marker(&mut self, name: &str) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.name != name);
        self.markers.len() != before
    }

    fn marker(&self, name: &str) -> Option<&TimeMarker> {
        self.markers.iter().find(|m| m.name == name)
    }
}
