// SPDX-License-Identifier: MIT OR Apache-2.0
//! Run summary printed after a script.

use crate::script::ScriptRunner;
use ordoplay_editor_sliders::{AnimationStore, SliderCommit, TimeMarker};
use serde::Serialize;
use std::fmt::Write as _;

/// One key in the summary
#[derive(Debug, Clone, Serialize)]
pub struct KeyReport {
    /// Time in frames
    pub time: f32,
    /// Value
    pub value: f32,
    /// Whether the key is selected
    pub selected: bool,
}

/// One channel in the summary
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    /// Channel name
    pub name: String,
    /// Keys in time order
    pub keys: Vec<KeyReport>,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Final curves
    pub channels: Vec<ChannelReport>,
    /// Final markers
    pub markers: Vec<TimeMarker>,
    /// Commits in the order they happened
    pub commits: Vec<SliderCommit>,
    /// Number of refused commands
    pub refused: usize,
    /// Whether the script ended mid-drag
    pub dragging: bool,
}

impl Report {
    /// Summarize a finished runner
    pub fn new(runner: &ScriptRunner) -> Self {
        let curves = &runner.curves;
        let channels = curves
            .channels()
            .map(|channel| ChannelReport {
                name: channel.name.clone(),
                keys: channel
                    .keyframes()
                    .iter()
                    .map(|key| KeyReport {
                        time: key.time,
                        value: key.value,
                        selected: curves.is_keyframe_selected(channel.id, key.id),
                    })
                    .collect(),
            })
            .collect();

        Self {
            channels,
            markers: curves.markers.markers().to_vec(),
            commits: runner.commits().to_vec(),
            refused: runner.refused(),
            dragging: runner.is_dragging(),
        }
    }

    /// Pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain text listing
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for channel in &self.channels {
            let _ = writeln!(out, "{}", channel.name);
            for key in &channel.keys {
                let mark = if key.selected { " *" } else { "" };
                let _ = writeln!(out, "  {:>9.3} {:>12.5}{}", key.time, key.value, mark);
            }
        }
        if !self.markers.is_empty() {
            let _ = writeln!(out, "markers");
            for marker in &self.markers {
                let _ = writeln!(out, "  {:<6} {:>9.3}", marker.name, marker.time);
            }
        }
        for commit in &self.commits {
            let _ = writeln!(out, "commit: {} ({} keys)", commit.description, commit.changed().count());
        }
        if self.refused > 0 {
            let _ = writeln!(out, "refused: {}", self.refused);
        }
        if self.dragging {
            let _ = writeln!(out, "warning: script ended with a drag still open");
        }
        out
    }
}
