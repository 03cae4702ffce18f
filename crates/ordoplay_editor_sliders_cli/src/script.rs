// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted slider input.
//!
//! A script is a RON list of commands that stand in for the editor's pointer,
//! keyboard and panel input. Refused commands are logged and skipped, the
//! same way the editor ignores them.

use crate::error::{CliError, Result};
use crate::scene::channel_by_name;
use ordoplay_editor_sliders::{
    CurveSet, ModalController, ModalStatus, Side, SliderCommit, SliderConfig, SliderError, SliderEvent,
    SliderKind, SliderSession, SliderSettings, SlotRef,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One scripted input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptCommand {
    /// Move the playhead
    SetFrame(f32),
    /// Select the key at a frame on a named channel
    SelectKey {
        /// Channel name
        channel: String,
        /// Key frame
        time: f32,
    },
    /// Clear the selection
    ClearSelection,
    /// Make a slider the active one
    UseSlot(SlotRef),
    /// Append a slider slot and make it active
    AddSlot,
    /// Remove the last slot and its markers
    RemoveLastSlot,
    /// Change the active slider's kind
    SetKind(SliderKind),
    /// Pick the active slider's kind by hotkey
    Hotkey {
        /// Number key
        key: char,
        /// Whether shift is held
        shift: bool,
    },
    /// Toggle overshoot on the active slider
    SetOvershoot(bool),
    /// Set the active slider's slope
    SetSlope(f32),
    /// Set the active slider's noise phase
    SetNoisePhase(u8),
    /// Toggle reference markers on the active slider
    UseMarkers(bool),
    /// Set the global "affect non-selected" flags
    AffectNonSelected {
        /// Edit keys on unselected channels
        channels: bool,
        /// Edit unselected keys on the same frame
        keys_on_frame: bool,
    },
    /// Store the playhead frame as a reference for the active slider
    SetReference(Side),
    /// Start a drag at a pointer position
    Begin(f32),
    /// Drag the pointer
    Move(f32),
    /// Nudge the factor one step
    Step(Side),
    /// Jump the factor to full strength
    Snap(Side),
    /// Finish the drag, keeping changes
    Confirm,
    /// Finish the drag, discarding changes
    Cancel,
    /// Apply the active slider once with a fixed factor
    Apply(f32),
}

/// Load a script file
pub fn load_script(path: &Path) -> Result<Vec<ScriptCommand>> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| CliError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Headless host that feeds commands to the slider tools
#[derive(Debug)]
pub struct ScriptRunner {
    /// Live curves
    pub curves: CurveSet,
    /// Slider configuration, including slots
    pub config: SliderConfig,
    modal: ModalController,
    active: SlotRef,
    commits: Vec<SliderCommit>,
    refused: usize,
}

impl ScriptRunner {
    /// Create a runner over a curve set
    pub fn new(curves: CurveSet, config: SliderConfig) -> Self {
        let modal = ModalController::new(config.modal);
        Self {
            curves,
            config,
            modal,
            active: SlotRef::Default,
            commits: Vec::new(),
            refused: 0,
        }
    }

    /// Commits made so far
    pub fn commits(&self) -> &[SliderCommit] {
        &self.commits
    }

    /// Number of refused commands
    pub fn refused(&self) -> usize {
        self.refused
    }

    /// Whether a drag is still open
    pub fn is_dragging(&self) -> bool {
        self.modal.is_active()
    }

    /// Run every command, skipping refused ones
    pub fn run_all(&mut self, commands: &[ScriptCommand]) {
        for (line, command) in commands.iter().enumerate() {
            if let Err(e) = self.run(command) {
                tracing::warn!("Command {} ({:?}) refused: {}", line + 1, command, e);
                self.refused += 1;
            }
        }
    }

    /// Run a single command
    pub fn run(&mut self, command: &ScriptCommand) -> Result<()> {
        match command {
            ScriptCommand::SetFrame(frame) => self.curves.current_frame = *frame,
            ScriptCommand::SelectKey { channel, time } => {
                let id = channel_by_name(&self.curves, channel)
                    .ok_or_else(|| CliError::Script(format!("no channel named '{channel}'")))?;
                self.curves
                    .select_key_at(id, *time)
                    .ok_or_else(|| CliError::Script(format!("no key on '{channel}' at frame {time}")))?;
            }
            ScriptCommand::ClearSelection => self.curves.selection.clear(),
            ScriptCommand::UseSlot(slot) => {
                self.config.sliders.get(*slot)?;
                self.active = *slot;
            }
            ScriptCommand::AddSlot => {
                self.active = SlotRef::Slot(self.config.sliders.add_slot());
            }
            ScriptCommand::RemoveLastSlot => {
                let removed = self.config.sliders.remove_last_slot(&mut self.curves.markers);
                if removed.is_some_and(|index| self.active == SlotRef::Slot(index)) {
                    self.active = SlotRef::Default;
                }
            }
            ScriptCommand::SetKind(kind) => self.active_settings()?.set_kind(*kind),
            ScriptCommand::Hotkey { key, shift } => {
                let kind = SliderKind::from_shortcut(*key, *shift)
                    .ok_or_else(|| CliError::Script(format!("no slider on hotkey '{key}'")))?;
                self.active_settings()?.set_kind(kind);
            }
            ScriptCommand::SetOvershoot(on) => self.active_settings()?.set_overshoot(*on),
            ScriptCommand::SetSlope(slope) => self.active_settings()?.set_slope(*slope),
            ScriptCommand::SetNoisePhase(phase) => self.active_settings()?.set_noise_phase(*phase),
            ScriptCommand::UseMarkers(on) => self.active_settings()?.use_markers = *on,
            ScriptCommand::AffectNonSelected { channels, keys_on_frame } => {
                self.config.sliders.default.affect_non_selected_channels = *channels;
                self.config.sliders.default.affect_non_selected_keys_on_frame = *keys_on_frame;
            }
            ScriptCommand::SetReference(side) => {
                let frame = self.curves.current_frame;
                self.config
                    .sliders
                    .set_reference(self.active, *side, frame, &mut self.curves.markers)?;
            }
            ScriptCommand::Begin(x) => {
                let settings = self.config.sliders.effective(self.active)?;
                self.modal.begin(&self.curves, &settings, *x)?;
            }
            ScriptCommand::Move(x) => self.drag(SliderEvent::PointerMove { x: *x })?,
            ScriptCommand::Step(side) => self.drag(SliderEvent::Step(*side))?,
            ScriptCommand::Snap(side) => self.drag(SliderEvent::Snap(*side))?,
            ScriptCommand::Confirm => self.drag(SliderEvent::Confirm)?,
            ScriptCommand::Cancel => self.drag(SliderEvent::Cancel)?,
            ScriptCommand::Apply(factor) => {
                if self.modal.is_active() {
                    return Err(SliderError::SessionActive.into());
                }
                let settings = self.config.sliders.effective(self.active)?;
                let commit = SliderSession::execute(&mut self.curves, &settings, *factor)?;
                self.commits.push(commit);
            }
        }
        Ok(())
    }

    fn active_settings(&mut self) -> Result<&mut SliderSettings> {
        Ok(self.config.sliders.get_mut(self.active)?)
    }

    fn drag(&mut self, event: SliderEvent) -> Result<()> {
        match self.modal.handle(&mut self.curves, event)? {
            ModalStatus::Running(factor) => tracing::debug!("Slider factor {:.3}", factor),
            ModalStatus::Committed(commit) => self.commits.push(commit),
            ModalStatus::Cancelled => {}
        }
        Ok(())
    }
}
