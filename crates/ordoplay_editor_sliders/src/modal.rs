// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive slider drag.
//!
//! The controller owns at most one [`SliderSession`]. Pointer movement is
//! mapped to a factor relative to where the drag started; confirm commits,
//! cancel rolls back. Events are handled one at a time.

use crate::curves::AnimationStore;
use crate::error::{Result, SliderError};
use crate::neighbors::Side;
use crate::session::{SliderCommit, SliderSession};
use crate::settings::SliderSettings;
use serde::{Deserialize, Serialize};

const MIN_SENSITIVITY: f32 = 1e-4;

/// Pointer and keyboard tuning for the modal drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalSettings {
    /// Factor change per unit of horizontal pointer travel
    pub sensitivity: f32,
    /// Factor change per keyboard step
    pub step: f32,
}

impl Default for ModalSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.005,
            step: 0.1,
        }
    }
}

impl ModalSettings {
    /// Copy with unusable values replaced
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let sensitivity = if self.sensitivity.is_finite() && self.sensitivity.abs() >= MIN_SENSITIVITY {
            self.sensitivity
        } else {
            defaults.sensitivity
        };
        let step = if self.step.is_finite() && self.step > 0.0 {
            self.step
        } else {
            defaults.step
        };
        Self { sensitivity, step }
    }
}

/// Input delivered to the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SliderEvent {
    /// Pointer moved to a new horizontal position
    PointerMove {
        /// Horizontal pointer position
        x: f32,
    },
    /// Nudge the factor one step towards a side
    Step(Side),
    /// Jump the factor to full strength on a side
    Snap(Side),
    /// Keep the edit
    Confirm,
    /// Discard the edit
    Cancel,
}

/// Outcome of one handled event
#[derive(Debug, Clone, PartialEq)]
pub enum ModalStatus {
    /// Still dragging, with the factor now applied
    Running(f32),
    /// The edit was committed
    Committed(SliderCommit),
    /// The edit was rolled back
    Cancelled,
}

/// Drives a slider session from pointer and keyboard events
#[derive(Debug, Default)]
pub struct ModalController {
    settings: ModalSettings,
    session: Option<SliderSession>,
    reference_x: f32,
    pointer_x: f32,
}

impl ModalController {
    /// Create an idle controller
    pub fn new(settings: ModalSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            ..Self::default()
        }
    }

    /// Pointer tuning
    pub fn settings(&self) -> ModalSettings {
        self.settings
    }

    /// Replace the pointer tuning, falling back to defaults for unusable values
    pub fn set_settings(&mut self, settings: ModalSettings) {
        self.settings = settings.sanitized();
    }

    /// Whether a drag is in progress
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The running session, if any
    pub fn session(&self) -> Option<&SliderSession> {
        self.session.as_ref()
    }

    /// Pointer position that maps to factor zero
    pub fn reference_x(&self) -> f32 {
        self.reference_x
    }

    /// Start a drag at `pointer_x`
    ///
    /// Refused while another drag is running, or when the session cannot arm.
    pub fn begin<S: AnimationStore + ?Sized>(
        &mut self,
        store: &S,
        settings: &SliderSettings,
        pointer_x: f32,
    ) -> Result<()> {
        if self.session.is_some() {
            tracing::warn!("Slider already running, ignoring {}", settings.kind().name());
            return Err(SliderError::SessionActive);
        }

        let mut settings = settings.clone();
        settings.set_factor(0.0);
        self.session = Some(SliderSession::arm(store, &settings)?);
        self.reference_x = pointer_x;
        self.pointer_x = pointer_x;
        Ok(())
    }

    /// Handle one event
    pub fn handle<S: AnimationStore + ?Sized>(&mut self, store: &mut S, event: SliderEvent) -> Result<ModalStatus> {
        let Some(session) = self.session.as_mut() else {
            return Err(SliderError::NoActiveSession);
        };

        match event {
            SliderEvent::PointerMove { x } => {
                self.pointer_x = x;
                let factor = (x - self.reference_x) * self.settings.sensitivity;
                let factor = session.update(store, factor)?;
                Ok(ModalStatus::Running(factor))
            }
            SliderEvent::Step(side) => {
                let target = session.factor() + side.sign() * self.settings.step;
                let factor = session.update(store, target)?;
                self.reanchor(factor);
                Ok(ModalStatus::Running(factor))
            }
            SliderEvent::Snap(side) => {
                let factor = session.update(store, side.sign())?;
                self.reanchor(factor);
                Ok(ModalStatus::Running(factor))
            }
            SliderEvent::Confirm => {
                let commit = session.commit()?;
                self.session = None;
                Ok(ModalStatus::Committed(commit))
            }
            SliderEvent::Cancel => {
                session.rollback(store)?;
                self.session = None;
                Ok(ModalStatus::Cancelled)
            }
        }
    }

    /// Move the reference so the last pointer position maps to `factor`
    fn reanchor(&mut self, factor: f32) {
        self.reference_x = self.pointer_x - factor / self.settings.sensitivity;
    }
}
