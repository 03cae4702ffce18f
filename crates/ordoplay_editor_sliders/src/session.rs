// SPDX-License-Identifier: MIT OR Apache-2.0
//! One slider edit, from arming to commit or rollback.
//!
//! Arming captures a [`Snapshot`] of every affected keyframe together with the
//! neighbor context each one is evaluated against. Every update recomputes all
//! affected keys from that snapshot, so repeated updates never compound.
//! Unaffected keys are never written by a session, which keeps the captured
//! neighbor context valid until the session ends.

use crate::channel::{Channel, ChannelId};
use crate::curves::AnimationStore;
use crate::error::{Result, SliderError};
use crate::keyframe::{KeyState, Keyframe, KeyframeId, TIME_EPSILON};
use crate::neighbors::{neighbors, run_bounds, sample_at, NeighborFilter};
use crate::settings::SliderSettings;
use crate::transform::{channel_seed, KeyContext, NeighborScope, Transform};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not started
    #[default]
    Idle,
    /// Snapshot taken, nothing written yet
    Armed,
    /// At least one factor has been applied
    Previewing,
    /// Live values kept
    Committed,
    /// Snapshot restored
    RolledBack,
}

impl SessionState {
    /// Whether the session still holds write access
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Armed | SessionState::Previewing)
    }
}

/// One affected keyframe and its frozen evaluation context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffectedKey {
    /// Keyframe identity
    pub key: KeyframeId,
    /// Original state and neighbors
    pub context: KeyContext,
}

impl AffectedKey {
    /// Channel of the key
    pub fn channel(&self) -> ChannelId {
        self.context.channel
    }

    /// Pre-edit time and value
    pub fn original(&self) -> KeyState {
        self.context.original
    }
}

/// Immutable pre-edit copy of every affected keyframe
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    keys: Vec<AffectedKey>,
    average: f32,
}

impl Snapshot {
    /// Collect the affected keys for `settings` from the live store
    ///
    /// Locked channels are skipped. Unselected channels are skipped unless
    /// `affect_non_selected_channels` is set. With
    /// `affect_non_selected_keys_on_frame`, keys sharing a frame with any
    /// selected key are added; with nothing selected, the keys under the
    /// playhead are used instead.
    pub fn capture<S: AnimationStore + ?Sized>(store: &S, settings: &SliderSettings) -> Result<Self> {
        let channels: Vec<&Channel> = store
            .channel_ids()
            .into_iter()
            .filter_map(|id| store.channel(id))
            .collect();
        if channels.iter().all(|channel| channel.is_empty()) {
            return Err(SliderError::NoAnimationData);
        }

        let eligible: Vec<&Channel> = channels
            .into_iter()
            .filter(|channel| !channel.locked)
            .filter(|channel| settings.affect_non_selected_channels || store.is_channel_selected(channel.id))
            .collect();

        let mut frames: Vec<f32> = Vec::new();
        if settings.affect_non_selected_keys_on_frame {
            for channel in &eligible {
                frames.extend(
                    channel
                        .keyframes()
                        .iter()
                        .filter(|key| store.is_keyframe_selected(channel.id, key.id))
                        .map(|key| key.time),
                );
            }
            if frames.is_empty() {
                frames.push(store.current_frame());
            }
        }
        let on_frame = |time: f32| {
            settings.affect_non_selected_keys_on_frame
                && frames.iter().any(|frame| (frame - time).abs() < TIME_EPSILON)
        };

        let scope = settings.kind().neighbor_scope();
        let mut keys = Vec::new();
        for channel in eligible {
            let affected: HashSet<KeyframeId> = channel
                .keyframes()
                .iter()
                .filter(|key| store.is_keyframe_selected(channel.id, key.id) || on_frame(key.time))
                .map(|key| key.id)
                .collect();

            for key in channel.keyframes().iter().filter(|key| affected.contains(&key.id)) {
                keys.push(AffectedKey {
                    key: key.id,
                    context: resolve_context(channel, key, &affected, scope, settings),
                });
            }
        }

        if keys.is_empty() {
            return Err(SliderError::NoSelection);
        }

        let average = keys.iter().map(|k| k.original().value).sum::<f32>() / keys.len() as f32;
        Ok(Self { keys, average })
    }

    /// Affected keys in channel order
    pub fn keys(&self) -> &[AffectedKey] {
        &self.keys
    }

    /// Number of affected keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key is affected
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Mean original value of the affected keys
    pub fn average(&self) -> f32 {
        self.average
    }
}

fn resolve_context(
    channel: &Channel,
    key: &Keyframe,
    affected: &HashSet<KeyframeId>,
    scope: NeighborScope,
    settings: &SliderSettings,
) -> KeyContext {
    let run_filter = NeighborFilter::Excluding(affected);
    let filter = match scope {
        NeighborScope::Run => run_filter,
        NeighborScope::Adjacent => NeighborFilter::All,
    };

    let (left, right) = neighbors(channel, key.id, &filter)
        .map(|n| (n.left.map(Keyframe::state), n.right.map(Keyframe::state)))
        .unwrap_or((None, None));
    let (first, last) = run_bounds(channel, key.id, &run_filter)
        .map(|(first, last)| (first.state(), last.state()))
        .unwrap_or((key.state(), key.state()));

    let mut context = KeyContext::new(channel.id, key.state())
        .with_neighbors(left, right)
        .with_run(first, last)
        .with_noise_seed(channel_seed(&channel.name));
    if settings.kind().uses_reference_frames() {
        context = context.with_references(
            sample_at(channel, settings.left_ref_frame),
            sample_at(channel, settings.right_ref_frame),
        );
    }
    context
}

/// Before and after state of one committed key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyChange {
    /// Channel of the key
    pub channel: ChannelId,
    /// Keyframe identity
    pub key: KeyframeId,
    /// State before the session
    pub before: KeyState,
    /// State after the commit
    pub after: KeyState,
}

/// Atomic result of a committed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderCommit {
    /// Description for an undo stack
    pub description: String,
    /// Final factor
    pub factor: f32,
    /// Every affected key
    pub changes: Vec<KeyChange>,
}

impl SliderCommit {
    /// Keys whose time or value actually changed
    pub fn changed(&self) -> impl Iterator<Item = &KeyChange> {
        self.changes.iter().filter(|change| !change.before.bits_eq(&change.after))
    }

    /// Write every `before` state back
    pub fn revert<S: AnimationStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        for change in self.changes.iter().rev() {
            store.write_key(change.channel, change.key, change.before)?;
        }
        Ok(())
    }

    /// Write every `after` state again
    pub fn reapply<S: AnimationStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        for change in &self.changes {
            store.write_key(change.channel, change.key, change.after)?;
        }
        Ok(())
    }
}

/// A configured slider operation bound to a snapshot
#[derive(Debug, Clone)]
pub struct SliderSession {
    settings: SliderSettings,
    transform: Transform,
    snapshot: Snapshot,
    current: Vec<KeyState>,
    state: SessionState,
}

impl SliderSession {
    /// Take the snapshot and arm the session
    pub fn arm<S: AnimationStore + ?Sized>(store: &S, settings: &SliderSettings) -> Result<Self> {
        let snapshot = Snapshot::capture(store, settings)
            .inspect_err(|e| tracing::warn!("Slider refused to start: {}", e))?;
        let transform = Transform::from_settings(settings, snapshot.average());
        let current = snapshot.keys().iter().map(AffectedKey::original).collect();
        tracing::debug!(
            "Armed {} on {} keys",
            settings.kind().name(),
            snapshot.len()
        );
        Ok(Self {
            settings: settings.clone(),
            transform,
            snapshot,
            current,
            state: SessionState::Armed,
        })
    }

    /// Arm, apply one factor and commit
    pub fn execute<S: AnimationStore + ?Sized>(
        store: &mut S,
        settings: &SliderSettings,
        factor: f32,
    ) -> Result<SliderCommit> {
        let mut session = Self::arm(&*store, settings)?;
        session.update(store, factor)?;
        session.commit()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Settings the session was armed with, including the current factor
    pub fn settings(&self) -> &SliderSettings {
        &self.settings
    }

    /// Current factor
    pub fn factor(&self) -> f32 {
        self.settings.factor()
    }

    /// The pre-edit snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn ensure_active(&self) -> Result<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(SliderError::NoActiveSession)
        }
    }

    /// Recompute every affected key for `factor` and write the results
    ///
    /// The factor is clamped to the session's bounds; the clamped value is
    /// returned. Keys that can no longer be written are skipped.
    pub fn update<S: AnimationStore + ?Sized>(&mut self, store: &mut S, factor: f32) -> Result<f32> {
        self.ensure_active()?;
        let factor = self.settings.set_factor(factor);

        let results: Vec<KeyState> = self
            .snapshot
            .keys()
            .iter()
            .map(|key| self.transform.apply(&key.context, factor))
            .collect();

        for ((key, state), current) in self.snapshot.keys().iter().zip(results).zip(&mut self.current) {
            match store.write_key(key.channel(), key.key, state) {
                Ok(_) => *current = state,
                Err(e) => {
                    tracing::warn!("Skipped key during preview: {}", e);
                    *current = key.original();
                }
            }
        }

        self.state = SessionState::Previewing;
        tracing::debug!("{} factor {:.3}", self.transform.kind().name(), factor);
        Ok(factor)
    }

    /// Keep the live values and end the session
    pub fn commit(&mut self) -> Result<SliderCommit> {
        self.ensure_active()?;
        self.state = SessionState::Committed;

        let factor = self.factor();
        let changes = self
            .snapshot
            .keys()
            .iter()
            .zip(&self.current)
            .map(|(key, after)| KeyChange {
                channel: key.channel(),
                key: key.key,
                before: key.original(),
                after: *after,
            })
            .collect();
        let description = format!("{} {:.2}", self.transform.kind().name(), factor);
        tracing::info!("Committed {} on {} keys", description, self.snapshot.len());

        Ok(SliderCommit {
            description,
            factor,
            changes,
        })
    }

    /// Restore every affected key from the snapshot and end the session
    pub fn rollback<S: AnimationStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        self.ensure_active()?;
        self.state = SessionState::RolledBack;

        for key in self.snapshot.keys() {
            if let Err(e) = store.write_key(key.channel(), key.key, key.original()) {
                tracing::warn!("Skipped key during rollback: {}", e);
            }
        }
        self.current = self.snapshot.keys().iter().map(AffectedKey::original).collect();
        tracing::info!(
            "Cancelled {}, restored {} keys",
            self.transform.kind().name(),
            self.snapshot.len()
        );
        Ok(())
    }
}
