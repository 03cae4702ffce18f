// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve slider tools for OrdoPlay Editor.
//!
//! This crate reshapes selected keyframes interactively:
//! - Ease, blend, scale and smooth key values against their neighbors
//! - Slide keys in time or add reproducible noise
//! - Preview every change live and commit or cancel atomically
//! - Keep extra slider slots with persisted reference frames
//!
//! ## Architecture
//!
//! The sliders are built on:
//! - An [`AnimationStore`] the host implements for its channels
//! - Pure [`Transform`] functions, one per [`SliderKind`]
//! - A [`SliderSession`] that snapshots, previews and commits
//! - A [`ModalController`] that turns pointer input into a factor

pub mod channel;
pub mod config;
pub mod curves;
pub mod easing;
pub mod error;
pub mod keyframe;
pub mod markers;
pub mod modal;
pub mod neighbors;
pub mod session;
pub mod settings;
pub mod slots;
pub mod transform;

pub use channel::{Channel, ChannelId};
pub use config::{SliderConfig, CONFIG_FORMAT_VERSION};
pub use curves::{AnimationStore, CurveSet, Selection};
pub use error::{ConfigError, Result, SliderError};
pub use keyframe::{Interpolation, InterpolationMode, KeyState, Keyframe, KeyframeId};
pub use markers::{marker_name, MarkerList, MarkerStore, TimeMarker};
pub use modal::{ModalController, ModalSettings, ModalStatus, SliderEvent};
pub use neighbors::{neighbors, sample_at, slider_neighbors, NeighborFilter, Neighbors, Side};
pub use session::{KeyChange, SessionState, SliderCommit, SliderSession, Snapshot};
pub use settings::{FactorBounds, SliderSettings};
pub use slots::{SliderSlots, SlotRef};
pub use transform::{channel_seed, KeyContext, SliderKind, Transform};
