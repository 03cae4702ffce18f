// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the slider tools.

use crate::channel::ChannelId;
use crate::keyframe::KeyframeId;
use thiserror::Error;

/// Slider errors
///
/// Every variant is a refusal: the operation that returned it left all state
/// unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum SliderError {
    /// The host has no animation channels to work on
    #[error("No animation data to edit")]
    NoAnimationData,

    /// Nothing is selected (and nothing is under the current frame)
    #[error("No keyframes selected")]
    NoSelection,

    /// A slider session is already running
    #[error("A slider session is already active")]
    SessionActive,

    /// No slider session is running
    #[error("No slider session is active")]
    NoActiveSession,

    /// Channel not found
    #[error("Channel not found: {0:?}")]
    ChannelNotFound(ChannelId),

    /// Keyframe not found
    #[error("Keyframe {1:?} not found in channel {0:?}")]
    KeyframeNotFound(ChannelId, KeyframeId),

    /// Slider slot not found
    #[error("Slider slot {0} does not exist")]
    SlotNotFound(usize),
}

/// Result type for slider operations
pub type Result<T> = std::result::Result<T, SliderError>;

/// Errors loading or saving slider configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// File written by a newer editor
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}
