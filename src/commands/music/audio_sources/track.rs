//! Defines the `Track` value type, the unified representation of a resolved,
//! playable piece of audio handed from the resolver to the playback engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A resolved track. Everything except `failure_count` is fixed at
/// resolution time; the engine bumps `failure_count` whenever a play
/// attempt for this entry fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// The title of the track.
    pub title: String,
    /// Canonical locator of the remote audio resource. Always usable; the
    /// resolver never emits a track without one.
    pub url: String,
    /// The duration of the track, if known.
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
    /// The name of the user who requested the track.
    pub requested_by: Option<String>,
    /// Number of failed play attempts for this queue entry.
    #[serde(default)]
    pub failure_count: u32,
}

impl Track {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            duration: None,
            thumbnail: None,
            requested_by: None,
            failure_count: 0,
        }
    }

    /// Attach the requesting user's name.
    pub fn requested_by(mut self, name: impl Into<String>) -> Self {
        self.requested_by = Some(name.into());
        self
    }
}
