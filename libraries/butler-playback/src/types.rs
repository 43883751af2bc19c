//! Core types for the playback engine

use crate::error::PlayerError;
use crate::group::Origin;
use crate::track::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shuffle algorithm applied when a group is enqueued with shuffling on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// Uniform random permutation
    #[default]
    Random,
    /// Spread artists apart
    Smart,
}

/// Where a new group lands in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Replace the group that is playing
    Start,
    /// Right after the group that is playing
    Next,
    /// After queued single tracks, before the first queued collection
    Later,
    /// At the tail of the queue
    End,
    /// At a track offset in the lineup, splitting a group if needed
    Index(usize),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Next => f.write_str("next"),
            Self::Later => f.write_str("later"),
            Self::End => f.write_str("end"),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

impl FromStr for Position {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "next" => Ok(Self::Next),
            "later" => Ok(Self::Later),
            "end" => Ok(Self::End),
            other => other
                .parse::<usize>()
                .map(Self::Index)
                .map_err(|_| PlayerError::InvalidPosition(format!("unknown position '{}'", s))),
        }
    }
}

/// Serialized form of one queued group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupState {
    pub origin: Origin,
    pub tracks: Vec<Metadata>,
}

/// Point-in-time view of the player
///
/// Derived on demand and never stored. `version` is the change counter value
/// the snapshot was taken at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub playing: bool,
    pub current_track: Option<Metadata>,
    /// Most recent first
    pub history: Vec<Metadata>,
    pub queue: Vec<GroupState>,
    pub version: u64,
}

impl PlayerState {
    /// Tracks in play order across all groups
    pub fn lineup(&self) -> impl Iterator<Item = &Metadata> {
        self.queue.iter().flat_map(|group| group.tracks.iter())
    }

    /// Ids of the lineup, in play order
    pub fn lineup_ids(&self) -> Vec<&str> {
        self.lineup().map(|track| track.id.as_str()).collect()
    }
}
