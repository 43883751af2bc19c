//! Track groups
//!
//! Every enqueue produces one [`TrackGroup`]: a single track, an album, an
//! artist's top tracks, a playlist or an ad hoc selection. Groups are
//! consumed from the front and never grow after construction.

use crate::shuffle::shuffle_tracks;
use crate::track::{Metadata, TrackRef};
use crate::types::{GroupState, ShuffleMode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Where a group came from
///
/// Only used for display and for `later` insertion, which treats
/// [`Origin::Track`] groups as single tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Origin {
    Track(Metadata),
    Album(Metadata),
    Artist(Metadata),
    Playlist(Metadata),
    /// Tracks enqueued together without a collection behind them
    Selection,
}

impl Origin {
    /// Origin for tracks enqueued without one
    pub fn infer(tracks: &[TrackRef]) -> Self {
        match tracks {
            [track] => Self::Track(track.metadata().clone()),
            _ => Self::Selection,
        }
    }

    pub fn is_single_track(&self) -> bool {
        matches!(self, Self::Track(_))
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Self::Track(m) | Self::Album(m) | Self::Artist(m) | Self::Playlist(m) => Some(m),
            Self::Selection => None,
        }
    }
}

/// Ordered, single-consumption sequence of tracks from one origin
#[derive(Debug, Clone)]
pub struct TrackGroup {
    origin: Origin,
    tracks: VecDeque<TrackRef>,
}

impl TrackGroup {
    /// Build a group, shuffling the full track list once if requested
    pub fn new(origin: Origin, tracks: Vec<TrackRef>, shuffle: Option<ShuffleMode>) -> Self {
        let mut tracks = tracks;
        if let Some(mode) = shuffle {
            shuffle_tracks(&mut tracks, mode);
        }

        Self {
            origin,
            tracks: tracks.into(),
        }
    }

    /// Group holding one track, labelled with that track's own metadata
    pub fn single(track: TrackRef) -> Self {
        let origin = Origin::Track(track.metadata().clone());
        Self::new(origin, vec![track], None)
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Take the front track
    ///
    /// `None` means the group is exhausted and should leave the queue.
    pub fn next(&mut self) -> Option<TrackRef> {
        self.tracks.pop_front()
    }

    /// Track that `next` would return
    pub fn front(&self) -> Option<&TrackRef> {
        self.tracks.front()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &TrackRef> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Split after `at` tracks; the tail keeps this group's origin
    ///
    /// Callers keep `0 < at < len` so both halves stay non-empty.
    pub(crate) fn split_off(&mut self, at: usize) -> Self {
        debug_assert!(at > 0 && at < self.tracks.len());
        Self {
            origin: self.origin.clone(),
            tracks: self.tracks.split_off(at),
        }
    }

    pub fn snapshot(&self) -> GroupState {
        GroupState {
            origin: self.origin.clone(),
            tracks: self.tracks.iter().map(|t| t.metadata().clone()).collect(),
        }
    }
}
