//! Playback history
//!
//! Tracks that were playing before the current one, most recent first.

use crate::track::TrackRef;
use std::collections::VecDeque;

/// Bounded, most-recent-first history
///
/// With a capacity set, pushing onto a full history evicts the oldest entry.
/// Without one the history grows without limit.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Front = most recent
    tracks: VecDeque<TrackRef>,

    capacity: Option<usize>,
}

impl History {
    /// Create an empty history; `None` means unbounded
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            tracks: VecDeque::new(),
            capacity,
        }
    }

    /// Record a track as the most recent entry
    pub fn push(&mut self, track: TrackRef) {
        if self.capacity == Some(0) {
            return;
        }
        self.tracks.push_front(track);
        self.trim();
    }

    /// Remove and return the most recent entry
    pub fn pop(&mut self) -> Option<TrackRef> {
        self.tracks.pop_front()
    }

    /// Most recent first
    pub fn iter(&self) -> impl Iterator<Item = &TrackRef> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Change the bound, discarding the oldest entries that no longer fit
    pub fn set_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
        self.trim();
    }

    fn trim(&mut self) {
        if let Some(capacity) = self.capacity {
            self.tracks.truncate(capacity);
        }
    }
}
