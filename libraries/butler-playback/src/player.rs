//! Player core
//!
//! Owns the queue of track groups, the history and the playing flag, and
//! drives the backend through [`Track`](crate::Track) transport calls. Every
//! operation here takes `&mut self`; callers serialize access, normally by
//! running the player inside [`PlayerService`](crate::PlayerService).

use crate::config::PlayerConfig;
use crate::counter::ChangeCounter;
use crate::error::{PlayerError, Result, TrackError};
use crate::group::{Origin, TrackGroup};
use crate::history::History;
use crate::track::{same_track, TrackRef};
use crate::types::{PlayerState, Position};
use std::time::Duration;
use tracing::{debug, warn};

/// Single-listener playback controller
#[derive(Debug)]
pub struct Player {
    playing: bool,
    current_track: Option<TrackRef>,
    queue: Vec<TrackGroup>,
    history: History,
    counter: ChangeCounter,
    config: PlayerConfig,
}

impl Player {
    /// Create an idle player with an empty queue
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_counter(config, ChangeCounter::new())
    }

    /// Create a player that reports changes through an existing counter
    pub(crate) fn with_counter(config: PlayerConfig, counter: ChangeCounter) -> Self {
        Self {
            playing: false,
            current_track: None,
            queue: Vec::new(),
            history: History::new(config.history_size),
            counter,
            config,
        }
    }

    // ===== Queue mutation =====

    /// Enqueue tracks as one group, inferring its origin
    pub fn add(&mut self, position: Position, tracks: Vec<TrackRef>, shuffle: bool) -> Result<()> {
        let origin = Origin::infer(&tracks);
        self.add_with_origin(position, origin, tracks, shuffle)
    }

    /// Enqueue tracks as one group with a known origin
    pub fn add_with_origin(
        &mut self,
        position: Position,
        origin: Origin,
        tracks: Vec<TrackRef>,
        shuffle: bool,
    ) -> Result<()> {
        if tracks.is_empty() {
            return Err(PlayerError::InvalidPosition(
                "cannot enqueue an empty track list".to_string(),
            ));
        }

        let shuffle = shuffle.then_some(self.config.shuffle_mode);
        self.add_group(position, TrackGroup::new(origin, tracks, shuffle))
    }

    /// Insert a prebuilt group
    ///
    /// Resyncs only when the head of the lineup changes; otherwise the
    /// counter is still bumped and the prefetch target refreshed. A new head
    /// put at [`Position::Start`] always starts playing, even when paused.
    pub fn add_group(&mut self, position: Position, group: TrackGroup) -> Result<()> {
        if group.is_empty() {
            return Err(PlayerError::InvalidPosition(
                "cannot enqueue an empty group".to_string(),
            ));
        }

        let head = self.lineup().next().cloned();
        let upcoming = self.lineup().nth(1).cloned();

        self.insert_group(position, group)?;
        debug!(%position, groups = self.queue.len(), "group enqueued");

        if !same_track(self.lineup().next(), head.as_ref()) {
            if position == Position::Start {
                self.playing = true;
            }
            return self.sync();
        }

        if !same_track(self.lineup().nth(1), upcoming.as_ref()) {
            self.prefetch_upcoming();
        }
        self.counter.bump();
        Ok(())
    }

    fn insert_group(&mut self, position: Position, group: TrackGroup) -> Result<()> {
        match position {
            Position::Start => {
                if self.queue.is_empty() {
                    self.queue.push(group);
                } else {
                    self.queue[0] = group;
                }
            }
            Position::Next => {
                let index = self.queue.len().min(1);
                self.queue.insert(index, group);
            }
            Position::Later => {
                // The playing group is never displaced, so `later` can't
                // jump ahead of `next`
                let index = self
                    .queue
                    .iter()
                    .skip(1)
                    .position(|g| !g.origin().is_single_track())
                    .map_or(self.queue.len(), |offset| offset + 1);
                self.queue.insert(index, group);
            }
            Position::End => self.queue.push(group),
            Position::Index(offset) => self.insert_at_offset(offset, group)?,
        }
        Ok(())
    }

    /// Insert so the group's first track lands at lineup position `offset`
    fn insert_at_offset(&mut self, offset: usize, group: TrackGroup) -> Result<()> {
        let mut remaining = offset;
        for index in 0..self.queue.len() {
            let len = self.queue[index].len();
            if remaining == 0 {
                self.queue.insert(index, group);
                return Ok(());
            }
            if remaining < len {
                let tail = self.queue[index].split_off(remaining);
                self.queue.insert(index + 1, group);
                self.queue.insert(index + 2, tail);
                return Ok(());
            }
            remaining -= len;
        }

        if remaining == 0 {
            self.queue.push(group);
            Ok(())
        } else {
            Err(PlayerError::InvalidPosition(format!(
                "index {} is past the end of a lineup of {} tracks",
                offset,
                offset - remaining
            )))
        }
    }

    // ===== Navigation =====

    /// Move to the next track in the lineup
    ///
    /// The current track goes to history. With nothing queued this is a
    /// no-op that still resyncs and broadcasts.
    pub fn next_track(&mut self) -> Result<()> {
        self.remember_current();

        while let Some(group) = self.queue.first_mut() {
            let taken = group.next();
            let exhausted = group.is_empty();
            if exhausted {
                self.queue.remove(0);
            }
            if taken.is_some() {
                break;
            }
        }

        self.sync()
    }

    /// Go back to the most recent history entry
    ///
    /// The track is put back as its own group in front of the queue, not
    /// into the group it originally came from.
    pub fn prev_track(&mut self) -> Result<()> {
        if let Some(track) = self.history.pop() {
            self.queue.insert(0, TrackGroup::single(track));
        }
        self.sync()
    }

    /// Skip the rest of the group that is playing
    pub fn next_set(&mut self) -> Result<()> {
        self.remember_current();
        if !self.queue.is_empty() {
            self.queue.remove(0);
        }
        self.sync()
    }

    // ===== Transport =====

    /// Pause or resume, optionally seeking first
    ///
    /// Without a current track only the counter moves.
    pub fn play(&mut self, pause: bool, seek: Option<Duration>) -> Result<()> {
        let mut outcome = Ok(());

        if let Some(track) = self.current_track.clone() {
            self.playing = !pause;
            if let Some(position) = seek {
                record(&mut outcome, track.seek(position));
            }
            record(&mut outcome, track.play(self.playing));
            debug!(track = %track.metadata().id, playing = self.playing, ?seek, "transport updated");
        }

        self.counter.bump();
        outcome.map_err(PlayerError::from)
    }

    /// Reconcile the loaded track with the head of the lineup
    ///
    /// Bookkeeping always completes. Every transport step is attempted; the
    /// first failure is returned and later ones are logged.
    fn sync(&mut self) -> Result<()> {
        let desired = self.lineup().next().cloned();
        let mut outcome = Ok(());

        if !same_track(desired.as_ref(), self.current_track.as_ref()) {
            let previous = self.current_track.take();
            if let Some(track) = &previous {
                record(&mut outcome, track.play(false));
                record(&mut outcome, track.unload());
            }

            match &desired {
                Some(track) => {
                    let loaded = track.load();
                    let load_failed = loaded.is_err();
                    record(&mut outcome, loaded);

                    if self.playing || previous.is_none() {
                        self.playing = true;
                        if !load_failed {
                            record(&mut outcome, track.play(true));
                        }
                    }
                    debug!(track = %track.metadata().id, playing = self.playing, "current track changed");
                }
                None => {
                    self.playing = false;
                    debug!("lineup empty, playback stopped");
                }
            }
        }

        self.prefetch_upcoming();
        self.current_track = desired;
        self.counter.bump();

        outcome.map_err(PlayerError::from)
    }

    fn prefetch_upcoming(&self) {
        if let Some(track) = self.lineup().nth(1) {
            if let Err(err) = track.prefetch() {
                warn!(track = %track.metadata().id, error = %err, "prefetch failed");
            }
        }
    }

    fn remember_current(&mut self) {
        if let Some(track) = self.current_track.clone() {
            self.history.push(track);
        }
    }

    // ===== Configuration =====

    /// Rebound the history, dropping the oldest entries that no longer fit
    ///
    /// `None` lifts the bound.
    pub fn set_history_size(&mut self, history_size: Option<usize>) {
        self.history.set_capacity(history_size);
        self.config.history_size = history_size;
        debug!(?history_size, kept = self.history.len(), "history resized");
        self.counter.bump();
    }

    // ===== Queries =====

    /// Whether the current track is playing rather than paused
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Loaded track, always the head of the lineup
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.current_track.as_ref()
    }

    /// Queued groups; the first one holds the current track
    pub fn queue(&self) -> &[TrackGroup] {
        &self.queue
    }

    /// Previously played tracks, most recent first
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Queued tracks in play order; the first one is the current track
    pub fn lineup(&self) -> impl Iterator<Item = &TrackRef> {
        self.queue.iter().flat_map(|group| group.tracks())
    }

    /// Change counter value; moves once per operation
    pub fn version(&self) -> u64 {
        self.counter.value()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Snapshot of the player at the current version
    pub fn state(&self) -> PlayerState {
        PlayerState {
            playing: self.playing,
            current_track: self.current_track.as_ref().map(|t| t.metadata().clone()),
            history: self.history.iter().map(|t| t.metadata().clone()).collect(),
            queue: self.queue.iter().map(TrackGroup::snapshot).collect(),
            version: self.counter.value(),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

/// Keep the first transport failure, log the rest
fn record(
    outcome: &mut std::result::Result<(), TrackError>,
    result: std::result::Result<(), TrackError>,
) {
    if let Err(err) = result {
        warn!(error = %err, "transport call failed");
        if outcome.is_ok() {
            *outcome = Err(err);
        }
    }
}
