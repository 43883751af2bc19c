//! Shared test backend
//!
//! Tracks record every transport call into one journal shared by the whole
//! backend, so tests can assert on call order across tracks.

#![allow(dead_code)]

use async_trait::async_trait;
use butler_playback::{
    Metadata, Origin, Player, PlayerError, Resolved, Source, Track, TrackError, TrackRef,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Load,
    Unload,
    Prefetch,
    Play,
    Seek,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(String),
    Unload(String),
    Prefetch(String),
    Play(String, bool),
    Seek(String, Duration),
}

#[derive(Debug)]
pub struct MockTrack {
    metadata: Metadata,
    journal: Arc<Mutex<Vec<Call>>>,
    failing: Vec<Op>,
}

impl MockTrack {
    fn attempt(&self, op: Op, call: Call) -> Result<(), TrackError> {
        self.journal.lock().unwrap().push(call);
        if !self.failing.contains(&op) {
            return Ok(());
        }

        let reason = format!("{} rejected {:?}", self.metadata.id, op);
        Err(match op {
            Op::Load => TrackError::Load(reason),
            Op::Unload => TrackError::Unload(reason),
            Op::Prefetch => TrackError::Prefetch(reason),
            Op::Play => TrackError::Play(reason),
            Op::Seek => TrackError::Seek(reason),
        })
    }
}

impl Track for MockTrack {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn load(&self) -> Result<(), TrackError> {
        self.attempt(Op::Load, Call::Load(self.metadata.id.clone()))
    }

    fn unload(&self) -> Result<(), TrackError> {
        self.attempt(Op::Unload, Call::Unload(self.metadata.id.clone()))
    }

    fn prefetch(&self) -> Result<(), TrackError> {
        self.attempt(Op::Prefetch, Call::Prefetch(self.metadata.id.clone()))
    }

    fn play(&self, play: bool) -> Result<(), TrackError> {
        self.attempt(Op::Play, Call::Play(self.metadata.id.clone(), play))
    }

    fn seek(&self, position: Duration) -> Result<(), TrackError> {
        self.attempt(Op::Seek, Call::Seek(self.metadata.id.clone(), position))
    }
}

/// Factory for mock tracks sharing one call journal
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    journal: Arc<Mutex<Vec<Call>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, id: &str) -> TrackRef {
        self.build(id, "Test Artist", Vec::new())
    }

    pub fn track_by(&self, id: &str, artist: &str) -> TrackRef {
        self.build(id, artist, Vec::new())
    }

    /// Track whose listed operations fail (the call is still recorded)
    pub fn failing_track(&self, id: &str, failing: &[Op]) -> TrackRef {
        self.build(id, "Test Artist", failing.to_vec())
    }

    pub fn tracks(&self, ids: &[&str]) -> Vec<TrackRef> {
        ids.iter().map(|id| self.track(id)).collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.lock().unwrap().clone()
    }

    /// Return and clear the journal
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.journal.lock().unwrap())
    }

    fn build(&self, id: &str, artist: &str, failing: Vec<Op>) -> TrackRef {
        Arc::new(MockTrack {
            metadata: metadata(id, artist),
            journal: Arc::clone(&self.journal),
            failing,
        })
    }
}

pub fn metadata(id: &str, artist: &str) -> Metadata {
    Metadata {
        id: id.to_string(),
        name: format!("Track {}", id),
        artist: artist.to_string(),
        duration: Duration::from_secs(180),
        url: format!("mock:track:{}", id),
        artwork_url: None,
        backend: "mock".to_string(),
    }
}

/// Source answering from a fixed table of queries
#[derive(Debug, Default)]
pub struct MockSource {
    results: HashMap<String, Resolved>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, resolved: Resolved) -> Self {
        self.results.insert(query.to_string(), resolved);
        self
    }

    pub fn album(backend: &MockBackend, id: &str, track_ids: &[&str]) -> Resolved {
        Resolved::new(
            Origin::Album(metadata(id, "Test Artist")),
            backend.tracks(track_ids),
        )
    }

    pub fn track(backend: &MockBackend, id: &str) -> Resolved {
        Resolved::single(backend.track(id))
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, query: &str) -> butler_playback::Result<Resolved> {
        self.results
            .get(query)
            .cloned()
            .ok_or_else(|| PlayerError::Source(format!("nothing found for '{}'", query)))
    }
}

// ===== Assertion helpers =====

pub fn lineup_ids(player: &Player) -> Vec<String> {
    player.lineup().map(|t| t.metadata().id.clone()).collect()
}

pub fn history_ids(player: &Player) -> Vec<String> {
    player
        .history()
        .iter()
        .map(|t| t.metadata().id.clone())
        .collect()
}

pub fn current_id(player: &Player) -> Option<String> {
    player.current_track().map(|t| t.metadata().id.clone())
}

/// Track ids per queued group
pub fn group_ids(player: &Player) -> Vec<Vec<String>> {
    player
        .queue()
        .iter()
        .map(|g| g.tracks().map(|t| t.metadata().id.clone()).collect())
        .collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
