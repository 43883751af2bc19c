//! Source capability
//!
//! A source turns a URI or free-form query into tracks the player can
//! enqueue. Resolution may hit the network, so it runs on the caller's task
//! and never inside the player.

use crate::error::Result;
use crate::group::Origin;
use crate::track::TrackRef;
use async_trait::async_trait;

/// What a query resolved to
#[derive(Debug, Clone)]
pub struct Resolved {
    pub origin: Origin,
    pub tracks: Vec<TrackRef>,
}

impl Resolved {
    pub fn new(origin: Origin, tracks: Vec<TrackRef>) -> Self {
        Self { origin, tracks }
    }

    /// A lone track, labelled with its own metadata
    pub fn single(track: TrackRef) -> Self {
        Self {
            origin: Origin::Track(track.metadata().clone()),
            tracks: vec![track],
        }
    }
}

/// Backend that can look tracks up
#[async_trait]
pub trait Source: Send + Sync {
    /// Backend name, matching [`Metadata::backend`](crate::Metadata::backend)
    fn name(&self) -> &str;

    /// Resolve a URI (track, album, artist or playlist link) or a search query
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Source`](crate::PlayerError::Source) when the
    /// query matches nothing or the backend cannot be reached.
    async fn resolve(&self, query: &str) -> Result<Resolved>;
}
