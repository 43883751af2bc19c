//! Butler - Playback Engine
//!
//! Queue, history and state broadcasting for a single-listener media player.
//!
//! This crate provides:
//! - A queue of track groups (single tracks, albums, artists, playlists)
//! - Five insertion modes: start, next, later, end and a lineup index
//! - Optional shuffling of a group when it is enqueued (Random + Smart)
//! - Bounded, most-recent-first playback history
//! - A version counter with long-poll waits for state changes
//! - A single-owner service task that serializes every mutation
//!
//! # Architecture
//!
//! `butler-playback` never touches audio. Backends hand it [`Track`]s and the
//! player tells them what to load, play, pause, seek, prefetch and release.
//! Lookups go through a [`Source`], which runs before anything reaches the
//! player.
//!
//! # Example: Driving the player directly
//!
//! ```rust
//! use butler_playback::{Metadata, Player, Position, Track, TrackError, TrackRef};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Silent(Metadata);
//!
//! impl Track for Silent {
//!     fn metadata(&self) -> &Metadata { &self.0 }
//!     fn load(&self) -> Result<(), TrackError> { Ok(()) }
//!     fn unload(&self) -> Result<(), TrackError> { Ok(()) }
//!     fn play(&self, _play: bool) -> Result<(), TrackError> { Ok(()) }
//!     fn seek(&self, _position: Duration) -> Result<(), TrackError> { Ok(()) }
//! }
//!
//! let track = |id: &str| -> TrackRef {
//!     Arc::new(Silent(Metadata {
//!         id: id.to_string(),
//!         name: format!("Song {}", id),
//!         artist: "Artist".to_string(),
//!         duration: Duration::from_secs(200),
//!         url: format!("silent:{}", id),
//!         artwork_url: None,
//!         backend: "silent".to_string(),
//!     }))
//! };
//!
//! let mut player = Player::default();
//! player.add(Position::End, vec![track("a"), track("b")], false).unwrap();
//! assert!(player.is_playing());
//!
//! player.next_track().unwrap();
//! assert_eq!(player.state().current_track.unwrap().id, "b");
//! ```
//!
//! # Example: Long polling through the service
//!
//! ```rust,no_run
//! use butler_playback::{PlayerConfig, PlayerService};
//! use std::time::Duration;
//!
//! # async fn example() -> butler_playback::Result<()> {
//! let (player, _task) = PlayerService::spawn(PlayerConfig::default())?;
//!
//! let state = player.state(None, None).await?;
//! // Blocks until something changes or 30 seconds pass
//! match player.state(Some(state.version), Some(Duration::from_secs(30))).await {
//!     Ok(newer) => println!("now at version {}", newer.version),
//!     Err(err) if err.is_timeout() => println!("nothing changed"),
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod counter;
mod error;
mod group;
mod history;
mod player;
mod service;
mod shuffle;
mod source;
mod track;
mod types;

pub use crate::config::PlayerConfig;
pub use counter::ChangeCounter;
pub use error::{PlayerError, Result, TrackError};
pub use group::{Origin, TrackGroup};
pub use history::History;
pub use player::Player;
pub use service::{BackendEvent, BackendNotifier, PlayerHandle, PlayerService};
pub use source::{Resolved, Source};
pub use track::{same_track, Metadata, Track, TrackRef};
pub use types::{GroupState, PlayerState, Position, ShuffleMode};
