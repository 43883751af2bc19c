//! Player service
//!
//! One task owns the [`Player`]. Handles send it commands over a bounded
//! channel and get replies through oneshot channels, so every mutation runs
//! to completion before the next one starts. Backend callbacks arrive the
//! same way through a [`BackendNotifier`].
//!
//! Long polls wait on the change counter without going through the task, so
//! a waiting client never holds up a mutation.

use crate::config::PlayerConfig;
use crate::counter::ChangeCounter;
use crate::error::{PlayerError, Result};
use crate::group::Origin;
use crate::player::Player;
use crate::source::{Resolved, Source};
use crate::track::TrackRef;
use crate::types::{PlayerState, Position};
use std::fmt;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Asynchronous notifications from a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The current track finished playing
    EndOfTrack,
    ConnectionError(String),
    StreamingError(String),
    /// The account started playing somewhere else
    PlayTokenLost,
}

impl fmt::Display for BackendEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfTrack => f.write_str("end of track"),
            Self::ConnectionError(reason) => write!(f, "connection error: {}", reason),
            Self::StreamingError(reason) => write!(f, "streaming error: {}", reason),
            Self::PlayTokenLost => f.write_str("play token lost"),
        }
    }
}

type Reply<T> = oneshot::Sender<T>;

/// Commands processed by the player task
enum PlayerCommand {
    Add {
        position: Position,
        origin: Option<Origin>,
        tracks: Vec<TrackRef>,
        shuffle: bool,
        reply: Reply<Result<()>>,
    },
    NextTrack(Reply<Result<()>>),
    PrevTrack(Reply<Result<()>>),
    NextSet(Reply<Result<()>>),
    Play {
        pause: bool,
        seek: Option<Duration>,
        reply: Reply<Result<()>>,
    },
    SetHistorySize {
        history_size: Option<usize>,
        reply: Reply<()>,
    },
    State(Reply<PlayerState>),
}

/// Task that owns the player
pub struct PlayerService {
    player: Player,
    commands: mpsc::Receiver<PlayerCommand>,
    events: mpsc::UnboundedReceiver<BackendEvent>,
}

impl PlayerService {
    /// Build the service and a handle to it without starting it
    pub fn new(config: PlayerConfig) -> (PlayerHandle, Self) {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let counter = ChangeCounter::new();
        let handle = PlayerHandle {
            commands: command_tx,
            events: event_tx,
            counter: counter.clone(),
            config: config.clone(),
        };

        let service = Self {
            player: Player::with_counter(config, counter),
            commands: command_rx,
            events: event_rx,
        };

        (handle, service)
    }

    /// Validate the configuration and start the service on the current runtime
    pub fn spawn(config: PlayerConfig) -> Result<(PlayerHandle, JoinHandle<()>)> {
        config.validate()?;
        let (handle, service) = Self::new(config);
        Ok((handle, tokio::spawn(service.run())))
    }

    /// Process commands and backend events until every sender is gone
    pub async fn run(mut self) {
        info!(
            history_size = ?self.player.config().history_size,
            shuffle_mode = ?self.player.config().shuffle_mode,
            "player service started"
        );

        loop {
            tokio::select! {
                Some(command) = self.commands.recv() => self.process_command(command),
                Some(event) = self.events.recv() => self.process_event(event),
                else => break,
            }
        }

        info!("player service stopped");
    }

    fn process_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Add {
                position,
                origin,
                tracks,
                shuffle,
                reply,
            } => {
                let result = match origin {
                    Some(origin) => self.player.add_with_origin(position, origin, tracks, shuffle),
                    None => self.player.add(position, tracks, shuffle),
                };
                let _ = reply.send(result);
            }
            PlayerCommand::NextTrack(reply) => {
                let _ = reply.send(self.player.next_track());
            }
            PlayerCommand::PrevTrack(reply) => {
                let _ = reply.send(self.player.prev_track());
            }
            PlayerCommand::NextSet(reply) => {
                let _ = reply.send(self.player.next_set());
            }
            PlayerCommand::Play { pause, seek, reply } => {
                let _ = reply.send(self.player.play(pause, seek));
            }
            PlayerCommand::SetHistorySize {
                history_size,
                reply,
            } => {
                self.player.set_history_size(history_size);
                let _ = reply.send(());
            }
            PlayerCommand::State(reply) => {
                let _ = reply.send(self.player.state());
            }
        }
    }

    fn process_event(&mut self, event: BackendEvent) {
        let result = match &event {
            BackendEvent::EndOfTrack => {
                debug!("end of track, advancing");
                self.player.next_track()
            }
            BackendEvent::ConnectionError(_)
            | BackendEvent::StreamingError(_)
            | BackendEvent::PlayTokenLost => {
                warn!(%event, "backend interrupted playback, pausing");
                self.player.play(true, None)
            }
        };

        if let Err(err) = result {
            warn!(%event, error = %err, "handling backend event failed");
        }
    }
}

/// Cloneable front door to a running [`PlayerService`]
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<PlayerCommand>,
    events: mpsc::UnboundedSender<BackendEvent>,
    counter: ChangeCounter,
    config: PlayerConfig,
}

impl PlayerHandle {
    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> PlayerCommand) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| PlayerError::ServiceClosed)?;
        response.await.map_err(|_| PlayerError::ServiceClosed)
    }

    /// Enqueue already-resolved tracks as one group
    pub async fn add(&self, position: Position, tracks: Vec<TrackRef>, shuffle: bool) -> Result<()> {
        self.request(|reply| PlayerCommand::Add {
            position,
            origin: None,
            tracks,
            shuffle,
            reply,
        })
        .await?
    }

    /// Resolve a query through `source`, then enqueue the result
    ///
    /// Resolution happens on the caller's task; only the final insert goes
    /// through the player.
    pub async fn enqueue(
        &self,
        source: &dyn Source,
        query: &str,
        position: Position,
        shuffle: bool,
    ) -> Result<()> {
        let Resolved { origin, tracks } = source.resolve(query).await?;
        debug!(source = source.name(), query, tracks = tracks.len(), "query resolved");

        self.request(|reply| PlayerCommand::Add {
            position,
            origin: Some(origin),
            tracks,
            shuffle,
            reply,
        })
        .await?
    }

    pub async fn next_track(&self) -> Result<()> {
        self.request(PlayerCommand::NextTrack).await?
    }

    pub async fn prev_track(&self) -> Result<()> {
        self.request(PlayerCommand::PrevTrack).await?
    }

    pub async fn next_set(&self) -> Result<()> {
        self.request(PlayerCommand::NextSet).await?
    }

    pub async fn play(&self, pause: bool, seek: Option<Duration>) -> Result<()> {
        self.request(|reply| PlayerCommand::Play { pause, seek, reply })
            .await?
    }

    /// Seek to the start of the current track and resume
    pub async fn restart_track(&self) -> Result<()> {
        self.play(false, Some(Duration::ZERO)).await
    }

    /// Rebound the history, for example after a config reload
    pub async fn set_history_size(&self, history_size: Option<usize>) -> Result<()> {
        self.request(|reply| PlayerCommand::SetHistorySize {
            history_size,
            reply,
        })
        .await
    }

    /// Long-poll for state newer than `known`
    ///
    /// With no `known` version the current state comes back immediately.
    /// The wait is bounded by `timeout`, capped by the configured
    /// `max_wait_ms`; running out yields [`PlayerError::WaitTimeout`].
    pub async fn state(&self, known: Option<u64>, timeout: Option<Duration>) -> Result<PlayerState> {
        let timeout = self.config.effective_wait(timeout);
        if let Err(err) = self.counter.wait(known, timeout).await {
            if err.is_timeout() {
                debug!(?known, "state wait timed out");
            }
            return Err(err);
        }

        self.request(PlayerCommand::State).await
    }

    pub fn version(&self) -> u64 {
        self.counter.value()
    }

    /// Notifier for backend callbacks
    pub fn notifier(&self) -> BackendNotifier {
        BackendNotifier {
            events: self.events.clone(),
        }
    }
}

/// Posts backend events to the player task
///
/// `notify` never blocks, so it can be called from backend threads that are
/// not running on the tokio runtime.
#[derive(Debug, Clone)]
pub struct BackendNotifier {
    events: mpsc::UnboundedSender<BackendEvent>,
}

impl BackendNotifier {
    pub fn notify(&self, event: BackendEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| PlayerError::ServiceClosed)
    }
}
