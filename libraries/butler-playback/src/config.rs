//! Player configuration

use crate::error::{PlayerError, Result};
use crate::types::ShuffleMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// How many past tracks to keep; unbounded when unset
    #[serde(default)]
    pub history_size: Option<usize>,

    /// Algorithm used when an enqueue asks for shuffling
    #[serde(default)]
    pub shuffle_mode: ShuffleMode,

    /// Commands the player task buffers before senders wait
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,

    /// Upper bound on any long-poll wait, in milliseconds
    #[serde(default)]
    pub max_wait_ms: Option<u64>,
}

impl PlayerConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Environment variables use the `BUTLER_` prefix, e.g.
    /// `BUTLER_HISTORY_SIZE=50` or `BUTLER_SHUFFLE_MODE=smart`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = ::config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlayerError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(::config::File::from(path));
        }

        settings = settings.add_source(
            ::config::Environment::with_prefix("BUTLER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.command_buffer == 0 {
            return Err(PlayerError::Config(
                "command_buffer must be greater than zero".to_string(),
            ));
        }

        if self.max_wait_ms == Some(0) {
            return Err(PlayerError::Config(
                "max_wait_ms must be greater than zero when set".to_string(),
            ));
        }

        Ok(())
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_ms.map(Duration::from_millis)
    }

    /// Timeout for one long poll: the caller's, capped by `max_wait_ms`
    pub fn effective_wait(&self, requested: Option<Duration>) -> Option<Duration> {
        match (requested, self.max_wait()) {
            (Some(requested), Some(cap)) => Some(requested.min(cap)),
            (requested, cap) => requested.or(cap),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            history_size: None,
            shuffle_mode: ShuffleMode::default(),
            command_buffer: default_command_buffer(),
            max_wait_ms: None,
        }
    }
}

fn default_command_buffer() -> usize {
    32
}
