//! Track capability
//!
//! Backends hand the engine playable tracks through the [`Track`] trait.
//! The engine never decodes audio; it only tells the backend which track to
//! load, play, pause, seek, prefetch and release.

use crate::error::TrackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Descriptive, immutable track information
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub duration: Duration,
    pub url: String,
    #[serde(default)]
    pub artwork_url: Option<String>,
    /// Name of the backend that produced this track
    pub backend: String,
}

/// A playable unit owned by a backend
///
/// All transport operations are synchronous and must not block on network
/// I/O; backends that need to fetch data do it ahead of time or in their
/// own threads. Failures are reported as [`TrackError`] and never retried
/// by the engine.
pub trait Track: Send + Sync + fmt::Debug {
    fn metadata(&self) -> &Metadata;

    /// Make this the backend's active track
    fn load(&self) -> Result<(), TrackError>;

    /// Release the backend's hold on this track
    fn unload(&self) -> Result<(), TrackError>;

    /// Hint that this track plays next
    ///
    /// Backends without buffering support can rely on the default no-op.
    fn prefetch(&self) -> Result<(), TrackError> {
        Ok(())
    }

    /// Start (`true`) or pause (`false`) output of a loaded track
    fn play(&self, play: bool) -> Result<(), TrackError>;

    /// Seek to an absolute offset
    fn seek(&self, position: Duration) -> Result<(), TrackError>;
}

/// Shared handle to a backend track
///
/// Two handles refer to the same track only if they point at the same
/// allocation; see [`same_track`].
pub type TrackRef = Arc<dyn Track>;

/// Identity comparison for optional track handles
pub fn same_track(a: Option<&TrackRef>, b: Option<&TrackRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Track with no backend behind it
    #[derive(Debug)]
    pub struct DummyTrack {
        metadata: Metadata,
    }

    impl DummyTrack {
        pub fn new(id: &str, artist: &str) -> TrackRef {
            Arc::new(Self {
                metadata: Metadata {
                    id: id.to_string(),
                    name: format!("Track {}", id),
                    artist: artist.to_string(),
                    duration: Duration::from_secs(180),
                    url: format!("dummy:track:{}", id),
                    artwork_url: None,
                    backend: "dummy".to_string(),
                },
            })
        }
    }

    impl Track for DummyTrack {
        fn metadata(&self) -> &Metadata {
            &self.metadata
        }

        fn load(&self) -> Result<(), TrackError> {
            Ok(())
        }

        fn unload(&self) -> Result<(), TrackError> {
            Ok(())
        }

        fn play(&self, _play: bool) -> Result<(), TrackError> {
            Ok(())
        }

        fn seek(&self, _position: Duration) -> Result<(), TrackError> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::DummyTrack;
    use super::*;

    #[test]
    fn identity_not_equality() {
        let a = DummyTrack::new("1", "Artist");
        let b = DummyTrack::new("1", "Artist");

        assert_eq!(a.metadata(), b.metadata());
        assert!(!same_track(Some(&a), Some(&b)));
        assert!(same_track(Some(&a), Some(&Arc::clone(&a))));
        assert!(same_track(None, None));
        assert!(!same_track(Some(&a), None));
    }

    #[test]
    fn metadata_serializes_without_artwork() {
        let json = r#"{"id":"1","name":"n","artist":"a","duration":{"secs":1,"nanos":0},"url":"u","backend":"b"}"#;
        let metadata: Metadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.artwork_url, None);
        assert_eq!(metadata.duration, Duration::from_secs(1));
    }
}
