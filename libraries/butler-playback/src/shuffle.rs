//! Shuffle algorithms for enqueued groups
//!
//! A group is shuffled once, when it is built, using every track it will
//! ever hold.

use crate::track::TrackRef;
use crate::types::ShuffleMode;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::HashMap;

/// Shuffle tracks in place with the given algorithm
pub fn shuffle_tracks(tracks: &mut [TrackRef], mode: ShuffleMode) {
    match mode {
        ShuffleMode::Random => shuffle_random(tracks),
        ShuffleMode::Smart => shuffle_smart(tracks),
    }
}

/// Fisher-Yates over the whole slice
fn shuffle_random(tracks: &mut [TrackRef]) {
    tracks.shuffle(&mut thread_rng());
}

/// Artist-aware shuffle
///
/// Tracks are bucketed by artist and shuffled within each bucket. The
/// buckets are then visited round-robin in random order, so one artist only
/// repeats back to back once the others have run out.
fn shuffle_smart(tracks: &mut [TrackRef]) {
    if tracks.len() <= 2 {
        shuffle_random(tracks);
        return;
    }

    let mut rng = thread_rng();

    let mut by_artist: HashMap<&str, Vec<TrackRef>> = HashMap::new();
    for track in tracks.iter() {
        by_artist
            .entry(track.metadata().artist.as_str())
            .or_default()
            .push(TrackRef::clone(track));
    }

    let mut buckets: Vec<std::vec::IntoIter<TrackRef>> = by_artist
        .into_values()
        .map(|mut bucket| {
            bucket.shuffle(&mut rng);
            bucket.into_iter()
        })
        .collect();
    buckets.shuffle(&mut rng);

    let mut result = Vec::with_capacity(tracks.len());
    while result.len() < tracks.len() {
        for bucket in &mut buckets {
            if let Some(track) = bucket.next() {
                result.push(track);
            }
        }
    }

    for (slot, track) in tracks.iter_mut().zip(result) {
        *slot = track;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::testing::DummyTrack;
    use std::collections::HashSet;

    fn ids(tracks: &[TrackRef]) -> HashSet<String> {
        tracks.iter().map(|t| t.metadata().id.clone()).collect()
    }

    #[test]
    fn random_shuffle_preserves_tracks() {
        let original: Vec<TrackRef> = (0..20)
            .map(|i| DummyTrack::new(&i.to_string(), "Artist"))
            .collect();
        let mut tracks = original.clone();

        shuffle_tracks(&mut tracks, ShuffleMode::Random);

        assert_eq!(tracks.len(), original.len());
        assert_eq!(ids(&tracks), ids(&original));
    }

    #[test]
    fn smart_shuffle_preserves_tracks() {
        let original: Vec<TrackRef> = (0..12)
            .map(|i| DummyTrack::new(&i.to_string(), &format!("Artist {}", i % 4)))
            .collect();
        let mut tracks = original.clone();

        shuffle_tracks(&mut tracks, ShuffleMode::Smart);

        assert_eq!(tracks.len(), original.len());
        assert_eq!(ids(&tracks), ids(&original));
    }

    #[test]
    fn smart_shuffle_separates_balanced_artists() {
        // Three artists with equal counts interleave perfectly
        let mut tracks: Vec<TrackRef> = (0..9)
            .map(|i| DummyTrack::new(&i.to_string(), &format!("Artist {}", i % 3)))
            .collect();

        shuffle_tracks(&mut tracks, ShuffleMode::Smart);

        for pair in tracks.windows(2) {
            assert_ne!(pair[0].metadata().artist, pair[1].metadata().artist);
        }
    }

    #[test]
    fn shuffle_small_inputs() {
        let mut empty: Vec<TrackRef> = Vec::new();
        shuffle_tracks(&mut empty, ShuffleMode::Smart);
        assert!(empty.is_empty());

        let mut one = vec![DummyTrack::new("1", "Artist")];
        shuffle_tracks(&mut one, ShuffleMode::Smart);
        assert_eq!(one[0].metadata().id, "1");
    }
}
