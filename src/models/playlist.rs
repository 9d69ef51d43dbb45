//! Playlist-related models.
//!
//! A liked playlist arrives without its tracks; they are attached later by
//! the exporter's enrichment step.

use serde::{Deserialize, Serialize};

use super::track::Track;
use super::user::User;

/// A user-curated playlist (or album/set), narrowed to the exported fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    /// Numeric playlist ID.
    pub id: u64,

    /// Type marker, always `"playlist"`.
    #[serde(default = "default_playlist_kind")]
    pub kind: String,

    /// Public playlist URL.
    pub permalink_url: String,

    /// Playlist title.
    pub title: String,

    /// Number of tracks the playlist declares.
    pub track_count: u32,

    /// Playlist owner.
    pub user: User,

    /// Hydrated tracks, present only after enrichment.
    ///
    /// Never read from the wire: upstream sends partial track stubs here.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

fn default_playlist_kind() -> String {
    "playlist".to_string()
}

impl Playlist {
    /// Attach the hydrated track list.
    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = Some(tracks);
        self
    }

    /// Number of hydrated tracks, if enriched.
    pub fn hydrated_count(&self) -> Option<usize> {
        self.tracks.as_ref().map(Vec::len)
    }

    /// Whether the hydrated list disagrees with the declared count.
    pub fn count_mismatch(&self) -> bool {
        self.hydrated_count()
            .is_some_and(|n| n != self.track_count as usize)
    }
}

/// Reference to a member track inside a playlist detail payload.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct TrackRef {
    /// Numeric track ID.
    pub id: u64,
}

/// The member ids of a playlist detail payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistMembers {
    /// Member tracks in playlist order.
    #[serde(default)]
    pub tracks: Vec<TrackRef>,
}

impl PlaylistMembers {
    /// Member ids in playlist order.
    pub fn ids(&self) -> Vec<u64> {
        self.tracks.iter().map(|t| t.id).collect()
    }
}
