//! Like and likes-page models.
//!
//! Upstream marks a like as a track or playlist like only by which of the
//! `track`/`playlist` fields is present. [`Like`] makes that an explicit
//! sum type while keeping the wire shape on serialization.

use serde::{Deserialize, Serialize};

use super::playlist::Playlist;
use super::track::Track;

/// A liked track.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrackLike {
    /// When the like was made, as sent by upstream.
    pub created_at: String,
    /// Type marker, always `"like"`.
    pub kind: String,
    /// The liked track.
    pub track: Track,
}

/// A liked playlist.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlaylistLike {
    /// When the like was made, as sent by upstream.
    pub created_at: String,
    /// Type marker, always `"like"`.
    pub kind: String,
    /// The liked playlist.
    pub playlist: Playlist,
}

/// One entry of a user's likes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged, try_from = "RawLike")]
pub enum Like {
    Track(TrackLike),
    Playlist(PlaylistLike),
}

/// Wire form of a like, before the variant is chosen.
#[derive(Deserialize)]
struct RawLike {
    created_at: String,
    #[serde(default = "default_like_kind")]
    kind: String,
    #[serde(default)]
    track: Option<Track>,
    #[serde(default)]
    playlist: Option<Playlist>,
}

fn default_like_kind() -> String {
    "like".to_string()
}

impl TryFrom<RawLike> for Like {
    type Error = String;

    fn try_from(raw: RawLike) -> std::result::Result<Self, Self::Error> {
        match (raw.track, raw.playlist) {
            (Some(track), None) => Ok(Like::Track(TrackLike {
                created_at: raw.created_at,
                kind: raw.kind,
                track,
            })),
            (None, Some(playlist)) => Ok(Like::Playlist(PlaylistLike {
                created_at: raw.created_at,
                kind: raw.kind,
                playlist,
            })),
            (Some(_), Some(_)) => Err("like carries both a track and a playlist".to_string()),
            (None, None) => Err("like carries neither a track nor a playlist".to_string()),
        }
    }
}

impl Like {
    /// Human-readable title of the liked item.
    pub fn title(&self) -> &str {
        match self {
            Like::Track(like) => &like.track.title,
            Like::Playlist(like) => &like.playlist.title,
        }
    }

    /// The liked playlist, if this is a playlist like.
    pub fn playlist(&self) -> Option<&Playlist> {
        match self {
            Like::Playlist(like) => Some(&like.playlist),
            Like::Track(_) => None,
        }
    }
}

/// One step of the cursor-paginated likes collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    /// Likes on this page in server order.
    pub collection: Vec<Like>,

    /// Absolute URL of the next page, `None` on the last page.
    #[serde(default)]
    pub next_href: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> serde_json::Value {
        json!({
            "id": 1,
            "kind": "user",
            "permalink_url": "https://soundcloud.com/a",
            "username": "a",
            "verified": false
        })
    }

    #[test]
    fn test_track_like_round_trips_wire_shape() {
        let raw = json!({
            "created_at": "2024-02-01T10:00:00Z",
            "kind": "like",
            "track": {
                "id": 5,
                "kind": "track",
                "permalink_url": "https://soundcloud.com/a/t",
                "title": "T",
                "genre": "House",
                "user": user()
            }
        });
        let like: Like = serde_json::from_value(raw).unwrap();
        assert!(matches!(like, Like::Track(_)));
        assert_eq!(like.title(), "T");

        let back = serde_json::to_value(&like).unwrap();
        assert_eq!(back["created_at"], "2024-02-01T10:00:00Z");
        assert_eq!(back["kind"], "like");
        assert!(back.get("playlist").is_none());
        assert!(back["track"].get("genre").is_none());
        assert!(back["track"]["user"].get("verified").is_none());
    }

    #[test]
    fn test_playlist_like_selected_by_field() {
        let raw = json!({
            "created_at": "2024-02-01T10:00:00Z",
            "kind": "like",
            "playlist": {
                "id": 9,
                "kind": "playlist",
                "permalink_url": "https://soundcloud.com/a/sets/p",
                "title": "P",
                "track_count": 3,
                "user": user()
            }
        });
        let like: Like = serde_json::from_value(raw).unwrap();
        assert_eq!(like.playlist().map(|p| p.id), Some(9));
    }

    #[test]
    fn test_like_without_item_is_rejected() {
        let raw = json!({ "created_at": "2024-02-01T10:00:00Z", "kind": "like" });
        assert!(serde_json::from_value::<Like>(raw).is_err());
    }

    #[test]
    fn test_page_end_of_stream() {
        let page: Page = serde_json::from_value(json!({
            "collection": [],
            "next_href": null,
            "query_urn": null
        }))
        .unwrap();
        assert!(page.collection.is_empty());
        assert!(page.next_href.is_none());
    }
}
