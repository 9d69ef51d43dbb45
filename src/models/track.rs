//! Track model.

use serde::{Deserialize, Serialize};

use super::user::User;

/// A single track, narrowed to the fields the export keeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    /// Numeric track ID.
    pub id: u64,

    /// Type marker, always `"track"`.
    #[serde(default = "default_track_kind")]
    pub kind: String,

    /// Public track URL.
    pub permalink_url: String,

    /// Track title.
    pub title: String,

    /// Uploader.
    pub user: User,
}

fn default_track_kind() -> String {
    "track".to_string()
}

impl Track {
    /// Create a new track.
    pub fn new<S1: Into<String>, S2: Into<String>>(
        id: u64,
        title: S1,
        permalink_url: S2,
        user: User,
    ) -> Self {
        Self {
            id,
            kind: default_track_kind(),
            permalink_url: permalink_url.into(),
            title: title.into(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_projection_keeps_values() {
        let raw = json!({
            "id": 7,
            "kind": "track",
            "permalink_url": "https://soundcloud.com/a/b",
            "title": "B",
            "duration": 180000,
            "waveform_url": "https://wave.sndcdn.com/x.json",
            "user": {
                "id": 1,
                "kind": "user",
                "permalink_url": "https://soundcloud.com/a",
                "username": "a",
                "city": "Berlin"
            }
        });
        let track: Track = serde_json::from_value(raw).unwrap();
        assert_eq!(
            track,
            Track::new(
                7,
                "B",
                "https://soundcloud.com/a/b",
                User::new(1, "a", "https://soundcloud.com/a")
            )
        );
        let back = serde_json::to_value(&track).unwrap();
        assert!(back.get("duration").is_none());
        assert!(back["user"].get("city").is_none());
    }
}
