//! User model.

use serde::{Deserialize, Serialize};

/// A SoundCloud account, narrowed to the fields the export keeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Numeric user ID.
    pub id: u64,

    /// Type marker, always `"user"`.
    #[serde(default = "default_user_kind")]
    pub kind: String,

    /// Public profile URL.
    pub permalink_url: String,

    /// Display name.
    pub username: String,
}

fn default_user_kind() -> String {
    "user".to_string()
}

impl User {
    /// Create a new user.
    pub fn new<S1: Into<String>, S2: Into<String>>(id: u64, username: S1, permalink_url: S2) -> Self {
        Self {
            id,
            kind: default_user_kind(),
            permalink_url: permalink_url.into(),
            username: username.into(),
        }
    }
}

/// One page of a user search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearch {
    /// Matching users in relevance order.
    pub collection: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_drops_unknown_fields() {
        let raw = json!({
            "id": 42,
            "kind": "user",
            "permalink_url": "https://soundcloud.com/someone",
            "username": "someone",
            "avatar_url": "https://i1.sndcdn.com/avatars-000.jpg",
            "followers_count": 1000
        });
        let user: User = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(
            back,
            json!({
                "id": 42,
                "kind": "user",
                "permalink_url": "https://soundcloud.com/someone",
                "username": "someone"
            })
        );
    }
}
