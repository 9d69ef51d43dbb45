//! SoundCloud JSON API client.
//!
//! All endpoints authenticate with a `client_id` query parameter and every
//! response is schema-checked before it is narrowed into a model.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{LikesError, Result};
use crate::models::{Page, Playlist, PlaylistMembers, Track, User, UserSearch};
use crate::schema::{narrow, Schema, SchemaValidator};

/// Base URL for the versioned JSON API.
pub const API_BASE_URL: &str = "https://api-v2.soundcloud.com";

/// Base URL for the public website.
pub const WEB_BASE_URL: &str = "https://soundcloud.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Connection settings for [`SoundCloudApi`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// JSON API base, without trailing slash.
    pub api_base: String,
    /// Website base, without trailing slash.
    pub web_base: String,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: API_BASE_URL.to_string(),
            web_base: WEB_BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientOptions {
    /// Options pointing both bases at one host (useful against a mock server).
    pub fn with_base<S: Into<String>>(base: S) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            api_base: base.clone(),
            web_base: base,
            ..Default::default()
        }
    }
}

/// SoundCloud API client.
///
/// Cheap to clone: the HTTP client and the schema validator are shared.
#[derive(Debug, Clone)]
pub struct SoundCloudApi {
    pub(crate) client: Client,
    pub(crate) options: ClientOptions,
    validator: Arc<SchemaValidator>,
}

impl SoundCloudApi {
    /// Create a new client.
    pub fn new(options: ClientOptions, validator: Arc<SchemaValidator>) -> Result<Self> {
        let client = Client::builder().user_agent(&options.user_agent).build()?;

        Ok(Self {
            client,
            options,
            validator,
        })
    }

    /// Turn a non-2xx response into an [`LikesError::Http`].
    pub(crate) fn check_status(response: Response, url: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(LikesError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            url: url.to_string(),
        })
    }

    /// GET a JSON document with the client id attached.
    ///
    /// `url` is reported in errors as given, without the client id.
    async fn get_json(&self, url: &str, client_id: &str, params: &[(&str, &str)]) -> Result<Value> {
        debug!("GET {} with params: {:?}", url, params);

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("client_id", client_id)])
            .send()
            .await?;
        let response = Self::check_status(response, url)?;

        Ok(response.json().await?)
    }

    /// URL of the first likes page for a user.
    pub fn likes_url(&self, user_id: &str, limit: u32) -> String {
        format!(
            "{}/users/{}/likes?limit={}",
            self.options.api_base, user_id, limit
        )
    }

    /// Fetch and validate one likes page.
    pub async fn likes_page(&self, url: &str, client_id: &str) -> Result<Page> {
        let payload = self.get_json(url, client_id, &[]).await?;
        let page: Page = self.validator.validate(Schema::Likes, payload)?;

        info!(
            "Fetched likes page with {} items (more: {})",
            page.collection.len(),
            page.next_href.is_some()
        );
        Ok(page)
    }

    /// Fetch a playlist and its member track ids.
    pub async fn playlist(&self, playlist_id: u64, client_id: &str) -> Result<(Playlist, Vec<u64>)> {
        let url = format!("{}/playlists/{}", self.options.api_base, playlist_id);
        let payload = self.get_json(&url, client_id, &[]).await?;

        self.validator.check(Schema::Playlist, &payload)?;
        let members: PlaylistMembers = narrow(payload.clone())?;
        let playlist: Playlist = narrow(payload)?;

        Ok((playlist, members.ids()))
    }

    /// Batch-fetch full tracks by id, in the order the ids were given.
    ///
    /// An empty id list returns immediately without a request. Ids the API
    /// does not return (deleted or private tracks) are left out.
    pub async fn tracks(&self, ids: &[u64], client_id: &str) -> Result<Vec<Track>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/tracks", self.options.api_base);
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let payload = self.get_json(&url, client_id, &[("ids", &joined)]).await?;
        let fetched: Vec<Track> = self.validator.validate(Schema::Tracks, payload)?;

        let by_id: HashMap<u64, Track> = fetched.into_iter().map(|t| (t.id, t)).collect();
        let tracks: Vec<Track> = ids.iter().filter_map(|id| by_id.get(id).cloned()).collect();

        debug!("Hydrated {}/{} tracks", tracks.len(), ids.len());
        Ok(tracks)
    }

    /// Search users by free text.
    pub async fn search_users(&self, query: &str, client_id: &str, limit: u32) -> Result<Vec<User>> {
        let url = format!("{}/search/users", self.options.api_base);
        let payload = self
            .get_json(&url, client_id, &[("q", query), ("limit", &limit.to_string())])
            .await?;

        let result: UserSearch = self.validator.validate(Schema::UserSearch, payload)?;
        Ok(result.collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn api(server: &mockito::Server) -> SoundCloudApi {
        let validator = Arc::new(SchemaValidator::new().unwrap());
        SoundCloudApi::new(ClientOptions::with_base(server.url()), validator).unwrap()
    }

    fn track(id: u64) -> Value {
        json!({
            "id": id,
            "kind": "track",
            "permalink_url": format!("https://soundcloud.com/a/{}", id),
            "title": format!("Track {}", id),
            "user": {
                "id": 1,
                "kind": "user",
                "permalink_url": "https://soundcloud.com/a",
                "username": "a"
            }
        })
    }

    #[test]
    fn test_likes_url() {
        let validator = Arc::new(SchemaValidator::new().unwrap());
        let api = SoundCloudApi::new(ClientOptions::default(), validator).unwrap();
        assert_eq!(
            api.likes_url("123", 100),
            "https://api-v2.soundcloud.com/users/123/likes?limit=100"
        );
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tracks")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let tracks = api(&server).tracks(&[], "cid").await.unwrap();

        assert!(tracks.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_tracks_follow_requested_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tracks")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("ids".into(), "12,11,13".into()),
                Matcher::UrlEncoded("client_id".into(), "cid".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(json!([track(11), track(12)]).to_string())
            .create_async()
            .await;

        let tracks = api(&server).tracks(&[12, 11, 13], "cid").await.unwrap();

        let ids: Vec<u64> = tracks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![12, 11]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/playlists/5")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = api(&server).playlist(5, "cid").await.unwrap_err();

        match err {
            LikesError::Http {
                status,
                status_text,
                url,
            } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
                assert!(url.ends_with("/playlists/5"));
                assert!(!url.contains("cid"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_unrepresentable_playlist_is_validation_error() {
        let mut server = mockito::Server::new_async().await;
        let _detail = server
            .mock("GET", "/playlists/7")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 7,
                    "kind": "playlist",
                    "permalink_url": "https://soundcloud.com/a/sets/huge",
                    "title": "Huge",
                    "track_count": 5_000_000_000u64,
                    "user": track(1)["user"].clone(),
                    "tracks": []
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = api(&server).playlist(7, "cid").await.unwrap_err();

        assert!(matches!(err, LikesError::Validation(_)));
    }

    #[tokio::test]
    async fn test_search_users() {
        let mut server = mockito::Server::new_async().await;
        let _search = server
            .mock("GET", "/search/users")
            .match_query(Matcher::UrlEncoded("q".into(), "someone".into()))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "collection": [{
                        "id": 42,
                        "kind": "user",
                        "permalink_url": "https://soundcloud.com/someone",
                        "username": "someone",
                        "followers_count": 3
                    }],
                    "total_results": 1
                })
                .to_string(),
            )
            .create_async()
            .await;

        let users = api(&server).search_users("someone", "cid", 10).await.unwrap();

        assert_eq!(users, vec![User::new(42, "someone", "https://soundcloud.com/someone")]);
    }
}
