//! Credential and user-id discovery from the public website.
//!
//! SoundCloud's web app ships its API client id inside one of the bundled
//! scripts, and every profile page embeds an app deep link carrying the
//! numeric user id. Both are pulled out with regular expressions.

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::client::SoundCloudApi;
use crate::error::{LikesError, Result};

static SCRIPT_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<script crossorigin src="([^"]+)""#).expect("valid regex"));

static CLIENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"client_id:"([A-Za-z0-9_-]+)""#).expect("valid regex"));

static USER_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"soundcloud://users:(\d+)").expect("valid regex"));

/// Cross-origin script URLs in page order.
pub fn script_urls(html: &str) -> Vec<String> {
    SCRIPT_SRC
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

/// The first `client_id:"..."` literal in a script body.
pub fn find_client_id(script: &str) -> Option<String> {
    CLIENT_ID.captures(script).map(|c| c[1].to_string())
}

/// The numeric id from a `soundcloud://users:<id>` deep link.
pub fn find_user_id(html: &str) -> Option<String> {
    USER_LINK.captures(html).map(|c| c[1].to_string())
}

impl SoundCloudApi {
    /// GET a page body as text.
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response, url)?;
        Ok(response.text().await?)
    }

    /// Discover a client id from the website's bundled scripts.
    ///
    /// All scripts are fetched concurrently; the first one that yields a
    /// client id wins and the remaining fetches are aborted.
    pub async fn resolve_client_id(&self) -> Result<String> {
        let html = self.get_text(&format!("{}/", self.options.web_base)).await?;
        let urls = script_urls(&html);
        debug!("Found {} candidate scripts", urls.len());

        let mut attempts = JoinSet::new();
        for url in &urls {
            let api = self.clone();
            let url = url.clone();
            attempts.spawn(async move {
                let body = api.get_text(&url).await?;
                Ok::<_, LikesError>((url, find_client_id(&body)))
            });
        }

        while let Some(joined) = attempts.join_next().await {
            match joined {
                Ok(Ok((url, Some(client_id)))) => {
                    attempts.abort_all();
                    info!("Resolved client id from {}", url);
                    return Ok(client_id);
                }
                Ok(Ok((url, None))) => debug!("No client id in {}", url),
                Ok(Err(e)) => debug!("Script fetch failed: {}", e),
                Err(e) => warn!("Script fetch task failed: {}", e),
            }
        }

        Err(LikesError::CredentialNotFound(urls.len()))
    }

    /// Resolve a username (profile permalink) to its numeric user id.
    pub async fn resolve_user_id(&self, username: &str) -> Result<String> {
        let html = self
            .get_text(&format!("{}/{}", self.options.web_base, username))
            .await?;

        let user_id =
            find_user_id(&html).ok_or_else(|| LikesError::UserNotFound(username.to_string()))?;

        info!("Resolved {} to user id {}", username, user_id);
        Ok(user_id)
    }
}
