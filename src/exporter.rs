//! Likes export pipeline.
//!
//! Resolves the user and a client id, walks the cursor-paginated likes
//! collection, hydrates every liked playlist with its tracks and writes the
//! ordered result as one pretty-printed JSON document.

use std::io::Write;
use std::path::{Path, PathBuf};

use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::api::SoundCloudApi;
use crate::error::Result;
use crate::models::{Like, Page};
use crate::pool::ordered_concurrent;

/// Items per likes page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Playlist enrichments allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Tuning and shortcuts for an export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Items requested per likes page.
    pub page_size: u32,
    /// Maximum concurrent playlist enrichments.
    pub concurrency: usize,
    /// Known client id; skips discovery when set.
    pub client_id: Option<String>,
    /// Known numeric user id; skips the profile lookup when set.
    pub user_id: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            client_id: None,
            user_id: None,
        }
    }
}

/// Main exporter interface.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use soundcloud_likes::{ClientOptions, ExportOptions, LikesExporter, SchemaValidator, SoundCloudApi};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let validator = Arc::new(SchemaValidator::new()?);
///     let api = SoundCloudApi::new(ClientOptions::default(), validator)?;
///     let exporter = LikesExporter::new(api, ExportOptions::default());
///     let count = exporter.export("someone", "likes.json").await?;
///     println!("Exported {} likes", count);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LikesExporter {
    api: SoundCloudApi,
    options: ExportOptions,
}

impl LikesExporter {
    /// Create a new exporter.
    pub fn new(api: SoundCloudApi, options: ExportOptions) -> Self {
        Self { api, options }
    }

    /// The underlying API client.
    pub fn api(&self) -> &SoundCloudApi {
        &self.api
    }

    /// Run options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    async fn client_id(&self) -> Result<String> {
        match &self.options.client_id {
            Some(id) => Ok(id.clone()),
            None => self.api.resolve_client_id().await,
        }
    }

    async fn user_id(&self, username: &str) -> Result<String> {
        match &self.options.user_id {
            Some(id) => Ok(id.clone()),
            None => self.api.resolve_user_id(username).await,
        }
    }

    /// Resolve `(user_id, client_id)` concurrently.
    pub async fn credentials(&self, username: &str) -> Result<(String, String)> {
        tokio::try_join!(self.user_id(username), self.client_id())
    }

    /// Likes pages in order, one request per page, until `next_href` is null.
    pub fn pages<'a>(&'a self, user_id: &str, client_id: &'a str) -> BoxStream<'a, Result<Page>> {
        let first = self.api.likes_url(user_id, self.options.page_size);
        let api = &self.api;

        stream::try_unfold(Some(first), move |cursor| next_page(api, cursor, client_id)).boxed()
    }

    /// Narrowed likes across all pages, in server order.
    pub fn likes<'a>(&'a self, user_id: &str, client_id: &'a str) -> BoxStream<'a, Result<Like>> {
        self.pages(user_id, client_id)
            .map_ok(|page| stream::iter(page.collection.into_iter().map(Ok)))
            .try_flatten()
            .boxed()
    }

    /// Attach the full track list to a playlist like.
    ///
    /// Track likes pass through unchanged.
    pub async fn enrich(&self, like: Like, client_id: &str) -> Result<Like> {
        let mut like = match like {
            Like::Playlist(like) => like,
            other => return Ok(other),
        };

        let (playlist, ids) = self.api.playlist(like.playlist.id, client_id).await?;
        let tracks = self.api.tracks(&ids, client_id).await?;
        let playlist = playlist.with_tracks(tracks);

        if playlist.count_mismatch() {
            warn!(
                "Playlist {} declares {} tracks but {} were hydrated",
                playlist.id,
                playlist.track_count,
                playlist.hydrated_count().unwrap_or(0)
            );
        }

        debug!("Enriched playlist {}", playlist.id);
        like.playlist = playlist;
        Ok(Like::Playlist(like))
    }

    /// Fetch and enrich every like of a resolved user.
    pub async fn collect_for(&self, user_id: &str, client_id: &str) -> Result<Vec<Like>> {
        ordered_concurrent(
            self.likes(user_id, client_id),
            self.options.concurrency,
            move |like| self.enrich(like, client_id),
        )
        .try_collect()
        .await
    }

    /// Resolve a username, then fetch and enrich all of its likes.
    pub async fn collect(&self, username: &str) -> Result<Vec<Like>> {
        let (user_id, client_id) = self.credentials(username).await?;
        info!("Collecting likes of {} (user id {})", username, user_id);

        let likes = self.collect_for(&user_id, &client_id).await?;
        info!("Collected {} likes", likes.len());
        Ok(likes)
    }

    /// Collect a user's likes and write them to `path`. Returns the like count.
    pub async fn export<P: AsRef<Path>>(&self, username: &str, path: P) -> Result<usize> {
        let likes = self.collect(username).await?;
        write_json(path.as_ref(), &likes).await?;
        Ok(likes.len())
    }
}

/// Fetch the page at `cursor` and hand back its continuation.
async fn next_page(
    api: &SoundCloudApi,
    cursor: Option<String>,
    client_id: &str,
) -> Result<Option<(Page, Option<String>)>> {
    let Some(url) = cursor else {
        return Ok(None);
    };

    let page = api.likes_page(&url, client_id).await?;
    let next = page.next_href.clone();
    Ok(Some((page, next)))
}

/// Write likes as two-space indented JSON.
///
/// The document goes to a uniquely named temp file next to `path` and is
/// persisted over it, so `path` never holds a truncated document. The temp
/// file is removed if any step fails.
pub async fn write_json(path: &Path, likes: &[Like]) -> Result<()> {
    let body = serde_json::to_string_pretty(likes)?;

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent).await?;

    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || persist(&parent, &target, body.as_bytes())).await??;

    info!("Wrote {} likes to {}", likes.len(), path.display());
    Ok(())
}

fn persist(dir: &Path, path: &Path, body: &[u8]) -> Result<()> {
    let prefix = match path.file_name() {
        Some(name) => format!(".{}.", name.to_string_lossy()),
        None => ".likes.".to_string(),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
