//! # SoundCloud Likes
//!
//! Export a SoundCloud user's liked tracks and playlists to a JSON file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use soundcloud_likes::{ClientOptions, ExportOptions, LikesExporter, SchemaValidator, SoundCloudApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let validator = Arc::new(SchemaValidator::new()?);
//!     let api = SoundCloudApi::new(ClientOptions::default(), validator)?;
//!     let exporter = LikesExporter::new(api, ExportOptions::default());
//!
//!     let likes = exporter.collect("someone").await?;
//!     println!("{} likes", likes.len());
//!     Ok(())
//! }
//! ```
//!
//! ## How it works
//!
//! - A client id is scraped from the website's bundled scripts and the
//!   username is resolved to a numeric id from its profile page.
//! - The likes collection is walked page by page via its `next_href` cursor.
//! - Every liked playlist is hydrated with its tracks, at most five at a
//!   time, without changing the order of the likes.
//! - Each API payload is checked against a bundled JSON Schema and narrowed
//!   to a fixed set of fields before use.

pub mod api;
pub mod error;
mod exporter;
pub mod models;
pub mod pool;
pub mod schema;

// Main interface (recommended)
pub use exporter::{write_json, ExportOptions, LikesExporter, DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE};

// Low-level APIs
pub use api::{ClientOptions, SoundCloudApi};
pub use error::{LikesError, Result};
pub use models::{Like, Page, Playlist, Track, User};
pub use schema::{Schema, SchemaValidator};
