//! API clients for SoundCloud.
//!
//! This module provides:
//! - [`SoundCloudApi`]: the versioned JSON API (likes, playlists, tracks, users)
//! - [`scrape`]: credential and user-id discovery from the public website

pub mod client;
pub mod scrape;

pub use client::{ClientOptions, SoundCloudApi};
