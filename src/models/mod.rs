//! Data models for SoundCloud API responses.
//!
//! Each model is a narrowed projection of the upstream payload: unknown
//! fields are dropped on deserialization, so serializing a model yields
//! exactly the exported fields.

pub mod like;
pub mod playlist;
pub mod track;
pub mod user;

// Re-exports for convenience
pub use like::{Like, Page, PlaylistLike, TrackLike};
pub use playlist::{Playlist, PlaylistMembers, TrackRef};
pub use track::Track;
pub use user::{User, UserSearch};
