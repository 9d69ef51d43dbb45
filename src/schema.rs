//! JSON Schema validation of upstream payloads.
//!
//! Every payload is checked against a bundled schema before it is narrowed
//! into a model. The schemas are compiled once when the
//! [`SchemaValidator`] is built; the validator is then shared read-only.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{LikesError, Result};

/// The payload kinds that have a bundled schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// Array of full tracks (batch track endpoint).
    Tracks,
    /// Single playlist with member track ids.
    Playlist,
    /// One page of a user's likes.
    Likes,
    /// User search results.
    UserSearch,
}

impl Schema {
    /// Every bundled schema.
    pub const ALL: [Schema; 4] = [
        Schema::Tracks,
        Schema::Playlist,
        Schema::Likes,
        Schema::UserSearch,
    ];

    /// Identifier of the schema document.
    pub fn id(&self) -> &'static str {
        match self {
            Schema::Tracks => "tracks",
            Schema::Playlist => "playlist",
            Schema::Likes => "likes",
            Schema::UserSearch => "user_search",
        }
    }

    /// Raw schema document.
    fn source(&self) -> &'static str {
        match self {
            Schema::Tracks => include_str!("../schemas/tracks.json"),
            Schema::Playlist => include_str!("../schemas/playlist.json"),
            Schema::Likes => include_str!("../schemas/likes.json"),
            Schema::UserSearch => include_str!("../schemas/user_search.json"),
        }
    }
}

/// Compiled validators for all bundled schemas.
pub struct SchemaValidator {
    compiled: HashMap<Schema, jsonschema::Validator>,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schemas", &self.compiled.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SchemaValidator {
    /// Compile every bundled schema.
    pub fn new() -> Result<Self> {
        Self::with_schemas(&Schema::ALL)
    }

    /// Compile only the given schemas.
    pub fn with_schemas(schemas: &[Schema]) -> Result<Self> {
        let mut compiled = HashMap::with_capacity(schemas.len());

        for &schema in schemas {
            let document: Value = serde_json::from_str(schema.source())?;
            let validator =
                jsonschema::validator_for(&document).map_err(|e| LikesError::SchemaCompile {
                    id: schema.id(),
                    message: e.to_string(),
                })?;
            debug!("Compiled schema {}", schema.id());
            compiled.insert(schema, validator);
        }

        Ok(Self { compiled })
    }

    /// Check a payload, collecting every violation into one error.
    pub fn check(&self, schema: Schema, payload: &Value) -> Result<()> {
        let validator = self
            .compiled
            .get(&schema)
            .ok_or(LikesError::UnknownSchema(schema.id()))?;

        let violations: Vec<String> = validator
            .iter_errors(payload)
            .map(|e| e.to_string())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(LikesError::Validation(violations.join(", ")))
        }
    }

    /// Check a payload, then narrow it into its model.
    pub fn validate<T: DeserializeOwned>(&self, schema: Schema, payload: Value) -> Result<T> {
        self.check(schema, &payload)?;
        narrow(payload)
    }
}

/// Narrow an already checked payload into a model.
///
/// A payload the schema accepts but the model cannot hold (an out of range
/// integer, say) is still a validation failure.
pub(crate) fn narrow<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| LikesError::Validation(e.to_string()))
}
