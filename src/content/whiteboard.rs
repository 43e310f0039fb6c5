//! Whiteboard codec — content is empty or a base64 data-URI raster snapshot.
//!
//! The drawing surface itself lives in the frontend; after every discrete
//! gesture it re-encodes the whole surface and replaces the snapshot here.
//! This module only validates the envelope before accepting a replacement.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::WorkspaceError;

/// A validated whiteboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    uri: String,
}

impl Snapshot {
    /// Validate a data URI as a raster image snapshot.
    ///
    /// Accepts `data:image/<subtype>;base64,<payload>` with a payload that
    /// decodes as base64. Everything else is rejected.
    pub fn parse(uri: &str) -> Result<Self, WorkspaceError> {
        let rest = uri
            .strip_prefix("data:image/")
            .ok_or_else(|| malformed("not an image data URI"))?;
        let (_subtype, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| malformed("missing base64 marker"))?;
        if payload.is_empty() {
            return Err(malformed("empty payload"));
        }
        STANDARD
            .decode(payload)
            .map_err(|e| malformed(&format!("invalid base64 payload: {e}")))?;
        Ok(Self {
            uri: uri.to_string(),
        })
    }

    /// The full data URI.
    pub fn as_uri(&self) -> &str {
        &self.uri
    }

    /// Consume into file content.
    pub fn into_content(self) -> String {
        self.uri
    }
}

/// Whether existing file content holds a snapshot to restore onto the
/// drawing surface. Blank content means a fresh board.
pub fn has_snapshot(content: &str) -> bool {
    !content.trim().is_empty()
}

fn malformed(reason: &str) -> WorkspaceError {
    WorkspaceError::MalformedContent {
        kind: "whiteboard",
        reason: reason.to_string(),
    }
}
