//! Virtual files and their kinds.
//!
//! A file's `content` is always a `String`; how that string is structured
//! depends on the kind. Parsing and serialization per kind live in
//! `crate::content` — nothing else in the crate interprets content directly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a virtual file, which determines its content encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// JSON-encoded message list.
    Chat,
    /// Raw source text.
    Code,
    /// Freeform text.
    Doc,
    /// Empty or a data-URI raster snapshot.
    Whiteboard,
    /// Newline-delimited rows of comma-delimited cells.
    Sheet,
    /// First line title, remaining lines body.
    Slide,
    /// Freeform text.
    Note,
}

impl FileKind {
    /// Stable lowercase name, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Chat => "chat",
            FileKind::Code => "code",
            FileKind::Doc => "doc",
            FileKind::Whiteboard => "whiteboard",
            FileKind::Sheet => "sheet",
            FileKind::Slide => "slide",
            FileKind::Note => "note",
        }
    }

    /// Default display name for a freshly created file of this kind.
    pub fn default_name(&self) -> &'static str {
        match self {
            FileKind::Chat => "New Chat",
            FileKind::Code => "Untitled Code",
            FileKind::Doc => "Untitled Document",
            FileKind::Whiteboard => "Untitled Board",
            FileKind::Sheet => "Untitled Sheet",
            FileKind::Slide => "Untitled Slide",
            FileKind::Note => "Untitled Note",
        }
    }

    /// Default content for a freshly created file of this kind.
    ///
    /// Chat gets an empty message list, a sheet gets a two-row header/data
    /// template, a slide gets a title/subtitle pair; everything else starts
    /// empty.
    pub fn default_content(&self) -> String {
        match self {
            FileKind::Chat => "[]".to_string(),
            FileKind::Sheet => "Column A,Column B,Column C\n,,".to_string(),
            FileKind::Slide => "New Slide\nClick to edit subtitle".to_string(),
            FileKind::Code | FileKind::Doc | FileKind::Whiteboard | FileKind::Note => String::new(),
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(FileKind::Chat),
            "code" => Ok(FileKind::Code),
            "doc" => Ok(FileKind::Doc),
            "whiteboard" => Ok(FileKind::Whiteboard),
            "sheet" => Ok(FileKind::Sheet),
            "slide" => Ok(FileKind::Slide),
            "note" => Ok(FileKind::Note),
            other => Err(format!("unknown file kind: {other}")),
        }
    }
}

/// A virtual file in the workspace.
///
/// Owned exclusively by the [`WorkspaceStore`](crate::workspace::WorkspaceStore);
/// content is mutated by full replacement only, never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualFile {
    pub id: Uuid,
    pub name: String,
    pub kind: FileKind,
    pub content: String,
}

impl VirtualFile {
    /// Create a file with a freshly generated id.
    pub fn new(kind: FileKind, name: Option<String>, content: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.unwrap_or_else(|| kind.default_name().to_string()),
            kind,
            content: content.unwrap_or_else(|| kind.default_content()),
        }
    }
}
