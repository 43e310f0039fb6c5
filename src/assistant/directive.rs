//! The model-reply action protocol.
//!
//! A reply may end with one fenced JSON block carrying a directive, and may
//! open with a bold specialist label. [`extract`] splits a raw reply into
//! the text shown to the user and the directive, if any. Extraction is
//! symmetric: the block is stripped from the visible text only when its JSON
//! actually parses; a malformed block is logged and left visible verbatim.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::workspace::FileKind;

/// What a directive asks the workspace to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveAction {
    CreateFile,
    UpdateFile,
    SwitchTab,
}

/// A structured directive parsed from the trailing block of a reply.
#[derive(Debug, Clone, Deserialize)]
pub struct Directive {
    pub action: DirectiveAction,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub file_type: Option<FileKind>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

static SPECIALIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*\*([^*\n]+)\*\*").expect("specialist regex"));

/// Split a raw reply into visible text and an optional directive.
///
/// The trailing block must be the last thing in the reply (whitespace
/// aside): a fence, an optional `json` tag, a JSON object, a closing fence.
pub fn extract(reply: &str) -> (String, Option<Directive>) {
    let Some((block_start, json)) = trailing_block(reply) else {
        return (reply.to_string(), None);
    };
    match serde_json::from_str::<Directive>(json) {
        Ok(directive) => {
            let visible = reply[..block_start].trim_end().to_string();
            (visible, Some(directive))
        }
        Err(e) => {
            // Malformed directive: swallow, keep the raw block visible.
            tracing::warn!(error = %e, "Discarding malformed directive block");
            (reply.to_string(), None)
        }
    }
}

/// Locate a fenced JSON object at the very end of the text.
///
/// Returns the byte offset where the block's opening fence starts and the
/// JSON slice between the fences.
fn trailing_block(text: &str) -> Option<(usize, &str)> {
    let trimmed = text.trim_end();
    let body = trimmed.strip_suffix("```")?;
    let open = body.rfind("```")?;
    let inner = body[open + 3..].trim_start();
    let inner = inner.strip_prefix("json").unwrap_or(inner).trim();
    if !(inner.starts_with('{') && inner.ends_with('}')) {
        return None;
    }
    Some((open, inner))
}

/// Extract the leading bold-emphasis span as a specialist label.
pub fn specialist_label(reply: &str) -> Option<String> {
    SPECIALIST_RE
        .captures(reply)
        .map(|caps| caps[1].trim().to_string())
        .filter(|label| !label.is_empty())
}
