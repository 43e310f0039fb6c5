//! Per-kind content codecs.
//!
//! A virtual file's `content` string means different things depending on the
//! file kind. Every parse/serialize rule lives here, in exactly one place per
//! kind; the rest of the crate treats content as opaque text:
//!
//! - [`chat`] — JSON-encoded message list
//! - [`sheet`] — newline-delimited rows of comma-delimited cells
//! - [`slide`] — first line title, remaining lines body
//! - [`whiteboard`] — empty or a base64 data-URI raster snapshot
//!
//! Doc, note, and code files are freeform text and need no codec.

pub mod chat;
pub mod sheet;
pub mod slide;
pub mod whiteboard;
