//! In-memory virtual-file workspace: the file set, tab order, and active tab.

pub mod file;
pub mod store;

pub use file::{FileKind, VirtualFile};
pub use store::WorkspaceStore;
