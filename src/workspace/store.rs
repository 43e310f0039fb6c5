//! The workspace store: file set, open-tab order, active-tab selection.
//!
//! Invariants maintained by every mutation:
//! - file ids are unique for the lifetime of the store;
//! - `open_tabs` holds ids that are all present in the file set;
//! - `active_tab` is `None` or a member of `open_tabs`;
//! - closing the active tab falls back to the tab immediately preceding it
//!   in the remaining order, or `None` when no tab is left.
//!
//! Closing a tab never deletes the file: it stays in the file set for the
//! rest of the session.

use uuid::Uuid;

use crate::error::WorkspaceError;
use crate::workspace::file::{FileKind, VirtualFile};

/// In-memory store for all virtual files and tab state.
#[derive(Debug, Default)]
pub struct WorkspaceStore {
    files: Vec<VirtualFile>,
    open_tabs: Vec<Uuid>,
    active_tab: Option<Uuid>,
}

impl WorkspaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new file, open it as a tab, and make it active.
    ///
    /// Missing `name`/`content` are filled with kind-appropriate defaults.
    /// Returns the id of the new file.
    pub fn create_file(
        &mut self,
        kind: FileKind,
        name: Option<String>,
        content: Option<String>,
    ) -> Uuid {
        let file = VirtualFile::new(kind, name, content);
        let id = file.id;
        tracing::debug!(id = %id, kind = %kind, name = %file.name, "File created");
        self.files.push(file);
        self.open_tabs.push(id);
        self.active_tab = Some(id);
        id
    }

    /// Replace a file's content wholesale.
    ///
    /// No kind-specific validation happens here; callers are responsible for
    /// producing well-formed content for the file's kind.
    pub fn update_content(&mut self, id: Uuid, content: String) -> Result<(), WorkspaceError> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(WorkspaceError::FileNotFound(id))?;
        file.content = content;
        Ok(())
    }

    /// Open a tab for `id` and make it active. Idempotent on membership.
    pub fn open_tab(&mut self, id: Uuid) -> Result<(), WorkspaceError> {
        if self.get(id).is_none() {
            return Err(WorkspaceError::FileNotFound(id));
        }
        if !self.open_tabs.contains(&id) {
            self.open_tabs.push(id);
        }
        self.active_tab = Some(id);
        Ok(())
    }

    /// Close the tab for `id`. Idempotent; unknown ids are a no-op.
    ///
    /// The underlying file is retained in the file set. If the closed tab was
    /// active, the tab that preceded it in the remaining order becomes
    /// active, or none when the tab list empties.
    pub fn close_tab(&mut self, id: Uuid) {
        let Some(pos) = self.open_tabs.iter().position(|&t| t == id) else {
            return;
        };
        self.open_tabs.remove(pos);
        if self.active_tab == Some(id) {
            self.active_tab = if self.open_tabs.is_empty() {
                None
            } else {
                Some(self.open_tabs[pos.saturating_sub(1).min(self.open_tabs.len() - 1)])
            };
        }
    }

    /// Look up a file by id.
    pub fn get(&self, id: Uuid) -> Option<&VirtualFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Look up a file by exact name. First match wins in creation order.
    pub fn find_by_name(&self, name: &str) -> Option<&VirtualFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// All files in creation order.
    pub fn files(&self) -> &[VirtualFile] {
        &self.files
    }

    /// Open tab ids in display order.
    pub fn open_tabs(&self) -> &[Uuid] {
        &self.open_tabs
    }

    /// The currently active tab, if any.
    pub fn active_tab(&self) -> Option<Uuid> {
        self.active_tab
    }

    /// The currently active file, if any.
    pub fn active_file(&self) -> Option<&VirtualFile> {
        self.active_tab.and_then(|id| self.get(id))
    }
}
