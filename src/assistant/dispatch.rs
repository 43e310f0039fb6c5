//! Applies a parsed directive to the workspace store.

use uuid::Uuid;

use crate::assistant::directive::{Directive, DirectiveAction};
use crate::workspace::{FileKind, VirtualFile, WorkspaceStore};

/// What a dispatched directive actually did.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Created { file: VirtualFile },
    Updated { id: Uuid },
    Switched { id: Uuid },
}

/// Apply `directive` to the store.
///
/// Target resolution matches by `file_name` first and falls back to
/// `file_id`; a directive whose target cannot be resolved is silently
/// dropped (`None`), debug-logged only.
pub fn apply(store: &mut WorkspaceStore, directive: Directive) -> Option<DispatchOutcome> {
    match directive.action {
        DirectiveAction::CreateFile => {
            let kind = directive.file_type.unwrap_or_else(|| {
                tracing::debug!("create_file directive without file_type, defaulting to doc");
                FileKind::Doc
            });
            let id = store.create_file(kind, directive.file_name, directive.content);
            let file = store.get(id)?.clone();
            tracing::info!(id = %id, name = %file.name, "Assistant created a file");
            Some(DispatchOutcome::Created { file })
        }
        DirectiveAction::UpdateFile => {
            let id = resolve_target(store, &directive)?;
            let content = directive.content.unwrap_or_default();
            store.update_content(id, content).ok()?;
            tracing::info!(id = %id, "Assistant updated a file");
            Some(DispatchOutcome::Updated { id })
        }
        DirectiveAction::SwitchTab => {
            let id = resolve_target(store, &directive)?;
            store.open_tab(id).ok()?;
            tracing::info!(id = %id, "Assistant switched the active tab");
            Some(DispatchOutcome::Switched { id })
        }
    }
}

/// Resolve the directive's target: `file_name` first, then `file_id`.
fn resolve_target(store: &WorkspaceStore, directive: &Directive) -> Option<Uuid> {
    if let Some(name) = directive.file_name.as_deref() {
        if let Some(file) = store.find_by_name(name) {
            return Some(file.id);
        }
    }
    if let Some(raw) = directive.file_id.as_deref() {
        if let Ok(id) = raw.parse::<Uuid>() {
            if store.get(id).is_some() {
                return Some(id);
            }
        }
    }
    tracing::debug!(
        name = ?directive.file_name,
        id = ?directive.file_id,
        "Directive target not found, dropping"
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(action: DirectiveAction) -> Directive {
        Directive {
            action,
            file_id: None,
            file_type: None,
            file_name: None,
            content: None,
        }
    }

    #[test]
    fn create_uses_supplied_fields() {
        let mut store = WorkspaceStore::new();
        let outcome = apply(
            &mut store,
            Directive {
                action: DirectiveAction::CreateFile,
                file_id: None,
                file_type: Some(FileKind::Doc),
                file_name: Some("Report.doc".to_string()),
                content: Some("Abstract...".to_string()),
            },
        );

        let Some(DispatchOutcome::Created { file }) = outcome else {
            panic!("expected a created file");
        };
        assert_eq!(file.kind, FileKind::Doc);
        assert_eq!(file.name, "Report.doc");
        assert_eq!(file.content, "Abstract...");
        assert_eq!(store.active_tab(), Some(file.id));
    }

    #[test]
    fn create_without_type_defaults_to_doc() {
        let mut store = WorkspaceStore::new();
        let outcome = apply(&mut store, directive(DirectiveAction::CreateFile)).unwrap();
        let DispatchOutcome::Created { file } = outcome else {
            panic!("expected a created file");
        };
        assert_eq!(file.kind, FileKind::Doc);
    }

    #[test]
    fn update_resolves_by_name_first() {
        let mut store = WorkspaceStore::new();
        let by_name = store.create_file(FileKind::Doc, Some("target".into()), Some("old".into()));
        let decoy = store.create_file(FileKind::Doc, Some("decoy".into()), Some("old".into()));

        let outcome = apply(
            &mut store,
            Directive {
                action: DirectiveAction::UpdateFile,
                file_id: Some(decoy.to_string()),
                file_type: None,
                file_name: Some("target".to_string()),
                content: Some("new".to_string()),
            },
        );

        assert!(matches!(outcome, Some(DispatchOutcome::Updated { id }) if id == by_name));
        assert_eq!(store.get(by_name).unwrap().content, "new");
        assert_eq!(store.get(decoy).unwrap().content, "old");
    }

    #[test]
    fn update_falls_back_to_id() {
        let mut store = WorkspaceStore::new();
        let id = store.create_file(FileKind::Code, Some("main".into()), Some("old".into()));

        let outcome = apply(
            &mut store,
            Directive {
                action: DirectiveAction::UpdateFile,
                file_id: Some(id.to_string()),
                file_type: None,
                file_name: Some("no such file".to_string()),
                content: Some("new".to_string()),
            },
        );

        assert!(matches!(outcome, Some(DispatchOutcome::Updated { .. })));
        let file = store.get(id).unwrap();
        assert_eq!(file.content, "new");
        // Everything but content is untouched.
        assert_eq!(file.name, "main");
        assert_eq!(file.kind, FileKind::Code);
    }

    #[test]
    fn unresolvable_update_is_dropped() {
        let mut store = WorkspaceStore::new();
        store.create_file(FileKind::Doc, Some("other".into()), None);

        let outcome = apply(
            &mut store,
            Directive {
                action: DirectiveAction::UpdateFile,
                file_id: Some("not-a-uuid".to_string()),
                file_type: None,
                file_name: Some("missing".to_string()),
                content: Some("new".to_string()),
            },
        );

        assert!(outcome.is_none());
        assert_eq!(store.find_by_name("other").unwrap().content, "");
    }

    #[test]
    fn switch_tab_activates_target() {
        let mut store = WorkspaceStore::new();
        let a = store.create_file(FileKind::Doc, Some("a".into()), None);
        let _b = store.create_file(FileKind::Doc, Some("b".into()), None);

        let outcome = apply(
            &mut store,
            Directive {
                action: DirectiveAction::SwitchTab,
                file_id: None,
                file_type: None,
                file_name: Some("a".to_string()),
                content: None,
            },
        );

        assert!(matches!(outcome, Some(DispatchOutcome::Switched { id }) if id == a));
        assert_eq!(store.active_tab(), Some(a));
    }

    #[test]
    fn switch_tab_reopens_a_closed_tab() {
        let mut store = WorkspaceStore::new();
        let a = store.create_file(FileKind::Doc, Some("a".into()), None);
        store.create_file(FileKind::Doc, Some("b".into()), None);
        store.close_tab(a);

        apply(
            &mut store,
            Directive {
                action: DirectiveAction::SwitchTab,
                file_id: Some(a.to_string()),
                file_type: None,
                file_name: None,
                content: None,
            },
        );

        assert_eq!(store.active_tab(), Some(a));
        assert!(store.open_tabs().contains(&a));
    }
}
