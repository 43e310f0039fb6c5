//! Terminal log and the code runner.
//!
//! "Running" code never executes anything locally: the code text is sent to
//! the backend with an act-as-interpreter instruction and whatever text comes
//! back is appended to the terminal log verbatim.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AssistantError, Error, WorkspaceError};
use crate::llm::{GenerateRequest, GenerativeBackend};
use crate::session::{SessionHandle, WorkspaceEvent};
use crate::workspace::FileKind;

/// Kind of a terminal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalKind {
    Info,
    Error,
    Success,
    Output,
}

/// One line in the terminal log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalEntry {
    pub id: Uuid,
    pub kind: TerminalKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Process-local, append-only terminal log. Cleared on demand; never
/// persisted into any file.
#[derive(Debug, Default)]
pub struct TerminalLog {
    entries: Vec<TerminalEntry>,
}

impl TerminalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a clone of it.
    pub fn push(&mut self, kind: TerminalKind, content: impl Into<String>) -> TerminalEntry {
        let entry = TerminalEntry {
            id: Uuid::new_v4(),
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        };
        self.entries.push(entry.clone());
        entry
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[TerminalEntry] {
        &self.entries
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Fixed instruction wrapped around the code text for a run.
fn interpreter_prompt(code: &str) -> String {
    format!(
        "Act as a code interpreter. Execute the following code and return \
         only its output, exactly as a real interpreter would print it. If \
         the code would raise an error, return the error text instead.\n\n{code}"
    )
}

/// Sends code text to the backend and appends the result to the terminal.
#[derive(Clone)]
pub struct CodeRunner {
    backend: Arc<dyn GenerativeBackend>,
}

impl CodeRunner {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Run the code file `file_id`.
    ///
    /// Rejected while any backend request is in flight (same guard as chat
    /// sends). Backend failure is not an error here: it degrades to an
    /// error-kind terminal entry.
    pub async fn run(&self, session: &SessionHandle, file_id: Uuid) -> Result<TerminalEntry, Error> {
        let _guard = session.try_begin_request().ok_or(AssistantError::Busy)?;

        let code = {
            let mut state = session.lock().await;
            let file = state
                .store
                .get(file_id)
                .ok_or(WorkspaceError::FileNotFound(file_id))?;
            if file.kind != FileKind::Code {
                return Err(WorkspaceError::KindMismatch {
                    id: file_id,
                    expected: FileKind::Code.as_str(),
                    actual: file.kind.as_str(),
                }
                .into());
            }
            let name = file.name.clone();
            let code = file.content.clone();

            let entry = state
                .terminal
                .push(TerminalKind::Info, format!("Running {name}..."));
            session.emit(WorkspaceEvent::TerminalAppended { entry });
            code
        };

        tracing::info!(file_id = %file_id, "Code run dispatched to backend");
        let result = self
            .backend
            .generate(GenerateRequest::one_shot(interpreter_prompt(&code)))
            .await;

        let mut state = session.lock().await;
        let entry = match result {
            Ok(output) => state.terminal.push(TerminalKind::Output, output),
            Err(e) => {
                tracing::warn!(error = %e, "Code run failed");
                state
                    .terminal
                    .push(TerminalKind::Error, format!("Execution failed: {e}"))
            }
        };
        session.emit(WorkspaceEvent::TerminalAppended {
            entry: entry.clone(),
        });
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    struct StubBackend {
        reply: Result<String, ()>,
    }

    #[async_trait::async_trait]
    impl GenerativeBackend for StubBackend {
        fn model_name(&self) -> &str {
            "stub"
        }
        async fn generate(&self, _request: GenerateRequest) -> Result<String, BackendError> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(BackendError::RequestFailed {
                    reason: "connection refused".to_string(),
                }),
            }
        }
    }

    fn runner(reply: Result<String, ()>) -> CodeRunner {
        CodeRunner::new(Arc::new(StubBackend { reply }))
    }

    #[test]
    fn terminal_kinds_serialize_lowercase() {
        for (kind, wire) in [
            (TerminalKind::Info, "\"info\""),
            (TerminalKind::Error, "\"error\""),
            (TerminalKind::Success, "\"success\""),
            (TerminalKind::Output, "\"output\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), wire);
        }
    }

    #[test]
    fn log_appends_and_clears() {
        let mut log = TerminalLog::new();
        let a = log.push(TerminalKind::Info, "one");
        let b = log.push(TerminalKind::Output, "two");
        assert_ne!(a.id, b.id);
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[1].content, "two");

        log.clear();
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn run_appends_output_entry() {
        let session = SessionHandle::new();
        let file_id = {
            let mut state = session.lock().await;
            state
                .store
                .create_file(FileKind::Code, None, Some("print(1)".into()))
        };

        let entry = runner(Ok("1\n".to_string()))
            .run(&session, file_id)
            .await
            .unwrap();
        assert_eq!(entry.kind, TerminalKind::Output);
        assert_eq!(entry.content, "1\n");

        let state = session.lock().await;
        let kinds: Vec<TerminalKind> = state.terminal.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![TerminalKind::Info, TerminalKind::Output]);
    }

    #[tokio::test]
    async fn backend_failure_degrades_to_error_entry() {
        let session = SessionHandle::new();
        let file_id = {
            let mut state = session.lock().await;
            state.store.create_file(FileKind::Code, None, None)
        };

        let entry = runner(Err(())).run(&session, file_id).await.unwrap();
        assert_eq!(entry.kind, TerminalKind::Error);
        assert!(entry.content.contains("connection refused"));
    }

    #[tokio::test]
    async fn running_a_non_code_file_is_rejected() {
        let session = SessionHandle::new();
        let file_id = {
            let mut state = session.lock().await;
            state.store.create_file(FileKind::Doc, None, None)
        };

        let err = runner(Ok(String::new())).run(&session, file_id).await;
        assert!(matches!(
            err,
            Err(Error::Workspace(WorkspaceError::KindMismatch { .. }))
        ));
    }

    #[tokio::test]
    async fn run_is_rejected_while_busy() {
        let session = SessionHandle::new();
        let file_id = {
            let mut state = session.lock().await;
            state.store.create_file(FileKind::Code, None, None)
        };

        let _guard = session.try_begin_request().unwrap();
        let err = runner(Ok(String::new())).run(&session, file_id).await;
        assert!(matches!(
            err,
            Err(Error::Assistant(AssistantError::Busy))
        ));

        let state = session.lock().await;
        assert!(state.terminal.entries().is_empty());
    }
}
