//! The assistant send flow.
//!
//! One send cycle: validate, append the user message optimistically, call
//! the backend with the full history plus a workspace snapshot, then commit
//! either the model's reply (with any directive applied) or a synthetic
//! error message. The chat history therefore always grows by exactly two
//! messages per accepted send, on both the success and failure paths.

use std::sync::Arc;

use uuid::Uuid;

use crate::assistant::dispatch::{self, DispatchOutcome};
use crate::assistant::{directive, prompt};
use crate::content::chat::{self, ChatMessage};
use crate::error::{AssistantError, Error, WorkspaceError};
use crate::llm::{GenerateRequest, GenerativeBackend, Turn};
use crate::session::{SessionHandle, WorkspaceEvent};
use crate::workspace::FileKind;

/// Result of an accepted send: the chat file and its updated history.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub chat_id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub specialist: Option<String>,
}

/// Drives chat requests against the generative backend.
#[derive(Clone)]
pub struct AssistantClient {
    backend: Arc<dyn GenerativeBackend>,
    thinking_budget: i32,
}

impl AssistantClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, thinking_budget: i32) -> Self {
        Self {
            backend,
            thinking_budget,
        }
    }

    /// Send `input` on the active chat.
    ///
    /// Typed rejections (blank input, no active chat, request in flight)
    /// leave the session untouched. A backend failure is not a rejection:
    /// the user message stays committed and the failure is appended as a
    /// model-authored error message.
    pub async fn send(&self, session: &SessionHandle, input: &str) -> Result<SendOutcome, Error> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AssistantError::EmptyInput.into());
        }
        let _guard = session.try_begin_request().ok_or(AssistantError::Busy)?;

        // Optimistic phase: commit the user message before the network call.
        let (chat_id, request) = {
            let mut state = session.lock().await;
            let Some(file) = state.store.active_file() else {
                return Err(AssistantError::NoActiveChat.into());
            };
            if file.kind != FileKind::Chat {
                return Err(AssistantError::NoActiveChat.into());
            }
            let chat_id = file.id;

            let mut history = chat::parse(&file.content)?;
            history.push(ChatMessage::user(input));
            let turns = history
                .iter()
                .map(|m| Turn::new(m.role, m.text.clone()))
                .collect();
            state
                .store
                .update_content(chat_id, chat::serialize(&history))?;
            session.emit(WorkspaceEvent::FileUpdated { id: chat_id });

            let request = GenerateRequest {
                turns,
                system_instruction: Some(prompt::system_instruction(&state.store)),
                thinking_budget: Some(self.thinking_budget),
            };
            (chat_id, request)
        };

        tracing::info!(chat_id = %chat_id, "Chat send dispatched to backend");
        let result = self.backend.generate(request).await;

        // Commit phase: append the reply (or the failure) to the history.
        let mut state = session.lock().await;
        // Files are never deleted, so the chat is still there after the await.
        let mut history = {
            let file = state
                .store
                .get(chat_id)
                .ok_or(WorkspaceError::FileNotFound(chat_id))?;
            chat::parse(&file.content)?
        };

        let reply = match result {
            Ok(raw) => {
                let specialist = directive::specialist_label(&raw);
                let (visible, parsed) = directive::extract(&raw);
                if let Some(directive) = parsed {
                    match dispatch::apply(&mut state.store, directive) {
                        Some(DispatchOutcome::Created { file }) => {
                            session.emit(WorkspaceEvent::FileCreated { file });
                        }
                        Some(DispatchOutcome::Updated { id }) => {
                            session.emit(WorkspaceEvent::FileUpdated { id });
                        }
                        Some(DispatchOutcome::Switched { id }) => {
                            session.emit(WorkspaceEvent::TabOpened { id });
                        }
                        None => {}
                    }
                }
                if specialist.is_some() && state.specialist != specialist {
                    state.specialist = specialist.clone();
                    session.emit(WorkspaceEvent::SpecialistChanged {
                        specialist: specialist.clone(),
                    });
                }
                ChatMessage::model(visible, specialist)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat send failed");
                ChatMessage::model(
                    format!("Sorry, I couldn't reach the assistant backend: {e}"),
                    None,
                )
            }
        };

        history.push(reply);
        state
            .store
            .update_content(chat_id, chat::serialize(&history))?;
        session.emit(WorkspaceEvent::FileUpdated { id: chat_id });

        Ok(SendOutcome {
            chat_id,
            messages: history,
            specialist: state.specialist.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::chat::Role;
    use crate::error::BackendError;

    /// Stub backend returning a fixed reply (or failing).
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
                    reason: "timed out".to_string(),
                }),
            }
        }
    }

    fn client(reply: Result<&str, ()>) -> AssistantClient {
        AssistantClient::new(
            Arc::new(StubBackend {
                reply: reply.map(str::to_string),
            }),
            0,
        )
    }

    async fn session_with_chat() -> (Arc<SessionHandle>, Uuid) {
        let session = SessionHandle::new();
        let chat_id = {
            let mut state = session.lock().await;
            state.store.create_file(FileKind::Chat, None, None)
        };
        (session, chat_id)
    }

    #[tokio::test]
    async fn successful_send_grows_history_by_two() {
        let (session, chat_id) = session_with_chat().await;
        let outcome = client(Ok("Hello back!")).send(&session, "hi").await.unwrap();

        assert_eq!(outcome.chat_id, chat_id);
        assert_eq!(outcome.messages.len(), 2);
        assert_eq!(outcome.messages[0].role, Role::User);
        assert_eq!(outcome.messages[0].text, "hi");
        assert_eq!(outcome.messages[1].role, Role::Model);
        assert_eq!(outcome.messages[1].text, "Hello back!");

        // Re-read from the store: the file content is the source of truth.
        let state = session.lock().await;
        let stored = chat::parse(&state.store.get(chat_id).unwrap().content).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn failed_send_also_grows_history_by_two() {
        let (session, _) = session_with_chat().await;
        let outcome = client(Err(())).send(&session, "hi").await.unwrap();

        assert_eq!(outcome.messages.len(), 2);
        assert_eq!(outcome.messages[1].role, Role::Model);
        assert!(outcome.messages[1].text.contains("timed out"));
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_mutation() {
        let (session, chat_id) = session_with_chat().await;
        let err = client(Ok("x")).send(&session, "   ").await;
        assert!(matches!(
            err,
            Err(Error::Assistant(AssistantError::EmptyInput))
        ));

        let state = session.lock().await;
        assert_eq!(state.store.get(chat_id).unwrap().content, "[]");
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn send_without_active_chat_is_rejected() {
        let session = SessionHandle::new();
        let err = client(Ok("x")).send(&session, "hi").await;
        assert!(matches!(
            err,
            Err(Error::Assistant(AssistantError::NoActiveChat))
        ));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn active_non_chat_file_is_rejected() {
        let session = SessionHandle::new();
        {
            let mut state = session.lock().await;
            state.store.create_file(FileKind::Doc, None, None);
        }
        let err = client(Ok("x")).send(&session, "hi").await;
        assert!(matches!(
            err,
            Err(Error::Assistant(AssistantError::NoActiveChat))
        ));
    }

    #[tokio::test]
    async fn second_send_while_busy_is_rejected() {
        let (session, _) = session_with_chat().await;
        let _guard = session.try_begin_request().unwrap();

        let err = client(Ok("x")).send(&session, "hi").await;
        assert!(matches!(err, Err(Error::Assistant(AssistantError::Busy))));
    }

    #[tokio::test]
    async fn guard_is_released_after_send() {
        let (session, _) = session_with_chat().await;
        client(Ok("ok")).send(&session, "one").await.unwrap();
        assert!(!session.is_busy());
        client(Ok("ok")).send(&session, "two").await.unwrap();
    }

    #[tokio::test]
    async fn create_directive_is_applied_and_stripped() {
        let (session, _) = session_with_chat().await;
        let reply = "Done, report drafted.\n\n```json\n{\"action\": \"create_file\", \
                     \"file_type\": \"doc\", \"file_name\": \"Report.doc\", \
                     \"content\": \"Abstract...\"}\n```";
        let outcome = client(Ok(reply)).send(&session, "write it").await.unwrap();

        assert_eq!(outcome.messages[1].text, "Done, report drafted.");
        assert!(!outcome.messages[1].text.contains("```"));

        let state = session.lock().await;
        let file = state.store.find_by_name("Report.doc").unwrap();
        assert_eq!(file.kind, FileKind::Doc);
        assert_eq!(file.content, "Abstract...");
        assert_eq!(state.store.active_tab(), Some(file.id));
    }

    #[tokio::test]
    async fn malformed_directive_stays_visible() {
        let (session, _) = session_with_chat().await;
        let reply = "Sure.\n```json\n{\"action\": }\n```";
        let outcome = client(Ok(reply)).send(&session, "go").await.unwrap();
        assert_eq!(outcome.messages[1].text, reply);
    }

    #[tokio::test]
    async fn specialist_label_is_recorded() {
        let (session, _) = session_with_chat().await;
        let outcome = client(Ok("**Data Analyst** The totals check out."))
            .send(&session, "check the totals")
            .await
            .unwrap();

        assert_eq!(outcome.specialist.as_deref(), Some("Data Analyst"));
        assert_eq!(
            outcome.messages[1].specialist.as_deref(),
            Some("Data Analyst")
        );

        let state = session.lock().await;
        assert_eq!(state.specialist.as_deref(), Some("Data Analyst"));
    }

    #[tokio::test]
    async fn history_accumulates_across_sends() {
        let (session, chat_id) = session_with_chat().await;
        let client = client(Ok("reply"));
        client.send(&session, "one").await.unwrap();
        let outcome = client.send(&session, "two").await.unwrap();

        assert_eq!(outcome.messages.len(), 4);
        let state = session.lock().await;
        let stored = chat::parse(&state.store.get(chat_id).unwrap().content).unwrap();
        assert_eq!(stored.len(), 4);
    }
}
