//! REST + WebSocket surface for the workspace session.
//!
//! The browser frontend drives every operation through these routes and
//! observes mutations through `/ws` (see [`ws`]).

pub mod ws;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::assistant::AssistantClient;
use crate::content::chat::ChatMessage;
use crate::content::{sheet::SheetGrid, slide::SlideContent, whiteboard};
use crate::error::{AssistantError, Error, WorkspaceError};
use crate::runner::{CodeRunner, TerminalEntry};
use crate::session::{Session, SessionHandle, WorkspaceEvent};
use crate::workspace::{FileKind, VirtualFile};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionHandle>,
    pub assistant: AssistantClient,
    pub runner: CodeRunner,
}

/// Build the full API router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws::ws_handler))
        .route("/api/workspace", get(get_workspace))
        .route("/api/files", post(create_file))
        .route("/api/files/{id}", get(get_file))
        .route("/api/files/{id}/content", put(update_content))
        .route("/api/files/{id}/sheet", post(edit_sheet_cell))
        .route("/api/files/{id}/slide", post(edit_slide))
        .route("/api/files/{id}/whiteboard", post(replace_whiteboard))
        .route("/api/tabs/{id}/open", post(open_tab))
        .route("/api/tabs/{id}/close", post(close_tab))
        .route("/api/chat/send", post(chat_send))
        .route("/api/run", post(run_code))
        .route("/api/terminal", get(get_terminal).delete(clear_terminal))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Views ───────────────────────────────────────────────────────────────

/// Full workspace snapshot returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceView {
    pub files: Vec<VirtualFile>,
    pub open_tabs: Vec<Uuid>,
    pub active_tab: Option<Uuid>,
    pub specialist: Option<String>,
}

impl WorkspaceView {
    pub(crate) fn from_session(state: &Session) -> Self {
        Self {
            files: state.store.files().to_vec(),
            open_tabs: state.store.open_tabs().to_vec(),
            active_tab: state.store.active_tab(),
            specialist: state.specialist.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Map engine errors onto HTTP statuses.
fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::Assistant(AssistantError::EmptyInput) => StatusCode::BAD_REQUEST,
        Error::Assistant(_) => StatusCode::CONFLICT,
        Error::Workspace(WorkspaceError::FileNotFound(_)) => StatusCode::NOT_FOUND,
        Error::Workspace(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Backend(_) => StatusCode::BAD_GATEWAY,
        Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "omniscience"
    }))
}

// ── Workspace & files ───────────────────────────────────────────────────

async fn get_workspace(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(WorkspaceView::from_session(&session))
}

#[derive(Debug, Deserialize)]
struct CreateFileRequest {
    file_type: FileKind,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Respond with the file's current state, or 404.
fn file_response(session: &Session, id: Uuid) -> Response {
    match session.store.get(id) {
        Some(file) => Json(file.clone()).into_response(),
        None => error_response(WorkspaceError::FileNotFound(id).into()),
    }
}

async fn create_file(
    State(state): State<AppState>,
    Json(req): Json<CreateFileRequest>,
) -> Response {
    let mut session = state.session.lock().await;
    let id = session.store.create_file(req.file_type, req.name, req.content);
    if let Some(file) = session.store.get(id) {
        state
            .session
            .emit(WorkspaceEvent::FileCreated { file: file.clone() });
    }
    (StatusCode::CREATED, file_response(&session, id)).into_response()
}

async fn get_file(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let session = state.session.lock().await;
    file_response(&session, id)
}

#[derive(Debug, Deserialize)]
struct UpdateContentRequest {
    content: String,
}

async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateContentRequest>,
) -> Response {
    let mut session = state.session.lock().await;
    if let Err(e) = session.store.update_content(id, req.content) {
        return error_response(e.into());
    }
    state.session.emit(WorkspaceEvent::FileUpdated { id });
    file_response(&session, id)
}

// ── Typed edits ─────────────────────────────────────────────────────────

/// Fetch a file of the expected kind, or produce the error response.
fn expect_kind<'a>(
    session: &'a Session,
    id: Uuid,
    expected: FileKind,
) -> Result<&'a VirtualFile, Error> {
    let file = session
        .store
        .get(id)
        .ok_or(WorkspaceError::FileNotFound(id))?;
    if file.kind != expected {
        return Err(WorkspaceError::KindMismatch {
            id,
            expected: expected.as_str(),
            actual: file.kind.as_str(),
        }
        .into());
    }
    Ok(file)
}

#[derive(Debug, Deserialize)]
struct SheetEditRequest {
    row: usize,
    col: usize,
    value: String,
}

async fn edit_sheet_cell(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SheetEditRequest>,
) -> Response {
    let mut session = state.session.lock().await;
    let content = match expect_kind(&session, id, FileKind::Sheet) {
        Ok(file) => file.content.clone(),
        Err(e) => return error_response(e),
    };
    let mut grid = SheetGrid::parse(&content);
    grid.set_cell(req.row, req.col, req.value);
    if let Err(e) = session.store.update_content(id, grid.serialize()) {
        return error_response(e.into());
    }
    state.session.emit(WorkspaceEvent::FileUpdated { id });
    file_response(&session, id)
}

#[derive(Debug, Deserialize)]
struct SlideEditRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

async fn edit_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SlideEditRequest>,
) -> Response {
    let mut session = state.session.lock().await;
    let content = match expect_kind(&session, id, FileKind::Slide) {
        Ok(file) => file.content.clone(),
        Err(e) => return error_response(e),
    };
    let mut slide = SlideContent::parse(&content);
    if let Some(title) = req.title {
        slide.set_title(title);
    }
    if let Some(body) = req.body {
        slide.set_body(body);
    }
    if let Err(e) = session.store.update_content(id, slide.serialize()) {
        return error_response(e.into());
    }
    state.session.emit(WorkspaceEvent::FileUpdated { id });
    file_response(&session, id)
}

#[derive(Debug, Deserialize)]
struct WhiteboardRequest {
    data_uri: String,
}

async fn replace_whiteboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<WhiteboardRequest>,
) -> Response {
    let mut session = state.session.lock().await;
    if let Err(e) = expect_kind(&session, id, FileKind::Whiteboard) {
        return error_response(e);
    }
    let snapshot = match whiteboard::Snapshot::parse(&req.data_uri) {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(e.into()),
    };
    if let Err(e) = session.store.update_content(id, snapshot.into_content()) {
        return error_response(e.into());
    }
    state.session.emit(WorkspaceEvent::FileUpdated { id });
    file_response(&session, id)
}

// ── Tabs ────────────────────────────────────────────────────────────────

async fn open_tab(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let mut session = state.session.lock().await;
    if let Err(e) = session.store.open_tab(id) {
        return error_response(e.into());
    }
    state.session.emit(WorkspaceEvent::TabOpened { id });
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Serialize)]
struct CloseTabResponse {
    active_tab: Option<Uuid>,
}

async fn close_tab(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let mut session = state.session.lock().await;
    session.store.close_tab(id);
    let active = session.store.active_tab();
    state
        .session
        .emit(WorkspaceEvent::TabClosed { id, active });
    Json(CloseTabResponse { active_tab: active }).into_response()
}

// ── Assistant & runner ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatSendRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatSendResponse {
    chat_id: Uuid,
    messages: Vec<ChatMessage>,
    specialist: Option<String>,
}

async fn chat_send(
    State(state): State<AppState>,
    Json(req): Json<ChatSendRequest>,
) -> Response {
    match state.assistant.send(&state.session, &req.text).await {
        Ok(outcome) => Json(ChatSendResponse {
            chat_id: outcome.chat_id,
            messages: outcome.messages,
            specialist: outcome.specialist,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct RunRequest {
    #[serde(default)]
    file_id: Option<Uuid>,
}

async fn run_code(State(state): State<AppState>, Json(req): Json<RunRequest>) -> Response {
    // Default to the active file when no target was named.
    let file_id = match req.file_id {
        Some(id) => id,
        None => {
            let session = state.session.lock().await;
            match session.store.active_file() {
                Some(file) if file.kind == FileKind::Code => file.id,
                _ => return error_response(AssistantError::NoCodeFile.into()),
            }
        }
    };
    match state.runner.run(&state.session, file_id).await {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => error_response(e),
    }
}

// ── Terminal ────────────────────────────────────────────────────────────

async fn get_terminal(State(state): State<AppState>) -> Json<Vec<TerminalEntry>> {
    let session = state.session.lock().await;
    Json(session.terminal.entries().to_vec())
}

async fn clear_terminal(State(state): State<AppState>) -> StatusCode {
    let mut session = state.session.lock().await;
    session.terminal.clear();
    state.session.emit(WorkspaceEvent::TerminalCleared);
    StatusCode::NO_CONTENT
}
