//! Session API: the operation log and publishing pipeline behind one lock.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use grc_oplog::{GraphProjection, OperationDraft};
use grc_pipeline::{PipelineError, PublishingState};
use grc_types::{Operation, OperationId};
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};
use crate::state::{AppState, Session};

pub async fn list_operations(State(state): State<AppState>) -> Json<Vec<Operation>> {
    let operations = state.session.lock().await.log.snapshot();
    Json(operations)
}

/// Validate a draft and append it.
pub async fn append_operation(
    State(state): State<AppState>,
    Json(draft): Json<OperationDraft>,
) -> ServerResult<(StatusCode, Json<Operation>)> {
    let payload = draft.validate()?;
    let op = state.session.lock().await.log.append(payload);
    Ok((StatusCode::CREATED, Json(op)))
}

pub async fn clear_operations(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.log.clear();
    StatusCode::NO_CONTENT
}

pub async fn remove_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let removed = state
        .session
        .lock()
        .await
        .log
        .remove_by_id(&OperationId::from(id.as_str()));
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("operation {id}")))
    }
}

/// What the log would do to the graph if published.
pub async fn entities(State(state): State<AppState>) -> Json<GraphProjection> {
    let session = state.session.lock().await;
    Json(GraphProjection::from_operations(session.log.operations()))
}

pub async fn publishing_state(State(state): State<AppState>) -> Json<PublishingState> {
    let current = state.session.lock().await.pipeline.state().clone();
    Json(current)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishingUpdate {
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub operation_name: Option<String>,
}

pub async fn update_publishing(
    State(state): State<AppState>,
    Json(update): Json<PublishingUpdate>,
) -> Json<PublishingState> {
    let mut session = state.session.lock().await;
    if let Some(space_id) = update.space_id {
        session.pipeline.set_space_id(space_id);
    }
    if let Some(name) = update.operation_name {
        session.pipeline.set_operation_name(name);
    }
    Json(session.pipeline.state().clone())
}

fn respond<T>(session: &Session, result: Result<T, PipelineError>) -> ServerResult<Json<PublishingState>> {
    match result {
        Ok(_) => Ok(Json(session.pipeline.state().clone())),
        Err(e) => Err(ServerError::pipeline(e, session.pipeline.state())),
    }
}

pub async fn publish(State(state): State<AppState>) -> ServerResult<Json<PublishingState>> {
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let result = session.pipeline.publish(session.log.operations()).await;
    respond(session, result)
}

pub async fn request_call_data(State(state): State<AppState>) -> ServerResult<Json<PublishingState>> {
    let mut session = state.session.lock().await;
    let result = session.pipeline.request_call_data().await;
    respond(&session, result)
}

pub async fn send_transaction(State(state): State<AppState>) -> ServerResult<Json<PublishingState>> {
    let mut session = state.session.lock().await;
    let result = session.pipeline.send_transaction().await;
    respond(&session, result)
}

pub async fn one_click(State(state): State<AppState>) -> ServerResult<Json<PublishingState>> {
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let result = session.pipeline.publish_all(session.log.operations()).await;
    respond(session, result)
}

pub async fn reset(State(state): State<AppState>) -> Json<PublishingState> {
    let mut session = state.session.lock().await;
    session.pipeline.reset();
    Json(session.pipeline.state().clone())
}
