use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use grc_client::ClientError;
use grc_oplog::DraftError;
use grc_pipeline::{PipelineError, PublishingState};
use grc_protocol::{ErrorBody, ProtocolError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid operation: {0}")]
    Draft(#[from] DraftError),

    #[error("{0}")]
    Client(#[from] ClientError),

    /// A pipeline step failed; the state after the failure goes back to the
    /// caller alongside the error.
    #[error("{error}")]
    Pipeline {
        error: PipelineError,
        state: Box<PublishingState>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn pipeline(error: PipelineError, state: &PublishingState) -> Self {
        Self::Pipeline {
            error,
            state: Box::new(state.clone()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Draft(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Pipeline { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Client(e) => match e {
                ClientError::InvalidUrl(_)
                | ClientError::Protocol(ProtocolError::InvalidTxHash(_))
                | ClientError::Protocol(ProtocolError::InvalidSpaceId(_)) => StatusCode::BAD_REQUEST,
                ClientError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request refused");
        }

        let message = self.to_string();
        match self {
            Self::Pipeline { state, .. } => (
                status,
                Json(json!({
                    "error": message,
                    "state": state,
                })),
            )
                .into_response(),
            Self::Client(e) => {
                let mut body = ErrorBody::new(message);
                if let Some((upstream_status, upstream_body)) = e.upstream() {
                    body.upstream_status = upstream_status;
                    body.upstream_body = Some(upstream_body);
                }
                (status, Json(body)).into_response()
            }
            _ => (status, Json(ErrorBody::new(message))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use grc_pipeline::PipelineStep;

    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServerError::Client(ClientError::Api { status: 500, message: "boom".into() }).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ServerError::Client(ClientError::InvalidUrl("ftp://x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::Client(ClientError::Protocol(ProtocolError::InvalidSpaceId("a/b".into())))
                .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::pipeline(PipelineError::EmptyLog, &PublishingState::default()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn pipeline_error_keeps_state() {
        let mut state = PublishingState::new("s");
        state.current_step = PipelineStep::AwaitingCallData;
        let err = ServerError::pipeline(PipelineError::MissingSpaceId, &state);
        match err {
            ServerError::Pipeline { state, .. } => assert_eq!(state.current_step, PipelineStep::AwaitingCallData),
            other => panic!("unexpected {other:?}"),
        }
    }
}
