use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use grc_protocol::{CallDataProxyRequest, HealthResponse, VerifyQuery, VerifyResponse};
use grc_types::CallData;
use serde::Deserialize;
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "grc-server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": grc_protocol::PROTOCOL_VERSION,
        "network": state.config.network,
        "api_base_url": state.config.api_base_url(),
    }))
}

/// `POST /calldata-proxy`: ask the edit API for call data on the caller's
/// behalf and hand back the normalized `{to, data}`.
pub async fn calldata_proxy_handler(
    State(state): State<AppState>,
    Json(req): Json<CallDataProxyRequest>,
) -> ServerResult<Json<CallData>> {
    if req.space_id.trim().is_empty() {
        return Err(ServerError::BadRequest("spaceId is required".into()));
    }
    if req.cid.trim().is_empty() {
        return Err(ServerError::BadRequest("cid is required".into()));
    }
    let network = req.network.unwrap_or(state.config.network);
    let call_data = state
        .call_data_service(network)
        .fetch(req.space_id.trim(), req.cid.trim(), network)
        .await?;
    tracing::info!(space_id = %req.space_id, %network, to = %call_data.to, "call data proxied");
    Ok(Json(call_data))
}

/// `GET /verify-transaction?txHash=..&spaceId=..`
pub async fn verify_transaction_handler(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> ServerResult<Json<VerifyResponse>> {
    let response = state
        .verifier
        .verify(query.tx_hash.trim(), query.space_id.as_deref())
        .await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// `GET|POST /generic-proxy?url=..`: forward method, body and content type;
/// return the upstream status and body unchanged.
pub async fn generic_proxy_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<ProxyQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Response> {
    let target = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("url query parameter is required".into()))?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let upstream = grc_client::forward(&state.http, method, &target, content_type, body).await?;
    tracing::info!(%target, status = upstream.status, "proxied");

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, upstream.body).into_response();
    if let Some(ct) = upstream.content_type.and_then(|ct| ct.parse().ok()) {
        response.headers_mut().insert(header::CONTENT_TYPE, ct);
    }
    Ok(response)
}
