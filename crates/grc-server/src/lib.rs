//! HTTP server for the GRC-20 edit publisher.
//!
//! Two groups of endpoints share one router:
//!
//! - stateless proxies (`/calldata-proxy`, `/verify-transaction`,
//!   `/generic-proxy`) that call remote services on a caller's behalf
//! - the session API under `/v1` that drives one operation log and one
//!   publishing pipeline, serialized behind a mutex

pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod session;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use server::GrcServer;
pub use state::{AppState, Session};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use grc_pipeline::fakes::{FakeCallData, FakePublisher, FakeSigner};
    use grc_pipeline::{PipelineServices, ServiceError};
    use grc_types::{AppConfig, CallData};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const HASH: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.default_space_id = "space-1".into();
        config
    }

    fn happy_services() -> PipelineServices {
        PipelineServices::new(
            Arc::new(FakePublisher::succeeding("cid123")),
            Arc::new(FakeCallData::succeeding(CallData::new("0xAAA", "0xBEEF"))),
            Arc::new(FakeSigner::succeeding("0xHASH")),
        )
    }

    fn app_with(config: AppConfig, services: PipelineServices) -> Router {
        router::build_router(AppState::with_services(config, services).unwrap())
    }

    fn app() -> Router {
        app_with(config(), happy_services())
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, value)
    }

    async fn add_triple(app: &Router) -> Value {
        let (status, op) = call(
            app,
            "POST",
            "/v1/operations",
            Some(json!({"kind": "AddTriple", "entityId": "E1", "attributeId": "A1", "rawValue": "Alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        op
    }

    // -----------------------------------------------------------------------
    // 1. Health and info
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = call(&app(), "GET", "/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (status, body) = call(&app(), "GET", "/v1/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "grc-server");
        assert_eq!(body["network"], "TESTNET");
    }

    // -----------------------------------------------------------------------
    // 2. Call-data proxy
    // -----------------------------------------------------------------------
    async fn upstream_app(upstream: &MockServer) -> Router {
        let mut config = config();
        config.api.testnet_url = upstream.uri();
        app_with(config, happy_services())
    }

    #[tokio::test]
    async fn calldata_proxy_normalizes_wrapped_response() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/space/space-1/edit/calldata"))
            .and(body_json(json!({"cid": "cid123", "network": "TESTNET"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"result": {"to": "0xAAA", "data": "0xBEEF"}}),
            ))
            .expect(1)
            .mount(&upstream)
            .await;

        let app = upstream_app(&upstream).await;
        let (status, body) = call(
            &app,
            "POST",
            "/calldata-proxy",
            Some(json!({"spaceId": "space-1", "cid": "cid123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"to": "0xAAA", "data": "0xBEEF"}));
    }

    #[tokio::test]
    async fn calldata_proxy_unusable_body_is_bad_gateway() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"queued": true})))
            .mount(&upstream)
            .await;

        let app = upstream_app(&upstream).await;
        let (status, body) = call(
            &app,
            "POST",
            "/calldata-proxy",
            Some(json!({"spaceId": "space-1", "cid": "cid123"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["upstreamBody"].as_str().unwrap().contains("queued"));
    }

    #[tokio::test]
    async fn calldata_proxy_surfaces_upstream_status() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("edit api down"))
            .mount(&upstream)
            .await;

        let app = upstream_app(&upstream).await;
        let (status, body) = call(
            &app,
            "POST",
            "/calldata-proxy",
            Some(json!({"spaceId": "space-1", "cid": "cid123"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["upstreamStatus"], 500);
        assert_eq!(body["upstreamBody"], "edit api down");
    }

    #[tokio::test]
    async fn calldata_proxy_requires_space_and_cid() {
        let (status, body) = call(
            &app(),
            "POST",
            "/calldata-proxy",
            Some(json!({"spaceId": " ", "cid": "cid123"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("spaceId"));
    }

    #[tokio::test]
    async fn calldata_proxy_refuses_space_id_outside_its_segment() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"to": "0xAAA", "data": "0xBEEF"})))
            .expect(0)
            .mount(&upstream)
            .await;

        let app = upstream_app(&upstream).await;
        for space_id in ["../ipfs/upload-edit?", "space-1/../../x", "space-1#"] {
            let (status, body) = call(
                &app,
                "POST",
                "/calldata-proxy",
                Some(json!({"spaceId": space_id, "cid": "cid123"})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{space_id}");
            assert!(body["error"].as_str().unwrap().contains("invalid space id"));
        }
    }

    // -----------------------------------------------------------------------
    // 3. Transaction verification
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn verify_reports_unknown_without_sources() {
        let uri = format!("/verify-transaction?txHash={HASH}&spaceId=space-1");
        let (status, body) = call(&app(), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], "unknown");
        assert_eq!(body["indexed"], "unknown");
        assert_eq!(body["txHash"], HASH);
        assert_eq!(body["spaceId"], "space-1");
    }

    #[tokio::test]
    async fn verify_rejects_malformed_hash() {
        let (status, _) = call(&app(), "GET", "/verify-transaction?txHash=0xHASH", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // -----------------------------------------------------------------------
    // 4. Generic proxy
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn generic_proxy_passes_status_and_body_through() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(
                ResponseTemplate::new(418)
                    .set_body_raw(b"{\"teapot\":true}".to_vec(), "application/json"),
            )
            .mount(&upstream)
            .await;

        let uri = format!("/generic-proxy?url={}/thing", upstream.uri());
        let (status, body) = call(&app(), "GET", &uri, None).await;
        assert_eq!(status.as_u16(), 418);
        assert_eq!(body, json!({"teapot": true}));
    }

    #[tokio::test]
    async fn generic_proxy_keeps_upstream_content_type() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"a,b\n1,2\n".to_vec(), "text/csv"))
            .mount(&upstream)
            .await;

        let request = Request::builder()
            .uri(format!("/generic-proxy?url={}/export", upstream.uri()))
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn generic_proxy_forwards_post_body() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"q": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"echo": 1})))
            .expect(1)
            .mount(&upstream)
            .await;

        let uri = format!("/generic-proxy?url={}/", upstream.uri());
        let (status, body) = call(&app(), "POST", &uri, Some(json!({"q": 1}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["echo"], 1);
    }

    #[tokio::test]
    async fn generic_proxy_validates_target() {
        let (status, _) = call(&app(), "GET", "/generic-proxy", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&app(), "GET", "/generic-proxy?url=file:///etc/hosts", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // -----------------------------------------------------------------------
    // 5. Session: operation log
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn operations_append_list_remove() {
        let app = app();
        let op = add_triple(&app).await;
        assert_eq!(op["kind"], "AddTriple");

        let (_, list) = call(&app, "GET", "/v1/operations", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (_, entities) = call(&app, "GET", "/v1/entities", None).await;
        assert!(entities["entities"].get("E1").is_some());

        let uri = format!("/v1/operations/{}", op["id"].as_str().unwrap());
        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = call(&app, "GET", "/v1/operations", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn incomplete_draft_is_rejected() {
        let app = app();
        let (status, body) = call(
            &app,
            "POST",
            "/v1/operations",
            Some(json!({"kind": "AddRelation", "fromEntityId": "E1", "toEntityId": "E2"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("relationTypeId"));

        let (_, list) = call(&app, "GET", "/v1/operations", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn clear_empties_the_log() {
        let app = app();
        add_triple(&app).await;
        add_triple(&app).await;
        let (status, _) = call(&app, "DELETE", "/v1/operations", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, list) = call(&app, "GET", "/v1/operations", None).await;
        assert_eq!(list, json!([]));
    }

    // -----------------------------------------------------------------------
    // 6. Session: publishing pipeline
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn one_click_publishes_the_log() {
        let app = app();
        add_triple(&app).await;
        let (_, state) = call(&app, "PUT", "/v1/publishing", Some(json!({"operationName": "test"}))).await;
        assert_eq!(state["operationName"], "test");
        assert_eq!(state["spaceId"], "space-1");

        let (status, state) = call(&app, "POST", "/v1/publishing/one-click", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["currentStep"], 4);
        assert_eq!(state["contentId"], "cid123");
        assert_eq!(state["callData"], json!({"to": "0xAAA", "data": "0xBEEF"}));
        assert_eq!(state["transactionHash"], "0xHASH");
    }

    #[tokio::test]
    async fn publishing_empty_log_is_unprocessable() {
        let app = app();
        call(&app, "PUT", "/v1/publishing", Some(json!({"operationName": "test"}))).await;
        let (status, body) = call(&app, "POST", "/v1/publishing/publish", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "no operations to publish");
        assert_eq!(body["state"]["currentStep"], 1);
        assert_eq!(body["state"]["contentId"], Value::Null);
    }

    #[tokio::test]
    async fn manual_steps_and_call_data_failure() {
        let services = PipelineServices::new(
            Arc::new(FakePublisher::succeeding("cid123")),
            Arc::new(FakeCallData::scripted(vec![
                Err(ServiceError::transport("timeout")),
                Ok(CallData::new("0xAAA", "0xBEEF")),
            ])),
            Arc::new(FakeSigner::succeeding("0xHASH")),
        );
        let app = app_with(config(), services);
        add_triple(&app).await;
        call(&app, "PUT", "/v1/publishing", Some(json!({"operationName": "test"}))).await;

        let (status, state) = call(&app, "POST", "/v1/publishing/publish", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["currentStep"], 3);

        let (status, body) = call(&app, "POST", "/v1/publishing/calldata", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["state"]["currentStep"], 3);
        assert_eq!(body["state"]["contentId"], "cid123");

        let (status, state) = call(&app, "POST", "/v1/publishing/calldata", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["currentStep"], 4);

        let (status, state) = call(&app, "POST", "/v1/publishing/send", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["transactionHash"], "0xHASH");

        let (status, _) = call(&app, "POST", "/v1/publishing/send", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn reset_keeps_space_and_name() {
        let app = app();
        add_triple(&app).await;
        call(&app, "PUT", "/v1/publishing", Some(json!({"operationName": "test"}))).await;
        call(&app, "POST", "/v1/publishing/one-click", None).await;

        let (status, state) = call(&app, "POST", "/v1/publishing/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["currentStep"], 1);
        assert_eq!(state["spaceId"], "space-1");
        assert_eq!(state["operationName"], "test");
        assert_eq!(state["transactionHash"], Value::Null);
        assert_eq!(state["status"], "Ready");
    }
}
