use axum::routing::{delete, get, post};
use axum::Router;
use grc_protocol::endpoints;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::session;
use crate::state::AppState;

/// Build the axum router with all publisher endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::CALLDATA_PROXY, post(handler::calldata_proxy_handler))
        .route(endpoints::VERIFY_TRANSACTION, get(handler::verify_transaction_handler))
        .route(
            endpoints::GENERIC_PROXY,
            get(handler::generic_proxy_handler).post(handler::generic_proxy_handler),
        )
        .route(
            endpoints::OPERATIONS,
            get(session::list_operations)
                .post(session::append_operation)
                .delete(session::clear_operations),
        )
        .route(endpoints::OPERATION, delete(session::remove_operation))
        .route(endpoints::ENTITIES, get(session::entities))
        .route(
            endpoints::PUBLISHING,
            get(session::publishing_state).put(session::update_publishing),
        )
        .route(endpoints::PUBLISHING_PUBLISH, post(session::publish))
        .route(endpoints::PUBLISHING_CALLDATA, post(session::request_call_data))
        .route(endpoints::PUBLISHING_SEND, post(session::send_transaction))
        .route(endpoints::PUBLISHING_ONE_CLICK, post(session::one_click))
        .route(endpoints::PUBLISHING_RESET, post(session::reset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
