//! Router configuration for the listgate API.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_list, get_list, list_lists, list_members, send_mail, subscribe, unsubscribe, AppState,
};
use super::middleware::{create_cors_layer, security_headers};

/// Create the API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(list_lists))
        .route("/:list", get(get_list).put(create_list).post(send_mail))
        .route(
            "/:list/members",
            get(list_members).put(subscribe).delete(unsubscribe),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state)
}
