use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::tickets::{create_ticket, list_tickets};
use crate::context::AppContext;

pub fn build_router(context: AppContext) -> Router {
    Router::new()
        .route("/create-ticket", post(create_ticket))
        .route("/tickets", get(list_tickets))
        .with_state(context)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
