pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/options", get(handlers::handle_options))
        // Interview sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            put(handlers::handle_submit_profile),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(handlers::handle_submit_answer),
        )
        .route("/api/v1/sessions/:id/actions", post(handlers::handle_action))
        .with_state(state)
}
