mod board;
mod middleware;
mod state;

pub use state::BoardAppState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use self::middleware::{log_responses, set_request_context};

pub fn build_router(state: BoardAppState) -> Router {
    Router::new()
        .route("/", get(board::board_page))
        .route("/search", post(board::board_search))
        .route("/more", post(board::board_load_more))
        .route("/refresh", post(board::board_refresh))
        .route("/modal/new", post(board::modal_new))
        .route("/modal/close", post(board::modal_close))
        .route("/modal/submit", post(board::modal_submit))
        .route("/posts/{id}/edit", post(board::post_edit))
        .route("/posts/{id}/delete", post(board::post_delete))
        .route("/health", get(board::health))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .with_state(state)
}
