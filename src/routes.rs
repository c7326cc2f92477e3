// routes.rs
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{handlers, AppState};

/// Wires the URL table to the handlers. The original routing table used one
/// ambiguous pattern for both delete routes; the choice route is namespaced
/// under `/choice/` to keep the paths distinct.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add/", post(handlers::add_question))
        .route("/{question_id}/", get(handlers::detail))
        .route("/{question_id}/delete/", post(handlers::delete_question))
        .route("/{question_id}/add/", post(handlers::add_choice))
        .route("/{question_id}/results/", get(handlers::results))
        .route("/{question_id}/vote/", post(handlers::vote))
        .route(
            "/choice/{choice_id}/delete/",
            get(handlers::delete_choice).post(handlers::delete_choice),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
