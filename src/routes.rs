use super::{controllers, middleware, models};
use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put, Router},
};
use tower_http::trace::TraceLayer;

#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    Router::new()
        .route("/notes", get(controllers::list_notes))
        .route("/notes", post(controllers::create_note))
        .route("/notes/search", get(controllers::search_notes))
        .route("/notes/:id", get(controllers::get_note))
        .route("/notes/:id", put(controllers::update_note))
        .route("/notes/:id", delete(controllers::delete_note))
        .fallback(controllers::not_found)
}

/// The full application: routes, middleware and state.
pub fn build_app(state: models::AppState) -> Router {
    get_routes()
        .layer(from_fn(middleware::json_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
