use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/sessions", post(handlers::create_session))
        .route("/api/sessions/:id", get(handlers::get_session))
        .route("/api/sessions/:id/profile", put(handlers::update_profile))
        .route("/api/sessions/:id/days/:day", put(handlers::update_day))
        .route("/api/sessions/:id/notes", put(handlers::update_notes))
        .route("/api/sessions/:id/export", post(handlers::export_csv))
        .with_state(state)
}
