use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

// Notes embed photos as data URIs, well past axum's 2 MB default.
pub const NOTE_BODY_LIMIT: usize = 32 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/select", post(handlers::select_form))
        .route("/add", post(handlers::add_form))
        .route("/edit/:index", post(handlers::edit_form))
        .route("/delete/:index", post(handlers::delete_form))
        .route(
            "/save",
            post(handlers::save_form).layer(DefaultBodyLimit::max(NOTE_BODY_LIMIT)),
        )
        .route("/cancel", post(handlers::cancel_form))
        .route("/api/state", get(handlers::get_state))
        .route("/api/records/:date", get(handlers::get_records))
        .route("/api/select", post(handlers::select))
        .route(
            "/api/field",
            post(handlers::field).layer(DefaultBodyLimit::max(NOTE_BODY_LIMIT)),
        )
        .route(
            "/api/image",
            post(handlers::image).layer(DefaultBodyLimit::max(NOTE_BODY_LIMIT)),
        )
        .route("/api/add", post(handlers::add))
        .route("/api/edit", post(handlers::edit))
        .route("/api/delete", post(handlers::delete))
        .route("/api/save", post(handlers::save))
        .route("/api/cancel", post(handlers::cancel))
        .with_state(state)
}
