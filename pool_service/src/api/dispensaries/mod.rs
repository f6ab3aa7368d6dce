use axum::{Router, routing::post};

use crate::api::context::AppState;

pub mod approve_dispensary;
pub mod set_status;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/approve",
            post(approve_dispensary::approve_dispensary_handler),
        )
        .route("/{id}/status", post(set_status::set_status_handler))
}
