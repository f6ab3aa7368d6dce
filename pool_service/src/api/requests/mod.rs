use axum::{
    Router,
    routing::{get, post},
};
use models_pool::SenderRole;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::context::AppState;

pub mod accept_request;
pub mod add_note;
pub mod cancel_request;
pub mod confirm_request;
pub mod create_request;
pub mod finalize_request;
pub mod fulfil_request;
pub mod get_request;
pub mod receive_request;
pub mod reject_request;
pub mod report_issue;

/// Body shared by the plain transition endpoints: which side of the
/// request the caller is acting as. The service enforces that the action
/// is legal for that party.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionBody {
    pub actor: SenderRole,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_request::create_request_handler))
        .route("/{id}", get(get_request::get_request_handler))
        .route("/{id}/accept", post(accept_request::accept_request_handler))
        .route("/{id}/reject", post(reject_request::reject_request_handler))
        .route("/{id}/cancel", post(cancel_request::cancel_request_handler))
        .route(
            "/{id}/confirm",
            post(confirm_request::confirm_request_handler),
        )
        .route("/{id}/fulfil", post(fulfil_request::fulfil_request_handler))
        .route(
            "/{id}/receive",
            post(receive_request::receive_request_handler),
        )
        .route("/{id}/issue", post(report_issue::report_issue_handler))
        .route("/{id}/notes", post(add_note::add_note_handler))
        .route(
            "/{id}/finalize",
            post(finalize_request::finalize_request_handler),
        )
}
