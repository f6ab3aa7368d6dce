use axum::{
    Json,
    extract::{self, Path, State},
    http::StatusCode,
};
use models_pool::{ProductRequest, SenderRole};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::context::AppState;
use crate::api::error_response;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteBody {
    pub note: String,
    pub by_name: String,
    pub sender_role: SenderRole,
}

#[utoipa::path(
        post,
        tag = "pool-requests",
        path = "/pool/requests/{id}/notes",
        operation_id = "add_note",
        responses(
            (status = 200, body = ProductRequest),
            (status = 400, body = String),
            (status = 404, body = String),
        )
    )]
#[tracing::instrument(skip(ctx, body), fields(sender = %body.sender_role))]
pub async fn add_note_handler(
    State(ctx): State<AppState>,
    Path(id): Path<Uuid>,
    extract::Json(body): extract::Json<AddNoteBody>,
) -> Result<Json<ProductRequest>, (StatusCode, String)> {
    let request = ctx
        .service
        .append_note(id, body.note, body.by_name, body.sender_role)
        .await
        .map_err(error_response)?;
    Ok(Json(request))
}
