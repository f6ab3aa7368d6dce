use axum::{
    Json,
    extract::{self, Path, State},
    http::StatusCode,
};
use models_pool::ProductRequest;
use uuid::Uuid;

use crate::api::context::AppState;
use crate::api::error_response;
use crate::api::requests::ActionBody;

#[utoipa::path(
        post,
        tag = "pool-requests",
        path = "/pool/requests/{id}/confirm",
        operation_id = "confirm_request",
        responses(
            (status = 200, body = ProductRequest),
            (status = 403, body = String),
            (status = 404, body = String),
            (status = 409, body = String),
        )
    )]
#[tracing::instrument(skip(ctx, body), fields(actor = %body.actor))]
pub async fn confirm_request_handler(
    State(ctx): State<AppState>,
    Path(id): Path<Uuid>,
    extract::Json(body): extract::Json<ActionBody>,
) -> Result<Json<ProductRequest>, (StatusCode, String)> {
    let request = ctx
        .service
        .confirm(id, body.actor)
        .await
        .map_err(error_response)?;
    Ok(Json(request))
}
