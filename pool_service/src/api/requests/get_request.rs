use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use models_pool::ProductRequest;
use uuid::Uuid;

use crate::api::context::AppState;
use crate::api::error_response;

#[utoipa::path(
        get,
        tag = "pool-requests",
        path = "/pool/requests/{id}",
        operation_id = "get_request",
        responses(
            (status = 200, body = ProductRequest),
            (status = 404, body = String),
        )
    )]
#[tracing::instrument(skip(ctx))]
pub async fn get_request_handler(
    State(ctx): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductRequest>, (StatusCode, String)> {
    let request = ctx.service.get_request(id).await.map_err(error_response)?;
    Ok(Json(request))
}
