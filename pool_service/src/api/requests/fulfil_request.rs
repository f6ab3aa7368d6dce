use axum::{
    Json,
    extract::{self, Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use models_pool::{ProductRequest, SenderRole};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::context::AppState;
use crate::api::error_response;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FulfilRequestBody {
    pub actor: SenderRole,
    /// When the goods went out; defaults to now.
    pub actual_delivery_date: Option<DateTime<Utc>>,
}

#[utoipa::path(
        post,
        tag = "pool-requests",
        path = "/pool/requests/{id}/fulfil",
        operation_id = "fulfil_request",
        responses(
            (status = 200, body = ProductRequest),
            (status = 403, body = String),
            (status = 404, body = String),
            (status = 409, body = String),
        )
    )]
#[tracing::instrument(skip(ctx, body), fields(actor = %body.actor))]
pub async fn fulfil_request_handler(
    State(ctx): State<AppState>,
    Path(id): Path<Uuid>,
    extract::Json(body): extract::Json<FulfilRequestBody>,
) -> Result<Json<ProductRequest>, (StatusCode, String)> {
    let request = ctx
        .service
        .mark_fulfilled(id, body.actor, body.actual_delivery_date)
        .await
        .map_err(error_response)?;
    Ok(Json(request))
}
