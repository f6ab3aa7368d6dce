use axum::{
    Json,
    extract::{self, Path, State},
    http::StatusCode,
};
use models_orders::Order;
use models_pool::SenderRole;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::context::AppState;
use crate::api::error_response;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequestBody {
    pub actor: SenderRole,
    /// One of the seller's configured shipping method ids.
    pub shipping_method_id: String,
}

#[utoipa::path(
        post,
        tag = "pool-requests",
        path = "/pool/requests/{id}/finalize",
        operation_id = "finalize_request",
        responses(
            (status = 201, body = Order),
            (status = 400, body = String),
            (status = 403, body = String),
            (status = 404, body = String),
            (status = 409, body = String),
            (status = 503, body = String),
        )
    )]
#[tracing::instrument(skip(ctx, body), fields(actor = %body.actor, shipping_method = %body.shipping_method_id))]
pub async fn finalize_request_handler(
    State(ctx): State<AppState>,
    Path(id): Path<Uuid>,
    extract::Json(body): extract::Json<FinalizeRequestBody>,
) -> Result<(StatusCode, Json<Order>), (StatusCode, String)> {
    let order = ctx
        .service
        .finalize(id, body.actor, &body.shipping_method_id)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(order)))
}
