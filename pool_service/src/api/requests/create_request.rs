use axum::{
    Json,
    extract::{self, State},
    http::StatusCode,
};
use models_pool::ProductRequest;

use crate::api::context::AppState;
use crate::api::error_response;
use crate::service::CreateRequestInput;

#[utoipa::path(
        post,
        tag = "pool-requests",
        path = "/pool/requests",
        operation_id = "create_request",
        responses(
            (status = 201, body = ProductRequest),
            (status = 400, body = String),
            (status = 404, body = String),
        )
    )]
#[tracing::instrument(skip(ctx, req), fields(product = %req.product_name))]
pub async fn create_request_handler(
    State(ctx): State<AppState>,
    extract::Json(req): extract::Json<CreateRequestInput>,
) -> Result<(StatusCode, Json<ProductRequest>), (StatusCode, String)> {
    let request = ctx
        .service
        .create_request(req)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(request)))
}
