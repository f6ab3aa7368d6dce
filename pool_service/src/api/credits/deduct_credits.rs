use axum::{
    Json,
    extract::{self, State},
    http::StatusCode,
};

use crate::api::context::AppState;
use crate::api::error_response;
use crate::credits::{DeductCreditsRequest, DeductCreditsResponse};

#[utoipa::path(
        post,
        tag = "credits",
        path = "/credits/deduct",
        operation_id = "deduct_credits",
        responses(
            (status = 200, body = DeductCreditsResponse),
            (status = 400, body = String),
            (status = 404, body = String),
        )
    )]
#[tracing::instrument(skip(ctx, req), fields(user_id = %req.user_id, advisor = %req.advisor_slug))]
pub async fn deduct_credits_handler(
    State(ctx): State<AppState>,
    extract::Json(req): extract::Json<DeductCreditsRequest>,
) -> Result<Json<DeductCreditsResponse>, (StatusCode, String)> {
    let res = ctx
        .service
        .deduct_credits(req)
        .await
        .map_err(error_response)?;
    Ok(Json(res))
}
