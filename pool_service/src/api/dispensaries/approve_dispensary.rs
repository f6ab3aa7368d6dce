use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use models_pool::DispensaryProfile;
use uuid::Uuid;

use crate::api::context::AppState;
use crate::api::error_response;

#[utoipa::path(
        post,
        tag = "dispensaries",
        path = "/dispensaries/{id}/approve",
        operation_id = "approve_dispensary",
        responses(
            (status = 200, body = DispensaryProfile),
            (status = 400, body = String),
            (status = 404, body = String),
        )
    )]
#[tracing::instrument(skip(ctx))]
pub async fn approve_dispensary_handler(
    State(ctx): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DispensaryProfile>, (StatusCode, String)> {
    let profile = ctx
        .service
        .approve_dispensary(id)
        .await
        .map_err(error_response)?;
    Ok(Json(profile))
}
