use axum::{
    Json,
    extract::{self, Path, State},
    http::StatusCode,
};
use models_pool::{DispensaryProfile, DispensaryStatus};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::context::AppState;
use crate::api::error_response;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusBody {
    pub status: DispensaryStatus,
}

#[utoipa::path(
        post,
        tag = "dispensaries",
        path = "/dispensaries/{id}/status",
        operation_id = "set_dispensary_status",
        responses(
            (status = 200, body = DispensaryProfile),
            (status = 400, body = String),
            (status = 404, body = String),
        )
    )]
#[tracing::instrument(skip(ctx, body), fields(status = %body.status))]
pub async fn set_status_handler(
    State(ctx): State<AppState>,
    Path(id): Path<Uuid>,
    extract::Json(body): extract::Json<SetStatusBody>,
) -> Result<Json<DispensaryProfile>, (StatusCode, String)> {
    let profile = ctx
        .service
        .set_dispensary_status(id, body.status)
        .await
        .map_err(error_response)?;
    Ok(Json(profile))
}
