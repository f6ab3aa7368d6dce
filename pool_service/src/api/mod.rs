use axum::{Json, Router, http::StatusCode, routing::IntoMakeService, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api::context::AppState;
use crate::error::PoolError;

pub mod context;
pub mod credits;
pub mod dispensaries;
pub mod health;
pub mod requests;
pub mod swagger;

type Service = IntoMakeService<Router>;

pub fn service(app_state: AppState) -> Service {
    let app = Router::new()
        .nest("/pool/requests", requests::router())
        .nest("/credits", credits::router())
        .nest("/dispensaries", dispensaries::router())
        .with_state(app_state)
        .merge(health::router())
        .route(
            "/api-doc/openapi.json",
            get(|| async { Json(swagger::ApiDoc::openapi()) }),
        )
        .layer(TraceLayer::new_for_http());

    app.into_make_service()
}

/// Maps a core failure to its HTTP representation.
pub(crate) fn error_response(err: PoolError) -> (StatusCode, String) {
    let status = match &err {
        PoolError::Validation(_) => StatusCode::BAD_REQUEST,
        PoolError::NotFound(_) => StatusCode::NOT_FOUND,
        PoolError::ConcurrencyConflict(_) => StatusCode::CONFLICT,
        PoolError::Unauthorized(_) => StatusCode::FORBIDDEN,
        PoolError::Dependency(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, err.to_string())
}
