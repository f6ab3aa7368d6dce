use axum::{Router, routing::post};

use crate::api::context::AppState;

pub mod deduct_credits;

pub fn router() -> Router<AppState> {
    Router::new().route("/deduct", post(deduct_credits::deduct_credits_handler))
}
