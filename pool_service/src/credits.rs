//! Advisor-chat credits deduction.
//!
//! The deduction is a conditional store update: the balance check and the
//! decrement happen under one store operation, so two concurrent
//! deductions can never overdraw. Free interactions are recorded in the
//! logs but deduct nothing.

use pool_store::{IdentityResolver, PoolStore};
use sendgrid_client::EmailSender;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PoolError;
use crate::service::PoolService;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductCreditsRequest {
    pub user_id: String,
    /// Which advisor the interaction was with; log context only.
    pub advisor_slug: String,
    pub credits_to_deduct: i64,
    #[serde(default)]
    pub was_free_interaction: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductCreditsResponse {
    pub success: bool,
    pub new_credits: i64,
}

impl<S, I, E> PoolService<S, I, E>
where
    S: PoolStore,
    I: IdentityResolver,
    E: EmailSender,
{
    pub async fn deduct_credits(
        &self,
        req: DeductCreditsRequest,
    ) -> Result<DeductCreditsResponse, PoolError> {
        if req.credits_to_deduct <= 0 {
            return Err(PoolError::Validation(
                "creditsToDeduct must be a positive number".to_string(),
            ));
        }

        if req.was_free_interaction {
            let user = self.store().get_user(&req.user_id).await?;
            tracing::info!(
                user_id = %req.user_id,
                advisor = %req.advisor_slug,
                "free interaction, no credits deducted"
            );
            return Ok(DeductCreditsResponse {
                success: true,
                new_credits: user.credits,
            });
        }

        let new_credits = self
            .store()
            .deduct_credits(&req.user_id, req.credits_to_deduct)
            .await?;
        tracing::info!(
            user_id = %req.user_id,
            advisor = %req.advisor_slug,
            deducted = req.credits_to_deduct,
            new_credits,
            "credits deducted"
        );

        Ok(DeductCreditsResponse {
            success: true,
            new_credits,
        })
    }
}
