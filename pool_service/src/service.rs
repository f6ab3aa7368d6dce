//! The request lifecycle service.
//!
//! [`PoolService`] owns the workflow: it loads the request, consults the
//! transition table, applies the mutation under a conditional write, and
//! dispatches any resulting notification. Notifications never fail a
//! transition; conditional-write conflicts surface as
//! [`PoolError::ConcurrencyConflict`] so callers can refresh and retry.

use chrono::{DateTime, Utc};
use models_orders::Order;
use models_pool::{
    DeliveryAddress, DispensaryStatus, PriceTier, ProductRequest, RequestNote, RequestStatus,
    SenderRole,
};
use pool_store::{IdentityResolver, PoolStore, RequestUpdate};
use sendgrid_client::EmailSender;
use uuid::Uuid;

use crate::error::PoolError;
use crate::materialize::build_order;
use crate::notification::{
    dispatch_best_effort, notice_for_created, notice_for_finalized, notice_for_note,
    notice_for_transition,
};
use crate::state::{RequestAction, Transition, transition};

/// Input for opening a new pool request. Party names, emails, and the tax
/// context are resolved from the dispensary profiles, not trusted from the
/// caller.
#[derive(Debug, Clone, serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestInput {
    pub requester_user_id: String,
    pub requester_dispensary_id: Uuid,
    pub product_owner_dispensary_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_image: Option<String>,
    pub requested_tier: Option<PriceTier>,
    pub quantity_requested: u32,
    pub delivery_address: Option<DeliveryAddress>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub preferred_delivery_date: Option<DateTime<Utc>>,
    /// Optional opening message, stored as the first note in the thread.
    pub note: Option<String>,
}

/// Checks a tier can be transacted at `now` for the requested quantity.
/// Applied when the request is opened and again when the owner accepts,
/// since the tier may have expired or sold down in between.
fn validate_tier(
    tier: &PriceTier,
    quantity_requested: u32,
    now: DateTime<Utc>,
) -> Result<(), PoolError> {
    if tier.price_cents < 0 {
        return Err(PoolError::Validation(format!(
            "the {} tier has a negative price",
            tier.unit,
        )));
    }
    if !tier.is_acceptable_at(now) {
        return Err(PoolError::Validation(format!(
            "the {} tier is expired or out of stock",
            tier.unit,
        )));
    }
    if quantity_requested > tier.quantity_in_stock {
        return Err(PoolError::Validation(format!(
            "only {} × {} in stock",
            tier.quantity_in_stock, tier.unit,
        )));
    }
    Ok(())
}

pub struct PoolService<S, I, E> {
    store: S,
    identity: I,
    email: E,
    /// Absolute front-end origin used to build notification links.
    base_url: String,
}

impl<S, I, E> PoolService<S, I, E>
where
    S: PoolStore,
    I: IdentityResolver,
    E: EmailSender,
{
    pub fn new(store: S, identity: I, email: E, base_url: String) -> Self {
        Self {
            store,
            identity,
            email,
            base_url,
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub async fn get_request(&self, id: Uuid) -> Result<ProductRequest, PoolError> {
        Ok(self.store.get_request(id).await?)
    }

    /// Opens a new request in `pending_owner_approval` and notifies the
    /// product owner.
    pub async fn create_request(
        &self,
        input: CreateRequestInput,
    ) -> Result<ProductRequest, PoolError> {
        let now = Utc::now();

        if input.quantity_requested == 0 {
            return Err(PoolError::Validation(
                "quantity requested must be at least 1".to_string(),
            ));
        }
        if input.requester_dispensary_id == input.product_owner_dispensary_id {
            return Err(PoolError::Validation(
                "a dispensary cannot request its own pooled stock".to_string(),
            ));
        }

        let requester = self
            .store
            .get_dispensary(input.requester_dispensary_id)
            .await?;
        let owner = self
            .store
            .get_dispensary(input.product_owner_dispensary_id)
            .await?;
        if owner.status != DispensaryStatus::Active {
            return Err(PoolError::Validation(format!(
                "{} is not active and cannot receive pool requests",
                owner.name,
            )));
        }

        if let Some(tier) = &input.requested_tier {
            validate_tier(tier, input.quantity_requested, now)?;
        }

        let notes = input
            .note
            .into_iter()
            .map(|note| RequestNote {
                note,
                by_name: requester.name.clone(),
                sender_role: SenderRole::Requester,
                timestamp: now,
            })
            .collect();

        let request = ProductRequest {
            id: Uuid::new_v4(),
            requester_user_id: input.requester_user_id,
            requester_dispensary_id: requester.id,
            requester_dispensary_name: requester.name.clone(),
            requester_email: requester.email.clone(),
            product_owner_dispensary_id: owner.id,
            product_owner_dispensary_name: owner.name.clone(),
            product_owner_email: owner.email.clone(),
            product_id: input.product_id,
            product_name: input.product_name,
            product_image: input.product_image,
            requested_tier: input.requested_tier,
            quantity_requested: input.quantity_requested,
            delivery_address: input.delivery_address,
            contact_person: input.contact_person,
            contact_phone: input.contact_phone,
            preferred_delivery_date: input.preferred_delivery_date,
            actual_delivery_date: None,
            status: RequestStatus::PendingOwnerApproval,
            notes,
            created_at: now,
            updated_at: now,
        };

        self.store.create_request(request.clone()).await?;
        tracing::info!(request_id = %request.id, product = %request.product_name, "pool request created");

        self.dispatch(notice_for_created(&request)).await;
        Ok(request)
    }

    pub async fn accept(&self, id: Uuid, actor: SenderRole) -> Result<ProductRequest, PoolError> {
        let now = Utc::now();
        self.transition_request(id, actor, RequestAction::Accept, move |request| {
            // Re-validate the tier at decision time; it may have expired or
            // sold down since the request was opened.
            let tier = request.requested_tier.as_ref().ok_or_else(|| {
                PoolError::Validation(
                    "this request has no price tier and cannot be accepted".to_string(),
                )
            })?;
            validate_tier(tier, request.quantity_requested, now)
        })
        .await
    }

    pub async fn reject(&self, id: Uuid, actor: SenderRole) -> Result<ProductRequest, PoolError> {
        self.transition_request(id, actor, RequestAction::Reject, |_| Ok(()))
            .await
    }

    pub async fn cancel(&self, id: Uuid, actor: SenderRole) -> Result<ProductRequest, PoolError> {
        self.transition_request(id, actor, RequestAction::Cancel, |_| Ok(()))
            .await
    }

    pub async fn confirm(&self, id: Uuid, actor: SenderRole) -> Result<ProductRequest, PoolError> {
        self.transition_request(id, actor, RequestAction::Confirm, |_| Ok(()))
            .await
    }

    pub async fn mark_fulfilled(
        &self,
        id: Uuid,
        actor: SenderRole,
        actual_delivery_date: Option<DateTime<Utc>>,
    ) -> Result<ProductRequest, PoolError> {
        let now = Utc::now();
        self.transition_request(id, actor, RequestAction::MarkFulfilled, move |request| {
            request.actual_delivery_date = Some(actual_delivery_date.unwrap_or(now));
            Ok(())
        })
        .await
    }

    pub async fn mark_received(
        &self,
        id: Uuid,
        actor: SenderRole,
    ) -> Result<ProductRequest, PoolError> {
        self.transition_request(id, actor, RequestAction::MarkReceived, |_| Ok(()))
            .await
    }

    pub async fn report_issue(
        &self,
        id: Uuid,
        actor: SenderRole,
    ) -> Result<ProductRequest, PoolError> {
        self.transition_request(id, actor, RequestAction::ReportIssue, |_| Ok(()))
            .await
    }

    /// Appends to the note thread and notifies the counterparty. Notes are
    /// legal in any status, including terminal ones.
    pub async fn append_note(
        &self,
        id: Uuid,
        note: String,
        by_name: String,
        sender_role: SenderRole,
    ) -> Result<ProductRequest, PoolError> {
        if note.trim().is_empty() {
            return Err(PoolError::Validation("a note cannot be empty".to_string()));
        }
        let note = RequestNote {
            note,
            by_name,
            sender_role,
            timestamp: Utc::now(),
        };
        let request = self.store.append_note(id, note.clone()).await?;
        self.dispatch(notice_for_note(&request, &note)).await;
        Ok(request)
    }

    /// Materializes a confirmed request into an order: builds the priced
    /// order, then atomically inserts it and deletes the request. The
    /// conditional batch makes the operation safe to retry: a concurrent
    /// change to the request fails the whole batch with a conflict.
    pub async fn finalize(
        &self,
        id: Uuid,
        actor: SenderRole,
        shipping_method_id: &str,
    ) -> Result<Order, PoolError> {
        let now = Utc::now();
        let request = self.store.get_request(id).await?;
        let current = request.status;

        match transition(current, actor, RequestAction::Finalize)? {
            Transition::Materialize => {}
            Transition::To(_) => {
                return Err(PoolError::ConcurrencyConflict(format!(
                    "productRequests/{id}"
                )));
            }
        }

        let order = build_order(&self.store, &request, shipping_method_id, now).await?;
        self.store
            .commit_order(order.clone(), id, current)
            .await?;
        tracing::info!(
            request_id = %id,
            order_number = %order.order_number,
            total_cents = order.total_cents,
            "pool request finalized into order"
        );

        self.dispatch(notice_for_finalized(&request, &order.order_number))
            .await;
        Ok(order)
    }

    /// Shared transition path: load, consult the table, validate/mutate,
    /// conditional write, notify.
    async fn transition_request(
        &self,
        id: Uuid,
        actor: SenderRole,
        action: RequestAction,
        mutate: impl FnOnce(&mut ProductRequest) -> Result<(), PoolError>,
    ) -> Result<ProductRequest, PoolError> {
        let mut request = self.store.get_request(id).await?;
        let old = request.status;

        let next = match transition(old, actor, action)? {
            Transition::To(next) => next,
            // Finalization carries a shipping method and commits a batch;
            // it has its own entry point.
            Transition::Materialize => {
                return Err(PoolError::Validation(
                    "finalizing requires a shipping method".to_string(),
                ));
            }
        };

        mutate(&mut request)?;

        // A field-level conditional write: the store applies only what a
        // transition may change, so a note appended between our read and
        // this write survives.
        let request = self
            .store
            .update_request(
                id,
                RequestUpdate {
                    status: next,
                    updated_at: Utc::now(),
                    actual_delivery_date: request.actual_delivery_date,
                },
                old,
            )
            .await?;
        tracing::info!(request_id = %id, %action, from = %old, to = %next, "pool request transitioned");

        if let Some(draft) = notice_for_transition(&request, old, next) {
            self.dispatch(draft).await;
        }
        Ok(request)
    }

    pub(crate) async fn dispatch(&self, draft: crate::notification::NotificationDraft) {
        dispatch_best_effort(
            &self.store,
            &self.identity,
            &self.email,
            &self.base_url,
            draft,
        )
        .await;
    }
}
