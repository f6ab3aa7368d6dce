//! Notification dispatch for request/dispensary state transitions.
//!
//! Translation is pure: a transition maps to zero-or-one
//! [`NotificationDraft`]. Delivery is best-effort: the recipient email is
//! resolved to a uid, a notification document is written, and a matching
//! email is sent — and every failure along the way is logged without ever
//! failing the transition that triggered it.

use chrono::Utc;
use models_pool::{ProductRequest, RequestNote, RequestStatus};
use models_pool_notifications::{
    EmailMessage, NoteEventMetadata, Notification, OrderEventMetadata, PoolNotificationEvent,
    RequestEventMetadata,
};
use pool_store::{IdentityResolver, PoolStore};
use sendgrid_client::EmailSender;
use uuid::Uuid;

/// One addressed, renderable notification.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub event: PoolNotificationEvent,
    pub recipient_email: String,
    pub subject: String,
    pub message: String,
    /// App-relative link; the dispatcher prefixes the configured base URL.
    pub link_path: String,
}

fn request_meta(request: &ProductRequest) -> RequestEventMetadata {
    RequestEventMetadata {
        request_id: request.id,
        product_name: request.product_name.clone(),
        requester_dispensary_name: request.requester_dispensary_name.clone(),
        product_owner_dispensary_name: request.product_owner_dispensary_name.clone(),
    }
}

fn request_link(request: &ProductRequest) -> String {
    format!("/dashboard/pool-requests/{}", request.id)
}

/// Draft for a freshly created request: the product owner is told someone
/// wants their stock.
pub fn notice_for_created(request: &ProductRequest) -> NotificationDraft {
    NotificationDraft {
        event: PoolNotificationEvent::RequestCreated(request_meta(request)),
        recipient_email: request.product_owner_email.clone(),
        subject: format!("New product pool request: {}", request.product_name),
        message: format!(
            "{} requested {} × {} of {}.",
            request.requester_dispensary_name,
            request.quantity_requested,
            request
                .requested_tier
                .as_ref()
                .map(|t| t.unit.as_str())
                .unwrap_or("unit"),
            request.product_name,
        ),
        link_path: request_link(request),
    }
}

/// Draft for a status transition, or `None` when the transition is silent.
///
/// Entering `accepted` emits nothing: the requester's "accepted" notice is
/// deferred until their confirmation flips, at which point both commitments
/// exist.
pub fn notice_for_transition(
    request: &ProductRequest,
    old: RequestStatus,
    new: RequestStatus,
) -> Option<NotificationDraft> {
    let meta = request_meta(request);
    let link_path = request_link(request);

    let (event, recipient_email, subject, message) = match (old, new) {
        // Acceptance is silent until the requester confirms.
        (
            RequestStatus::PendingOwnerApproval,
            RequestStatus::Accepted {
                requester_confirmed: false,
            },
        ) => return None,

        (
            RequestStatus::Accepted {
                requester_confirmed: false,
            },
            RequestStatus::Accepted {
                requester_confirmed: true,
            },
        ) => (
            PoolNotificationEvent::RequesterConfirmed(meta),
            request.requester_email.clone(),
            format!("Request accepted: {}", request.product_name),
            format!(
                "{} accepted your request for {} and you confirmed it. \
                 The owner will now finalize the order.",
                request.product_owner_dispensary_name, request.product_name,
            ),
        ),

        (_, RequestStatus::Rejected) => (
            PoolNotificationEvent::RequestRejected(meta),
            request.requester_email.clone(),
            format!("Request declined: {}", request.product_name),
            format!(
                "{} declined your request for {}.",
                request.product_owner_dispensary_name, request.product_name,
            ),
        ),

        (_, RequestStatus::Cancelled) => (
            PoolNotificationEvent::RequestCancelled(meta),
            request.product_owner_email.clone(),
            format!("Request cancelled: {}", request.product_name),
            format!(
                "{} cancelled their request for {}.",
                request.requester_dispensary_name, request.product_name,
            ),
        ),

        (_, RequestStatus::FulfilledBySender) => (
            PoolNotificationEvent::FulfilledBySender(meta),
            request.requester_email.clone(),
            format!("Order shipped: {}", request.product_name),
            format!(
                "{} marked your {} request as fulfilled.",
                request.product_owner_dispensary_name, request.product_name,
            ),
        ),

        (_, RequestStatus::ReceivedByRequester) => (
            PoolNotificationEvent::ReceivedByRequester(meta),
            request.product_owner_email.clone(),
            format!("Delivery confirmed: {}", request.product_name),
            format!(
                "{} confirmed receipt of {}.",
                request.requester_dispensary_name, request.product_name,
            ),
        ),

        (_, RequestStatus::IssueReported) => (
            PoolNotificationEvent::IssueReported(meta),
            request.product_owner_email.clone(),
            format!("Issue reported: {}", request.product_name),
            format!(
                "{} reported an issue with the delivery of {}.",
                request.requester_dispensary_name, request.product_name,
            ),
        ),

        _ => return None,
    };

    Some(NotificationDraft {
        event,
        recipient_email,
        subject,
        message,
        link_path,
    })
}

/// Draft for an appended note: routed to the counterparty of the sender.
pub fn notice_for_note(request: &ProductRequest, note: &RequestNote) -> NotificationDraft {
    let recipient_email = request.counterparty_email(note.sender_role).to_string();
    NotificationDraft {
        event: PoolNotificationEvent::NoteAdded(NoteEventMetadata {
            request: request_meta(request),
            note: note.note.clone(),
            by_name: note.by_name.clone(),
        }),
        recipient_email,
        subject: format!("New note on request: {}", request.product_name),
        message: format!("{}: {}", note.by_name, note.note),
        link_path: request_link(request),
    }
}

/// Draft for a finalized request: the requester learns their order number.
pub fn notice_for_finalized(request: &ProductRequest, order_number: &str) -> NotificationDraft {
    NotificationDraft {
        event: PoolNotificationEvent::OrderFinalized(OrderEventMetadata {
            request: request_meta(request),
            order_number: order_number.to_string(),
        }),
        recipient_email: request.requester_email.clone(),
        subject: format!("Order created: {order_number}"),
        message: format!(
            "{} finalized your request for {}. Your order number is {}.",
            request.product_owner_dispensary_name, request.product_name, order_number,
        ),
        link_path: format!("/dashboard/orders?orderNumber={order_number}"),
    }
}

/// Delivers a draft: uid resolution, notification document, email. Never
/// fails — each step logs and moves on.
pub async fn dispatch_best_effort<S, I, E>(
    store: &S,
    identity: &I,
    email: &E,
    base_url: &str,
    draft: NotificationDraft,
) where
    S: PoolStore,
    I: IdentityResolver,
    E: EmailSender,
{
    let event_type = draft.event.event_type();

    match identity.resolve_email(&draft.recipient_email).await {
        Ok(Some(user)) => {
            let notification = Notification {
                id: Uuid::now_v7(),
                recipient_uid: user.uid,
                message: draft.message.clone(),
                link: format!("{base_url}{}", draft.link_path),
                read: false,
                event: draft.event.clone(),
                created_at: Utc::now(),
            };
            if let Err(e) = store.create_notification(notification).await {
                tracing::error!(error = ?e, %event_type, "unable to persist notification");
            }
        }
        Ok(None) => {
            tracing::warn!(
                recipient = %draft.recipient_email,
                %event_type,
                "recipient identity not found, skipping in-app notification"
            );
        }
        Err(e) => {
            tracing::error!(error = ?e, %event_type, "unable to resolve recipient identity");
        }
    }

    let message = EmailMessage {
        to: draft.recipient_email,
        subject: draft.subject,
        html_body: format!(
            "<p>{}</p><p><a href=\"{base_url}{}\">View in The Dispensary Tree</a></p>",
            draft.message, draft.link_path,
        ),
    };
    if let Err(e) = email.send(&message).await {
        tracing::error!(error = ?e, %event_type, "unable to send notification email");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models_pool::{PriceTier, SenderRole};
    use models_pool_notifications::PoolNotificationEventType;

    fn request(status: RequestStatus) -> ProductRequest {
        let now = Utc::now();
        ProductRequest {
            id: Uuid::new_v4(),
            requester_user_id: "user-requester".to_string(),
            requester_dispensary_id: Uuid::new_v4(),
            requester_dispensary_name: "Green Leaf".to_string(),
            requester_email: "buyer@green-leaf.example".to_string(),
            product_owner_dispensary_id: Uuid::new_v4(),
            product_owner_dispensary_name: "The Herb Hut".to_string(),
            product_owner_email: "owner@herb-hut.example".to_string(),
            product_id: Uuid::new_v4(),
            product_name: "OG Kush".to_string(),
            product_image: None,
            requested_tier: Some(PriceTier {
                unit: "1kg".to_string(),
                price_cents: 50_000,
                quantity_in_stock: 10,
                weight_grams: None,
                expires_at: None,
            }),
            quantity_requested: 2,
            delivery_address: None,
            contact_person: None,
            contact_phone: None,
            preferred_delivery_date: None,
            actual_delivery_date: None,
            status,
            notes: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    const UNCONFIRMED: RequestStatus = RequestStatus::Accepted {
        requester_confirmed: false,
    };
    const CONFIRMED: RequestStatus = RequestStatus::Accepted {
        requester_confirmed: true,
    };

    #[test]
    fn creation_notifies_the_owner() {
        let req = request(RequestStatus::PendingOwnerApproval);
        let draft = notice_for_created(&req);
        assert_eq!(draft.recipient_email, req.product_owner_email);
        assert_eq!(
            draft.event.event_type(),
            PoolNotificationEventType::RequestCreated
        );
    }

    #[test]
    fn acceptance_is_silent_until_confirmation() {
        let req = request(UNCONFIRMED);
        assert!(
            notice_for_transition(&req, RequestStatus::PendingOwnerApproval, UNCONFIRMED)
                .is_none()
        );

        let req = request(CONFIRMED);
        let draft = notice_for_transition(&req, UNCONFIRMED, CONFIRMED).unwrap();
        assert_eq!(draft.recipient_email, req.requester_email);
        assert_eq!(
            draft.event.event_type(),
            PoolNotificationEventType::RequesterConfirmed
        );
    }

    #[test]
    fn rejection_and_cancellation_notify_the_counterparty() {
        let req = request(RequestStatus::Rejected);
        let draft =
            notice_for_transition(&req, RequestStatus::PendingOwnerApproval, RequestStatus::Rejected)
                .unwrap();
        assert_eq!(draft.recipient_email, req.requester_email);

        let req = request(RequestStatus::Cancelled);
        let draft = notice_for_transition(&req, UNCONFIRMED, RequestStatus::Cancelled).unwrap();
        assert_eq!(draft.recipient_email, req.product_owner_email);
    }

    #[test]
    fn note_routing_follows_sender_role() {
        let req = request(UNCONFIRMED);

        let owner_note = RequestNote {
            note: "Can ship Tuesday".to_string(),
            by_name: "The Herb Hut".to_string(),
            sender_role: SenderRole::Owner,
            timestamp: Utc::now(),
        };
        assert_eq!(
            notice_for_note(&req, &owner_note).recipient_email,
            req.requester_email
        );

        let requester_note = RequestNote {
            note: "Tuesday works".to_string(),
            by_name: "Green Leaf".to_string(),
            sender_role: SenderRole::Requester,
            timestamp: Utc::now(),
        };
        assert_eq!(
            notice_for_note(&req, &requester_note).recipient_email,
            req.product_owner_email
        );
    }

    #[test]
    fn finalization_carries_the_order_number() {
        let req = request(CONFIRMED);
        let draft = notice_for_finalized(&req, "POOL-1724680000000-X4J9QA");
        assert_eq!(draft.recipient_email, req.requester_email);
        assert!(draft.message.contains("POOL-1724680000000-X4J9QA"));
    }
}
