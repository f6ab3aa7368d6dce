//! Notification event taxonomy for the product pool, the persisted
//! notification record, and the outbound email content type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;
use utoipa::ToSchema;
use uuid::Uuid;

/// A state transition the dispatcher may translate into a notification.
#[derive(Debug, Clone, Serialize, Deserialize, EnumDiscriminants, ToSchema)]
#[strum_discriminants(name(PoolNotificationEventType))]
#[strum_discriminants(derive(Serialize, Deserialize, ToSchema, strum::EnumString, strum::Display))]
#[strum_discriminants(serde(rename_all = "snake_case"))]
#[strum_discriminants(strum(serialize_all = "snake_case"))]
#[serde(
    tag = "eventType",
    content = "eventMetadata",
    rename_all = "snake_case"
)]
pub enum PoolNotificationEvent {
    /// A new request was created against the owner's pooled product.
    RequestCreated(RequestEventMetadata),
    /// The requester confirmed an accepted request. This is also where the
    /// deferred "accepted" notice to the requester is emitted.
    RequesterConfirmed(RequestEventMetadata),
    /// The owner rejected (or withdrew from) the request.
    RequestRejected(RequestEventMetadata),
    /// The requester cancelled the request.
    RequestCancelled(RequestEventMetadata),
    /// A note was appended by one of the parties.
    NoteAdded(NoteEventMetadata),
    /// The owner finalized the request into an order.
    OrderFinalized(OrderEventMetadata),
    /// The owner marked the goods as shipped.
    FulfilledBySender(RequestEventMetadata),
    /// The requester confirmed receipt.
    ReceivedByRequester(RequestEventMetadata),
    /// The requester reported a problem with the delivery.
    IssueReported(RequestEventMetadata),
    /// A dispensary's application was approved.
    DispensaryApproved(DispensaryEventMetadata),
    /// A dispensary's status changed.
    DispensaryStatusChanged(DispensaryEventMetadata),
}

impl PoolNotificationEvent {
    pub fn event_type(&self) -> PoolNotificationEventType {
        PoolNotificationEventType::from(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestEventMetadata {
    pub request_id: Uuid,
    pub product_name: String,
    pub requester_dispensary_name: String,
    pub product_owner_dispensary_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteEventMetadata {
    #[serde(flatten)]
    pub request: RequestEventMetadata,
    pub note: String,
    pub by_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderEventMetadata {
    #[serde(flatten)]
    pub request: RequestEventMetadata,
    pub order_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispensaryEventMetadata {
    pub dispensary_id: Uuid,
    pub dispensary_name: String,
    pub status: String,
}

/// The persisted in-app notification document. Mutated only to flip
/// `read`; never deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Self-generated uuidv7.
    pub id: Uuid,
    pub recipient_uid: String,
    pub message: String,
    /// In-app link the notification points at.
    pub link: String,
    pub read: bool,
    #[serde(flatten)]
    pub event: PoolNotificationEvent,
    pub created_at: DateTime<Utc>,
}

/// Outbound email content handed to the mail client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_meta() -> RequestEventMetadata {
        RequestEventMetadata {
            request_id: Uuid::new_v4(),
            product_name: "OG Kush 1kg".to_string(),
            requester_dispensary_name: "Green Leaf".to_string(),
            product_owner_dispensary_name: "The Herb Hut".to_string(),
        }
    }

    #[test]
    fn event_type_discriminant_matches_variant() {
        let event = PoolNotificationEvent::RequestCreated(request_meta());
        assert_eq!(
            event.event_type(),
            PoolNotificationEventType::RequestCreated
        );
        assert_eq!(event.event_type().to_string(), "request_created");
    }

    #[test]
    fn event_serializes_with_tagged_metadata() {
        let event = PoolNotificationEvent::OrderFinalized(OrderEventMetadata {
            request: request_meta(),
            order_number: "POOL-1724680000000-X4J9QA".to_string(),
        });
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["eventType"], "order_finalized");
        assert_eq!(v["eventMetadata"]["orderNumber"], "POOL-1724680000000-X4J9QA");
    }
}
