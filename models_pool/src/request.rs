use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A priced unit-of-sale variant of a pooled product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    /// Unit of sale, e.g. "1kg".
    pub unit: String,
    /// Price per unit in minor currency units (cents).
    pub price_cents: i64,
    pub quantity_in_stock: u32,
    /// Shipping weight per unit, in grams.
    pub weight_grams: Option<u32>,
    /// Tiers past this instant cannot be accepted.
    pub expires_at: Option<DateTime<Utc>>,
}

impl PriceTier {
    /// A tier can back an acceptance only while it is unexpired and in stock.
    pub fn is_acceptable_at(&self, now: DateTime<Utc>) -> bool {
        let unexpired = self.expires_at.map(|e| e > now).unwrap_or(true);
        unexpired && self.quantity_in_stock > 0
    }
}

/// Which side of the request an actor is on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SenderRole {
    Requester,
    Owner,
}

impl SenderRole {
    pub fn counterparty(self) -> SenderRole {
        match self {
            SenderRole::Requester => SenderRole::Owner,
            SenderRole::Owner => SenderRole::Requester,
        }
    }
}

/// One entry in a request's append-only note thread.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestNote {
    pub note: String,
    pub by_name: String,
    pub sender_role: SenderRole,
    pub timestamp: DateTime<Utc>,
}

/// Lifecycle status of a [`ProductRequest`].
///
/// `Accepted` carries the requester's confirmation as part of the variant so
/// the state space is exhaustive under `match`; on the wire this flattens back
/// to `requestStatus: "accepted"` plus a `requesterConfirmed` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display,
)]
#[serde(tag = "requestStatus", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestStatus {
    PendingOwnerApproval,
    Accepted {
        #[serde(rename = "requesterConfirmed", default)]
        requester_confirmed: bool,
    },
    Rejected,
    Cancelled,
    FulfilledBySender,
    ReceivedByRequester,
    IssueReported,
}

impl RequestStatus {
    /// Terminal statuses accept no further status transitions. Notes may
    /// still be appended for record-keeping.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Rejected
                | RequestStatus::Cancelled
                | RequestStatus::ReceivedByRequester
                | RequestStatus::IssueReported
        )
    }
}

/// Delivery address on a request: either a structured address or the
/// free-form string older documents carry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DeliveryAddress {
    Structured(StructuredAddress),
    Freeform(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// One vendor's request to acquire stock from another vendor's pooled
/// inventory. The single shared mutable document between the two parties.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub id: Uuid,

    pub requester_user_id: String,
    pub requester_dispensary_id: Uuid,
    pub requester_dispensary_name: String,
    pub requester_email: String,

    pub product_owner_dispensary_id: Uuid,
    pub product_owner_dispensary_name: String,
    pub product_owner_email: String,

    pub product_id: Uuid,
    pub product_name: String,
    pub product_image: Option<String>,
    pub requested_tier: Option<PriceTier>,
    pub quantity_requested: u32,

    pub delivery_address: Option<DeliveryAddress>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub preferred_delivery_date: Option<DateTime<Utc>>,
    /// Set by the owner when marking the request fulfilled.
    pub actual_delivery_date: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub status: RequestStatus,
    pub notes: Vec<RequestNote>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRequest {
    /// Email of the party opposite `role`.
    pub fn counterparty_email(&self, role: SenderRole) -> &str {
        match role.counterparty() {
            SenderRole::Requester => &self.requester_email,
            SenderRole::Owner => &self.product_owner_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_status_flattens_to_original_wire_shape() {
        let status = RequestStatus::Accepted {
            requester_confirmed: true,
        };
        let v = serde_json::to_value(status).unwrap();
        assert_eq!(v["requestStatus"], "accepted");
        assert_eq!(v["requesterConfirmed"], true);

        let back: RequestStatus =
            serde_json::from_value(serde_json::json!({ "requestStatus": "accepted" })).unwrap();
        assert_eq!(
            back,
            RequestStatus::Accepted {
                requester_confirmed: false
            },
            "missing requesterConfirmed defaults to false"
        );
    }

    #[test]
    fn tier_acceptability() {
        let now = Utc::now();
        let tier = PriceTier {
            unit: "1kg".to_string(),
            price_cents: 50_000,
            quantity_in_stock: 10,
            weight_grams: Some(1_000),
            expires_at: None,
        };
        assert!(tier.is_acceptable_at(now));

        let sold_out = PriceTier {
            quantity_in_stock: 0,
            ..tier.clone()
        };
        assert!(!sold_out.is_acceptable_at(now));

        let expired = PriceTier {
            expires_at: Some(now - chrono::Duration::hours(1)),
            ..tier
        };
        assert!(!expired.is_acceptable_at(now));
    }

    #[test]
    fn terminal_statuses() {
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
        assert!(RequestStatus::ReceivedByRequester.is_terminal());
        assert!(RequestStatus::IssueReported.is_terminal());
        assert!(!RequestStatus::PendingOwnerApproval.is_terminal());
        assert!(
            !RequestStatus::Accepted {
                requester_confirmed: true
            }
            .is_terminal()
        );
        assert!(!RequestStatus::FulfilledBySender.is_terminal());
    }
}
