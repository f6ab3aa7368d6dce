//! The materialized order aggregate: the immutable transactional record
//! created once both parties of a pool request have committed.
//!
//! All monetary amounts are integer minor currency units (cents) and all
//! rates are basis points, so the financial invariants hold exactly at the
//! smallest currency unit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use models_pool::{Locker, ShippingMethodKind, StructuredAddress};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// Append-only audit trail entry. Orders are never "un-created"; every
/// later change appends one of these.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    /// Who performed the change, e.g. a user id or "system".
    pub actor: String,
    pub note: Option<String>,
}

/// One line of an order, carrying the full per-unit price decomposition.
///
/// Invariant (held by construction in the pricing engine):
/// `line_total_cents == subtotal_before_tax_cents * quantity
///   + tax_amount_cents + platform_commission_cents * quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub unit: String,
    pub quantity: u32,
    /// Gross per-unit price (what the buyer is charged before tax).
    pub unit_price_cents: i64,
    /// Seller's net per-unit price after platform commission.
    pub base_price_cents: i64,
    /// Absolute per-unit platform commission.
    pub platform_commission_cents: i64,
    /// The fixed pool commission rate applied, in basis points.
    pub commission_rate_bps: i64,
    /// Per-unit taxable amount (equals `base_price_cents`; tax is computed
    /// on the base price, never the commission-inclusive price).
    pub subtotal_before_tax_cents: i64,
    /// Total tax across the whole quantity.
    pub tax_amount_cents: i64,
    pub line_total_cents: i64,
}

/// Per-seller shipment details on an order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderShipment {
    pub seller_dispensary_id: Uuid,
    pub seller_dispensary_name: String,
    pub shipping_method_id: String,
    pub shipping_method_kind: ShippingMethodKind,
    pub shipping_method_label: String,
    pub shipping_cost_cents: i64,
    pub origin_locker: Option<Locker>,
    pub destination_locker: Option<Locker>,
    pub status_history: Vec<StatusHistoryEntry>,
}

/// Buyer details on a pool order. B2B: the "customer" is the requesting
/// dispensary, not an end consumer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub dispensary_id: Uuid,
    pub dispensary_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<StructuredAddress>,
}

/// The immutable order record materialized from an agreed pool request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    /// Human-readable, globally unique, e.g. `POOL-1724680000000-X4J9QA`.
    pub order_number: String,
    /// Buyer user id.
    pub user_id: String,
    pub customer_details: CustomerDetails,
    pub items: Vec<OrderItem>,
    /// Keyed by seller dispensary id.
    pub shipments: HashMap<Uuid, OrderShipment>,
    pub currency: String,

    /// Sum of gross line prices (`unit_price_cents * quantity`).
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub shipping_total_cents: i64,
    /// `subtotal + tax + shipping_total`, exactly.
    pub total_cents: i64,
    pub total_dispensary_earnings_cents: i64,
    pub total_platform_commission_cents: i64,

    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub status_history: Vec<StatusHistoryEntry>,
    /// The pool request this order was materialized from. The request
    /// document itself is deleted in the same batch that creates the order.
    pub source_request_id: Uuid,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Checks the aggregate financial invariants.
    pub fn totals_are_consistent(&self) -> bool {
        let subtotal: i64 = self
            .items
            .iter()
            .map(|i| i.unit_price_cents * i.quantity as i64)
            .sum();
        let tax: i64 = self.items.iter().map(|i| i.tax_amount_cents).sum();
        let shipping: i64 = self
            .shipments
            .values()
            .map(|s| s.shipping_cost_cents)
            .sum();
        let earnings: i64 = self
            .items
            .iter()
            .map(|i| i.base_price_cents * i.quantity as i64)
            .sum();
        let commission: i64 = self
            .items
            .iter()
            .map(|i| i.platform_commission_cents * i.quantity as i64)
            .sum();

        self.subtotal_cents == subtotal
            && self.tax_cents == tax
            && self.shipping_total_cents == shipping
            && self.total_cents == subtotal + tax + shipping
            && self.total_dispensary_earnings_cents == earnings
            && self.total_platform_commission_cents == commission
            && self.total_dispensary_earnings_cents + self.total_platform_commission_cents
                == subtotal
    }
}
