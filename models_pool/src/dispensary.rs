use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::StructuredAddress;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DispensaryStatus {
    PendingApproval,
    Active,
    Suspended,
    Closed,
}

/// A parcel-locker network location used by locker-based shipping methods.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Locker {
    pub id: String,
    pub name: String,
    pub address: String,
}

/// How a pool shipment travels. `Ltd`/`Dtl`/`Ltl` are locker-based and
/// require the corresponding party to have a configured locker.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShippingMethodKind {
    /// Door to door.
    Dtd,
    /// Locker to door: picked up from the seller's origin locker.
    Ltd,
    /// Door to locker: delivered to the buyer's destination locker.
    Dtl,
    /// Locker to locker.
    Ltl,
}

impl ShippingMethodKind {
    pub fn requires_origin_locker(self) -> bool {
        matches!(self, ShippingMethodKind::Ltd | ShippingMethodKind::Ltl)
    }

    pub fn requires_destination_locker(self) -> bool {
        matches!(self, ShippingMethodKind::Dtl | ShippingMethodKind::Ltl)
    }
}

/// One shipping method a dispensary has configured for outbound pool orders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    pub id: String,
    pub kind: ShippingMethodKind,
    pub label: String,
    /// Flat shipping price in minor currency units (cents).
    pub price_cents: i64,
}

/// A vendor profile. Carries everything order materialization needs from
/// either side of a pool transaction: tax rate, currency, contact details,
/// and shipping configuration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispensaryProfile {
    pub id: Uuid,
    pub name: String,
    pub owner_user_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<StructuredAddress>,
    /// ISO 4217 currency code, e.g. "ZAR".
    pub currency: String,
    /// Sales tax rate in basis points (1500 = 15%).
    pub tax_rate_bps: i64,
    pub status: DispensaryStatus,
    pub shipping_methods: Vec<ShippingMethod>,
    /// The dispensary's configured locker, used as origin when it sells and
    /// destination when it buys.
    pub locker: Option<Locker>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DispensaryProfile {
    pub fn shipping_method(&self, id: &str) -> Option<&ShippingMethod> {
        self.shipping_methods.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locker_requirements_by_kind() {
        assert!(!ShippingMethodKind::Dtd.requires_origin_locker());
        assert!(!ShippingMethodKind::Dtd.requires_destination_locker());
        assert!(ShippingMethodKind::Ltd.requires_origin_locker());
        assert!(!ShippingMethodKind::Ltd.requires_destination_locker());
        assert!(!ShippingMethodKind::Dtl.requires_origin_locker());
        assert!(ShippingMethodKind::Dtl.requires_destination_locker());
        assert!(ShippingMethodKind::Ltl.requires_origin_locker());
        assert!(ShippingMethodKind::Ltl.requires_destination_locker());
    }

    #[test]
    fn shipping_kind_round_trips_as_lowercase() {
        let v = serde_json::to_value(ShippingMethodKind::Ltl).unwrap();
        assert_eq!(v, "ltl");
        let back: ShippingMethodKind = serde_json::from_value(v).unwrap();
        assert_eq!(back, ShippingMethodKind::Ltl);
    }
}
