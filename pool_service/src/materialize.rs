//! Order materialization: converts an accepted-and-confirmed request into
//! an immutable [`Order`].
//!
//! Everything here is validation and pure construction; the only side
//! effect is the final atomic commit (insert order + delete request) the
//! caller performs through the store. A failure at any earlier step leaves
//! the request intact and unmodified, so retrying is always safe.

use chrono::{DateTime, Utc};
use models_orders::{
    CustomerDetails, Order, OrderItem, OrderShipment, OrderStatus, PaymentStatus,
    StatusHistoryEntry,
};
use models_pool::{DispensaryProfile, ProductRequest};
use pool_store::PoolStore;
use uuid::Uuid;

use crate::error::PoolError;
use crate::order_number::generate_order_number;
use crate::pricing::pool_price_breakdown;

/// Builds the order for `request` with the owner-selected shipping method.
///
/// Fetches both dispensary profiles and validates the tier and shipping
/// selection; returns a fully priced [`Order`] ready for the atomic commit.
pub async fn build_order<S: PoolStore>(
    store: &S,
    request: &ProductRequest,
    shipping_method_id: &str,
    now: DateTime<Utc>,
) -> Result<Order, PoolError> {
    let seller = store
        .get_dispensary(request.product_owner_dispensary_id)
        .await?;
    let buyer = store.get_dispensary(request.requester_dispensary_id).await?;

    let tier = request.requested_tier.as_ref().ok_or_else(|| {
        PoolError::Validation("this request has no price tier and cannot be finalized".to_string())
    })?;

    let shipment = resolve_shipment(&seller, &buyer, shipping_method_id, now)?;

    let breakdown = pool_price_breakdown(
        tier.price_cents,
        seller.tax_rate_bps,
        request.quantity_requested,
    );
    let qty = request.quantity_requested as i64;

    let item = OrderItem {
        product_id: request.product_id,
        product_name: request.product_name.clone(),
        unit: tier.unit.clone(),
        quantity: request.quantity_requested,
        unit_price_cents: breakdown.unit_price_cents,
        base_price_cents: breakdown.base_price_cents,
        platform_commission_cents: breakdown.commission_cents,
        commission_rate_bps: breakdown.commission_rate_bps,
        subtotal_before_tax_cents: breakdown.subtotal_before_tax_cents,
        tax_amount_cents: breakdown.tax_amount_cents,
        line_total_cents: breakdown.line_total_cents,
    };

    let subtotal_cents = breakdown.unit_price_cents * qty;
    let tax_cents = breakdown.tax_amount_cents;
    let shipping_total_cents = shipment.shipping_cost_cents;

    let order = Order {
        id: Uuid::new_v4(),
        order_number: generate_order_number(now),
        user_id: request.requester_user_id.clone(),
        customer_details: CustomerDetails {
            dispensary_id: buyer.id,
            dispensary_name: buyer.name.clone(),
            email: buyer.email.clone(),
            phone: buyer.phone.clone(),
            address: buyer.address.clone(),
        },
        items: vec![item],
        shipments: [(seller.id, shipment)].into(),
        currency: seller.currency.clone(),
        subtotal_cents,
        tax_cents,
        shipping_total_cents,
        total_cents: subtotal_cents + tax_cents + shipping_total_cents,
        total_dispensary_earnings_cents: breakdown.base_price_cents * qty,
        total_platform_commission_cents: breakdown.commission_cents * qty,
        payment_status: PaymentStatus::Pending,
        status: OrderStatus::Processing,
        status_history: vec![StatusHistoryEntry {
            status: OrderStatus::Processing,
            timestamp: now,
            actor: seller.owner_user_id.clone(),
            note: Some(format!("materialized from pool request {}", request.id)),
        }],
        source_request_id: request.id,
        created_at: now,
    };

    debug_assert!(order.totals_are_consistent());
    Ok(order)
}

/// Resolves the owner's shipping selection against both parties' profiles.
fn resolve_shipment(
    seller: &DispensaryProfile,
    buyer: &DispensaryProfile,
    shipping_method_id: &str,
    now: DateTime<Utc>,
) -> Result<OrderShipment, PoolError> {
    if seller.shipping_methods.is_empty() {
        return Err(PoolError::Validation(format!(
            "{} has no shipping methods configured; configure one before finalizing",
            seller.name,
        )));
    }

    let method = seller.shipping_method(shipping_method_id).ok_or_else(|| {
        PoolError::Validation(format!(
            "shipping method {shipping_method_id} is not configured for {}",
            seller.name,
        ))
    })?;

    let origin_locker = if method.kind.requires_origin_locker() {
        Some(seller.locker.clone().ok_or_else(|| {
            PoolError::Validation(format!(
                "{} requires an origin locker, but {} has none configured",
                method.kind, seller.name,
            ))
        })?)
    } else {
        None
    };

    let destination_locker = if method.kind.requires_destination_locker() {
        Some(buyer.locker.clone().ok_or_else(|| {
            PoolError::Validation(format!(
                "{} requires a destination locker, but {} has none configured",
                method.kind, buyer.name,
            ))
        })?)
    } else {
        None
    };

    Ok(OrderShipment {
        seller_dispensary_id: seller.id,
        seller_dispensary_name: seller.name.clone(),
        shipping_method_id: method.id.clone(),
        shipping_method_kind: method.kind,
        shipping_method_label: method.label.clone(),
        shipping_cost_cents: method.price_cents,
        origin_locker,
        destination_locker,
        status_history: vec![StatusHistoryEntry {
            status: OrderStatus::Processing,
            timestamp: now,
            actor: seller.owner_user_id.clone(),
            note: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use models_pool::{
        DispensaryStatus, Locker, ShippingMethod, ShippingMethodKind,
    };

    fn dispensary(name: &str, locker: Option<Locker>) -> DispensaryProfile {
        let now = Utc::now();
        DispensaryProfile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            owner_user_id: format!("user-{name}"),
            email: format!("{name}@example.com"),
            phone: None,
            address: None,
            currency: "ZAR".to_string(),
            tax_rate_bps: 1_500,
            status: DispensaryStatus::Active,
            shipping_methods: vec![
                ShippingMethod {
                    id: "dtd".to_string(),
                    kind: ShippingMethodKind::Dtd,
                    label: "Door to door".to_string(),
                    price_cents: 8_500,
                },
                ShippingMethod {
                    id: "ltl".to_string(),
                    kind: ShippingMethodKind::Ltl,
                    label: "Locker to locker".to_string(),
                    price_cents: 6_000,
                },
            ],
            locker,
            created_at: now,
            updated_at: now,
        }
    }

    fn locker(id: &str) -> Locker {
        Locker {
            id: id.to_string(),
            name: format!("Locker {id}"),
            address: "1 Main Rd".to_string(),
        }
    }

    #[test]
    fn door_to_door_needs_no_lockers() {
        let seller = dispensary("seller", None);
        let buyer = dispensary("buyer", None);
        let shipment = resolve_shipment(&seller, &buyer, "dtd", Utc::now()).unwrap();
        assert!(shipment.origin_locker.is_none());
        assert!(shipment.destination_locker.is_none());
        assert_eq!(shipment.shipping_cost_cents, 8_500);
    }

    #[test]
    fn locker_to_locker_requires_both_lockers() {
        let now = Utc::now();
        let buyer = dispensary("buyer", Some(locker("B1")));

        let seller_without = dispensary("seller", None);
        let err = resolve_shipment(&seller_without, &buyer, "ltl", now).unwrap_err();
        assert!(matches!(err, PoolError::Validation(_)), "{err}");
        assert!(err.to_string().contains("origin locker"));

        let seller_with = dispensary("seller", Some(locker("S1")));
        let buyer_without = dispensary("buyer", None);
        let err = resolve_shipment(&seller_with, &buyer_without, "ltl", now).unwrap_err();
        assert!(err.to_string().contains("destination locker"));

        let shipment = resolve_shipment(&seller_with, &buyer, "ltl", now).unwrap();
        assert_eq!(shipment.origin_locker.as_ref().unwrap().id, "S1");
        assert_eq!(shipment.destination_locker.as_ref().unwrap().id, "B1");
    }

    #[test]
    fn unknown_method_is_a_validation_failure() {
        let seller = dispensary("seller", None);
        let buyer = dispensary("buyer", None);
        let err = resolve_shipment(&seller, &buyer, "overnight", Utc::now()).unwrap_err();
        assert!(matches!(err, PoolError::Validation(_)));
    }

    #[test]
    fn no_configured_methods_blocks_finalization() {
        let mut seller = dispensary("seller", None);
        seller.shipping_methods.clear();
        let buyer = dispensary("buyer", None);
        let err = resolve_shipment(&seller, &buyer, "dtd", Utc::now()).unwrap_err();
        assert!(err.to_string().contains("no shipping methods configured"));
    }
}
