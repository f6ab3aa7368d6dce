//! Commission and price-breakdown calculator for pool transactions.
//!
//! All arithmetic is on integer minor currency units (cents) with rates in
//! basis points, rounded half-up, so the invariants hold exactly at the
//! smallest currency unit:
//!
//! - `commission == unit_price × POOL_COMMISSION_RATE_BPS / 10_000`
//! - `line_total == subtotal_before_tax × qty + tax + commission × qty`
//!
//! Tax is computed on the *base* price (the seller's net), never on the
//! commission-inclusive price.

/// Fixed platform commission for pool transactions: 5%. Distinct from
/// per-dispensary vendor commission rates used elsewhere in the platform.
pub const POOL_COMMISSION_RATE_BPS: i64 = 500;

/// Per-line price decomposition for one requested tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub quantity: u32,
    /// Gross per-unit price (what the buyer is charged before tax).
    pub unit_price_cents: i64,
    /// Seller's net per-unit price: `unit_price - commission`.
    pub base_price_cents: i64,
    /// Absolute per-unit platform commission.
    pub commission_cents: i64,
    pub commission_rate_bps: i64,
    /// Per-unit taxable amount; equals `base_price_cents`.
    pub subtotal_before_tax_cents: i64,
    /// Tax across the whole quantity, on the base price.
    pub tax_amount_cents: i64,
    /// `base × qty + tax + commission × qty`, by construction.
    pub line_total_cents: i64,
}

/// `amount × bps / 10_000`, rounded half-up. Amounts are non-negative.
fn apply_bps(amount_cents: i64, bps: i64) -> i64 {
    (amount_cents * bps + 5_000) / 10_000
}

/// Decomposes one pool line item at the fixed pool commission rate.
pub fn pool_price_breakdown(
    unit_price_cents: i64,
    tax_rate_bps: i64,
    quantity: u32,
) -> PriceBreakdown {
    let commission_cents = apply_bps(unit_price_cents, POOL_COMMISSION_RATE_BPS);
    let base_price_cents = unit_price_cents - commission_cents;
    let qty = quantity as i64;
    let tax_amount_cents = apply_bps(base_price_cents, tax_rate_bps) * qty;
    let line_total_cents = base_price_cents * qty + tax_amount_cents + commission_cents * qty;

    PriceBreakdown {
        quantity,
        unit_price_cents,
        base_price_cents,
        commission_cents,
        commission_rate_bps: POOL_COMMISSION_RATE_BPS,
        subtotal_before_tax_cents: base_price_cents,
        tax_amount_cents,
        line_total_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_breakdown() {
        // 500.00 per unit, 15% tax, qty 2, 5% pool commission.
        let b = pool_price_breakdown(50_000, 1_500, 2);
        assert_eq!(b.commission_cents, 2_500, "25.00 per unit");
        assert_eq!(b.base_price_cents, 47_500, "475.00 per unit");
        assert_eq!(b.subtotal_before_tax_cents, 47_500);
        assert_eq!(b.tax_amount_cents, 14_250, "475.00 x 15% x 2 = 142.50");
        assert_eq!(b.commission_cents * 2, 5_000, "50.00 commission across qty");
        assert_eq!(b.line_total_cents, 47_500 * 2 + 14_250 + 2_500 * 2);
    }

    #[test]
    fn line_total_identity_holds_for_awkward_amounts() {
        // Prices chosen so the bps products do not divide evenly.
        for unit_price in [1, 3, 99, 1_234, 9_999, 123_457, 999_999] {
            for tax_bps in [0, 700, 1_450, 1_500, 2_000] {
                for qty in [1u32, 2, 7, 100] {
                    let b = pool_price_breakdown(unit_price, tax_bps, qty);
                    let qty = qty as i64;
                    assert_eq!(
                        b.line_total_cents,
                        b.subtotal_before_tax_cents * qty
                            + b.tax_amount_cents
                            + b.commission_cents * qty,
                        "identity must hold for price={unit_price} tax={tax_bps} qty={qty}"
                    );
                    assert_eq!(
                        b.base_price_cents + b.commission_cents,
                        b.unit_price_cents,
                        "base + commission must reassemble the gross price"
                    );
                }
            }
        }
    }

    #[test]
    fn commission_rounds_half_up() {
        // 0.99 at 5% = 4.95 cents -> 5 cents.
        assert_eq!(pool_price_breakdown(99, 0, 1).commission_cents, 5);
        // 0.49 at 5% = 2.45 cents -> 2 cents.
        assert_eq!(pool_price_breakdown(49, 0, 1).commission_cents, 2);
    }

    #[test]
    fn tax_is_computed_on_base_not_gross() {
        let b = pool_price_breakdown(50_000, 1_500, 1);
        // On the gross price the tax would be 7_500; on the base it is 7_125.
        assert_eq!(b.tax_amount_cents, 7_125);
    }

    #[test]
    fn zero_tax_rate() {
        let b = pool_price_breakdown(10_000, 0, 3);
        assert_eq!(b.tax_amount_cents, 0);
        assert_eq!(b.line_total_cents, 10_000 * 3);
    }
}
