use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;

/// Generates a human-readable, globally unique order number:
/// `POOL-<millisecond timestamp>-<6 uppercase alphanumerics>`. The random
/// suffix keeps the collision probability negligible even for orders
/// created in the same millisecond.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("POOL-{}-{}", now.timestamp_millis(), suffix)
}
