//! Domain model for the cross-vendor product pool: requests, price tiers,
//! dispensary profiles, shipping configuration, and user records.

mod dispensary;
mod request;
mod user;

pub use dispensary::*;
pub use request::*;
pub use user::*;
