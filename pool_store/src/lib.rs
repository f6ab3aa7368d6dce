//! The document-store boundary of the product pool.
//!
//! The core never talks to a concrete database; it goes through
//! [`PoolStore`] and [`IdentityResolver`]. Every status write is a
//! compare-and-swap against the caller's expected status, and order
//! materialization is a single atomic batch (insert order + delete
//! request) — the two primitives the request lifecycle's correctness
//! rests on.

mod error;
mod memory;
mod ports;

pub use error::StoreError;
pub use memory::MemoryPoolStore;
pub use ports::{IdentityResolver, PoolStore, RequestUpdate};
