//! Product Pool request lifecycle service.
//!
//! Two dispensaries negotiate over a shared request document: the
//! requester asks for pooled stock, the owner accepts, the requester
//! confirms, and the owner finalizes — at which point the request is
//! atomically converted into an immutable order with the platform
//! commission carved out of the seller's price.

pub mod api;
pub mod config;
pub mod credits;
pub mod dispensary;
pub mod entrypoint;
pub mod error;
pub mod materialize;
pub mod notification;
pub mod order_number;
pub mod pricing;
pub mod service;
pub mod state;
