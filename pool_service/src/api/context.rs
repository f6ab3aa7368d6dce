use std::sync::Arc;

use axum_macros::FromRef;
use pool_store::MemoryPoolStore;
use sendgrid_client::SendGridClient;

use crate::service::PoolService;

/// The concrete service wiring used by the binary: the in-process store
/// doubles as the identity resolver, and SendGrid carries outbound email.
pub type AppService = PoolService<MemoryPoolStore, MemoryPoolStore, SendGridClient>;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub service: Arc<AppService>,
}
