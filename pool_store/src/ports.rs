use chrono::{DateTime, Utc};
use models_orders::Order;
use models_pool::{DispensaryProfile, ProductRequest, RequestNote, RequestStatus, UserRecord};
use models_pool_notifications::Notification;
use uuid::Uuid;

use crate::StoreError;

/// Field-level changes a lifecycle transition may apply to a stored
/// request. Deliberately narrow: the note thread is append-only through
/// [`PoolStore::append_note`] and everything else on the document is
/// immutable after creation, so a transition can never clobber a note
/// that landed after it loaded its copy.
#[derive(Debug, Clone)]
pub struct RequestUpdate {
    pub status: RequestStatus,
    pub updated_at: DateTime<Utc>,
    /// Written when present, left untouched when `None`.
    pub actual_delivery_date: Option<DateTime<Utc>>,
}

/// Document-store operations the request lifecycle needs.
///
/// Implementations must honour two contracts:
///
/// 1. [`update_request`][PoolStore::update_request] and
///    [`commit_order`][PoolStore::commit_order] are conditional on
///    `expected` matching the stored request's current status, failing with
///    [`StoreError::Conflict`] otherwise. Blind overwrites lose updates when
///    both parties act on the same request concurrently.
/// 2. [`commit_order`][PoolStore::commit_order] is all-or-nothing: either
///    the order exists and the request is gone, or neither write happened.
pub trait PoolStore: Send + Sync + 'static {
    fn create_request(
        &self,
        request: ProductRequest,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_request(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<ProductRequest, StoreError>> + Send;

    /// Applies `update` to the stored request if its current status equals
    /// `expected`, returning the document as stored afterwards.
    fn update_request(
        &self,
        id: Uuid,
        update: RequestUpdate,
        expected: RequestStatus,
    ) -> impl Future<Output = Result<ProductRequest, StoreError>> + Send;

    /// Appends to the note thread. Legal in every status, including
    /// terminal ones (audit trail).
    fn append_note(
        &self,
        id: Uuid,
        note: RequestNote,
    ) -> impl Future<Output = Result<ProductRequest, StoreError>> + Send;

    /// Atomically inserts `order` and deletes the source request, with the
    /// same status precondition as [`update_request`][PoolStore::update_request].
    fn commit_order(
        &self,
        order: Order,
        request_id: Uuid,
        expected: RequestStatus,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_dispensary(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<DispensaryProfile, StoreError>> + Send;

    fn update_dispensary(
        &self,
        profile: DispensaryProfile,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn create_notification(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_user(&self, uid: &str) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;

    /// Conditionally decrements a user's credit balance, returning the new
    /// balance. Fails with [`StoreError::InsufficientCredits`] without
    /// mutating anything when the balance is too low.
    fn deduct_credits(
        &self,
        uid: &str,
        amount: i64,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;
}

/// The auth/identity boundary: resolve an email address to a platform user.
pub trait IdentityResolver: Send + Sync + 'static {
    fn resolve_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;
}
