use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use models_orders::Order;
use models_pool::{DispensaryProfile, ProductRequest, RequestNote, RequestStatus, UserRecord};
use models_pool_notifications::Notification;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{IdentityResolver, PoolStore, RequestUpdate, StoreError};

#[derive(Default)]
struct Inner {
    requests: HashMap<Uuid, ProductRequest>,
    orders: HashMap<Uuid, Order>,
    notifications: Vec<Notification>,
    dispensaries: HashMap<Uuid, DispensaryProfile>,
    users: HashMap<String, UserRecord>,
}

/// In-process [`PoolStore`] used by tests and local runs.
///
/// All mutations go through one async mutex, so the conditional-update and
/// atomic-batch contracts hold by construction. `fail_next_commit` injects
/// a transient failure into the next order commit, leaving state untouched,
/// for atomicity and retry tests.
#[derive(Clone, Default)]
pub struct MemoryPoolStore {
    inner: Arc<Mutex<Inner>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next [`PoolStore::commit_order`] fail with
    /// [`StoreError::Unavailable`] without persisting anything.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub async fn insert_dispensary(&self, profile: DispensaryProfile) {
        self.inner
            .lock()
            .await
            .dispensaries
            .insert(profile.id, profile);
    }

    pub async fn insert_user(&self, user: UserRecord) {
        self.inner.lock().await.users.insert(user.uid.clone(), user);
    }

    pub async fn request_exists(&self, id: Uuid) -> bool {
        self.inner.lock().await.requests.contains_key(&id)
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.inner.lock().await.orders.values().cloned().collect()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.lock().await.notifications.clone()
    }
}

impl PoolStore for MemoryPoolStore {
    async fn create_request(&self, request: ProductRequest) -> Result<(), StoreError> {
        self.inner.lock().await.requests.insert(request.id, request);
        Ok(())
    }

    async fn get_request(&self, id: Uuid) -> Result<ProductRequest, StoreError> {
        self.inner
            .lock()
            .await
            .requests
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("productRequests/{id}")))
    }

    async fn update_request(
        &self,
        id: Uuid,
        update: RequestUpdate,
        expected: RequestStatus,
    ) -> Result<ProductRequest, StoreError> {
        let mut inner = self.inner.lock().await;
        let stored = inner
            .requests
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("productRequests/{id}")))?;
        if stored.status != expected {
            return Err(StoreError::Conflict(format!("productRequests/{id}")));
        }
        stored.status = update.status;
        stored.updated_at = update.updated_at;
        if let Some(date) = update.actual_delivery_date {
            stored.actual_delivery_date = Some(date);
        }
        Ok(stored.clone())
    }

    async fn append_note(&self, id: Uuid, note: RequestNote) -> Result<ProductRequest, StoreError> {
        let mut inner = self.inner.lock().await;
        let stored = inner
            .requests
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("productRequests/{id}")))?;
        stored.updated_at = note.timestamp;
        stored.notes.push(note);
        Ok(stored.clone())
    }

    async fn commit_order(
        &self,
        order: Order,
        request_id: Uuid,
        expected: RequestStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;

        // Preconditions first; nothing below may partially apply.
        let stored = inner
            .requests
            .get(&request_id)
            .ok_or_else(|| StoreError::NotFound(format!("productRequests/{request_id}")))?;
        if stored.status != expected {
            return Err(StoreError::Conflict(format!(
                "productRequests/{request_id}"
            )));
        }

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "injected batch-write failure".to_string(),
            ));
        }

        inner.orders.insert(order.id, order);
        inner.requests.remove(&request_id);
        Ok(())
    }

    async fn get_dispensary(&self, id: Uuid) -> Result<DispensaryProfile, StoreError> {
        self.inner
            .lock()
            .await
            .dispensaries
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("dispensaries/{id}")))
    }

    async fn update_dispensary(&self, profile: DispensaryProfile) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.dispensaries.contains_key(&profile.id) {
            return Err(StoreError::NotFound(format!("dispensaries/{}", profile.id)));
        }
        inner.dispensaries.insert(profile.id, profile);
        Ok(())
    }

    async fn create_notification(&self, notification: Notification) -> Result<(), StoreError> {
        self.inner.lock().await.notifications.push(notification);
        Ok(())
    }

    async fn get_user(&self, uid: &str) -> Result<UserRecord, StoreError> {
        self.inner
            .lock()
            .await
            .users
            .get(uid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("users/{uid}")))
    }

    async fn deduct_credits(&self, uid: &str, amount: i64) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .get_mut(uid)
            .ok_or_else(|| StoreError::NotFound(format!("users/{uid}")))?;
        if user.credits < amount {
            return Err(StoreError::InsufficientCredits {
                available: user.credits,
                requested: amount,
            });
        }
        user.credits -= amount;
        Ok(user.credits)
    }
}

impl IdentityResolver for MemoryPoolStore {
    async fn resolve_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .await
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(status: RequestStatus) -> ProductRequest {
        let now = Utc::now();
        ProductRequest {
            id: Uuid::new_v4(),
            requester_user_id: "user-requester".to_string(),
            requester_dispensary_id: Uuid::new_v4(),
            requester_dispensary_name: "Green Leaf".to_string(),
            requester_email: "buyer@green-leaf.example".to_string(),
            product_owner_dispensary_id: Uuid::new_v4(),
            product_owner_dispensary_name: "The Herb Hut".to_string(),
            product_owner_email: "owner@herb-hut.example".to_string(),
            product_id: Uuid::new_v4(),
            product_name: "OG Kush".to_string(),
            product_image: None,
            requested_tier: None,
            quantity_requested: 1,
            delivery_address: None,
            contact_person: None,
            contact_phone: None,
            preferred_delivery_date: None,
            actual_delivery_date: None,
            status,
            notes: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn status_update(status: RequestStatus) -> RequestUpdate {
        RequestUpdate {
            status,
            updated_at: Utc::now(),
            actual_delivery_date: None,
        }
    }

    #[tokio::test]
    async fn update_with_stale_expectation_conflicts() {
        let store = MemoryPoolStore::new();
        let req = request(RequestStatus::PendingOwnerApproval);
        store.create_request(req.clone()).await.unwrap();

        store
            .update_request(
                req.id,
                status_update(RequestStatus::Rejected),
                RequestStatus::PendingOwnerApproval,
            )
            .await
            .unwrap();

        // Second writer still expects the old status.
        let err = store
            .update_request(
                req.id,
                status_update(RequestStatus::Cancelled),
                RequestStatus::PendingOwnerApproval,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let stored = store.get_request(req.id).await.unwrap();
        assert_eq!(stored.status, RequestStatus::Rejected);
    }

    #[tokio::test]
    async fn status_update_preserves_a_note_appended_after_the_read() {
        let store = MemoryPoolStore::new();
        let req = request(RequestStatus::PendingOwnerApproval);
        store.create_request(req.clone()).await.unwrap();

        // The counterparty's note lands after this writer loaded its copy.
        store
            .append_note(
                req.id,
                RequestNote {
                    note: "Could you do Tuesday instead?".to_string(),
                    by_name: "Green Leaf".to_string(),
                    sender_role: models_pool::SenderRole::Requester,
                    timestamp: Utc::now(),
                },
            )
            .await
            .unwrap();

        let updated = store
            .update_request(
                req.id,
                status_update(RequestStatus::Rejected),
                RequestStatus::PendingOwnerApproval,
            )
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::Rejected);
        assert_eq!(updated.notes.len(), 1, "note thread must be append-only");
        let stored = store.get_request(req.id).await.unwrap();
        assert_eq!(stored.notes.len(), 1);
    }

    #[tokio::test]
    async fn injected_commit_failure_leaves_no_partial_state() {
        let store = MemoryPoolStore::new();
        let req = request(RequestStatus::Accepted {
            requester_confirmed: true,
        });
        let req_id = req.id;
        store.create_request(req).await.unwrap();

        let order = models_orders::Order {
            id: Uuid::new_v4(),
            order_number: "POOL-1-TEST00".to_string(),
            user_id: "user-requester".to_string(),
            customer_details: models_orders::CustomerDetails {
                dispensary_id: Uuid::new_v4(),
                dispensary_name: "Green Leaf".to_string(),
                email: "buyer@green-leaf.example".to_string(),
                phone: None,
                address: None,
            },
            items: vec![],
            shipments: Default::default(),
            currency: "ZAR".to_string(),
            subtotal_cents: 0,
            tax_cents: 0,
            shipping_total_cents: 0,
            total_cents: 0,
            total_dispensary_earnings_cents: 0,
            total_platform_commission_cents: 0,
            payment_status: models_orders::PaymentStatus::Pending,
            status: models_orders::OrderStatus::Processing,
            status_history: vec![],
            source_request_id: req_id,
            created_at: Utc::now(),
        };

        store.fail_next_commit();
        let err = store
            .commit_order(
                order.clone(),
                req_id,
                RequestStatus::Accepted {
                    requester_confirmed: true,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.request_exists(req_id).await);
        assert!(store.orders().await.is_empty());

        // Retry succeeds and applies both writes.
        store
            .commit_order(
                order,
                req_id,
                RequestStatus::Accepted {
                    requester_confirmed: true,
                },
            )
            .await
            .unwrap();
        assert!(!store.request_exists(req_id).await);
        assert_eq!(store.orders().await.len(), 1);
    }

    #[tokio::test]
    async fn deduct_credits_is_conditional() {
        let store = MemoryPoolStore::new();
        store
            .insert_user(UserRecord {
                uid: "u1".to_string(),
                email: "u1@example.com".to_string(),
                display_name: None,
                dispensary_id: None,
                role: None,
                credits: 3,
            })
            .await;

        assert_eq!(store.deduct_credits("u1", 2).await.unwrap(), 1);
        let err = store.deduct_credits("u1", 2).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientCredits {
                available: 1,
                requested: 2
            }
        ));
        // Balance untouched by the failed attempt.
        assert_eq!(store.get_user("u1").await.unwrap().credits, 1);
    }
}
