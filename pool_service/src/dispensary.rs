//! Dispensary lifecycle: approval of pending applications and later
//! status changes, each with a best-effort notice to the owner.

use chrono::Utc;
use models_pool::{DispensaryProfile, DispensaryStatus};
use models_pool_notifications::{DispensaryEventMetadata, PoolNotificationEvent};
use pool_store::{IdentityResolver, PoolStore};
use sendgrid_client::EmailSender;
use uuid::Uuid;

use crate::error::PoolError;
use crate::notification::NotificationDraft;
use crate::service::PoolService;

fn dispensary_meta(profile: &DispensaryProfile) -> DispensaryEventMetadata {
    DispensaryEventMetadata {
        dispensary_id: profile.id,
        dispensary_name: profile.name.clone(),
        status: profile.status.to_string(),
    }
}

impl<S, I, E> PoolService<S, I, E>
where
    S: PoolStore,
    I: IdentityResolver,
    E: EmailSender,
{
    /// Approves a pending dispensary application, activating the profile.
    pub async fn approve_dispensary(&self, id: Uuid) -> Result<DispensaryProfile, PoolError> {
        let mut profile = self.store().get_dispensary(id).await?;
        if profile.status != DispensaryStatus::PendingApproval {
            return Err(PoolError::Validation(format!(
                "{} is {} and cannot be approved",
                profile.name, profile.status,
            )));
        }

        profile.status = DispensaryStatus::Active;
        profile.updated_at = Utc::now();
        self.store().update_dispensary(profile.clone()).await?;
        tracing::info!(dispensary_id = %id, name = %profile.name, "dispensary approved");

        self.dispatch(NotificationDraft {
            event: PoolNotificationEvent::DispensaryApproved(dispensary_meta(&profile)),
            recipient_email: profile.email.clone(),
            subject: format!("{} is now live on The Dispensary Tree", profile.name),
            message: format!(
                "Your application for {} was approved. You can now list pooled stock.",
                profile.name,
            ),
            link_path: "/dashboard/settings".to_string(),
        })
        .await;

        Ok(profile)
    }

    /// Changes a dispensary's status (suspend, close, re-activate).
    pub async fn set_dispensary_status(
        &self,
        id: Uuid,
        status: DispensaryStatus,
    ) -> Result<DispensaryProfile, PoolError> {
        if status == DispensaryStatus::PendingApproval {
            return Err(PoolError::Validation(
                "a dispensary cannot be moved back to pending approval".to_string(),
            ));
        }

        let mut profile = self.store().get_dispensary(id).await?;
        if profile.status == status {
            return Ok(profile);
        }

        let old = profile.status;
        profile.status = status;
        profile.updated_at = Utc::now();
        self.store().update_dispensary(profile.clone()).await?;
        tracing::info!(
            dispensary_id = %id,
            name = %profile.name,
            from = %old,
            to = %status,
            "dispensary status changed"
        );

        self.dispatch(NotificationDraft {
            event: PoolNotificationEvent::DispensaryStatusChanged(dispensary_meta(&profile)),
            recipient_email: profile.email.clone(),
            subject: format!("Status update for {}", profile.name),
            message: format!("{} is now {}.", profile.name, status),
            link_path: "/dashboard/settings".to_string(),
        })
        .await;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models_pool::UserRecord;
    use models_pool_notifications::{EmailMessage, PoolNotificationEventType};
    use pool_store::MemoryPoolStore;

    struct NullEmailSender;

    impl EmailSender for NullEmailSender {
        async fn send(&self, _message: &EmailMessage) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn pending(name: &str) -> DispensaryProfile {
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
            status: DispensaryStatus::PendingApproval,
            shipping_methods: vec![],
            locker: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn service() -> (
        PoolService<MemoryPoolStore, MemoryPoolStore, NullEmailSender>,
        MemoryPoolStore,
    ) {
        let store = MemoryPoolStore::new();
        let service = PoolService::new(
            store.clone(),
            store.clone(),
            NullEmailSender,
            "https://pool.example".to_string(),
        );
        (service, store)
    }

    #[tokio::test]
    async fn approval_activates_and_notifies_the_owner() {
        let (service, store) = service().await;
        let profile = pending("herb-hut");
        store.insert_dispensary(profile.clone()).await;
        store
            .insert_user(UserRecord {
                uid: "uid-owner".to_string(),
                email: profile.email.clone(),
                display_name: None,
                dispensary_id: Some(profile.id),
                role: None,
                credits: 0,
            })
            .await;

        let approved = service.approve_dispensary(profile.id).await.unwrap();
        assert_eq!(approved.status, DispensaryStatus::Active);

        let notifications = store.notifications().await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].recipient_uid, "uid-owner");
        assert_eq!(
            notifications[0].event.event_type(),
            PoolNotificationEventType::DispensaryApproved
        );
    }

    #[tokio::test]
    async fn approving_twice_fails_validation() {
        let (service, store) = service().await;
        let profile = pending("herb-hut");
        store.insert_dispensary(profile.clone()).await;

        service.approve_dispensary(profile.id).await.unwrap();
        let err = service.approve_dispensary(profile.id).await.unwrap_err();
        assert!(matches!(err, PoolError::Validation(_)), "{err}");
    }

    #[tokio::test]
    async fn status_change_is_recorded_and_idempotent() {
        let (service, store) = service().await;
        let mut profile = pending("herb-hut");
        profile.status = DispensaryStatus::Active;
        store.insert_dispensary(profile.clone()).await;

        let updated = service
            .set_dispensary_status(profile.id, DispensaryStatus::Suspended)
            .await
            .unwrap();
        assert_eq!(updated.status, DispensaryStatus::Suspended);
        assert_eq!(store.notifications().await.len(), 0, "owner uid unknown, in-app skip");

        // Same status again is a no-op without a second notice.
        service
            .set_dispensary_status(profile.id, DispensaryStatus::Suspended)
            .await
            .unwrap();
        assert_eq!(store.notifications().await.len(), 0);
    }

    #[tokio::test]
    async fn cannot_return_to_pending() {
        let (service, store) = service().await;
        let mut profile = pending("herb-hut");
        profile.status = DispensaryStatus::Active;
        store.insert_dispensary(profile.clone()).await;

        let err = service
            .set_dispensary_status(profile.id, DispensaryStatus::PendingApproval)
            .await
            .unwrap_err();
        assert!(matches!(err, PoolError::Validation(_)));
    }
}
