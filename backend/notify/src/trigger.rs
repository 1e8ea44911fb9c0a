//! Best-effort notification delivery.
//!
//! Two deliberate policy branches live here and must stay separate:
//! the preference lookup fails OPEN (a broken preference read must not
//! suppress a notification), while the insert failure is swallowed after a
//! warn (delivery must never block the action that triggered it).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use pondo_core::{NotificationData, NotificationKind, NotificationRecord};
use pondo_store::NotificationStore;

pub struct NotificationTrigger {
    store: Arc<dyn NotificationStore>,
}

impl NotificationTrigger {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Whether the user wants notifications of this kind. An unset flag or
    /// a failed lookup both count as enabled: over-notifying beats
    /// silently dropping.
    pub async fn is_notification_enabled(&self, user_id: Uuid, kind: NotificationKind) -> bool {
        match self.store.preference(user_id, kind).await {
            Ok(Some(enabled)) => enabled,
            Ok(None) => true,
            Err(e) => {
                warn!(%user_id, kind = kind.as_str(), error = %e,
                    "preference lookup failed, defaulting to enabled");
                true
            }
        }
    }

    /// Insert a notification if the user's preference allows it.
    ///
    /// Returns the stored record, or `None` when the preference blocked it
    /// or the insert failed. Never returns an error: delivery is
    /// best-effort and non-blocking for the caller.
    pub async fn trigger(&self, data: NotificationData) -> Option<NotificationRecord> {
        if !self.is_notification_enabled(data.user_id, data.kind).await {
            debug!(user_id = %data.user_id, kind = data.kind.as_str(),
                "notification suppressed by user preference");
            return None;
        }

        let record = NotificationRecord {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            kind: data.kind,
            title: data.title,
            message: data.message,
            action_url: data.action_url,
            metadata: data.metadata,
            is_read: false,
            created_at: Utc::now(),
        };

        match self.store.insert_notification(record.clone()).await {
            Ok(()) => Some(record),
            Err(e) => {
                warn!(user_id = %record.user_id, error = %e,
                    "notification insert failed, dropping");
                None
            }
        }
    }
}
