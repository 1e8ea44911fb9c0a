use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use pondo_core::{
    ChallengeMembership, Goal, NotificationKind, NotificationRecord, Profile, Transaction,
};

/// Read access to the four user-scoped financial collections, plus the
/// minimal write surface needed to populate them.
///
/// Every operation is filtered to a single user id; cross-user reads are
/// not expressible through this interface.
#[async_trait]
pub trait UserDataStore: Send + Sync {
    async fn transactions_for(&self, user_id: Uuid) -> Result<Vec<Transaction>>;
    async fn goals_for(&self, user_id: Uuid) -> Result<Vec<Goal>>;
    async fn challenges_for(&self, user_id: Uuid) -> Result<Vec<ChallengeMembership>>;
    async fn profile_for(&self, user_id: Uuid) -> Result<Option<Profile>>;

    async fn add_transaction(&self, tx: Transaction) -> Result<()>;
    async fn add_goal(&self, goal: Goal) -> Result<()>;
    async fn join_challenge(&self, membership: ChallengeMembership) -> Result<()>;
    async fn upsert_profile(&self, profile: Profile) -> Result<()>;
}

/// Notification storage and the per-user preference lookup.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, record: NotificationRecord) -> Result<()>;

    /// All notifications for one user, newest first.
    async fn notifications_for(&self, user_id: Uuid) -> Result<Vec<NotificationRecord>>;

    /// Flip `is_read` to true for one notification, scoped to the acting
    /// user. Returns the affected-row count: 0 means the notification does
    /// not exist or belongs to someone else, and nothing was changed.
    async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<u64>;

    /// The stored preference flag for (user, kind), or `None` if the user
    /// has never set one.
    async fn preference(&self, user_id: Uuid, kind: NotificationKind) -> Result<Option<bool>>;

    async fn set_preference(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        enabled: bool,
    ) -> Result<()>;
}
