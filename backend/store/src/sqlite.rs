/// SQLite-backed durable store for user financial data and notifications.
///
/// Uses `rusqlite` behind a `tokio::sync::Mutex` so the async traits can be
/// served from a single connection. Dates are stored as ISO-8601 text and
/// parsed back on read. Row-level security is the hosted database's concern
/// in production; here the user-id filter on every statement provides the
/// same per-user scoping.
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use pondo_core::{
    ChallengeMembership, ExpenseCategory, Goal, NotificationKind, NotificationRecord, Profile,
    Transaction, TransactionKind,
};

use crate::store::{NotificationStore, UserDataStore};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS profiles (
        user_id        TEXT PRIMARY KEY,
        name           TEXT NOT NULL,
        age            INTEGER,
        monthly_income REAL
    );
    CREATE TABLE IF NOT EXISTS transactions (
        id       TEXT PRIMARY KEY,
        user_id  TEXT NOT NULL,
        amount   REAL NOT NULL,
        kind     TEXT NOT NULL,
        category TEXT NOT NULL,
        merchant TEXT,
        date     TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
    CREATE TABLE IF NOT EXISTS goals (
        id            TEXT PRIMARY KEY,
        user_id       TEXT NOT NULL,
        name          TEXT NOT NULL,
        target_amount REAL NOT NULL,
        saved_amount  REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id);
    CREATE TABLE IF NOT EXISTS challenge_members (
        id        TEXT PRIMARY KEY,
        user_id   TEXT NOT NULL,
        title     TEXT NOT NULL,
        is_active INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_challenge_members_user ON challenge_members(user_id);
    CREATE TABLE IF NOT EXISTS notifications (
        id         TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL,
        kind       TEXT NOT NULL,
        title      TEXT NOT NULL,
        message    TEXT NOT NULL,
        action_url TEXT,
        metadata   TEXT NOT NULL,
        is_read    INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at);
    CREATE TABLE IF NOT EXISTS notification_prefs (
        user_id TEXT NOT NULL,
        kind    TEXT NOT NULL,
        enabled INTEGER NOT NULL,
        PRIMARY KEY (user_id, kind)
    );
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn =
            Connection::open(path.as_ref()).context("Failed to open SQLite database")?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to enable WAL")?;
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize schema")?;

        info!("SqliteStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

#[async_trait]
impl UserDataStore for SqliteStore {
    async fn transactions_for(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, amount, kind, category, merchant, date
             FROM transactions WHERE user_id = ?1 ORDER BY date DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id.to_string()], row_to_transaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn goals_for(&self, user_id: Uuid) -> Result<Vec<Goal>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, target_amount, saved_amount
             FROM goals WHERE user_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![user_id.to_string()], row_to_goal)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn challenges_for(&self, user_id: Uuid) -> Result<Vec<ChallengeMembership>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, is_active
             FROM challenge_members WHERE user_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![user_id.to_string()], row_to_membership)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn profile_for(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT user_id, name, age, monthly_income FROM profiles WHERE user_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![user_id.to_string()], row_to_profile)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn add_transaction(&self, tx: Transaction) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO transactions (id, user_id, amount, kind, category, merchant, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                tx.id.to_string(),
                tx.user_id.to_string(),
                tx.amount,
                kind_str(tx.kind),
                tx.category.as_str(),
                tx.merchant,
                tx.date.to_string(),
            ],
        )?;
        debug!("Inserted transaction {}", tx.id);
        Ok(())
    }

    async fn add_goal(&self, goal: Goal) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO goals (id, user_id, name, target_amount, saved_amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                goal.id.to_string(),
                goal.user_id.to_string(),
                goal.name,
                goal.target_amount,
                goal.saved_amount,
            ],
        )?;
        Ok(())
    }

    async fn join_challenge(&self, membership: ChallengeMembership) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO challenge_members (id, user_id, title, is_active)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                membership.id.to_string(),
                membership.user_id.to_string(),
                membership.title,
                membership.is_active as i64,
            ],
        )?;
        Ok(())
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO profiles (user_id, name, age, monthly_income)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                profile.user_id.to_string(),
                profile.name,
                profile.age,
                profile.monthly_income,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl NotificationStore for SqliteStore {
    async fn insert_notification(&self, record: NotificationRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        let metadata = serde_json::to_string(&record.metadata)?;
        conn.execute(
            "INSERT INTO notifications
                 (id, user_id, kind, title, message, action_url, metadata, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id.to_string(),
                record.user_id.to_string(),
                record.kind.as_str(),
                record.title,
                record.message,
                record.action_url,
                metadata,
                record.is_read as i64,
                record.created_at.to_rfc3339(),
            ],
        )?;
        debug!("Inserted notification {}", record.id);
        Ok(())
    }

    async fn notifications_for(&self, user_id: Uuid) -> Result<Vec<NotificationRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, kind, title, message, action_url, metadata, is_read, created_at
             FROM notifications WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id.to_string()], row_to_notification)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<u64> {
        let conn = self.conn.lock().await;
        // The user-id filter is what stops cross-user mutation; never
        // update by notification id alone.
        let affected = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
            params![notification_id.to_string(), user_id.to_string()],
        )?;
        Ok(affected as u64)
    }

    async fn preference(&self, user_id: Uuid, kind: NotificationKind) -> Result<Option<bool>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT enabled FROM notification_prefs WHERE user_id = ?1 AND kind = ?2",
        )?;
        let mut rows = stmt.query_map(
            params![user_id.to_string(), kind.as_str()],
            |row| row.get::<_, i64>(0),
        )?;
        match rows.next() {
            Some(row) => Ok(Some(row? != 0)),
            None => Ok(None),
        }
    }

    async fn set_preference(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        enabled: bool,
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO notification_prefs (user_id, kind, enabled)
             VALUES (?1, ?2, ?3)",
            params![user_id.to_string(), kind.as_str(), enabled as i64],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row deserialization helpers
// ---------------------------------------------------------------------------

fn invalid(e: impl std::fmt::Display) -> rusqlite::Error {
    rusqlite::Error::InvalidParameterName(e.to_string())
}

fn kind_str(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "expense",
        TransactionKind::Income => "income",
    }
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let kind: String = row.get(3)?;
    let category: String = row.get(4)?;
    let date: String = row.get(6)?;

    Ok(Transaction {
        id: Uuid::parse_str(&id).map_err(invalid)?,
        user_id: Uuid::parse_str(&user_id).map_err(invalid)?,
        amount: row.get(2)?,
        kind: match kind.as_str() {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            other => return Err(invalid(format!("unknown transaction kind: {other}"))),
        },
        category: ExpenseCategory::parse(&category)
            .ok_or_else(|| invalid(format!("unknown category: {category}")))?,
        merchant: row.get(5)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(invalid)?,
    })
}

fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    Ok(Goal {
        id: Uuid::parse_str(&id).map_err(invalid)?,
        user_id: Uuid::parse_str(&user_id).map_err(invalid)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        saved_amount: row.get(4)?,
    })
}

fn row_to_membership(row: &rusqlite::Row) -> rusqlite::Result<ChallengeMembership> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let is_active: i64 = row.get(3)?;
    Ok(ChallengeMembership {
        id: Uuid::parse_str(&id).map_err(invalid)?,
        user_id: Uuid::parse_str(&user_id).map_err(invalid)?,
        title: row.get(2)?,
        is_active: is_active != 0,
    })
}

fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
    let user_id: String = row.get(0)?;
    Ok(Profile {
        user_id: Uuid::parse_str(&user_id).map_err(invalid)?,
        name: row.get(1)?,
        age: row.get(2)?,
        monthly_income: row.get(3)?,
    })
}

fn row_to_notification(row: &rusqlite::Row) -> rusqlite::Result<NotificationRecord> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let kind: String = row.get(2)?;
    let metadata: String = row.get(6)?;
    let is_read: i64 = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(NotificationRecord {
        id: Uuid::parse_str(&id).map_err(invalid)?,
        user_id: Uuid::parse_str(&user_id).map_err(invalid)?,
        kind: NotificationKind::parse(&kind)
            .ok_or_else(|| invalid(format!("unknown notification kind: {kind}")))?,
        title: row.get(3)?,
        message: row.get(4)?,
        action_url: row.get(5)?,
        metadata: serde_json::from_str(&metadata).map_err(invalid)?,
        is_read: is_read != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(invalid)?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_notification(user_id: Uuid) -> NotificationRecord {
        NotificationRecord {
            id: Uuid::new_v4(),
            user_id,
            kind: NotificationKind::BillReminder,
            title: "Meralco bill due".to_string(),
            message: "Your electricity bill is due in 3 days.".to_string(),
            action_url: Some("/bills".to_string()),
            metadata: serde_json::json!({"bill": "meralco"}),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn transaction_roundtrip() {
        let store = SqliteStore::in_memory().expect("in-memory db");
        let user_id = Uuid::new_v4();
        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id,
            amount: 250.0,
            kind: TransactionKind::Expense,
            category: ExpenseCategory::Transportation,
            merchant: Some("Grab".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        store.add_transaction(tx.clone()).await.unwrap();

        let got = store.transactions_for(user_id).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].category, ExpenseCategory::Transportation);
        assert_eq!(got[0].date, tx.date);

        // Scoped to the owner: another user sees nothing.
        let other = store.transactions_for(Uuid::new_v4()).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn mark_read_requires_owning_user() {
        let store = SqliteStore::in_memory().expect("in-memory db");
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let record = sample_notification(owner);
        store.insert_notification(record.clone()).await.unwrap();

        let affected = store.mark_read(record.id, intruder).await.unwrap();
        assert_eq!(affected, 0);
        let got = store.notifications_for(owner).await.unwrap();
        assert!(!got[0].is_read);

        let affected = store.mark_read(record.id, owner).await.unwrap();
        assert_eq!(affected, 1);
        let got = store.notifications_for(owner).await.unwrap();
        assert!(got[0].is_read);
    }

    #[tokio::test]
    async fn preference_roundtrip_and_absence() {
        let store = SqliteStore::in_memory().expect("in-memory db");
        let user_id = Uuid::new_v4();

        let got = store
            .preference(user_id, NotificationKind::BudgetAlert)
            .await
            .unwrap();
        assert_eq!(got, None);

        store
            .set_preference(user_id, NotificationKind::BudgetAlert, false)
            .await
            .unwrap();
        let got = store
            .preference(user_id, NotificationKind::BudgetAlert)
            .await
            .unwrap();
        assert_eq!(got, Some(false));
    }

    #[tokio::test]
    async fn notifications_listed_newest_first() {
        let store = SqliteStore::in_memory().expect("in-memory db");
        let user_id = Uuid::new_v4();

        let mut first = sample_notification(user_id);
        first.title = "first".to_string();
        first.created_at = Utc::now() - chrono::Duration::minutes(5);
        let mut second = sample_notification(user_id);
        second.title = "second".to_string();

        store.insert_notification(first).await.unwrap();
        store.insert_notification(second).await.unwrap();

        let got = store.notifications_for(user_id).await.unwrap();
        assert_eq!(got[0].title, "second");
        assert_eq!(got[1].title, "first");
    }
}
