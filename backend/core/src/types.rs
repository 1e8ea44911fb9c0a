//! Shared domain types for the Pondo backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Spending category for a transaction or scanned receipt.
///
/// This is a closed set: new categories are added here, never carried as
/// free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    #[serde(rename = "Health")]
    Health,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Other")]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::FoodDining,
        ExpenseCategory::Transportation,
        ExpenseCategory::Shopping,
        ExpenseCategory::Entertainment,
        ExpenseCategory::BillsUtilities,
        ExpenseCategory::Health,
        ExpenseCategory::Education,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::FoodDining => "Food & Dining",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::BillsUtilities => "Bills & Utilities",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Other => "Other",
        }
    }

    /// Parse a category name as emitted by the structuring model.
    /// Returns `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s.trim())
    }
}

/// How a purchase was paid for. Closed set, same rules as [`ExpenseCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "GCash")]
    GCash,
    #[serde(rename = "Maya")]
    Maya,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Other")]
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Cash,
        PaymentMethod::GCash,
        PaymentMethod::Maya,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::BankTransfer,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::GCash => "GCash",
            PaymentMethod::Maya => "Maya",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == s.trim())
    }
}

/// A fully structured receipt produced by the scan pipeline.
///
/// Immutable once produced; persisting it is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    pub merchant: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub items: Vec<String>,
    pub category: ExpenseCategory,
    pub payment_method: PaymentMethod,
}

/// A USD→PHP exchange rate snapshot. Recomputed per request, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub usd_to_php: f64,
    pub last_updated: DateTime<Utc>,
}

/// Category of notification, keyed against per-user preference flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BillReminder,
    Learning,
    Achievement,
    BudgetAlert,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BillReminder => "bill_reminder",
            NotificationKind::Learning => "learning",
            NotificationKind::Achievement => "achievement",
            NotificationKind::BudgetAlert => "budget_alert",
            NotificationKind::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bill_reminder" => Some(NotificationKind::BillReminder),
            "learning" => Some(NotificationKind::Learning),
            "achievement" => Some(NotificationKind::Achievement),
            "budget_alert" => Some(NotificationKind::BudgetAlert),
            "system" => Some(NotificationKind::System),
            _ => None,
        }
    }
}

/// Input to the notification trigger helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A stored notification. `is_read` only ever flips false→true, and only
/// for the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub metadata: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// One of a user's financial transactions, as read from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: ExpenseCategory,
    pub merchant: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    Income,
}

/// A savings goal owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_amount: f64,
    pub saved_amount: f64,
}

/// A user's membership in a savings challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeMembership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub is_active: bool,
}

/// A user profile record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub name: String,
    pub age: Option<u32>,
    pub monthly_income: Option<f64>,
}

/// Rollup of one user's financial picture across the four independent
/// domains. Rebuilt in full on every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserContextSummary {
    pub profile: Option<ProfileSummary>,
    pub transactions: TransactionSummary,
    pub goals: GoalSummary,
    pub challenges: ChallengeSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub age: Option<u32>,
    pub monthly_income: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub count: usize,
    pub total_spent: f64,
    pub total_income: f64,
    pub top_category: Option<ExpenseCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalSummary {
    pub count: usize,
    pub names: Vec<String>,
    pub total_target: f64,
    pub total_saved: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub active_count: usize,
    pub titles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_roundtrip() {
        for c in ExpenseCategory::ALL {
            assert_eq!(ExpenseCategory::parse(c.as_str()), Some(c));
        }
        assert_eq!(ExpenseCategory::parse("Groceries"), None);
    }

    #[test]
    fn payment_method_parse_is_exact() {
        assert_eq!(PaymentMethod::parse("GCash"), Some(PaymentMethod::GCash));
        assert_eq!(PaymentMethod::parse(" GCash "), Some(PaymentMethod::GCash));
        assert_eq!(PaymentMethod::parse("gcash"), None);
    }

    #[test]
    fn receipt_record_wire_shape() {
        let record = ReceiptRecord {
            merchant: "Jollibee".into(),
            amount: 185.5,
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            items: vec!["Chickenjoy".into()],
            category: ExpenseCategory::FoodDining,
            payment_method: PaymentMethod::GCash,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["paymentMethod"], "GCash");
        assert_eq!(json["category"], "Food & Dining");
        assert_eq!(json["date"], "2025-01-15");
    }
}
