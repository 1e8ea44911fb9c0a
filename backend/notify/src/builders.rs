//! Typed constructors for the notification kinds the app sends.

use serde_json::json;
use uuid::Uuid;

use pondo_core::{NotificationData, NotificationKind};

pub fn bill_reminder(user_id: Uuid, bill_name: &str, days_until_due: u32) -> NotificationData {
    NotificationData {
        user_id,
        kind: NotificationKind::BillReminder,
        title: format!("{bill_name} bill due soon"),
        message: format!("Your {bill_name} bill is due in {days_until_due} day(s)."),
        action_url: Some("/bills".to_string()),
        metadata: json!({ "bill": bill_name, "days_until_due": days_until_due }),
    }
}

pub fn achievement(user_id: Uuid, achievement_name: &str) -> NotificationData {
    NotificationData {
        user_id,
        kind: NotificationKind::Achievement,
        title: "Achievement unlocked!".to_string(),
        message: format!("You earned \"{achievement_name}\". Keep it up!"),
        action_url: Some("/achievements".to_string()),
        metadata: json!({ "achievement": achievement_name }),
    }
}

pub fn budget_alert(user_id: Uuid, category: &str, spent: f64, budget: f64) -> NotificationData {
    NotificationData {
        user_id,
        kind: NotificationKind::BudgetAlert,
        title: format!("{category} budget alert"),
        message: format!("You've spent ₱{spent:.2} of your ₱{budget:.2} {category} budget."),
        action_url: Some("/budgets".to_string()),
        metadata: json!({ "category": category, "spent": spent, "budget": budget }),
    }
}

pub fn learning_nudge(user_id: Uuid, module_title: &str) -> NotificationData {
    NotificationData {
        user_id,
        kind: NotificationKind::Learning,
        title: "Continue learning".to_string(),
        message: format!("Pick up where you left off in \"{module_title}\"."),
        action_url: Some("/learning".to_string()),
        metadata: json!({ "module": module_title }),
    }
}

pub fn system(user_id: Uuid, title: &str, message: &str) -> NotificationData {
    NotificationData {
        user_id,
        kind: NotificationKind::System,
        title: title.to_string(),
        message: message.to_string(),
        action_url: None,
        metadata: json!({}),
    }
}
