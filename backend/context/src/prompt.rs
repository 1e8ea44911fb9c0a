//! Renders a [`UserContextSummary`] into the natural-language block fed to
//! the AI assistant.
//!
//! Pure function over the summary. Section order is fixed: profile,
//! transactions, goals, challenges. A domain with nothing in it is omitted
//! entirely rather than rendered as an empty sentence.

use pondo_core::UserContextSummary;

pub fn render_prompt(summary: &UserContextSummary) -> String {
    let mut sections = Vec::new();

    if let Some(profile) = &summary.profile {
        let mut line = format!("User profile: {}", profile.name);
        if let Some(age) = profile.age {
            line.push_str(&format!(", age {age}"));
        }
        if let Some(income) = profile.monthly_income {
            line.push_str(&format!(", monthly income ₱{income:.2}"));
        }
        line.push('.');
        sections.push(line);
    }

    let tx = &summary.transactions;
    if tx.count > 0 {
        let mut line = format!(
            "Transactions: {} recorded, ₱{:.2} spent, ₱{:.2} received",
            tx.count, tx.total_spent, tx.total_income
        );
        if let Some(top) = tx.top_category {
            line.push_str(&format!("; most spending in {}", top.as_str()));
        }
        line.push('.');
        sections.push(line);
    }

    let goals = &summary.goals;
    if goals.count > 0 {
        sections.push(format!(
            "Goals: {} active ({}), ₱{:.2} saved of ₱{:.2} target.",
            goals.count,
            goals.names.join(", "),
            goals.total_saved,
            goals.total_target
        ));
    }

    let challenges = &summary.challenges;
    if challenges.active_count > 0 {
        sections.push(format!(
            "Challenges: {} active ({}).",
            challenges.active_count,
            challenges.titles.join(", ")
        ));
    }

    if sections.is_empty() {
        return "This user has no recorded financial activity yet.".to_string();
    }
    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pondo_core::{
        ExpenseCategory, GoalSummary, ProfileSummary, TransactionSummary, UserContextSummary,
    };

    #[test]
    fn omits_goals_when_user_has_none() {
        let summary = UserContextSummary {
            transactions: TransactionSummary {
                count: 3,
                total_spent: 950.0,
                total_income: 0.0,
                top_category: Some(ExpenseCategory::FoodDining),
            },
            ..Default::default()
        };
        let block = render_prompt(&summary);
        assert!(block.contains("Transactions: 3 recorded"));
        assert!(!block.contains("Goals"));
    }

    #[test]
    fn sections_follow_fixed_order() {
        let summary = UserContextSummary {
            profile: Some(ProfileSummary {
                name: "Miguel".to_string(),
                age: None,
                monthly_income: None,
            }),
            transactions: TransactionSummary {
                count: 1,
                total_spent: 100.0,
                total_income: 0.0,
                top_category: None,
            },
            goals: GoalSummary {
                count: 1,
                names: vec!["Laptop".to_string()],
                total_target: 40_000.0,
                total_saved: 10_000.0,
            },
            ..Default::default()
        };
        let block = render_prompt(&summary);
        let profile_at = block.find("User profile").unwrap();
        let tx_at = block.find("Transactions").unwrap();
        let goals_at = block.find("Goals").unwrap();
        assert!(profile_at < tx_at && tx_at < goals_at);
    }

    #[test]
    fn empty_summary_gets_placeholder() {
        let block = render_prompt(&UserContextSummary::default());
        assert_eq!(block, "This user has no recorded financial activity yet.");
    }
}
