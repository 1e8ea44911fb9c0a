//! Builds a [`UserContextSummary`] from the four user-scoped collections.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use pondo_core::{
    ChallengeSummary, ExpenseCategory, GoalSummary, PondoError, ProfileSummary, Transaction,
    TransactionKind, TransactionSummary, UserContextSummary,
};
use pondo_store::UserDataStore;

pub struct ContextAggregator {
    store: Arc<dyn UserDataStore>,
}

impl ContextAggregator {
    pub fn new(store: Arc<dyn UserDataStore>) -> Self {
        Self { store }
    }

    /// Rebuild the full summary for one user.
    ///
    /// The four reads share no data dependency, so they run concurrently
    /// and join. All-or-nothing: if any read fails the whole build fails
    /// with [`PondoError::ContextBuild`]: an incomplete financial picture
    /// is worse than none for the downstream AI consumer.
    pub async fn build(&self, user_id: Uuid) -> Result<UserContextSummary, PondoError> {
        let (transactions, goals, challenges, profile) = tokio::join!(
            self.store.transactions_for(user_id),
            self.store.goals_for(user_id),
            self.store.challenges_for(user_id),
            self.store.profile_for(user_id),
        );

        let transactions =
            transactions.map_err(|e| PondoError::ContextBuild(e.to_string()))?;
        let goals = goals.map_err(|e| PondoError::ContextBuild(e.to_string()))?;
        let challenges = challenges.map_err(|e| PondoError::ContextBuild(e.to_string()))?;
        let profile = profile.map_err(|e| PondoError::ContextBuild(e.to_string()))?;

        let summary = UserContextSummary {
            profile: profile.map(|p| ProfileSummary {
                name: p.name,
                age: p.age,
                monthly_income: p.monthly_income,
            }),
            transactions: summarize_transactions(&transactions),
            goals: GoalSummary {
                count: goals.len(),
                names: goals.iter().map(|g| g.name.clone()).collect(),
                total_target: goals.iter().map(|g| g.target_amount).sum(),
                total_saved: goals.iter().map(|g| g.saved_amount).sum(),
            },
            challenges: ChallengeSummary {
                active_count: challenges.iter().filter(|c| c.is_active).count(),
                titles: challenges
                    .iter()
                    .filter(|c| c.is_active)
                    .map(|c| c.title.clone())
                    .collect(),
            },
        };

        debug!(%user_id, tx = summary.transactions.count, "context summary built");
        Ok(summary)
    }
}

fn summarize_transactions(transactions: &[Transaction]) -> TransactionSummary {
    let mut spent_by_category: HashMap<ExpenseCategory, f64> = HashMap::new();
    let mut total_spent = 0.0;
    let mut total_income = 0.0;

    for tx in transactions {
        match tx.kind {
            TransactionKind::Expense => {
                total_spent += tx.amount;
                *spent_by_category.entry(tx.category).or_default() += tx.amount;
            }
            TransactionKind::Income => total_income += tx.amount,
        }
    }

    let top_category = spent_by_category
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(category, _)| category);

    TransactionSummary {
        count: transactions.len(),
        total_spent,
        total_income,
        top_category,
    }
}
