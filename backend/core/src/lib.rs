pub mod error;
pub mod traits;
pub mod types;

pub use error::PondoError;
pub use traits::{ExtractModel, ImagePayload, ModelRequest, ModelResponse, OcrProvider};
pub use types::{
    ChallengeMembership, ChallengeSummary, ExchangeRate, ExpenseCategory, Goal, GoalSummary,
    NotificationData, NotificationKind, NotificationRecord, PaymentMethod, Profile,
    ProfileSummary, ReceiptRecord, Transaction, TransactionKind, TransactionSummary,
    UserContextSummary,
};
