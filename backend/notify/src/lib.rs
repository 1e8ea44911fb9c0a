pub mod builders;
pub mod trigger;

pub use trigger::NotificationTrigger;
