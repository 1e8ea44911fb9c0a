pub mod aggregator;
pub mod prompt;

pub use aggregator::ContextAggregator;
pub use prompt::render_prompt;
