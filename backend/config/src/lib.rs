//! Configuration for the Pondo backend: TOML schema with defaults,
//! environment-variable overrides, and a validation pass.

pub mod io;
pub mod schema;
pub mod validation;

pub use io::load;
pub use schema::{Config, DatabaseConfig, LoggingConfig, ProvidersConfig, RatesConfig, ServerConfig};
pub use validation::{validate, ConfigValidationError};
