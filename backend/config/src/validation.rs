use thiserror::Error;

use crate::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("server.port must be nonzero")]
    ZeroPort,

    #[error("database.path must not be empty")]
    EmptyDbPath,

    #[error("logging.dir must not be empty")]
    EmptyLogDir,
}

pub fn validate(config: &Config) -> Result<(), ConfigValidationError> {
    if config.server.port == 0 {
        return Err(ConfigValidationError::ZeroPort);
    }
    if config.database.path.trim().is_empty() {
        return Err(ConfigValidationError::EmptyDbPath);
    }
    if config.logging.dir.trim().is_empty() {
        return Err(ConfigValidationError::EmptyLogDir);
    }
    Ok(())
}
