use thiserror::Error;

use crate::config::LoadError;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}

impl From<LoadError> for InfraError {
    fn from(err: LoadError) -> Self {
        Self::configuration(err.to_string())
    }
}
