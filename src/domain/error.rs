use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("`{entity}` was not found")]
    NotFound { entity: &'static str },
    #[error("profile validation failed: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
