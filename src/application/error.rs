use thiserror::Error;

use crate::{
    application::repos::RepoError, cache::CacheError, domain::error::DomainError,
    infra::error::InfraError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the failure came from bad caller input rather than a collaborator.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Cache(CacheError::InvalidArgument { .. })
                | AppError::Domain(DomainError::Validation { .. })
                | AppError::Repo(RepoError::InvalidInput { .. })
        )
    }
}
