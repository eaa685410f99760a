// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Service-level error taxonomy shared by every application service.

use thiserror::Error;

use crate::domain::agent::UnknownAgentType;
use crate::domain::block::BlockError;
use crate::domain::relationship::LinkError;
use crate::domain::repository::RepositoryError;
use crate::domain::system_prompt::SystemPromptError;
use crate::domain::tool::ToolError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(entity: &str, key: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} '{}'", entity, key))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        // Unique violations reach callers as conflicts
        match err {
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<LinkError> for ServiceError {
    fn from(err: LinkError) -> Self {
        ServiceError::Conflict(err.to_string())
    }
}

impl From<BlockError> for ServiceError {
    fn from(err: BlockError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<ToolError> for ServiceError {
    fn from(err: ToolError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<SystemPromptError> for ServiceError {
    fn from(err: SystemPromptError) -> Self {
        ServiceError::Configuration(err.to_string())
    }
}

impl From<UnknownAgentType> for ServiceError {
    fn from(err: UnknownAgentType) -> Self {
        ServiceError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflict_surfaces_as_conflict() {
        let err: ServiceError = RepositoryError::Conflict("duplicate key".to_string()).into();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn test_database_error_propagates_unchanged() {
        let err: ServiceError = RepositoryError::Database("connection reset".to_string()).into();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::Database(_))));
    }

    #[test]
    fn test_missing_template_is_configuration_error() {
        let err: ServiceError =
            SystemPromptError::NoDefault(crate::domain::agent::AgentType::O1Agent).into();
        assert!(matches!(err, ServiceError::Configuration(ref m) if m.contains("o1_agent")));
    }
}
