//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Error taxonomy shared by the entity model, the business-rule layer and
//! the persistence layer.

use thiserror::Error;

/// Errors that can occur anywhere in Guildhall.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A supplied entity or argument violates a field-level constraint.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A uniqueness constraint (character or guild name) would be violated.
    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    /// A referenced id does not correspond to any stored row.
    #[error("Not found: {0}")]
    ResourceNotFound(String),

    /// The operation is well-formed but a cross-entity rule forbids it.
    #[error("Business rule violated: {0}")]
    BusinessRuleViolation(String),

    /// The entity is not in a state that allows the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The storage layer failed.
    #[error("Database error: {0}")]
    DatabaseOperation(String),
}

/// Result type for Guildhall operations.
pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateResource(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::ResourceNotFound(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::DatabaseOperation(msg.into())
    }

    /// Duplicate resources travel the same path as any other invalid input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::DuplicateResource(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound(_))
    }
}

/// Postgres SQLSTATE for `unique_violation`.
#[cfg(feature = "sqlx")]
const UNIQUE_VIOLATION: &str = "23505";

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for GameError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::ResourceNotFound("no matching row".to_string()),
            sqlx::Error::Database(db)
                if db.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Self::DuplicateResource(db.message().to_string())
            }
            _ => Self::DatabaseOperation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_invalid_input() {
        assert!(GameError::duplicate("Thorin").is_invalid_input());
        assert!(GameError::invalid_input("level").is_invalid_input());
        assert!(!GameError::not_found("character 7").is_invalid_input());
        assert!(!GameError::business_rule("guild has members").is_invalid_input());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GameError::not_found("Character with ID 3").to_string(),
            "Not found: Character with ID 3"
        );
        assert_eq!(
            GameError::database("connection reset").to_string(),
            "Database error: connection reset"
        );
    }
}
