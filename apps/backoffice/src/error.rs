//! # API Error Types
//!
//! The error every command returns to its caller.
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ValidationError ─┐                                                     │
//! │  CoreError ───────┼──► ApiError { code, message } ──► caller / UI       │
//! │  DbError ─────────┘                                                     │
//! │                                                                         │
//! │  code                 when                                              │
//! │  ───────────────────  ───────────────────────────────────────────────   │
//! │  NOT_FOUND            unknown sale / client id                          │
//! │  VALIDATION_ERROR     the user can fix the form and resubmit            │
//! │  FORBIDDEN            the account may not write to the section          │
//! │  DATABASE_ERROR       persistence failed (in-memory state kept)         │
//! │  COLLABORATOR_ERROR   catalog or other collaborator failed              │
//! │  INTERNAL             anything else                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database internals are logged, never shown: the message is generic.

use serde::Serialize;
use thiserror::Error;

use backoffice_core::{CoreError, Section, ValidationError};
use backoffice_db::DbError;

/// Serialized as `{ "code": "NOT_FOUND", "message": "Sale not found: ..." }`.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    Forbidden,
    DatabaseError,
    CollaboratorError,
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn forbidden(section: Section) -> Self {
        ApiError::new(
            ErrorCode::Forbidden,
            format!("No write access to {}", section.label()),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", &id),
            CoreError::ClientNotFound(id) => ApiError::not_found("Client", &id),
            CoreError::Validation(e) => ApiError::from(e),
            CoreError::Collaborator(e) => {
                tracing::error!("Collaborator failed: {}", e);
                ApiError::new(ErrorCode::CollaboratorError, e.to_string())
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::DatabaseError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored data could not be decoded: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored data is unreadable")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}
