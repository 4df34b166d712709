//! # Error Types
//!
//! Domain-specific error types for backoffice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backoffice-core errors (this file)                                    │
//! │  ├── CoreError          - General domain errors                        │
//! │  ├── ValidationError    - Input validation failures (recoverable)      │
//! │  └── CollaboratorError  - Catalog / persistence collaborator failures  │
//! │                                                                         │
//! │  backoffice-db errors (separate crate)                                 │
//! │  └── DbError            - Database operation failures                  │
//! │                                                                         │
//! │  app errors                                                            │
//! │  └── ApiError           - What the caller sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No error here is fatal: every failure leaves the session in its
//! pre-operation state so the user can correct the form and resubmit.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No sale with the given id exists in the sale book.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// No client with the given id exists in the directory.
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An external collaborator (catalog, persistence) failed.
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

impl CoreError {
    /// Returns true for failures the user can fix by editing the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Always recoverable and surfaced to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection must contain at least one entry.
    ///
    /// ## When This Occurs
    /// - Registering a sale with no line items
    #[error("{field} must contain at least one entry")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Collaborator Error
// =============================================================================

/// Failures reported by external collaborators.
///
/// The core never retries; it surfaces whatever the collaborator returned.
/// A catalog lookup failure degrades to "no match" (autofill is skipped).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The collaborator could not be reached.
    #[error("{collaborator} unavailable: {reason}")]
    Unavailable { collaborator: String, reason: String },

    /// The collaborator refused the request.
    #[error("{collaborator} rejected the request: {reason}")]
    Rejected { collaborator: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
