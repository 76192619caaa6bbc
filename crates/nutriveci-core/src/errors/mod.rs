// ABOUTME: Unified error handling system with standard error codes and context
// ABOUTME: Defines AppError, ErrorCode, and the recommendation error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! # Unified Error Handling System
//!
//! Service and binary boundaries report failures as [`AppError`], a code plus a
//! human-readable message, optional context, and a chained source. The
//! algorithm and store layers use narrow `thiserror` enums (see
//! [`recommendation`]) that convert into `AppError` with `?`.

/// Recommendation error taxonomy (store, training, prediction, parsing)
pub mod recommendation;

pub use recommendation::{ListFieldError, PredictionError, StoreError, TrainingError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// The provided input is invalid
    InvalidInput = 3000,
    /// A required field is missing
    MissingRequiredField = 3001,
    /// The data format is invalid
    InvalidFormat = 3002,
    /// The value is outside the acceptable range
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    /// The requested resource was not found
    ResourceNotFound = 4000,
    /// The resource is temporarily unavailable
    ResourceUnavailable = 4003,

    // Recommendation pipeline (5000-5999)
    /// Not enough interactions to train the latent factor model
    InsufficientData = 5000,
    /// Scoring a single user/recipe pair failed
    PredictionFailed = 5001,

    // Configuration (6000-6999)
    /// Configuration error encountered
    ConfigError = 6000,
    /// Configuration is invalid
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Internal error
    InternalError = 9000,
    /// Database operation failed
    DatabaseError = 9001,
    /// Storage operation failed
    StorageError = 9002,
    /// Data serialization/deserialization failed
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceUnavailable => "The resource is temporarily unavailable",
            Self::InsufficientData => "Not enough interaction data to train a model",
            Self::PredictionFailed => "Scoring a recipe for the user failed",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether the recommender handles this error locally instead of surfacing it
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData | Self::PredictionFailed | Self::ResourceUnavailable
        )
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<String>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            user_id: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.context.user_id = Some(user_id.into());
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        let code = match &error {
            StoreError::Unavailable { .. } => ErrorCode::ResourceUnavailable,
            StoreError::NotFound { .. } => ErrorCode::ResourceNotFound,
            StoreError::Serialization(_) | StoreError::ListField(_) => {
                ErrorCode::SerializationError
            }
            StoreError::Database(_) => ErrorCode::DatabaseError,
            StoreError::Io(_) => ErrorCode::StorageError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<TrainingError> for AppError {
    fn from(error: TrainingError) -> Self {
        let code = match &error {
            TrainingError::InsufficientData { .. } => ErrorCode::InsufficientData,
            TrainingError::InvalidRating { .. } => ErrorCode::ValueOutOfRange,
            TrainingError::Diverged { .. } => ErrorCode::InternalError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<PredictionError> for AppError {
    fn from(error: PredictionError) -> Self {
        Self::new(ErrorCode::PredictionFailed, error.to_string()).with_source(error)
    }
}

impl From<ListFieldError> for AppError {
    fn from(error: ListFieldError) -> Self {
        Self::new(ErrorCode::InvalidFormat, error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::new(ErrorCode::StorageError, error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::InsufficientData).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_DATA\"");
    }

    #[test]
    fn test_app_error_display_includes_description() {
        let error = AppError::invalid_input("rating 3.0 outside [0, 1]").with_user_id("u1");
        let rendered = error.to_string();
        assert!(rendered.starts_with("The provided input is invalid"));
        assert!(rendered.contains("rating 3.0"));
        assert_eq!(error.context.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_training_error_conversion_keeps_code() {
        let error: AppError = TrainingError::InsufficientData {
            required: 10,
            available: 4,
        }
        .into();
        assert_eq!(error.code, ErrorCode::InsufficientData);
        assert!(error.code.is_recoverable());
        assert!(std::error::Error::source(&error).is_some());
    }
}
