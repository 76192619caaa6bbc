// ABOUTME: Domain error types for the recommendation pipeline
// ABOUTME: Store, training, prediction, and list-field parsing errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! # Recommendation Error Types
//!
//! - `StoreError` - failures reported by catalog/interaction/profile stores
//! - `TrainingError` - latent factor model could not be fitted
//! - `PredictionError` - a single user/recipe pair could not be scored
//! - `ListFieldError` - a serialized list column could not be decoded
//!
//! Every variant here is recoverable inside the recommender; only the
//! conversion into `AppError` at the service boundary surfaces them.

use thiserror::Error;

/// Errors raised by the external store collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached or refused the operation
    #[error("{store} store unavailable: {reason}")]
    Unavailable {
        /// Which store failed (catalog, interactions, profiles)
        store: &'static str,
        /// Underlying reason
        reason: String,
    },

    /// A record that must exist is missing
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A stored JSON column failed to decode
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored list column failed validation
    #[error(transparent)]
    ListField(#[from] ListFieldError),

    /// Database driver error
    #[error("Database error: {0}")]
    Database(String),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Create an "unavailable" error for the given store
    pub fn unavailable(store: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            store,
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::unavailable("database", error.to_string())
            }
            other => Self::Database(other.to_string()),
        }
    }
}

/// Errors raised while fitting the latent factor model
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Fewer interactions than the training threshold
    #[error("insufficient interaction data: {available} available, {required} required")]
    InsufficientData {
        /// Minimum number of interactions required
        required: usize,
        /// Number of interactions supplied
        available: usize,
    },

    /// A rating outside the configured scale (or non-finite) was supplied
    #[error("rating {rating} for user '{user_id}' outside [{min}, {max}]")]
    InvalidRating {
        /// User that produced the rating
        user_id: String,
        /// Offending value
        rating: f64,
        /// Lower bound of the scale
        min: f64,
        /// Upper bound of the scale
        max: f64,
    },

    /// Optimisation produced non-finite parameters
    #[error("training diverged at epoch {epoch}")]
    Diverged {
        /// Epoch (1-based) where a non-finite value appeared
        epoch: usize,
    },
}

/// Errors raised while scoring a single user/recipe pair
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The model produced a non-finite estimate
    #[error("non-finite score for user '{user_id}' and recipe '{recipe_id}'")]
    NonFinite {
        /// User being scored
        user_id: String,
        /// Recipe being scored
        recipe_id: String,
    },
}

/// Typed parse error for list-of-strings / list-of-numbers text fields
///
/// Replaces dynamic evaluation of serialized list columns: input that is not a
/// plain list literal is rejected with the byte offset of the problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListFieldError {
    /// The field does not start with `[` or end with `]`
    #[error("expected a list literal, found {found:?}")]
    NotAList {
        /// Leading part of the offending input
        found: String,
    },

    /// A string literal was not closed before the end of the input
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString {
        /// Byte offset of the opening quote
        offset: usize,
    },

    /// An unsupported token was found where an element was expected
    #[error("unexpected {found:?} at offset {offset}")]
    UnexpectedToken {
        /// Byte offset of the token
        offset: usize,
        /// The offending character
        found: char,
    },

    /// An element is not a number where numbers were expected
    #[error("invalid number {value:?} at index {index}")]
    InvalidNumber {
        /// Element index inside the list
        index: usize,
        /// Element text
        value: String,
    },
}
