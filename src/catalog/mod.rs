// ABOUTME: Recipe catalog loading from Food.com exports and locally curated recipe files
// ABOUTME: Validated list-field decoding and wholesale catalog replacement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! # Catalog Import
//!
//! Two input shapes are supported:
//!
//! - **Food.com** rows (JSON array or JSON lines). `ingredients`, `steps` and
//!   `tags` may be JSON arrays or serialized list literals; nutrition is
//!   either flattened columns or the Food.com `nutrition` list.
//! - **Local** recipe files (JSON array). A missing `id` is derived from the
//!   recipe name.
//!
//! Importing one source rebuilds the catalog: recipes from other sources are
//! kept, recipes from the imported source are replaced.

/// Row decoding and store replacement
pub mod import;
/// Strict list literal parsing
pub mod list_field;

pub use import::{parse_catalog, CatalogFormat, CatalogImporter, ImportReport};

use nutriveci_core::errors::{AppError, ErrorCode, ListFieldError, StoreError};
use thiserror::Error;

/// Errors raised while importing a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The document (or a JSON line) is not valid JSON of the expected shape
    #[error("row {row}: invalid JSON: {source}")]
    Json {
        /// 1-based row (or line) number
        row: usize,
        /// Decoder error
        source: serde_json::Error,
    },

    /// A list field failed validation
    #[error("row {row}: field '{field}': {source}")]
    ListField {
        /// 1-based row number
        row: usize,
        /// Offending column
        field: &'static str,
        /// Parse error
        source: ListFieldError,
    },

    /// Persisting the catalog failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CatalogError> for AppError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Store(store) => store.into(),
            CatalogError::Io(io) => io.into(),
            other @ CatalogError::Json { .. } => {
                Self::new(ErrorCode::SerializationError, other.to_string())
            }
            other @ CatalogError::ListField { .. } => {
                Self::new(ErrorCode::InvalidFormat, other.to_string())
            }
        }
    }
}
