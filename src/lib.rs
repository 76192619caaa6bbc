// ABOUTME: Main library entry point for the NutriVeci hybrid recipe recommender
// ABOUTME: Wires stores, catalog import, configuration, and the recommendation orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

#![deny(unsafe_code)]

//! # `NutriVeci`
//!
//! A hybrid recipe recommender: a latent factor model for users with enough
//! history, popularity ranking for everyone else, and hard dietary
//! constraints derived from each user's health profile.
//!
//! ## Architecture
//!
//! - **`nutriveci-core`**: models, constants, error types
//! - **`nutriveci-intelligence`**: factorization, profile filter, popularity
//! - **stores**: catalog, interaction, and profile persistence
//! - **catalog**: Food.com and local recipe import
//! - **recommender**: the orchestrating service object
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nutriveci::config::RecommenderConfig;
//! use nutriveci::recommender::Recommender;
//! use nutriveci::stores::{InMemoryStore, Stores};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let stores = Stores::from_shared(Arc::new(InMemoryStore::new()));
//!     let recommender = Recommender::new(stores, RecommenderConfig::default());
//!     let result = recommender.recommend("user-1", 5, true).await;
//!     println!("{} recipes via {:?}", result.recipes.len(), result.strategy);
//! }
//! ```

/// Catalog import from Food.com and local recipe files
pub mod catalog;

/// Process configuration (database, logging, recommender)
pub mod config;

/// Logging configuration and structured logging setup
pub mod logging;

/// Recommendation orchestrator
pub mod recommender;

/// Catalog, interaction, and profile stores
pub mod stores;

pub use nutriveci_core::{constants, errors, models};
pub use recommender::{Recommendations, Recommender, Strategy};
