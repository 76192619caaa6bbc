// ABOUTME: Recommendation intelligence: latent factor model, profile filter, popularity ranking
// ABOUTME: Pure computation over in-memory snapshots, no I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

#![deny(unsafe_code)]

//! # `NutriVeci` Intelligence
//!
//! The algorithmic half of the recommender. Everything here operates on fully
//! materialized snapshots handed in by the service layer:
//!
//! - [`factorization`]: biased matrix factorization trained by SGD
//! - [`profile_filter`]: hard dietary constraints with a non-empty guarantee
//! - [`popularity`]: interaction-count ranking for cold-start users
//! - [`config`]: tunables for all of the above

/// Recommender configuration (factorization, strategy, filter)
pub mod config;

/// Latent factor model training and prediction
pub mod factorization;

/// Dietary profile filtering of candidate recipes
pub mod profile_filter;

/// Popularity ranking used when personalized scores are unavailable
pub mod popularity;

pub use config::{ConfigError, RecommenderConfig};
pub use factorization::{LatentFactorModel, ModelSummary, TrainedModel};
pub use profile_filter::{ExclusionReason, FilterOutcome, ProfileFilter};
pub use popularity::PopularityRanker;
