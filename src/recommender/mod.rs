// ABOUTME: Recommendation orchestrator module
// ABOUTME: Service object, published-model slot, and result diagnostics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! # Recommendation Orchestrator
//!
//! `recommend(user, n, filter_by_profile)`:
//!
//! 1. read the catalog, the interaction log and (optionally) the profile
//! 2. pick the model path only for users with enough distinct interactions
//!    when a model is published and something is left unseen
//! 3. filter unseen recipes with the profile, relaxing if nothing survives
//! 4. rank by model score or by popularity and keep the first `n`
//!
//! Retraining is triggered by [`Recommender::add_interaction`] or
//! [`Recommender::retrain`] and publishes a new model atomically.

/// Result and diagnostic types
pub mod diagnostics;
/// Published model holder
pub mod model_slot;
mod service;

pub use diagnostics::{AppendOutcome, Diagnostic, ModelStatus, Recommendations, Strategy};
pub use model_slot::ModelSlot;
pub use service::Recommender;
