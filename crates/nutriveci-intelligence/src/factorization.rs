// ABOUTME: Biased matrix factorization trained by stochastic gradient descent
// ABOUTME: Fits user/recipe biases and latent factors, then scores candidate recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci
//! Latent factor model for personalized recipe scoring
//!
//! The estimate for a user `u` and recipe `i` is
//! `mu + b_u + b_i + dot(p_u, q_i)` where `mu` is the global mean rating.
//! Training walks the interaction table in input order for a fixed number of
//! epochs, updating biases and factors with L2-regularized SGD steps.
//!
//! A [`TrainedModel`] is immutable. Retraining produces a new value that the
//! service layer publishes atomically, so readers never observe a partially
//! updated model.
#![allow(clippy::cast_precision_loss)] // Safe: interaction counts are far below 2^52

use crate::config::FactorizationConfig;
use chrono::{DateTime, Utc};
use nutriveci_core::errors::{PredictionError, TrainingError};
use nutriveci_core::models::{Interaction, RatingTriple, RecipeId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::TAU;
use tracing::{debug, info};

/// Trainer for the latent factor model
#[derive(Debug, Clone)]
pub struct LatentFactorModel {
    config: FactorizationConfig,
}

/// Parameters learned for one side of the factorization (users or recipes)
#[derive(Debug, Clone)]
struct FactorTable {
    biases: Vec<f64>,
    /// Row-major `len x factors` matrix
    factors: Vec<f64>,
}

impl FactorTable {
    fn random(len: usize, factors: usize, std_dev: f64, rng: &mut ChaCha8Rng) -> Self {
        Self {
            biases: vec![0.0; len],
            factors: (0..len * factors)
                .map(|_| sample_normal(rng) * std_dev)
                .collect(),
        }
    }

    fn row(&self, index: usize, factors: usize) -> &[f64] {
        &self.factors[index * factors..(index + 1) * factors]
    }

    fn all_finite(&self) -> bool {
        self.biases.iter().chain(&self.factors).all(|v| v.is_finite())
    }
}

/// Standard normal sample (Box-Muller)
fn sample_normal(rng: &mut ChaCha8Rng) -> f64 {
    // 1 - [0, 1) keeps the logarithm argument strictly positive
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

impl LatentFactorModel {
    /// Create a trainer with the given hyperparameters
    #[must_use]
    pub const fn new(config: FactorizationConfig) -> Self {
        Self { config }
    }

    /// Hyperparameters used by this trainer
    #[must_use]
    pub const fn config(&self) -> &FactorizationConfig {
        &self.config
    }

    /// Fit a model on a full snapshot of the interaction table
    ///
    /// Every record is one training sample; duplicate `(user, recipe)` pairs
    /// are not collapsed. `generation` is stamped on the result so callers can
    /// tell successive models apart.
    ///
    /// # Errors
    ///
    /// - `TrainingError::InsufficientData` if fewer than `min_interactions` records are supplied
    /// - `TrainingError::InvalidRating` if a rating is non-finite or outside the scale
    /// - `TrainingError::Diverged` if SGD produces non-finite parameters
    pub fn train(
        &self,
        interactions: &[Interaction],
        generation: u64,
    ) -> Result<TrainedModel, TrainingError> {
        let triples: Vec<RatingTriple<'_>> =
            interactions.iter().map(Interaction::as_triple).collect();
        self.train_triples(&triples, generation)
    }

    /// Fit a model on borrowed `(user, recipe, rating)` triples
    ///
    /// # Errors
    ///
    /// Same conditions as [`LatentFactorModel::train`]
    pub fn train_triples(
        &self,
        triples: &[RatingTriple<'_>],
        generation: u64,
    ) -> Result<TrainedModel, TrainingError> {
        let cfg = &self.config;
        if triples.len() < cfg.min_interactions {
            return Err(TrainingError::InsufficientData {
                required: cfg.min_interactions,
                available: triples.len(),
            });
        }

        for triple in triples {
            if !triple.rating.is_finite()
                || triple.rating < cfg.rating_min
                || triple.rating > cfg.rating_max
            {
                return Err(TrainingError::InvalidRating {
                    user_id: triple.user_id.to_owned(),
                    rating: triple.rating,
                    min: cfg.rating_min,
                    max: cfg.rating_max,
                });
            }
        }

        // Dense indices in first-seen order
        let mut user_index: HashMap<String, usize> = HashMap::new();
        let mut item_index: HashMap<RecipeId, usize> = HashMap::new();
        let samples: Vec<(usize, usize, f64)> = triples
            .iter()
            .map(|t| {
                let next_user = user_index.len();
                let u = *user_index
                    .entry(t.user_id.to_owned())
                    .or_insert(next_user);
                let next_item = item_index.len();
                let i = *item_index
                    .entry(t.recipe_id.clone())
                    .or_insert(next_item);
                (u, i, t.rating)
            })
            .collect();

        let global_mean = samples.iter().map(|(_, _, r)| r).sum::<f64>() / samples.len() as f64;

        let mut rng = cfg
            .random_seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        let k = cfg.factors;
        let mut users = FactorTable::random(user_index.len(), k, cfg.init_std_dev, &mut rng);
        let mut items = FactorTable::random(item_index.len(), k, cfg.init_std_dev, &mut rng);

        let lr = cfg.learning_rate;
        let reg = cfg.regularization;
        for epoch in 1..=cfg.epochs {
            let mut squared_error = 0.0;
            for &(u, i, rating) in &samples {
                let pu = &mut users.factors[u * k..(u + 1) * k];
                let qi = &mut items.factors[i * k..(i + 1) * k];
                let dot: f64 = pu.iter().zip(qi.iter()).map(|(a, b)| a * b).sum();
                let err = rating - (global_mean + users.biases[u] + items.biases[i] + dot);
                squared_error += err * err;

                users.biases[u] += lr * (err - reg * users.biases[u]);
                items.biases[i] += lr * (err - reg * items.biases[i]);
                for (puf, qif) in pu.iter_mut().zip(qi.iter_mut()) {
                    let (p, q) = (*puf, *qif);
                    *puf += lr * (err * q - reg * p);
                    *qif += lr * (err * p - reg * q);
                }
            }

            if !(users.all_finite() && items.all_finite()) {
                return Err(TrainingError::Diverged { epoch });
            }
            debug!(
                epoch,
                rmse = (squared_error / samples.len() as f64).sqrt(),
                "factorization epoch complete"
            );
        }

        let model = TrainedModel {
            global_mean,
            user_index,
            item_index,
            users,
            items,
            factors: k,
            rating_min: cfg.rating_min,
            rating_max: cfg.rating_max,
            generation,
            trained_at: Utc::now(),
            training_size: samples.len(),
        };

        info!(
            generation,
            interactions = model.training_size,
            users = model.user_count(),
            recipes = model.recipe_count(),
            "latent factor model trained"
        );
        Ok(model)
    }
}

/// Immutable fitted model
#[derive(Debug, Clone)]
pub struct TrainedModel {
    global_mean: f64,
    user_index: HashMap<String, usize>,
    item_index: HashMap<RecipeId, usize>,
    users: FactorTable,
    items: FactorTable,
    factors: usize,
    rating_min: f64,
    rating_max: f64,
    generation: u64,
    trained_at: DateTime<Utc>,
    training_size: usize,
}

/// Serializable description of a trained model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    /// Monotonic training counter
    pub generation: u64,
    /// When training finished
    pub trained_at: DateTime<Utc>,
    /// Interaction records used for training
    pub training_size: usize,
    /// Distinct users seen during training
    pub users: usize,
    /// Distinct recipes seen during training
    pub recipes: usize,
    /// Mean training rating
    pub global_mean: f64,
}

impl TrainedModel {
    /// Estimated rating for a user/recipe pair, clipped to the rating scale
    ///
    /// Unknown users or recipes contribute no bias and no factor term, so a
    /// pair where both are unknown scores the global mean.
    ///
    /// # Errors
    ///
    /// Returns `PredictionError::NonFinite` if the estimate is not a finite number
    pub fn predict(&self, user_id: &str, recipe_id: &RecipeId) -> Result<f64, PredictionError> {
        let user = self.user_index.get(user_id).copied();
        let item = self.item_index.get(recipe_id).copied();

        let mut estimate = self.global_mean;
        if let Some(u) = user {
            estimate += self.users.biases[u];
        }
        if let Some(i) = item {
            estimate += self.items.biases[i];
        }
        if let (Some(u), Some(i)) = (user, item) {
            estimate += self
                .users
                .row(u, self.factors)
                .iter()
                .zip(self.items.row(i, self.factors))
                .map(|(a, b)| a * b)
                .sum::<f64>();
        }

        if !estimate.is_finite() {
            return Err(PredictionError::NonFinite {
                user_id: user_id.to_owned(),
                recipe_id: recipe_id.to_string(),
            });
        }
        Ok(estimate.clamp(self.rating_min, self.rating_max))
    }

    /// Score every candidate independently, in parallel, preserving input order
    ///
    /// A failed prediction does not affect the others.
    #[must_use]
    pub fn predict_each<'a>(
        &self,
        user_id: &str,
        candidates: &[&'a RecipeId],
    ) -> Vec<(&'a RecipeId, Result<f64, PredictionError>)> {
        candidates
            .par_iter()
            .map(|&id| (id, self.predict(user_id, id)))
            .collect()
    }

    /// Mean rating of the training data
    #[must_use]
    pub const fn global_mean(&self) -> f64 {
        self.global_mean
    }

    /// Training counter stamped at fit time
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// When training finished
    #[must_use]
    pub const fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Number of interaction records used for training
    #[must_use]
    pub const fn training_size(&self) -> usize {
        self.training_size
    }

    /// Distinct users in the training data
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.user_index.len()
    }

    /// Distinct recipes in the training data
    #[must_use]
    pub fn recipe_count(&self) -> usize {
        self.item_index.len()
    }

    /// Serializable summary
    #[must_use]
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            generation: self.generation,
            trained_at: self.trained_at,
            training_size: self.training_size,
            users: self.user_count(),
            recipes: self.recipe_count(),
            global_mean: self.global_mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config() -> FactorizationConfig {
        FactorizationConfig {
            random_seed: Some(7),
            ..FactorizationConfig::default()
        }
    }

    fn table(rows: &[(&str, &str, f64)]) -> Vec<Interaction> {
        rows.iter()
            .map(|(u, r, rating)| Interaction::new(*u, RecipeId::local(*r), *rating))
            .collect()
    }

    fn ten_rows() -> Vec<Interaction> {
        table(&[
            ("u1", "a", 1.0),
            ("u1", "b", 0.5),
            ("u1", "c", 1.0),
            ("u2", "a", 0.5),
            ("u2", "d", 1.0),
            ("u2", "e", 0.5),
            ("u3", "b", 1.0),
            ("u3", "c", 0.5),
            ("u3", "e", 1.0),
            ("u4", "a", 1.0),
        ])
    }

    #[test]
    fn test_training_requires_minimum_interactions() {
        let model = LatentFactorModel::new(seeded_config());
        let rows = table(&[("u1", "a", 1.0), ("u1", "b", 0.5)]);
        let err = model.train(&rows, 1).unwrap_err();
        assert!(matches!(
            err,
            TrainingError::InsufficientData {
                required: 10,
                available: 2
            }
        ));
    }

    #[test]
    fn test_out_of_scale_rating_is_rejected() {
        let model = LatentFactorModel::new(seeded_config());
        let mut rows = ten_rows();
        rows[3].rating = 4.0;
        assert!(matches!(
            model.train(&rows, 1),
            Err(TrainingError::InvalidRating { .. })
        ));
    }

    #[test]
    fn test_predictions_stay_within_scale() {
        let model = LatentFactorModel::new(seeded_config())
            .train(&ten_rows(), 1)
            .unwrap();
        for user in ["u1", "u2", "u3", "u4", "stranger"] {
            for recipe in ["a", "b", "c", "d", "e", "zzz"] {
                let score = model.predict(user, &RecipeId::local(recipe)).unwrap();
                assert!((0.0..=1.0).contains(&score), "{user}/{recipe}: {score}");
            }
        }
    }

    #[test]
    fn test_unknown_pair_scores_global_mean() {
        let model = LatentFactorModel::new(seeded_config())
            .train(&ten_rows(), 1)
            .unwrap();
        let score = model.predict("nobody", &RecipeId::local("nothing")).unwrap();
        assert!((score - model.global_mean()).abs() < f64::EPSILON);
        assert!((model.global_mean() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_gives_same_model() {
        let trainer = LatentFactorModel::new(seeded_config());
        let first = trainer.train(&ten_rows(), 1).unwrap();
        let second = trainer.train(&ten_rows(), 2).unwrap();
        let id = RecipeId::local("d");
        assert!(
            (first.predict("u1", &id).unwrap() - second.predict("u1", &id).unwrap()).abs()
                < f64::EPSILON
        );
        assert_eq!(second.generation(), 2);
    }

    #[test]
    fn test_predict_each_preserves_order() {
        let model = LatentFactorModel::new(seeded_config())
            .train(&ten_rows(), 1)
            .unwrap();
        let candidates: Vec<RecipeId> = ["e", "d", "zzz", "a"]
            .into_iter()
            .map(RecipeId::local)
            .collect();
        let refs: Vec<&RecipeId> = candidates.iter().collect();
        let scored = model.predict_each("u1", &refs);
        let ids: Vec<&RecipeId> = scored.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, refs);
        assert!(scored.iter().all(|(_, score)| score.is_ok()));
    }

    #[test]
    fn test_identical_ratings_converge_to_constant() {
        let rows: Vec<Interaction> = (0..12)
            .map(|i| Interaction::new(format!("u{}", i % 4), RecipeId::local(i.to_string()), 1.0))
            .collect();
        let model = LatentFactorModel::new(FactorizationConfig {
            random_seed: Some(1),
            ..FactorizationConfig::default()
        })
        .train(&rows, 1)
        .unwrap();

        assert!((model.global_mean() - 1.0).abs() < 1e-12);
        for user in ["u0", "u1", "u2", "u3", "stranger"] {
            for recipe in (0..12).map(|i| i.to_string()).chain(["unseen".to_owned()]) {
                let score = model.predict(user, &RecipeId::local(recipe.as_str())).unwrap();
                assert!(score.is_finite());
                assert!((score - 1.0).abs() <= 0.2, "{user}/{recipe}: {score}");
            }
        }
        let unknown = model.predict("stranger", &RecipeId::local("unseen")).unwrap();
        assert!((unknown - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_reports_training_shape() {
        let model = LatentFactorModel::new(seeded_config())
            .train(&ten_rows(), 3)
            .unwrap();
        let summary = model.summary();
        assert_eq!(summary.generation, 3);
        assert_eq!(summary.training_size, 10);
        assert_eq!(summary.users, 4);
        assert_eq!(summary.recipes, 5);
    }
}
