// ABOUTME: Recommendation orchestrator choosing between model and popularity strategies
// ABOUTME: Applies dietary filtering, records diagnostics, and retrains on interaction appends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use super::diagnostics::{AppendOutcome, Diagnostic, ModelStatus, Recommendations, Strategy};
use super::model_slot::ModelSlot;
use crate::stores::Stores;
use chrono::Utc;
use nutriveci_core::errors::{AppError, AppResult, ErrorCode, TrainingError};
use nutriveci_core::models::{DietaryProfile, Interaction, Recipe, RecipeId};
use nutriveci_intelligence::config::RetrainPolicy;
use nutriveci_intelligence::{
    LatentFactorModel, PopularityRanker, ProfileFilter, RecommenderConfig, TrainedModel,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Hybrid recipe recommender
///
/// Constructed once per process with its stores and configuration. All
/// methods take `&self`; share it behind an `Arc` across tasks.
pub struct Recommender {
    stores: Stores,
    config: RecommenderConfig,
    trainer: LatentFactorModel,
    filter: ProfileFilter,
    popularity: PopularityRanker,
    model: ModelSlot,
    retrain_lock: Mutex<()>,
}

/// Outcome of strategy selection
enum Path {
    Model(Arc<TrainedModel>),
    Popularity,
}

impl Recommender {
    /// Create a recommender over `stores`
    #[must_use]
    pub fn new(stores: Stores, config: RecommenderConfig) -> Self {
        Self {
            trainer: LatentFactorModel::new(config.factorization.clone()),
            filter: ProfileFilter::new(config.filter.clone()),
            popularity: PopularityRanker::new(config.factorization.random_seed),
            model: ModelSlot::new(),
            retrain_lock: Mutex::new(()),
            stores,
            config,
        }
    }

    /// Effective configuration
    #[must_use]
    pub const fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Result count used when the caller does not choose one
    #[must_use]
    pub const fn default_count(&self) -> usize {
        self.config.strategy.default_results
    }

    /// Currently published model, if any
    #[must_use]
    pub fn model(&self) -> Option<Arc<TrainedModel>> {
        self.model.snapshot()
    }

    /// Describe the published model
    #[must_use]
    pub fn model_status(&self) -> ModelStatus {
        ModelStatus {
            enabled: self.config.factorization.enabled,
            model: self.model.snapshot().map(|model| model.summary()),
            observed_at: Utc::now(),
        }
    }

    /// Recommend up to `n` unseen recipes for `user_id`
    ///
    /// Never fails: store errors and per-item scoring failures degrade the
    /// result and are reported in [`Recommendations::diagnostics`].
    #[instrument(skip(self), fields(user.id = %user_id))]
    pub async fn recommend(&self, user_id: &str, n: usize, filter_by_profile: bool) -> Recommendations {
        let mut diagnostics = Vec::new();
        if n == 0 {
            return Recommendations::empty(diagnostics);
        }
        let max = self.config.strategy.max_results;
        let count = n.min(max);
        if count != n {
            diagnostics.push(Diagnostic::CountClamped {
                requested: n,
                effective: count,
            });
        }

        // Gather
        let catalog = match self.stores.catalog.get_recipes().await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!(error = %e, "catalog store unavailable, returning no recommendations");
                diagnostics.push(Diagnostic::StoreUnavailable {
                    store: "catalog",
                    reason: e.to_string(),
                });
                return Recommendations::empty(diagnostics);
            }
        };
        let interactions = match self.stores.interactions.get_interactions().await {
            Ok(interactions) => interactions,
            Err(e) => {
                error!(error = %e, "interaction store unavailable, returning no recommendations");
                diagnostics.push(Diagnostic::StoreUnavailable {
                    store: "interactions",
                    reason: e.to_string(),
                });
                return Recommendations::empty(diagnostics);
            }
        };

        let mut profile_failed = false;
        let profile = if filter_by_profile {
            match self.stores.profiles.get_profile(user_id).await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(error = %e, "profile store unavailable, using unfiltered popularity");
                    diagnostics.push(Diagnostic::ProfileUnavailable {
                        reason: e.to_string(),
                    });
                    profile_failed = true;
                    None
                }
            }
        } else {
            None
        };

        let seen: HashSet<&RecipeId> = interactions
            .iter()
            .filter(|interaction| interaction.user_id == user_id)
            .map(|interaction| &interaction.recipe_id)
            .collect();
        let unseen: Vec<&Recipe> = catalog
            .iter()
            .filter(|recipe| !seen.contains(&recipe.id))
            .collect();

        let path = if profile_failed {
            Path::Popularity
        } else {
            self.select_path(seen.len(), unseen.is_empty(), &mut diagnostics)
        };

        let candidates = match &profile {
            Some(profile) => self.filter_candidates(profile, &unseen, &mut diagnostics),
            None => unseen,
        };

        let (strategy, ranked) = match path {
            Path::Model(model) => {
                match Self::rank_by_model(&model, user_id, &candidates, &mut diagnostics) {
                    Some(ranked) => (Strategy::Model, ranked),
                    None => (
                        Strategy::Popularity,
                        self.rank_by_popularity(candidates, &interactions),
                    ),
                }
            }
            Path::Popularity => (
                Strategy::Popularity,
                self.rank_by_popularity(candidates, &interactions),
            ),
        };

        let recipes = Self::assemble(&catalog, ranked.into_iter().take(count), &mut diagnostics);
        info!(
            strategy = %strategy,
            returned = recipes.len(),
            seen = seen.len(),
            diagnostics = diagnostics.len(),
            "recommendations produced"
        );

        Recommendations {
            recipes,
            strategy: Some(strategy),
            diagnostics,
        }
    }

    fn select_path(
        &self,
        distinct_seen: usize,
        nothing_unseen: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Path {
        let required = self.config.strategy.cold_start_min_interactions;
        if distinct_seen < required {
            debug!(interacted = distinct_seen, required, "cold start user");
            diagnostics.push(Diagnostic::ColdStart {
                interacted: distinct_seen,
                required,
            });
            return Path::Popularity;
        }
        if !self.config.factorization.enabled {
            diagnostics.push(Diagnostic::ModelDisabled);
            return Path::Popularity;
        }
        let Some(model) = self.model.snapshot() else {
            debug!("no trained model published");
            diagnostics.push(Diagnostic::NoModel);
            return Path::Popularity;
        };
        if nothing_unseen {
            diagnostics.push(Diagnostic::NothingUnseen);
            return Path::Popularity;
        }
        Path::Model(model)
    }

    fn filter_candidates<'a>(
        &self,
        profile: &DietaryProfile,
        unseen: &[&'a Recipe],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<&'a Recipe> {
        let outcome = self.filter.apply_refs(profile, unseen);
        if outcome.relaxed {
            warn!(
                excluded = outcome.excluded.len(),
                "dietary rules excluded every candidate, using unfiltered set"
            );
            diagnostics.push(Diagnostic::FilterRelaxed {
                excluded: outcome.excluded.len(),
            });
        } else if !outcome.excluded.is_empty() {
            debug!(excluded = outcome.excluded.len(), "dietary rules applied");
        }
        if outcome.difficulty_relaxed {
            diagnostics.push(Diagnostic::DifficultyPreferenceSkipped);
        }
        outcome.kept
    }

    /// Score candidates with the model; `None` when nothing could be scored
    fn rank_by_model(
        model: &TrainedModel,
        user_id: &str,
        candidates: &[&Recipe],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Vec<RecipeId>> {
        let ids: Vec<&RecipeId> = candidates.iter().map(|recipe| &recipe.id).collect();
        let mut scored: Vec<(&RecipeId, f64)> = Vec::with_capacity(ids.len());
        for (id, prediction) in model.predict_each(user_id, &ids) {
            match prediction {
                Ok(score) => scored.push((id, score)),
                Err(e) => {
                    warn!(recipe.id = %id, error = %e, "skipping recipe that failed to score");
                    diagnostics.push(Diagnostic::PredictionSkipped {
                        recipe_id: id.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if scored.is_empty() && !ids.is_empty() {
            warn!(candidates = ids.len(), "model path failed, falling back to popularity");
            diagnostics.push(Diagnostic::ModelPathFailed {
                candidates: ids.len(),
            });
            return None;
        }

        // sort_by is stable: equal scores keep catalog order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Some(scored.into_iter().map(|(id, _)| id.clone()).collect())
    }

    fn rank_by_popularity(
        &self,
        candidates: Vec<&Recipe>,
        interactions: &[Interaction],
    ) -> Vec<RecipeId> {
        self.popularity
            .rank(candidates, interactions)
            .into_iter()
            .map(|(recipe, _)| recipe.id.clone())
            .collect()
    }

    /// Map ranked identifiers back to catalog records, dropping unknown ones
    fn assemble(
        catalog: &[Recipe],
        ranked: impl Iterator<Item = RecipeId>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Recipe> {
        let index: HashMap<&RecipeId, &Recipe> =
            catalog.iter().map(|recipe| (&recipe.id, recipe)).collect();
        ranked
            .filter_map(|id| {
                let found = index.get(&id).map(|recipe| (*recipe).clone());
                if found.is_none() {
                    debug!(recipe.id = %id, "ranked recipe missing from catalog");
                    diagnostics.push(Diagnostic::UnknownRecipeDropped {
                        recipe_id: id.to_string(),
                    });
                }
                found
            })
            .collect()
    }

    /// Append an interaction, retraining when the policy says so
    ///
    /// The retrain (if any) runs to completion before this returns.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the user id is blank or the rating is non-finite or off-scale
    /// - a storage error if the append or the follow-up count fails
    #[instrument(skip(self), fields(user.id = %user_id, recipe.id = %recipe_id))]
    pub async fn add_interaction(
        &self,
        user_id: &str,
        recipe_id: RecipeId,
        rating: f64,
    ) -> AppResult<AppendOutcome> {
        if user_id.trim().is_empty() {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "user_id must not be empty",
            ));
        }
        let scale = &self.config.factorization;
        if !rating.is_finite() || rating < scale.rating_min || rating > scale.rating_max {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                format!(
                    "rating {rating} outside [{}, {}]",
                    scale.rating_min, scale.rating_max
                ),
            )
            .with_user_id(user_id)
            .with_resource_id(recipe_id.to_string()));
        }

        self.stores
            .interactions
            .append_interaction(Interaction::new(user_id, recipe_id, rating))
            .await?;
        let total_interactions = self.stores.interactions.interaction_count().await?;

        let retrained = if self.should_retrain(total_interactions) {
            self.retrain().await
        } else {
            false
        };

        Ok(AppendOutcome {
            total_interactions,
            retrained,
        })
    }

    fn should_retrain(&self, total: usize) -> bool {
        let threshold = self.config.factorization.min_interactions;
        if !self.config.factorization.enabled || total < threshold {
            return false;
        }
        match self.config.strategy.retrain_policy {
            RetrainPolicy::ThresholdCrossing => total == threshold || !self.model.is_published(),
            RetrainPolicy::EveryAppend => true,
        }
    }

    /// Refit the model from the full interaction table and publish it
    ///
    /// Returns whether a new model was published. Failures (model disabled,
    /// too little data, store errors, divergence) leave the previous model in
    /// place.
    pub async fn retrain(&self) -> bool {
        if !self.config.factorization.enabled {
            info!("retrain skipped: model-based scoring disabled");
            return false;
        }
        let _guard = self.retrain_lock.lock().await;

        let interactions = match self.stores.interactions.get_interactions().await {
            Ok(interactions) => interactions,
            Err(e) => {
                error!(error = %e, "retrain aborted: interaction store unavailable");
                return false;
            }
        };

        let generation = self.model.next_generation();
        let trainer = self.trainer.clone();
        let started = Instant::now();
        let training =
            tokio::task::spawn_blocking(move || trainer.train(&interactions, generation)).await;

        match training {
            Ok(Ok(model)) => {
                let published = self.model.publish(model);
                info!(
                    generation,
                    published,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "retrain finished"
                );
                published
            }
            Ok(Err(TrainingError::InsufficientData {
                required,
                available,
            })) => {
                debug!(required, available, "retrain skipped: insufficient data");
                false
            }
            Ok(Err(e)) => {
                error!(error = %e, "retrain failed");
                false
            }
            Err(e) => {
                error!(error = %e, "retrain task failed");
                false
            }
        }
    }

    /// Store the dietary profile for `user_id` (last write wins)
    ///
    /// # Errors
    ///
    /// Returns a storage error if the profile store fails
    pub async fn set_user_profile(&self, user_id: &str, profile: DietaryProfile) -> AppResult<()> {
        if user_id.trim().is_empty() {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "user_id must not be empty",
            ));
        }
        let profile = DietaryProfile {
            user_id: user_id.to_owned(),
            ..profile
        }
        .normalized();
        self.stores.profiles.set_profile(user_id, profile).await?;
        debug!(user.id = %user_id, "dietary profile stored");
        Ok(())
    }

    /// Stored dietary profile for `user_id`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the profile store fails
    pub async fn get_user_profile(&self, user_id: &str) -> AppResult<Option<DietaryProfile>> {
        Ok(self.stores.profiles.get_profile(user_id).await?)
    }
}
