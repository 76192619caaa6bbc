// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Rating conventions, recommendation thresholds, and nutrient limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.
//! Every threshold here is only a default: the recommender reads the effective
//! values from its configuration.

/// Rating conventions for implicit feedback
///
/// Ratings are NOT a 1-5 star scale: they encode how strongly a user engaged
/// with a recipe.
pub mod ratings {
    /// Recipe was viewed
    pub const VIEWED: f64 = 0.5;
    /// Recipe was saved or marked as favorite
    pub const SAVED: f64 = 1.0;
    /// Lower bound of the rating scale
    pub const SCALE_MIN: f64 = 0.0;
    /// Upper bound of the rating scale
    pub const SCALE_MAX: f64 = 1.0;
}

/// Latent factor model defaults
pub mod factorization {
    /// Latent dimensionality (k)
    pub const DEFAULT_FACTORS: usize = 20;
    /// Number of passes over the interaction table
    pub const DEFAULT_EPOCHS: usize = 10;
    /// SGD step size
    pub const DEFAULT_LEARNING_RATE: f64 = 0.005;
    /// L2 regularization applied to biases and factors
    pub const DEFAULT_REGULARIZATION: f64 = 0.02;
    /// Standard deviation of the initial factor values
    pub const DEFAULT_INIT_STD_DEV: f64 = 0.1;
    /// Minimum number of interactions required to train
    pub const MIN_TRAINING_INTERACTIONS: usize = 10;
}

/// Strategy selection defaults
pub mod strategy {
    /// Distinct interacted recipes a user needs before the model path is used
    pub const COLD_START_MIN_INTERACTIONS: usize = 3;
    /// Number of recommendations when the caller does not specify one
    pub const DEFAULT_RESULTS: usize = 5;
    /// Upper bound for a single recommendation request
    pub const MAX_RESULTS: usize = 20;
}

/// Dietary filter defaults (units as stored in the catalog, unconverted)
pub mod dietary {
    /// Recipes at or above this sodium value are excluded for hypertension
    pub const SODIUM_LIMIT: f64 = 500.0;
    /// Recipes at or above this sugar value are excluded for diabetes
    pub const SUGAR_LIMIT: f64 = 10.0;
    /// Users strictly older than this prefer non-hard recipes
    pub const SENIOR_AGE: u32 = 65;
    /// Pathology tokens that belong to the hypertension family
    pub const HYPERTENSION_TERMS: &[&str] = &[
        "hipertension",
        "hipertensión",
        "hypertension",
        "presion alta",
        "presión alta",
        "high blood pressure",
    ];
    /// Pathology tokens that trigger the sugar rule
    pub const DIABETES_TERMS: &[&str] = &["diabetes"];
    /// Tokens meaning "nothing to declare" in free-text profile answers
    pub const NONE_MARKERS: &[&str] = &["none", "ninguno", "ninguna", "no", "n/a"];
}

/// Service identity used in structured logs
pub mod service_names {
    /// Service name for the recommendation engine
    pub const NUTRIVECI: &str = "nutriveci";
}
