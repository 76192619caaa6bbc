// ABOUTME: Shared, replaceable slot holding the currently published trained model
// ABOUTME: Readers clone an Arc snapshot; retrains publish a finished model with one swap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use nutriveci_intelligence::TrainedModel;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Holder of the published model
///
/// The lock only guards the `Arc` pointer. A reader that took a snapshot keeps
/// scoring against it even if a newer model is published meanwhile.
#[derive(Debug, Default)]
pub struct ModelSlot {
    current: RwLock<Option<Arc<TrainedModel>>>,
    generations: AtomicU64,
}

impl ModelSlot {
    /// Empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently published model
    ///
    /// Returns `None` if nothing is published or the lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<TrainedModel>> {
        let Ok(current) = self.current.read() else {
            return None;
        };
        current.clone()
    }

    /// Whether a model is published
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Reserve the generation number for the next training run
    pub fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the published model
    ///
    /// A model older than the one already published is discarded. Returns
    /// whether `model` was published.
    pub fn publish(&self, model: TrainedModel) -> bool {
        let model = Arc::new(model);
        let Ok(mut current) = self.current.write() else {
            return false;
        };
        if current
            .as_ref()
            .is_some_and(|existing| existing.generation() > model.generation())
        {
            return false;
        }
        *current = Some(model);
        true
    }
}
