// ABOUTME: Core types and constants for the NutriVeci recipe recommendation platform
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

#![deny(unsafe_code)]

//! # NutriVeci Core
//!
//! Foundation crate providing shared types and constants for the NutriVeci
//! recommendation engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the
//!   recommendation error taxonomy (store, training, prediction, parsing)
//! - **models**: Recipes, interactions, and dietary profiles
//! - **constants**: Rating conventions and default thresholds

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Recipe, Interaction, `DietaryProfile`)
pub mod models;
