// ABOUTME: Command-line interface for the NutriVeci recipe recommender
// ABOUTME: Imports catalogs, records interactions, manages profiles, and prints recommendations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! `NutriVeci` CLI
//!
//! Usage:
//! ```bash
//! # Import a Food.com export (first 5000 rows)
//! nutriveci-cli import foodcom RAW_recipes.json --limit 5000
//!
//! # Import locally curated recipes
//! nutriveci-cli import local recetas.json
//!
//! # Record a rating
//! nutriveci-cli interact --user ana --recipe foodcom:137739 --rating 5
//!
//! # Store a dietary profile
//! nutriveci-cli profile set --user ana --pathologies "hipertensión" --allergies "maní" --age 70
//!
//! # Ten recommendations
//! nutriveci-cli recommend --user ana --count 10
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nutriveci::catalog::CatalogFormat;
use nutriveci::config::{DatabaseUrl, ServerConfig};
use nutriveci::recommender::Recommender;
use nutriveci::stores::{SqliteStore, Stores};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "nutriveci-cli",
    about = "NutriVeci recipe recommender CLI",
    long_about = "Import recipe catalogs, record user interactions, manage dietary profiles, and produce recommendations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Import a recipe catalog file, replacing earlier imports of the same source
    Import {
        /// Catalog format: foodcom or local
        format: CatalogFormat,

        /// JSON array or JSON-lines file
        file: PathBuf,

        /// Read at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Recommend recipes for a user
    Recommend {
        /// User identifier
        #[arg(long)]
        user: String,

        /// Number of recipes (defaults to the configured result count)
        #[arg(long)]
        count: Option<usize>,

        /// Ignore the stored dietary profile
        #[arg(long)]
        no_profile_filter: bool,
    },

    /// Record one user-recipe interaction
    Interact {
        /// User identifier
        #[arg(long)]
        user: String,

        /// Recipe identifier, `<source>:<id>` or a legacy `foodcom_<id>`
        #[arg(long)]
        recipe: String,

        /// Rating on the configured scale
        #[arg(long, default_value_t = 1.0)]
        rating: f64,
    },

    /// Dietary profile management
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Refit the latent factor model from every stored interaction
    Retrain,

    /// Show store and model status
    Status,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ProfileCommand {
    /// Store a profile (replaces any previous one)
    Set {
        /// User identifier
        #[arg(long)]
        user: String,

        /// Comma-separated pathologies
        #[arg(long, default_value = "")]
        pathologies: String,

        /// Comma-separated allergies
        #[arg(long, default_value = "")]
        allergies: String,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,
    },

    /// Print the stored profile
    Show {
        /// User identifier
        #[arg(long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if cli.verbose {
        config.logging.level = "debug".into();
    }
    config.logging.init()?;

    if let Some(url) = &cli.database_url {
        config.database = DatabaseUrl::parse_url(url);
    }

    let store = Arc::new(SqliteStore::open(&config.database).await?);
    let recommender = Recommender::new(Stores::from_shared(store.clone()), config.recommender);

    match cli.command {
        Command::Import {
            format,
            file,
            limit,
        } => commands::catalog::import(&store, format, &file, limit).await?,
        Command::Recommend {
            user,
            count,
            no_profile_filter,
        } => commands::recommend::recommend(&recommender, &user, count, !no_profile_filter).await?,
        Command::Interact {
            user,
            recipe,
            rating,
        } => commands::recommend::interact(&recommender, &user, &recipe, rating).await?,
        Command::Profile(ProfileCommand::Set {
            user,
            pathologies,
            allergies,
            age,
        }) => commands::profile::set(&recommender, &user, &pathologies, &allergies, age).await?,
        Command::Profile(ProfileCommand::Show { user }) => {
            commands::profile::show(&recommender, &user).await?;
        }
        Command::Retrain => commands::recommend::retrain(&recommender).await?,
        Command::Status => commands::catalog::status(&store, &recommender).await?,
    }

    Ok(())
}
