// ABOUTME: SQLite-backed catalog, interaction, and profile store using sqlx
// ABOUTME: Runs schema migrations on connect and decodes list columns with typed errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! `SQLite` store
//!
//! List-valued columns (ingredients, steps, tags, pathologies, allergies) are
//! stored as JSON arrays. They are decoded with the strict list parser, so
//! rows written by older tools as list literals still load and anything else
//! surfaces as a `ListFieldError`.

use super::{CatalogStore, InteractionStore, ProfileStore, StoreResult};
use crate::catalog::list_field::parse_string_list;
use crate::config::DatabaseUrl;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nutriveci_core::errors::StoreError;
use nutriveci_core::models::{
    DietaryProfile, Difficulty, Interaction, NutritionFacts, Recipe, RecipeId, RecipeSource,
};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

/// `SQLite` implementation of all three stores
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Connect to `database_url` and run migrations
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the connection or a migration fails
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains("mode=")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = if database_url.contains(":memory:") {
            // Each pooled connection would otherwise get its own empty database
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePool::connect(&connection_options).await?
        };
        let store = Self { pool };
        store.migrate().await?;

        info!(database = %database_url, "sqlite store ready");
        Ok(store)
    }

    /// Connect to a typed database location, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be created or the connection fails
    pub async fn open(url: &DatabaseUrl) -> StoreResult<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Self::connect(&url.to_connection_string()).await
    }

    /// Create tables and indexes
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a statement fails
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                source TEXT NOT NULL,
                native_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                ingredients TEXT NOT NULL DEFAULT '[]',
                steps TEXT NOT NULL DEFAULT '[]',
                calories REAL,
                total_fat REAL,
                sugar REAL,
                sodium REAL,
                protein REAL,
                carbohydrates REAL,
                difficulty TEXT NOT NULL DEFAULT 'medium',
                tags TEXT NOT NULL DEFAULT '[]',
                PRIMARY KEY (source, native_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS interactions (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                recipe_source TEXT NOT NULL,
                recipe_native_id TEXT NOT NULL,
                rating REAL NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_interactions_user_id ON interactions(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS dietary_profiles (
                user_id TEXT PRIMARY KEY,
                pathologies TEXT NOT NULL DEFAULT '[]',
                allergies TEXT NOT NULL DEFAULT '[]',
                age INTEGER,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        debug!("sqlite migrations applied");
        Ok(())
    }

    fn recipe_from_row(row: &SqliteRow) -> StoreResult<Recipe> {
        let source: String = row.try_get("source")?;
        let native_id: String = row.try_get("native_id")?;
        let ingredients: String = row.try_get("ingredients")?;
        let steps: String = row.try_get("steps")?;
        let tags: String = row.try_get("tags")?;
        let difficulty: String = row.try_get("difficulty")?;

        Ok(Recipe {
            id: RecipeId::new(RecipeSource::from(source), native_id),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            ingredients: parse_string_list(&ingredients)?,
            steps: parse_string_list(&steps)?,
            nutrition: NutritionFacts {
                calories: row.try_get("calories")?,
                total_fat: row.try_get("total_fat")?,
                sugar: row.try_get("sugar")?,
                sodium: row.try_get("sodium")?,
                protein: row.try_get("protein")?,
                carbohydrates: row.try_get("carbohydrates")?,
            },
            difficulty: Difficulty::from_str_lossy(&difficulty),
            tags: parse_string_list(&tags)?.into_iter().collect(),
        })
    }

    fn interaction_from_row(row: &SqliteRow) -> StoreResult<Interaction> {
        let source: String = row.try_get("recipe_source")?;
        let native_id: String = row.try_get("recipe_native_id")?;
        let created_at: String = row.try_get("created_at")?;
        let timestamp = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::Database(format!("invalid created_at '{created_at}': {e}")))?
            .with_timezone(&Utc);

        Ok(Interaction {
            user_id: row.try_get("user_id")?,
            recipe_id: RecipeId::new(RecipeSource::from(source), native_id),
            rating: row.try_get("rating")?,
            timestamp,
        })
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn get_recipes(&self) -> StoreResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT source, native_id, name, description, ingredients, steps,
                   calories, total_fat, sugar, sodium, protein, carbohydrates,
                   difficulty, tags
            FROM recipes ORDER BY position
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::recipe_from_row).collect()
    }

    async fn replace_catalog(&self, recipes: Vec<Recipe>) -> StoreResult<usize> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM recipes").execute(&mut *tx).await?;

        for (position, recipe) in recipes.iter().enumerate() {
            sqlx::query(
                r"
                INSERT OR REPLACE INTO recipes (
                    source, native_id, position, name, description, ingredients, steps,
                    calories, total_fat, sugar, sodium, protein, carbohydrates,
                    difficulty, tags
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                ",
            )
            .bind(recipe.id.source.as_str())
            .bind(&recipe.id.native_id)
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(&recipe.name)
            .bind(&recipe.description)
            .bind(serde_json::to_string(&recipe.ingredients)?)
            .bind(serde_json::to_string(&recipe.steps)?)
            .bind(recipe.nutrition.calories)
            .bind(recipe.nutrition.total_fat)
            .bind(recipe.nutrition.sugar)
            .bind(recipe.nutrition.sodium)
            .bind(recipe.nutrition.protein)
            .bind(recipe.nutrition.carbohydrates)
            .bind(recipe.difficulty.as_str())
            .bind(serde_json::to_string(&recipe.tags)?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(recipes.len())
    }
}

#[async_trait]
impl InteractionStore for SqliteStore {
    async fn get_interactions(&self) -> StoreResult<Vec<Interaction>> {
        let rows = sqlx::query(
            r"
            SELECT user_id, recipe_source, recipe_native_id, rating, created_at
            FROM interactions ORDER BY seq
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::interaction_from_row).collect()
    }

    async fn append_interaction(&self, interaction: Interaction) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO interactions (user_id, recipe_source, recipe_native_id, rating, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(&interaction.user_id)
        .bind(interaction.recipe_id.source.as_str())
        .bind(&interaction.recipe_id.native_id)
        .bind(interaction.rating)
        .bind(interaction.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn interaction_count(&self) -> StoreResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM interactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn get_user_interactions(&self, user_id: &str) -> StoreResult<Vec<Interaction>> {
        let rows = sqlx::query(
            r"
            SELECT user_id, recipe_source, recipe_native_id, rating, created_at
            FROM interactions WHERE user_id = ?1 ORDER BY seq
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::interaction_from_row).collect()
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<DietaryProfile>> {
        let row = sqlx::query(
            "SELECT user_id, pathologies, allergies, age FROM dietary_profiles WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let pathologies: String = row.try_get("pathologies")?;
        let allergies: String = row.try_get("allergies")?;
        let age: Option<i64> = row.try_get("age")?;

        Ok(Some(
            DietaryProfile::new(user_id)
                .with_pathologies(parse_string_list(&pathologies)?)
                .with_allergies(parse_string_list(&allergies)?)
                .with_optional_age(age.and_then(|a| u32::try_from(a).ok())),
        ))
    }

    async fn set_profile(&self, user_id: &str, profile: DietaryProfile) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT OR REPLACE INTO dietary_profiles (user_id, pathologies, allergies, age, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(user_id)
        .bind(serde_json::to_string(&profile.pathologies)?)
        .bind(serde_json::to_string(&profile.allergies)?)
        .bind(profile.age.map(i64::from))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
