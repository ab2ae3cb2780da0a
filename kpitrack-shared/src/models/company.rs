/// Company model and database operations
///
/// A company is the unit every metric row belongs to. Founders are stored in
/// their own table (see [`super::founder`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE companies (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     website VARCHAR(512),
///     bio TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Company model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID
    pub id: i64,

    /// Company name
    pub name: String,

    /// Public website
    pub website: Option<String>,

    /// Short description
    pub bio: Option<String>,

    /// When the company was added
    pub created_at: DateTime<Utc>,

    /// When the company was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub website: Option<String>,
    pub bio: Option<String>,
}

impl Company {
    /// Inserts a company
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateCompany,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, website, bio)
            VALUES ($1, $2, $3)
            RETURNING id, name, website, bio, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.website)
        .bind(data.bio)
        .fetch_one(executor)
        .await
    }

    /// Finds a company by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, website, bio, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Checks whether a company exists without loading it
    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Lists all companies, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, website, bio, created_at, updated_at
            FROM companies
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Deletes a company; founders and metric rows cascade
    ///
    /// Used by test teardown. No HTTP route exposes this.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
