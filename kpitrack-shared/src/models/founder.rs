/// Founder model and database operations
///
/// Founders are listed on a company when it is created. A user account is
/// linked to a founder record by email, which is what grants a non-staff user
/// access to that company's metrics.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE founders (
///     id BIGSERIAL PRIMARY KEY,
///     company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     role VARCHAR(100),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Founder of a company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Founder {
    pub id: i64,

    /// Company this founder belongs to
    pub company_id: i64,

    pub name: String,

    /// Contact email, stored lowercased
    pub email: String,

    /// Role within the company (e.g. "CEO")
    pub role: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for adding a founder to a company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFounder {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

impl Founder {
    /// Adds a founder to a company
    pub async fn create(
        executor: impl PgExecutor<'_>,
        company_id: i64,
        data: CreateFounder,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Founder>(
            r#"
            INSERT INTO founders (company_id, name, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, name, email, role, created_at
            "#,
        )
        .bind(company_id)
        .bind(data.name)
        .bind(super::normalize_email(&data.email))
        .bind(data.role)
        .fetch_one(executor)
        .await
    }

    /// Lists a company's founders in the order they were added
    pub async fn list_by_company(pool: &PgPool, company_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Founder>(
            r#"
            SELECT id, company_id, name, email, role, created_at
            FROM founders
            WHERE company_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Finds the most recently added founder record with this email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Founder>(
            r#"
            SELECT id, company_id, name, email, role, created_at
            FROM founders
            WHERE email = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(super::normalize_email(email))
        .fetch_optional(pool)
        .await
    }
}
