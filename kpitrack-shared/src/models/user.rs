/// User model and database operations
///
/// A user is either staff (access to every company) or, optionally, linked to
/// a founder record, which ties them to exactly one company.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     staff BOOLEAN NOT NULL DEFAULT FALSE,
///     founder_id BIGINT REFERENCES founders(id) ON DELETE SET NULL,
///     registered_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use kpitrack_shared::models::user::{User, CreateUser};
/// use kpitrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "jane@demo.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     staff: false,
///     founder_id: None,
/// }).await?;
///
/// if let Some(account) = User::find_account(&pool, user.id).await? {
///     println!("company: {:?}", account.company_name);
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Email address, stored lowercased and unique across users
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Staff members may read and write every company's metrics
    pub staff: bool,

    /// Founder record this account is linked to, if any
    pub founder_id: Option<i64>,

    /// When the account was created
    pub registered_on: DateTime<Utc>,

    /// When the user last logged in
    pub last_login_at: Option<DateTime<Utc>>,
}

/// A user together with the company their founder record points at
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAccount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,

    /// Company ID via the linked founder record
    pub company_id: Option<i64>,

    /// Company name via the linked founder record
    pub company_name: Option<String>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (lowercased before storage)
    pub email: String,

    /// Argon2id password hash, never the plaintext password
    pub password_hash: String,

    pub staff: bool,

    pub founder_id: Option<i64>,
}

const USER_COLUMNS: &str =
    "u.id, u.email, u.password_hash, u.staff, u.founder_id, u.registered_on, u.last_login_at";

/// Unique constraint on `users.email`
pub const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Whether `err` is the violation [`User::create`] returns for a taken email
pub fn is_duplicate_email(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(EMAIL_CONSTRAINT),
        _ => false,
    }
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the email is taken; see
    /// [`is_duplicate_email`].
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, staff, founder_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, staff, founder_id, registered_on, last_login_at
            "#,
        )
        .bind(super::normalize_email(&data.email))
        .bind(data.password_hash)
        .bind(data.staff)
        .bind(data.founder_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users u WHERE u.id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users u WHERE u.email = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(super::normalize_email(email))
            .fetch_optional(pool)
            .await
    }

    /// Loads a user with their company resolved through the founder link
    pub async fn find_account(pool: &PgPool, id: i64) -> Result<Option<UserAccount>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {}, f.company_id AS company_id, c.name AS company_name
            FROM users u
            LEFT JOIN founders f ON f.id = u.founder_id
            LEFT JOIN companies c ON c.id = f.company_id
            WHERE u.id = $1
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, UserAccount>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Links every unlinked user with this email to a founder record
    ///
    /// Returns the number of accounts linked.
    pub async fn link_founder(
        executor: impl PgExecutor<'_>,
        email: &str,
        founder_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET founder_id = $2
            WHERE email = $1 AND founder_id IS NULL
            "#,
        )
        .bind(super::normalize_email(email))
        .bind(founder_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Records a successful login
    pub async fn update_last_login(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user by ID
    ///
    /// Used by test teardown. No HTTP route exposes this.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "john@demo.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            staff: false,
            founder_id: Some(3),
            registered_on: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "john@demo.com");
    }

    #[test]
    fn test_account_serializes_flat() {
        let account = UserAccount {
            user: sample_user(),
            company_id: Some(1),
            company_name: Some("Demo".to_string()),
        };

        let json = serde_json::to_value(account).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["company_id"], 1);
        assert_eq!(json["company_name"], "Demo");
    }
}
