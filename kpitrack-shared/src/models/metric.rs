/// Metric registry and per-metric row storage
///
/// Every tracked KPI lives in its own, structurally identical table. The
/// [`Metric`] enum is the registry: it maps the public metric key used in
/// request/response bodies to that table, and [`Metric::ALL`] fixes the order
/// in which metrics are listed.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sales (
///     id BIGSERIAL PRIMARY KEY,
///     company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     week DATE NOT NULL DEFAULT date_trunc('week', NOW())::date,
///     value JSONB NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// -- ...and the same for every other metric
/// ```
///
/// # Example
///
/// ```no_run
/// use kpitrack_shared::models::metric::{Metric, MetricEntry};
/// use serde_json::json;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let metric: Metric = "sales".parse()?;
/// MetricEntry::create(&pool, metric, 1, &json!(100)).await?;
///
/// let history = MetricEntry::list_for_company(&pool, metric, 1).await?;
/// assert_eq!(history.last().map(|e| &e.value), Some(&json!(100)));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgExecutor;
use std::fmt;
use std::str::FromStr;

/// Error returned when a key does not name a registered metric
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric: {0}")]
pub struct UnknownMetric(pub String);

/// A tracked KPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Sales,
    Traffic,
    Subscribers,
    Engagement,
    Mrr,
    Pilots,
    ActiveUsers,
    PayingUsers,
    Cpa,
    ProductReleases,
    Preorders,
    AutomationPercents,
    ConversionRate,
    MarketingSpent,
    #[serde(rename = "other_1")]
    Other1,
    #[serde(rename = "other_2")]
    Other2,
}

impl Metric {
    /// Every registered metric, in listing order
    pub const ALL: [Metric; 16] = [
        Metric::Sales,
        Metric::Traffic,
        Metric::Subscribers,
        Metric::Engagement,
        Metric::Mrr,
        Metric::Pilots,
        Metric::ActiveUsers,
        Metric::PayingUsers,
        Metric::Cpa,
        Metric::ProductReleases,
        Metric::Preorders,
        Metric::AutomationPercents,
        Metric::ConversionRate,
        Metric::MarketingSpent,
        Metric::Other1,
        Metric::Other2,
    ];

    /// Public key of the metric, as used in JSON bodies
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Sales => "sales",
            Metric::Traffic => "traffic",
            Metric::Subscribers => "subscribers",
            Metric::Engagement => "engagement",
            Metric::Mrr => "mrr",
            Metric::Pilots => "pilots",
            Metric::ActiveUsers => "active_users",
            Metric::PayingUsers => "paying_users",
            Metric::Cpa => "cpa",
            Metric::ProductReleases => "product_releases",
            Metric::Preorders => "preorders",
            Metric::AutomationPercents => "automation_percents",
            Metric::ConversionRate => "conversion_rate",
            Metric::MarketingSpent => "marketing_spent",
            Metric::Other1 => "other_1",
            Metric::Other2 => "other_2",
        }
    }

    /// Table holding this metric's rows
    ///
    /// Only ever returns one of the fixed names created by the migrations,
    /// so it is safe to interpolate into SQL.
    pub fn table(&self) -> &'static str {
        self.key()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|metric| metric.key() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// One weekly observation of a metric for a company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MetricEntry {
    /// Row ID (unique within the metric's table)
    pub id: i64,

    /// Owning company
    pub company_id: i64,

    /// Week the observation belongs to (Monday of that week)
    pub week: NaiveDate,

    /// Submitted value, a JSON number or string
    pub value: JsonValue,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the value was last written
    pub updated_at: DateTime<Utc>,
}

const ENTRY_COLUMNS: &str = "id, company_id, week, value, created_at, updated_at";

impl MetricEntry {
    /// Inserts a new row for the current week
    ///
    /// Accepts any executor so callers can run several inserts in one transaction.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        metric: Metric,
        company_id: i64,
        value: &JsonValue,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} (company_id, value) VALUES ($1, $2) RETURNING {}",
            metric.table(),
            ENTRY_COLUMNS
        );

        sqlx::query_as::<_, MetricEntry>(&sql)
            .bind(company_id)
            .bind(value)
            .fetch_one(executor)
            .await
    }

    /// Lists a company's rows for a metric, oldest week first
    pub async fn list_for_company(
        executor: impl PgExecutor<'_>,
        metric: Metric,
        company_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE company_id = $1 ORDER BY week ASC, id ASC",
            ENTRY_COLUMNS,
            metric.table()
        );

        sqlx::query_as::<_, MetricEntry>(&sql)
            .bind(company_id)
            .fetch_all(executor)
            .await
    }

    /// Finds the company's most recently updated row for a metric
    ///
    /// Ties on `updated_at` go to the newest row.
    pub async fn last_updated(
        executor: impl PgExecutor<'_>,
        metric: Metric,
        company_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE company_id = $1 ORDER BY updated_at DESC, id DESC LIMIT 1",
            ENTRY_COLUMNS,
            metric.table()
        );

        sqlx::query_as::<_, MetricEntry>(&sql)
            .bind(company_id)
            .fetch_optional(executor)
            .await
    }

    /// Overwrites the value of an existing row and bumps `updated_at`
    pub async fn update_value(
        executor: impl PgExecutor<'_>,
        metric: Metric,
        id: i64,
        value: &JsonValue,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "UPDATE {} SET value = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            metric.table(),
            ENTRY_COLUMNS
        );

        sqlx::query_as::<_, MetricEntry>(&sql)
            .bind(id)
            .bind(value)
            .fetch_one(executor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_order_starts_with_sales() {
        assert_eq!(Metric::ALL[0], Metric::Sales);
        assert_eq!(Metric::ALL[15], Metric::Other2);
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<&str> = Metric::ALL.iter().map(|m| m.key()).collect();
        assert_eq!(keys.len(), Metric::ALL.len());
    }

    #[test]
    fn test_parse_every_key() {
        for metric in Metric::ALL {
            assert_eq!(metric.key().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = "customers".parse::<Metric>().unwrap_err();
        assert_eq!(err, UnknownMetric("customers".to_string()));
        assert_eq!(err.to_string(), "unknown metric: customers");
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Sales".parse::<Metric>().is_err());
    }

    #[test]
    fn test_serde_matches_key() {
        for metric in Metric::ALL {
            let encoded = serde_json::to_value(metric).unwrap();
            assert_eq!(encoded, JsonValue::String(metric.key().to_string()));
        }
    }

    #[test]
    fn test_table_names_are_plain_identifiers() {
        for metric in Metric::ALL {
            assert!(metric
                .table()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
    }
}
